use afriwiki_render::config::{self, RenderConfig};
use afriwiki_render::{AutoLinkMode, ContentFormat, ContentRenderer, FormatHint, sanitize};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "afriwiki-render")]
#[command(about = "Render AfriWiki content fields to safe HTML")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, convert, sanitize and auto-link a content field
    Render {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,

        /// TOML config file
        #[arg(short, long, env = "AFRIWIKI_RENDER_CONFIG")]
        config: Option<PathBuf>,

        /// JSON entity table, overrides the config
        #[arg(short, long)]
        entities: Option<PathBuf>,

        /// Content format, overrides the config
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Auto-link mode, overrides the config
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Wrap the output in the wiki-content container
        #[arg(short, long)]
        wrap: bool,
    },

    /// Sanitize an HTML fragment only
    Sanitize {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Print whether the input is treated as html or markdown
    Detect {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Html,
    Markdown,
}

impl From<FormatArg> for FormatHint {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => FormatHint::Auto,
            FormatArg::Html => FormatHint::Html,
            FormatArg::Markdown => FormatHint::Markdown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    First,
    Every,
}

impl From<ModeArg> for AutoLinkMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::First => AutoLinkMode::First,
            ModeArg::Every => AutoLinkMode::Every,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries only HTML
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            config: config_path,
            entities,
            format,
            mode,
            wrap,
        } => {
            let mut config = config::load_or_default(config_path.as_deref())
                .context("failed to load render config")?;
            apply_overrides(&mut config, entities, format, mode, wrap);

            let table = config
                .load_entities()
                .context("failed to load entity table")?;
            let renderer = ContentRenderer::new(&table, &config.render_options());

            let text = read_input(input.as_deref())?;
            let html = renderer.render(Some(&text));
            if config.content.wrap_container {
                println!("{}", html.wrap_container());
            } else {
                println!("{html}");
            }
            Ok(())
        }
        Commands::Sanitize { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", sanitize(&text));
            Ok(())
        }
        Commands::Detect { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", ContentFormat::detect(&text));
            Ok(())
        }
    }
}

fn apply_overrides(
    config: &mut RenderConfig,
    entities: Option<PathBuf>,
    format: Option<FormatArg>,
    mode: Option<ModeArg>,
    wrap: bool,
) {
    if let Some(entities) = entities {
        config.autolink.entities = Some(entities);
    }
    if let Some(format) = format {
        config.content.format = format.into();
    }
    if let Some(mode) = mode {
        config.autolink.mode = mode.into();
    }
    if wrap {
        config.content.wrap_container = true;
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
