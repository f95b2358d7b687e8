//! Content rendering pipeline: detect, convert, sanitize, auto-link.
//!
//! [`SafeHtml`] is the only type this crate hands out for raw HTML injection,
//! and it can only be built at the end of [`ContentRenderer::render_as`].

use crate::autolink::{AutoLinkMode, AutoLinker, DEFAULT_PATH_PREFIX, EntityTable};
use crate::parser::Parser;
use crate::renderer::HtmlRenderer;
use crate::sanitizer::sanitize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Anything that looks like an opening tag marks the content as HTML. Tag
/// names are ASCII; a case-insensitive class would also take `K` (Kelvin)
/// and `ſ`.
static HTML_START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[A-Za-z].*>").expect("html start tag pattern"));

/// How a stored content string is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Html,
    Markdown,
}

impl ContentFormat {
    /// Heuristic used for content stored without a format tag.
    pub fn detect(raw: &str) -> Self {
        if HTML_START_TAG.is_match(raw) {
            ContentFormat::Html
        } else {
            ContentFormat::Markdown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Html => "html",
            ContentFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format tag carried by a record, `Auto` for legacy rows without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatHint {
    #[default]
    Auto,
    Html,
    Markdown,
}

impl FormatHint {
    pub fn resolve(self, raw: &str) -> ContentFormat {
        match self {
            FormatHint::Auto => ContentFormat::detect(raw),
            FormatHint::Html => ContentFormat::Html,
            FormatHint::Markdown => ContentFormat::Markdown,
        }
    }
}

impl From<ContentFormat> for FormatHint {
    fn from(format: ContentFormat) -> Self {
        match format {
            ContentFormat::Html => FormatHint::Html,
            ContentFormat::Markdown => FormatHint::Markdown,
        }
    }
}

/// Sanitized, auto-linked HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wrap in the `wiki-content` container the stylesheet targets.
    pub fn wrap_container(&self) -> String {
        format!("<div class=\"wiki-content\">{}</div>", self.0)
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: FormatHint,
    pub autolink: bool,
    pub mode: AutoLinkMode,
    pub path_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: FormatHint::Auto,
            autolink: true,
            mode: AutoLinkMode::First,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
        }
    }
}

/// Renders content fields against one entity table.
///
/// Build it once per page and reuse it for every field on that page; the
/// entity matcher is compiled in [`ContentRenderer::new`].
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    linker: Option<AutoLinker>,
    format: FormatHint,
}

impl ContentRenderer {
    pub fn new(entities: &EntityTable, options: &RenderOptions) -> Self {
        let linker = options
            .autolink
            .then(|| AutoLinker::new(entities, options.mode, &options.path_prefix));
        Self {
            linker,
            format: options.format,
        }
    }

    /// Render with the renderer's configured format hint.
    pub fn render(&self, text: Option<&str>) -> SafeHtml {
        self.render_as(text, self.format)
    }

    pub fn render_as(&self, text: Option<&str>, format: FormatHint) -> SafeHtml {
        let Some(raw) = text.filter(|raw| !raw.is_empty()) else {
            return SafeHtml::default();
        };

        let format = format.resolve(raw);
        let converted = match format {
            ContentFormat::Html => raw.to_string(),
            ContentFormat::Markdown => {
                let blocks = Parser::new().parse(raw);
                debug!(blocks = blocks.len(), "converted markdown");
                HtmlRenderer::new().render(&blocks)
            }
        };

        // Both paths go through the sanitizer
        let sanitized = sanitize(&converted);
        let linked = match &self.linker {
            Some(linker) => {
                let linked = linker.apply(&sanitized);
                // Inserted anchors can join text into markup the sanitizer
                // never saw.
                if linked.len() == sanitized.len() {
                    linked
                } else {
                    sanitize(&linked)
                }
            }
            None => sanitized,
        };

        debug!(%format, input_len = raw.len(), output_len = linked.len(), "rendered content");
        SafeHtml(linked)
    }
}

/// Render one content field with default options.
pub fn render(text: Option<&str>, entities: &EntityTable) -> SafeHtml {
    ContentRenderer::new(entities, &RenderOptions::default()).render(text)
}
