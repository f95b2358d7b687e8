//! Blocklist HTML sanitizer.
//!
//! Strips script-capable markup from an HTML fragment with a fixed cascade of
//! regex substitutions:
//!
//! 1. `<script>` blocks, then any stray `<script` / `</script` tag
//! 2. inline event handlers (`onclick=`, `onerror=`, ...), quoted or not
//! 3. `javascript:` targets in `href` (becomes `#`) and `src` (becomes empty)
//! 4. denylisted elements: paired ones with their content, lone tags alone
//! 5. CSS `expression(...)`
//!
//! The cascade is repeated until the fragment stops changing, so removals that
//! splice a new dangerous construct together are caught on the next pass.
//! Nested splices peel off a layer or two per pass, so after [`MAX_PASSES`]
//! the fragment is given up on: every `<`, `=` and `(` left is escaped, which
//! no rule can match and no browser runs.
//!
//! This is not an allowlist parser. Anything not matched is left as text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{trace, warn};

/// Elements removed wherever they appear.
pub const DENIED_ELEMENTS: &[&str] = &[
    "iframe", "object", "embed", "form", "input", "button", "select", "textarea",
];

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script block pattern")
});

/// Unpaired open or close tag, including a truncated one at end of input.
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?script[^>]*>?").expect("script tag pattern"));

/// Handler attributes must follow whitespace, `/` or a quote, so `\b` loses
/// nothing and keeps words like "Bonjour=" intact.
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s*\bon\w+\s*=\s*(?:"[^"]*"?|'[^']*'?|[^\s>]*)"#)
        .expect("event handler pattern")
});

/// `javascript` with the tab and newline characters browsers drop from URLs
/// allowed between letters.
const JAVASCRIPT_SCHEME: &str =
    r"j[\t\n\r]*a[\t\n\r]*v[\t\n\r]*a[\t\n\r]*s[\t\n\r]*c[\t\n\r]*r[\t\n\r]*i[\t\n\r]*p[\t\n\r]*t\s*:";

static JAVASCRIPT_HREF: LazyLock<Regex> = LazyLock::new(|| javascript_attribute("href"));

static JAVASCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| javascript_attribute("src"));

fn javascript_attribute(name: &str) -> Regex {
    let scheme = JAVASCRIPT_SCHEME;
    Regex::new(&format!(
        r#"(?i)\b{name}\s*=\s*(?:"\s*{scheme}[^"]*"?|'\s*{scheme}[^']*'?|{scheme}[^\s>]*)"#
    ))
    .expect("javascript attribute pattern")
}

/// `(paired block, lone tag)` patterns for each denied element.
static DENIED_ELEMENT_PATTERNS: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    DENIED_ELEMENTS
        .iter()
        .map(|tag| {
            let paired = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("denied element block pattern");
            let lone =
                Regex::new(&format!(r"(?i)</?{tag}\b[^>]*>?")).expect("denied element tag pattern");
            (paired, lone)
        })
        .collect()
});

static CSS_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)expression\s*\([^)]*\)?").expect("css expression pattern")
});

/// Passes before a fragment that keeps changing is escaped wholesale.
pub const MAX_PASSES: usize = 16;

/// Sanitize an HTML fragment. Never fails; idempotent.
pub fn sanitize(html: &str) -> String {
    sanitize_counted(html).0
}

/// Sanitized fragment plus the number of cascade passes it took.
fn sanitize_counted(html: &str) -> (String, usize) {
    if html.is_empty() {
        return (String::new(), 0);
    }

    let mut current = html.to_string();
    let mut passes = 0usize;
    loop {
        if passes == MAX_PASSES {
            warn!(input_len = html.len(), "fragment did not settle, escaping markup");
            current = escape_remaining(&current);
            break;
        }
        passes += 1;
        let next = sanitize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }

    trace!(passes, input_len = html.len(), output_len = current.len(), "sanitized fragment");
    (current, passes)
}

/// Every rule needs one of these characters to match.
fn escape_remaining(html: &str) -> String {
    html.replace('<', "&lt;")
        .replace('=', "&#61;")
        .replace('(', "&#40;")
}

/// One run of the full cascade.
fn sanitize_pass(html: &str) -> String {
    let html = SCRIPT_BLOCK.replace_all(html, "");
    let html = replace(html, &SCRIPT_TAG, "");
    let html = replace(html, &EVENT_HANDLER, "");
    let html = replace(html, &JAVASCRIPT_HREF, r##"href="#""##);
    let mut html = replace(html, &JAVASCRIPT_SRC, r#"src="""#);
    for (paired, lone) in DENIED_ELEMENT_PATTERNS.iter() {
        html = replace(html, paired, "");
        html = replace(html, lone, "");
    }
    replace(html, &CSS_EXPRESSION, "").into_owned()
}

fn replace<'a>(text: Cow<'a, str>, pattern: &Regex, replacement: &str) -> Cow<'a, str> {
    let changed = match pattern.replace_all(&text, replacement) {
        Cow::Borrowed(_) => None,
        Cow::Owned(changed) => Some(changed),
    };
    changed.map_or(text, Cow::Owned)
}
