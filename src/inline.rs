/// Inline substitution cascade for links and emphasis
///
/// Substitutions run in a fixed order. Links go first so their text can still
/// carry emphasis; `***` goes before `**`, which goes before `*`, so a shorter
/// delimiter never splits a longer one.
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static EXTERNAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)]+)\)").expect("external link pattern")
});

static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((/[^)]*)\)").expect("internal link pattern"));

/// Any link left after the two above: the target is not a usable URL.
static ANY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("link pattern"));

static STRONG_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("strong emphasis pattern"));

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("strong pattern"));

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("emphasis pattern"));

/// Full inline transform used by paragraphs and list items.
pub fn render_inline(text: &str) -> String {
    let text = EXTERNAL_LINK.replace_all(
        text,
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    );
    let text = replace(text, &INTERNAL_LINK, r#"<a href="${2}">${1}</a>"#);
    let text = replace(text, &ANY_LINK, "<strong>${1}</strong>");
    let text = replace(text, &STRONG_EMPHASIS, "<strong><em>${1}</em></strong>");
    let text = replace(text, &STRONG, "<strong>${1}</strong>");
    replace(text, &EMPHASIS, "<em>${1}</em>").into_owned()
}

/// Heading transform: links collapse to their text, only bold survives.
pub fn render_heading_inline(text: &str) -> String {
    let text = ANY_LINK.replace_all(text, "${1}");
    replace(text, &STRONG, "<strong>${1}</strong>").into_owned()
}

fn replace<'a>(text: Cow<'a, str>, pattern: &Regex, replacement: &str) -> Cow<'a, str> {
    let changed = match pattern.replace_all(&text, replacement) {
        Cow::Borrowed(_) => None,
        Cow::Owned(changed) => Some(changed),
    };
    changed.map_or(text, Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_link_opens_new_tab() {
        assert_eq!(
            render_inline("[Google](https://google.com)"),
            r#"<a href="https://google.com" target="_blank" rel="noopener noreferrer">Google</a>"#
        );
        assert_eq!(
            render_inline("[Site](http://example.org/a)"),
            r#"<a href="http://example.org/a" target="_blank" rel="noopener noreferrer">Site</a>"#
        );
    }

    #[test]
    fn test_internal_link_has_no_target() {
        assert_eq!(render_inline("[Home](/home)"), r#"<a href="/home">Home</a>"#);
    }

    #[test]
    fn test_malformed_link_degrades_to_strong() {
        assert_eq!(render_inline("[Bad](notaurl)"), "<strong>Bad</strong>");
        assert_eq!(
            render_inline("[x](javascript:alert(1))"),
            "<strong>x</strong>)"
        );
    }

    #[test]
    fn test_emphasis_cascade() {
        assert_eq!(
            render_inline("***both*** **bold** *it*"),
            "<strong><em>both</em></strong> <strong>bold</strong> <em>it</em>"
        );
    }

    #[test]
    fn test_emphasis_does_not_cross_lines() {
        assert_eq!(render_inline("*a\nb*"), "*a\nb*");
    }

    #[test]
    fn test_bold_link_text() {
        assert_eq!(
            render_inline("[**Acme**](/e/acme)"),
            r#"<a href="/e/acme"><strong>Acme</strong></a>"#
        );
    }

    #[test]
    fn test_heading_inline_strips_links_and_italics() {
        assert_eq!(
            render_heading_inline("Voir [LinkedIn](https://linkedin.com) et **plus** *ici*"),
            "Voir LinkedIn et <strong>plus</strong> *ici*"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(render_inline("Rien à signaler."), "Rien à signaler.");
    }
}
