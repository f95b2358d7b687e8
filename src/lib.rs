/// Wiki content renderer: Markdown to HTML, sanitization and entity auto-linking
pub mod ast;
pub mod autolink;
pub mod config;
pub mod content;
pub mod error;
pub mod inline;
pub mod parser;
pub mod renderer;
pub mod sanitizer;

pub use autolink::{AutoLinkMode, AutoLinker, EntityRef, EntityTable, apply_auto_links};
pub use content::{ContentFormat, ContentRenderer, FormatHint, RenderOptions, SafeHtml, render};
pub use error::{Error, Result};
pub use sanitizer::sanitize;

use parser::Parser;
use renderer::HtmlRenderer;

/// Convert wiki Markdown to HTML. The output is not sanitized; use [`render`]
/// for anything that ends up in a page.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new();
    let blocks = parser.parse(markdown);
    let renderer = HtmlRenderer::new();
    renderer.render(&blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
    }

    #[test]
    fn test_unsanitized_conversion_keeps_markup() {
        assert_eq!(
            markdown_to_html("a <i>b</i>"),
            "<p class=\"wiki-paragraph\">a <i>b</i></p>"
        );
    }

    #[test]
    fn test_profile_scenario() {
        let table = EntityTable::new(vec![EntityRef::new("Jean Dupont", "jean-dupont")]);
        let html = render(
            Some("Jean Dupont est un **entrepreneur**.\n\n## Parcours\n\n* [LinkedIn](https://linkedin.com/in/jean)"),
            &table,
        );
        assert_eq!(
            html.as_str(),
            concat!(
                "<p class=\"wiki-paragraph\"><a href=\"/e/jean-dupont\">Jean Dupont</a> est un <strong>entrepreneur</strong>.</p>",
                "<h3 class=\"wiki-h3\">Parcours</h3>",
                "<ul class=\"wiki-list\"><li><a href=\"https://linkedin.com/in/jean\" target=\"_blank\" rel=\"noopener noreferrer\">LinkedIn</a></li></ul>",
            )
        );
    }
}
