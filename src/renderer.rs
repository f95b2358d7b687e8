/// HTML renderer for classified wiki blocks
use crate::ast::{Block, ListLine};
use crate::inline::{render_heading_inline, render_inline};

pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    /// Blocks carry their own tags, so they are concatenated without separators.
    pub fn render(&self, blocks: &[Block]) -> String {
        blocks.iter().map(render_block).collect()
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Section(text) => {
            format!("<h3 class=\"wiki-h3\">{}</h3>", render_heading_inline(text))
        }
        Block::Subsection(text) => {
            format!("<h4 class=\"wiki-h4\">{}</h4>", render_heading_inline(text))
        }
        Block::BulletList(lines) => {
            format!("<ul class=\"wiki-list\">{}</ul>", render_list_lines(lines))
        }
        Block::OrderedList(lines) => {
            format!("<ol class=\"wiki-list\">{}</ol>", render_list_lines(lines))
        }
        Block::Paragraph(text) => {
            let content = render_inline(text).replace('\n', "<br>");
            format!("<p class=\"wiki-paragraph\">{}</p>", content)
        }
    }
}

fn render_list_lines(lines: &[ListLine]) -> String {
    lines
        .iter()
        .map(|line| match line {
            ListLine::Item(text) => format!("<li>{}</li>", render_inline(text)),
            // Unmarked lines pass through untouched
            ListLine::Raw(text) => text.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn render(markdown: &str) -> String {
        HtmlRenderer::new().render(&Parser::new().parse(markdown))
    }

    #[test]
    fn test_section_heading() {
        assert_eq!(render("## Section"), "<h3 class=\"wiki-h3\">Section</h3>");
    }

    #[test]
    fn test_subsection_heading() {
        assert_eq!(
            render("### Distinctions **2021**"),
            "<h4 class=\"wiki-h4\">Distinctions <strong>2021</strong></h4>"
        );
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(
            render("* a\n* b"),
            "<ul class=\"wiki-list\"><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render("1. *un*\n2. deux"),
            "<ol class=\"wiki-list\"><li><em>un</em></li><li>deux</li></ol>"
        );
    }

    #[test]
    fn test_mixed_list_block_keeps_raw_line() {
        assert_eq!(
            render("Liens :\n- [Site](/e/acme)"),
            "<ul class=\"wiki-list\">Liens :<li><a href=\"/e/acme\">Site</a></li></ul>"
        );
    }

    #[test]
    fn test_paragraph_line_breaks() {
        assert_eq!(
            render("ligne une\nligne **deux**"),
            "<p class=\"wiki-paragraph\">ligne une<br>ligne <strong>deux</strong></p>"
        );
    }

    #[test]
    fn test_blocks_concatenate_in_order() {
        assert_eq!(
            render("Intro\n\n## Parcours\n\n- a"),
            "<p class=\"wiki-paragraph\">Intro</p><h3 class=\"wiki-h3\">Parcours</h3><ul class=\"wiki-list\"><li>a</li></ul>"
        );
    }
}
