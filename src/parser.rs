/// Block splitter and classifier for the wiki Markdown dialect
use crate::ast::{Block, ListLine};
use regex::Regex;
use std::sync::LazyLock;

/// Two or more consecutive newlines separate blocks.
static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("block separator pattern"));

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[*-] ").expect("bullet line pattern"));

static ORDERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[0-9]+\. ").expect("ordered line pattern"));

const SUBSECTION_PREFIX: &str = "### ";
const SECTION_PREFIX: &str = "## ";

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, input: &str) -> Vec<Block> {
        // Content saved from Windows browsers carries CRLF line endings
        let normalized = input.replace("\r\n", "\n");

        BLOCK_SEPARATOR
            .split(&normalized)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(classify_block)
            .collect()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify one trimmed block. First matching rule wins:
/// `### ` heading, `## ` heading, bullet list, ordered list, paragraph.
fn classify_block(block: &str) -> Block {
    if let Some(text) = block.strip_prefix(SUBSECTION_PREFIX) {
        Block::Subsection(text.to_string())
    } else if let Some(text) = block.strip_prefix(SECTION_PREFIX) {
        Block::Section(text.to_string())
    } else if BULLET_LINE.is_match(block) {
        Block::BulletList(split_list_lines(block, &BULLET_LINE))
    } else if ORDERED_LINE.is_match(block) {
        Block::OrderedList(split_list_lines(block, &ORDERED_LINE))
    } else {
        Block::Paragraph(block.to_string())
    }
}

fn split_list_lines(block: &str, marker: &Regex) -> Vec<ListLine> {
    block
        .split('\n')
        .map(|line| match marker.find(line) {
            Some(m) => ListLine::Item(line[m.end()..].to_string()),
            None => ListLine::Raw(line.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Block> {
        Parser::new().parse(input)
    }

    #[test]
    fn test_empty_input_has_no_blocks() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n   \n\n").is_empty());
    }

    #[test]
    fn test_blocks_split_on_blank_lines() {
        let blocks = parse("first\n\n\n\nsecond\nline");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("first".to_string()),
                Block::Paragraph("second\nline".to_string()),
            ]
        );
    }

    #[test]
    fn test_crlf_blocks_split() {
        let blocks = parse("one\r\n\r\ntwo");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(parse("## Parcours"), vec![Block::Section("Parcours".to_string())]);
        assert_eq!(parse("### Prix"), vec![Block::Subsection("Prix".to_string())]);
        // Single hash is not part of the dialect
        assert_eq!(parse("# Titre"), vec![Block::Paragraph("# Titre".to_string())]);
    }

    #[test]
    fn test_heading_wins_over_list_lines() {
        let blocks = parse("## Liens\n* a");
        assert_eq!(blocks, vec![Block::Section("Liens\n* a".to_string())]);
    }

    #[test]
    fn test_bullet_list_keeps_raw_lines() {
        let blocks = parse("intro\n* a\n- b");
        assert_eq!(
            blocks,
            vec![Block::BulletList(vec![
                ListLine::Raw("intro".to_string()),
                ListLine::Item("a".to_string()),
                ListLine::Item("b".to_string()),
            ])]
        );
    }

    #[test]
    fn test_bullet_checked_before_ordered() {
        let blocks = parse("1. one\n* two");
        assert_eq!(
            blocks,
            vec![Block::BulletList(vec![
                ListLine::Raw("1. one".to_string()),
                ListLine::Item("two".to_string()),
            ])]
        );
    }

    #[test]
    fn test_ordered_list() {
        let blocks = parse("1. un\n12. douze");
        assert_eq!(
            blocks,
            vec![Block::OrderedList(vec![
                ListLine::Item("un".to_string()),
                ListLine::Item("douze".to_string()),
            ])]
        );
    }

    #[test]
    fn test_emphasis_is_not_a_bullet() {
        assert_eq!(
            parse("**gras** texte"),
            vec![Block::Paragraph("**gras** texte".to_string())]
        );
    }
}
