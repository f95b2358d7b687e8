/// Block types produced by the Markdown block classifier
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// `## ` block, rendered as `<h3 class="wiki-h3">`
    Section(String),
    /// `### ` block, rendered as `<h4 class="wiki-h4">`
    Subsection(String),
    BulletList(Vec<ListLine>),
    OrderedList(Vec<ListLine>),
    Paragraph(String),
}

/// One line of a list block. Lines that don't carry the list marker stay raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListLine {
    Item(String), // Marker already stripped
    Raw(String),
}
