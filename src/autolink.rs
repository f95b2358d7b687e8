//! Entity auto-linking for rendered HTML.
//!
//! Known entity names (published entrepreneurs, articles) found in the text
//! nodes of a fragment are wrapped in anchors pointing at their profile path.
//! Tags, attribute values and the content of existing `<a>` elements are never
//! touched.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, warn};

pub const DEFAULT_PATH_PREFIX: &str = "/e/";

/// Splits a fragment into tags and the text between them. Quoted attribute
/// values may contain `>`; a tag with an unbalanced quote ends at the first `>`.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:[^>"']|"[^"]*"|'[^']*')*>|<[^>]*>"#).expect("tag pattern")
});

/// Text that would read as an attribute once a tag boundary sits right before it.
static ATTRIBUTE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:on\w+|href|src)\s*=").expect("attribute-like pattern")
});

static ANCHOR_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<a(?:\s|>|/)").expect("anchor open pattern"));

static ANCHOR_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</a\s*>$").expect("anchor close pattern"));

/// A known entity and its canonical slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    pub slug: String,
}

impl EntityRef {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Ordered, read-only list of linkable entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTable {
    entries: Vec<EntityRef>,
}

impl EntityTable {
    pub fn new(entries: Vec<EntityRef>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of `{ "name": ..., "slug": ... }` objects and
    /// validate every slug.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<EntityRef> = serde_json::from_str(json)?;
        for entry in &entries {
            validate_slug(entry)?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[EntityRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EntityRef> for EntityTable {
    fn from_iter<I: IntoIterator<Item = EntityRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn validate_slug(entry: &EntityRef) -> Result<()> {
    if entry.slug.is_empty() {
        return Err(Error::InvalidEntity {
            name: entry.name.clone(),
            reason: "slug is empty".to_string(),
        });
    }
    if let Some(c) = entry
        .slug
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/')))
    {
        return Err(Error::InvalidEntity {
            name: entry.name.clone(),
            reason: format!("slug contains {c:?}"),
        });
    }
    Ok(())
}

/// Which occurrences of an entity name get linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoLinkMode {
    /// Only the first mention of each entity per fragment
    #[default]
    First,
    Every,
}

/// Compiled matcher for one entity table.
#[derive(Debug, Clone)]
pub struct AutoLinker {
    /// Alternation of all names, longest first, so leftmost-first matching
    /// picks the longest name starting at a position.
    matcher: Option<Regex>,
    /// Name -> escaped href
    targets: HashMap<String, String>,
    mode: AutoLinkMode,
}

impl AutoLinker {
    pub fn new(table: &EntityTable, mode: AutoLinkMode, path_prefix: &str) -> Self {
        let path_prefix = if is_valid_path_prefix(path_prefix) {
            path_prefix
        } else {
            warn!(
                path_prefix,
                default = DEFAULT_PATH_PREFIX,
                "invalid auto-link path prefix, using default"
            );
            DEFAULT_PATH_PREFIX
        };

        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for entry in table.entries() {
            if entry.name.trim().is_empty() {
                warn!(slug = %entry.slug, "skipping entity with empty name");
                continue;
            }
            if !seen.insert(entry.name.as_str()) {
                debug!(name = %entry.name, "duplicate entity name, keeping first entry");
                continue;
            }
            let href = format!("{}{}", path_prefix, entry.slug);
            ordered.push((entry.name.clone(), escape_attribute(&href)));
        }
        // Stable sort keeps table order among equal-length names
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let matcher = if ordered.is_empty() {
            None
        } else {
            let alternation = ordered
                .iter()
                .map(|(name, _)| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            match Regex::new(&alternation) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    // Only reachable when the compiled size limit is exceeded
                    warn!(error = %err, entities = ordered.len(), "entity matcher disabled");
                    None
                }
            }
        };

        Self {
            matcher,
            targets: ordered.into_iter().collect(),
            mode,
        }
    }

    /// Wrap entity mentions found in text nodes of `html`.
    pub fn apply(&self, html: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return html.to_string();
        };

        let mut output = String::with_capacity(html.len());
        let mut linked: HashSet<&str> = HashSet::new();
        let mut anchor_depth = 0usize;
        let mut last = 0;

        for tag in TAG.find_iter(html) {
            let text = &html[last..tag.start()];
            self.link_text(matcher, text, anchor_depth > 0, &mut linked, &mut output);

            let tag_str = tag.as_str();
            if ANCHOR_OPEN.is_match(tag_str) {
                anchor_depth += 1;
            } else if ANCHOR_CLOSE.is_match(tag_str) {
                anchor_depth = anchor_depth.saturating_sub(1);
            }
            output.push_str(tag_str);
            last = tag.end();
        }
        self.link_text(matcher, &html[last..], anchor_depth > 0, &mut linked, &mut output);

        output
    }

    fn link_text<'a>(
        &'a self,
        matcher: &Regex,
        text: &str,
        inside_anchor: bool,
        linked: &mut HashSet<&'a str>,
        output: &mut String,
    ) {
        if inside_anchor || text.is_empty() {
            output.push_str(text);
            return;
        }

        let mut last = 0;
        for found in matcher.find_iter(text) {
            let Some((name, href)) = self.target(found.as_str()) else {
                continue;
            };
            // The anchor tags would put a boundary before or after the name,
            // turning text like `Acmeonclick=` into a handler attribute.
            if ATTRIBUTE_LIKE.is_match(&text[found.start()..])
                || ATTRIBUTE_LIKE.is_match(&text[found.end()..])
            {
                continue;
            }
            // A longer name that was already linked still consumes its span,
            // so none of its shorter sub-names get linked inside it.
            if self.mode == AutoLinkMode::First && !linked.insert(name) {
                continue;
            }
            output.push_str(&text[last..found.start()]);
            output.push_str("<a href=\"");
            output.push_str(href);
            output.push_str("\">");
            output.push_str(found.as_str());
            output.push_str("</a>");
            last = found.end();
        }
        output.push_str(&text[last..]);
    }

    fn target(&self, name: &str) -> Option<(&str, &str)> {
        self.targets
            .get_key_value(name)
            .map(|(name, href)| (name.as_str(), href.as_str()))
    }
}

/// Link targets are site-relative paths that stay inside a quoted attribute.
pub fn is_valid_path_prefix(prefix: &str) -> bool {
    prefix.starts_with('/') && !prefix.starts_with("//") && !prefix.contains(['"', '<', '>'])
}

/// One-shot helper: compile the table and link `html`.
pub fn apply_auto_links(html: &str, table: &EntityTable, mode: AutoLinkMode) -> String {
    AutoLinker::new(table, mode, DEFAULT_PATH_PREFIX).apply(html)
}

fn escape_attribute(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
