use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the outline a heading falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingKind {
    #[default]
    Normal,
    /// Auto-generated title of an appended data block (API, schema). Never
    /// shown in the outline; owned by the nearest preceding normal heading.
    RenderedDataTitle,
}

/// One heading element, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingDescriptor {
    #[serde(default)]
    pub id: String,
    pub level: u8,
    pub text: String,
    #[serde(default)]
    pub kind: HeadingKind,
}

impl HeadingDescriptor {
    pub fn normal(id: impl Into<String>, level: u8, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            text: text.into(),
            kind: HeadingKind::Normal,
        }
    }

    pub fn rendered_data(id: impl Into<String>, level: u8, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            text: text.into(),
            kind: HeadingKind::RenderedDataTitle,
        }
    }
}

/// The page's rank-1 title heading. Not an outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTitle {
    #[serde(default = "default_title_id")]
    pub id: String,
    pub text: String,
}

pub const TITLE_ID: &str = "toc-title";

fn default_title_id() -> String {
    TITLE_ID.to_string()
}

/// Everything the builder needs from a page: its title, headings in document
/// order and the ids already taken by other navigation on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub title: Option<PageTitle>,
    #[serde(default)]
    pub headings: Vec<HeadingDescriptor>,
    #[serde(default)]
    pub reserved_ids: Vec<String>,
}

/// One node of the displayed navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub id: String,
    pub label: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub owned_data_ids: BTreeSet<String>,
}

impl OutlineEntry {
    pub(crate) fn new(id: String, label: String, level: u8) -> Self {
        Self {
            id,
            label,
            level,
            children: Vec::new(),
            owned_data_ids: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    None,
    /// The URL fragment decides the highlighted entry.
    HashLocked,
    /// The highlighted entry follows what is on screen.
    ViewportTracked,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::HashLocked => write!(f, "hash-locked"),
            Self::ViewportTracked => write!(f, "viewport-tracked"),
        }
    }
}

/// Output format for `tocnav outline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
    Html,
}
