use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rows shown in a collapsed node before the "show more" affordance kicks in.
pub const COLLAPSED_ROW_LIMIT: usize = 6;

pub const HEADER_HEIGHT: f64 = 28.0;
pub const ROW_HEIGHT: f64 = 22.0;

const BASE_WIDTH: f64 = 120.0;
const NAME_CHAR_WIDTH: f64 = 7.2;
const ROW_CHAR_WIDTH: f64 = 6.0;
const HEADER_PADDING: f64 = 24.0;
const BADGE_PADDING: f64 = 40.0;
const ROW_PADDING: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of catalog asset a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    DataSource,
    Table,
    View,
    Formula,
    Report,
    Dashboard,
    ModelArtifact,
}

impl NodeKind {
    /// Short label rendered in the header badge.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::DataSource => "source",
            NodeKind::Table => "table",
            NodeKind::View => "view",
            NodeKind::Formula => "formula",
            NodeKind::Report => "report",
            NodeKind::Dashboard => "dashboard",
            NodeKind::ModelArtifact => "model",
        }
    }
}

/// Key role of a content row, rendered as a glyph next to the row name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowKey {
    #[default]
    None,
    Primary,
    Reference,
}

/// One row of node content, e.g. a table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRow {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub key: RowKey,
}

impl ContentRow {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            key: RowKey::None,
        }
    }

    pub fn with_key(mut self, key: RowKey) -> Self {
        self.key = key;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Host-supplied node description, before ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub display_name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_rows: Vec<ContentRow>,
}

/// A node as owned by the model. `expanded` starts false on ingestion and
/// only [`crate::GraphModel::toggle_expand`] flips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    pub id: NodeId,
    pub display_name: String,
    pub kind: NodeKind,
    pub tags: BTreeSet<String>,
    pub content_rows: Vec<ContentRow>,
    pub expanded: bool,
}

impl CatalogNode {
    pub(crate) fn from_spec(spec: NodeSpec) -> Self {
        Self {
            id: NodeId::new(spec.id),
            display_name: spec.display_name,
            kind: spec.kind,
            tags: spec.tags.into_iter().collect(),
            content_rows: spec.content_rows,
            expanded: false,
        }
    }

    /// Whether the node has more rows than the collapsed view shows.
    pub fn is_expandable(&self) -> bool {
        self.content_rows.len() > COLLAPSED_ROW_LIMIT
    }

    /// Number of rows currently visible.
    pub fn visible_row_count(&self) -> usize {
        if self.expanded {
            self.content_rows.len()
        } else {
            self.content_rows.len().min(COLLAPSED_ROW_LIMIT)
        }
    }

    /// Number of rows hidden behind the "show more" affordance.
    pub fn hidden_row_count(&self) -> usize {
        self.content_rows.len() - self.visible_row_count()
    }

    /// Computed node size. Width comes from a character-width text measure
    /// of the header and rows; height is a pure function of the visible row
    /// count, so expand/collapse feeds straight into layout.
    pub fn size(&self) -> Size {
        let name_width = self.display_name.len() as f64 * NAME_CHAR_WIDTH + HEADER_PADDING;
        let badge_width = self.kind.label().len() as f64 * ROW_CHAR_WIDTH + BADGE_PADDING;
        let mut width = (name_width + badge_width).max(BASE_WIDTH);

        for row in &self.content_rows {
            let row_width =
                (row.name.len() + row.data_type.len()) as f64 * ROW_CHAR_WIDTH + ROW_PADDING;
            width = width.max(row_width);
        }

        let mut height = HEADER_HEIGHT + self.visible_row_count() as f64 * ROW_HEIGHT;
        // The affordance row ("show N more" / "show fewer") occupies a
        // normal row slot whenever there is anything to toggle.
        if self.is_expandable() {
            height += ROW_HEIGHT;
        }

        Size { width, height }
    }
}
