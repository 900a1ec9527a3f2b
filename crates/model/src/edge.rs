use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Derived from the endpoint pair; `ordinal > 0` disambiguates parallel
    /// edges between the same pair.
    pub(crate) fn derive(source: &NodeId, target: &NodeId, ordinal: usize) -> Self {
        if ordinal == 0 {
            Self(format!("{source}->{target}"))
        } else {
            Self(format!("{source}->{target}#{ordinal}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cardinality of a typed relationship edge (ERDG). Lineage edges carry no
/// relationship kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub fn label(self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "1:1",
            RelationshipKind::OneToMany => "1:N",
            RelationshipKind::ManyToOne => "N:1",
            RelationshipKind::ManyToMany => "N:M",
        }
    }
}

/// Host-supplied descriptor of a downstream view associated with an edge,
/// shown in the relationship tooltip. The core never fetches this data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownstreamView {
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Host-supplied edge description, before ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relationship: Option<RelationshipKind>,
    #[serde(default)]
    pub views: Vec<DownstreamView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub relationship: Option<RelationshipKind>,
    pub views: Vec<DownstreamView>,
}
