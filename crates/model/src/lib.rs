//! In-memory graph model for the catalog viewers (lineage and ERDG).
//!
//! The model knows nothing about layout or rendering: it owns the node and
//! edge set, per-node display state (expanded/collapsed), and the computed
//! node sizes that the layout engine reads through immutable snapshots.

mod edge;
mod error;
mod graph;
mod node;

pub use edge::{DownstreamView, Edge, EdgeId, EdgeSpec, RelationshipKind};
pub use error::ModelError;
pub use graph::{GraphModel, GraphSnapshot};
pub use node::{
    CatalogNode, ContentRow, NodeId, NodeKind, NodeSpec, RowKey, Size, COLLAPSED_ROW_LIMIT,
    HEADER_HEIGHT, ROW_HEIGHT,
};
