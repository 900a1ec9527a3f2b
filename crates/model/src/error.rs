use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Referential-integrity violation at ingestion: edges referencing
    /// unknown nodes or forming self-loops. Fatal to the panel open; the
    /// offending edges are listed in full so the host can report them.
    #[error("invalid graph: {} offending edge(s): {}", edges.len(), edges.join(", "))]
    InvalidGraph { edges: Vec<String> },

    /// Two nodes were ingested with the same id.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },
}
