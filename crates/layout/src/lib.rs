//! Deterministic layered ("Sugiyama-style") layout for catalog graphs.
//!
//! A pure function from a [`catviz_model::GraphSnapshot`] to geometry: rank
//! assignment (longest path over a DAG, with a guarded cycle check), a
//! barycenter crossing-reduction heuristic, coordinate assignment driven by
//! the snapshot's computed node sizes, and per-column edge waypoint
//! routing. No randomness and no reliance on prior layout state.

mod engine;
mod order;
mod position;
mod rank;
mod route;
mod types;

pub use engine::LayoutEngine;
pub use types::{LayoutError, LayoutResult, Point, Rect};
