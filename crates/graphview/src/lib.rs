//! Interactive view layer for catalog graphs: pan/zoom viewport, pointer
//! interaction state machine, stateless scene renderer, and the panel type
//! that owns one open viewer instance.

mod interaction;
mod overlay;
mod panel;
mod scene;
mod viewport;

pub use interaction::{
    HitTarget, InteractionAction, InteractionLayer, InteractionState, PointerEvent,
};
pub use overlay::{EdgeTooltip, HostCallbacks, NoopHost};
pub use panel::GraphPanel;
pub use scene::{
    Color, EdgeVisual, GridLine, NodeVisual, Renderer, RowGlyph, RowVisual, Scene, TooltipVisual,
};
pub use viewport::{ViewportController, ViewportSize, ViewportTransform};
