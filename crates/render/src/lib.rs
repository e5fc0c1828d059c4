//! Rendering Adapter: renderer-agnostic interface and scene description.
//!
//! # Invariants
//! - Renderers cannot mutate the session.
//! - Render state derives from the session and the chase camera.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{SceneStyle, rgb};
