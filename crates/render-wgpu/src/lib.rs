//! wgpu render backend for the skatepark demo.
//!
//! Draws a lit ground slab with a grid overlay and the skateboard box,
//! viewed through the kernel's chase camera.
//!
//! # Invariants
//! - Renderer never mutates the session.
//! - Camera placement comes from the kernel; this crate only projects it.

mod camera;
mod gpu;
mod shaders;

pub use camera::ChaseCamera;
pub use gpu::SkateRenderer;
