//! wgpu implementation of the render backend.
//!
//! - `context` owns the instance, device and surface and reconfigures the
//!   swapchain on resize.
//! - `pipeline` turns the two GLSL stages into a render pipeline and reflects
//!   the uniform block.
//! - `backend` holds the linked program, quad buffer and uniform buffer and
//!   implements [`RenderBackend`](crate::driver::RenderBackend).

mod backend;
mod context;
mod pipeline;

pub use backend::GpuBackend;
pub use pipeline::QUAD_VERTICES;
