//! GPU front end of the seascape renderer.
//!
//! The fragment stage does all the per-pixel work; this crate compiles it,
//! feeds it uniforms every frame and presents the result in a winit window.
//!
//! ```text
//!   seascape CLI
//!        │ RendererConfig
//!        ▼
//!   run_window ──▶ FrameDriver ──▶ GpuBackend ──▶ ocean.vert / ocean.frag
//!                      │  ▲
//!        resize/cursor ┘  └── UniformBlock (offsets reflected by naga)
//! ```
//!
//! `export_still` skips the GPU and renders one frame with `seafield`.

pub mod driver;
mod error;
pub mod gpu;
pub mod input;
pub mod runtime;
pub mod shader;
mod still;
mod types;
pub mod uniforms;
mod window;

pub use driver::{DriverState, FrameDriver, FrameSnapshot, RenderBackend, Resource};
pub use error::{RendererError, StageKind};
pub use runtime::{FixedTimeSource, SystemTimeSource, TimeSample, TimeSource};
pub use still::{export_still, StillRequest};
pub use types::{GpuPowerPreference, RendererConfig};
pub use window::run_window;
