//! Host-side model of the procedural seascape.
//!
//! The fragment stage in `renderer` evaluates this exact algorithm per pixel on
//! the GPU; this crate mirrors it on the CPU with the same constants so the
//! numerics can be tested and still frames can be produced without a device.
//!
//! ```text
//!   Camera::ray ──▶ march::trace ──▶ shading::normal ──▶ shading::sea_color
//!                        │                  │
//!                        └── HeightField::coarse / fine ──┘
//! ```

pub mod camera;
pub mod frame;
pub mod height;
pub mod march;
pub mod noise;
mod params;
pub mod shading;

pub use camera::{Camera, Ray};
pub use frame::Scene;
pub use height::{sea_octave, HeightField};
pub use march::{trace, Hit, HitKind};
pub use params::SeaParams;
