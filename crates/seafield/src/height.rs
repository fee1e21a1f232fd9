//! Multi-octave sea height field.
//!
//! Each octave warps the sample coordinate by value noise, folds it through a
//! ridged `1 - |sin|` / `|cos|` blend and sums two copies drifting in opposite
//! directions over time. Between octaves the coordinate is rotated and scaled
//! by [`OCTAVE_M`], the frequency grows by [`FREQ_GROWTH`], the amplitude
//! decays by [`AMP_DECAY`] and the choppiness relaxes toward one.

use glam::{vec2, Mat2, Vec2, Vec3};

use crate::noise::{mix, value_noise};
use crate::params::SeaParams;

/// Rotation/scale applied to the octave coordinate (`uv = OCTAVE_M * uv`).
pub const OCTAVE_M: Mat2 = Mat2::from_cols(Vec2::new(1.6, -1.2), Vec2::new(1.2, 1.6));
/// Frequency multiplier between octaves.
pub const FREQ_GROWTH: f32 = 1.9;
/// Amplitude multiplier between octaves.
pub const AMP_DECAY: f32 = 0.22;
/// Blend factor pulling choppiness toward 1.0 after each octave.
pub const CHOPPY_RELAX: f32 = 0.2;
/// Horizontal squash applied to x before the first octave.
const X_SQUASH: f32 = 0.75;

/// One ridged wave octave, in `[0, 1]`.
pub fn sea_octave(mut uv: Vec2, choppy: f32) -> f32 {
    uv += Vec2::splat(value_noise(uv));
    let wv = vec2(1.0 - uv.x.sin().abs(), 1.0 - uv.y.sin().abs());
    let swv = vec2(uv.x.cos().abs(), uv.y.cos().abs());
    let wv = wv + (swv - wv) * wv;
    (1.0 - (wv.x * wv.y).powf(0.65)).powf(choppy)
}

/// The sea surface at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct HeightField {
    params: SeaParams,
    time: f32,
}

impl HeightField {
    /// Freezes the field at `time` seconds since the clock started.
    pub fn new(params: SeaParams, time: f32) -> Self {
        Self { params, time }
    }

    /// Phase offset of the two drifting copies.
    pub fn sea_time(&self) -> f32 {
        1.0 + self.time * self.params.sea_speed
    }

    /// Surface elevation above the plane `y = 0` at `(x, z)`.
    pub fn height(&self, x: f32, z: f32, octaves: u32) -> f32 {
        let mut freq = self.params.sea_freq;
        let mut amp = self.params.sea_height;
        let mut choppy = self.params.sea_choppy;
        let mut uv = vec2(x * X_SQUASH, z);
        let drift = Vec2::splat(self.sea_time());

        let mut h = 0.0;
        for _ in 0..octaves {
            let mut d = sea_octave((uv + drift) * freq, choppy);
            d += sea_octave((uv - drift) * freq, choppy);
            h += d * amp;
            uv = OCTAVE_M * uv;
            freq *= FREQ_GROWTH;
            amp *= AMP_DECAY;
            choppy = mix(choppy, 1.0, CHOPPY_RELAX);
        }
        h
    }

    /// Signed distance of `p` above the surface: positive in the air.
    pub fn signed_height(&self, p: Vec3, octaves: u32) -> f32 {
        p.y - self.height(p.x, p.z, octaves)
    }

    /// Search-loop evaluation with the geometry octave count.
    pub fn coarse(&self, p: Vec3) -> f32 {
        self.signed_height(p, self.params.geometry_octaves)
    }

    /// Shading evaluation with the fragment octave count.
    pub fn fine(&self, p: Vec3) -> f32 {
        self.signed_height(p, self.params.fragment_octaves)
    }

    /// Amplitude weight of octave `index` (zero-based).
    pub fn octave_amplitude(&self, index: u32) -> f32 {
        self.params.sea_height * AMP_DECAY.powi(index as i32)
    }
}
