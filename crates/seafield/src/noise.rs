//! Hash-based value noise matching the fragment stage bit for bit in intent
//! (f32 `sin` on the host and the GPU may still differ in the last ulps).

use glam::{vec2, Vec2};

/// GLSL `fract`: always in `[0, 1)`, including for negative inputs.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mix`.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL `smoothstep`, tolerant of reversed edges.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in `[0, 1)` for a lattice point.
pub fn hash(p: Vec2) -> f32 {
    let h = p.dot(vec2(127.1, 311.7));
    fract(h.sin() * 43758.5453123)
}

/// Smooth value noise in `[-1, 1]`.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let bottom = mix(hash(i), hash(i + vec2(1.0, 0.0)), u.x);
    let top = mix(hash(i + vec2(0.0, 1.0)), hash(i + vec2(1.0, 1.0)), u.x);
    -1.0 + 2.0 * mix(bottom, top, u.y)
}
