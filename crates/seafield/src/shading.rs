//! Normals, sky gradient, Fresnel-blended sea colour and the final gamma curve.

use std::f32::consts::PI;

use glam::{vec3, Vec3};

use crate::height::HeightField;
use crate::noise::smoothstep;

/// Deep-water base colour.
pub const SEA_BASE: Vec3 = Vec3::new(0.0, 0.07, 0.15);
/// Scattered water tint.
pub const SEA_WATER_COLOR: Vec3 = Vec3::new(0.25 * 0.7, 0.6 * 0.7, 0.9 * 0.7);
/// Exponent of the output colour curve.
pub const GAMMA: f32 = 0.65;

const FRESNEL_POWER: f32 = 3.0;
const FRESNEL_SCALE: f32 = 0.65;
const DIFFUSE_POWER: f32 = 80.0;
const SPECULAR_POWER: f32 = 60.0;

/// Fixed sun direction.
pub fn light_direction() -> Vec3 {
    vec3(0.0, 1.0, 0.8).normalize()
}

/// Finite-difference step for the normal: grows with squared distance and
/// shrinks with output width.
pub fn normal_epsilon(dist: Vec3, resolution_x: f32) -> f32 {
    dist.dot(dist) * (0.1 / resolution_x)
}

/// Surface normal from three fine-pass samples.
pub fn normal(field: &HeightField, p: Vec3, eps: f32) -> Vec3 {
    let center = field.fine(p);
    let dx = field.fine(vec3(p.x + eps, p.y, p.z)) - center;
    let dz = field.fine(vec3(p.x, p.y, p.z + eps)) - center;
    vec3(dx, eps, dz).normalize()
}

pub fn diffuse(n: Vec3, l: Vec3, power: f32) -> f32 {
    (n.dot(l) * 0.4 + 0.6).powf(power)
}

pub fn specular(n: Vec3, l: Vec3, eye: Vec3, power: f32) -> f32 {
    let normalization = (power + 8.0) / (PI * 8.0);
    reflect(eye, n).dot(l).max(0.0).powf(power) * normalization
}

fn reflect(incident: Vec3, n: Vec3) -> Vec3 {
    incident - 2.0 * n.dot(incident) * n
}

/// Vertical sky gradient seen along direction `e`.
pub fn sky_color(e: Vec3) -> Vec3 {
    let y = (e.y.max(0.0) * 0.8 + 0.2) * 0.8;
    vec3((1.0 - y).powi(2), 1.0 - y, 0.6 + (1.0 - y) * 0.4) * 1.1
}

/// Water colour at `p` seen from direction `eye`, `dist` away from the camera.
pub fn sea_color(p: Vec3, n: Vec3, light: Vec3, eye: Vec3, dist: Vec3, sea_height: f32) -> Vec3 {
    let fresnel = (1.0 - n.dot(-eye)).clamp(0.0, 1.0).powf(FRESNEL_POWER) * FRESNEL_SCALE;

    let reflected = sky_color(reflect(eye, n));
    let refracted = SEA_BASE + diffuse(n, light, DIFFUSE_POWER) * SEA_WATER_COLOR * 0.12;
    let mut color = refracted.lerp(reflected, fresnel);

    let atten = (1.0 - dist.dot(dist) * 0.001).max(0.0);
    color += SEA_WATER_COLOR * (p.y - sea_height) * 0.18 * atten;
    color += Vec3::splat(specular(n, light, eye, SPECULAR_POWER));
    color
}

/// Weight of the sea colour against the sky near the horizon.
pub fn horizon_blend(dir_y: f32) -> f32 {
    smoothstep(0.0, -0.02, dir_y).powf(0.2)
}

/// Output colour curve applied to the composite before display.
pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(GAMMA)
}
