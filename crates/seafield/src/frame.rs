//! Whole-pixel evaluation and a CPU reference renderer.
//!
//! [`Scene::pixel`] is the host twin of the fragment stage's `main`, which
//! makes it usable for still exports and for checking the GPU output by eye.

use glam::{vec2, Vec2, Vec3};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::height::HeightField;
use crate::march::trace;
use crate::params::SeaParams;
use crate::shading::{
    gamma_correct, horizon_blend, light_direction, normal, normal_epsilon, sea_color, sky_color,
};

/// Inputs shared by every pixel of one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    params: SeaParams,
    resolution: Vec2,
    elapsed: f32,
    pointer: Vec2,
}

impl Scene {
    pub fn new(params: SeaParams, width: u32, height: u32, elapsed: f32, pointer: Vec2) -> Self {
        Self {
            params,
            resolution: vec2(width.max(1) as f32, height.max(1) as f32),
            elapsed,
            pointer,
        }
    }

    /// Gamma-corrected colour at `coord` (pixels, bottom-left origin).
    pub fn pixel(&self, coord: Vec2) -> Vec3 {
        let camera = Camera::new(&self.params);
        let time = camera.time(self.elapsed, self.pointer.x);
        let field = HeightField::new(self.params, self.elapsed);
        let ray = camera.ray(coord, self.resolution, time);

        let hit = trace(&field, &ray, self.params.step_budget);
        let dist = hit.point - ray.origin;
        let n = normal(&field, hit.point, normal_epsilon(dist, self.resolution.x));
        let sea = sea_color(
            hit.point,
            n,
            light_direction(),
            ray.dir,
            dist,
            self.params.sea_height,
        );

        let color = sky_color(ray.dir).lerp(sea, horizon_blend(ray.dir.y));
        gamma_correct(color)
    }

    /// Renders the frame into tightly packed RGBA8 rows, top row first.
    pub fn render_rgba(&self) -> Vec<u8> {
        let width = self.resolution.x as usize;
        let height = self.resolution.y as usize;
        let mut pixels = vec![0u8; width * height * 4];
        pixels
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(row, line)| {
                let y = height as f32 - (row as f32 + 0.5);
                for (column, texel) in line.chunks_exact_mut(4).enumerate() {
                    let color = self.pixel(vec2(column as f32 + 0.5, y));
                    texel[0] = to_unorm8(color.x);
                    texel[1] = to_unorm8(color.y);
                    texel[2] = to_unorm8(color.z);
                    texel[3] = u8::MAX;
                }
            });
        pixels
    }
}

fn to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
