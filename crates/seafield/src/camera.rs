//! Scripted fly-through camera and per-pixel ray construction.

use glam::{vec2, vec3, Mat3, Vec2, Vec3};

use crate::params::SeaParams;

/// Ray origin height above the mean sea plane.
const EYE_HEIGHT: f32 = 3.5;
/// Fraction of wall-clock time that drives the camera path.
const TIME_SCALE: f32 = 0.3;
/// Pointer pixels to camera-time seconds, before sensitivity.
const POINTER_TIME_SCALE: f32 = 0.01;
/// Strength of the fisheye-style bend toward the screen edges.
const LENS_BEND: f32 = 0.14;

/// Rotation built from Euler angles, column-major like the fragment stage.
pub fn from_euler(ang: Vec3) -> Mat3 {
    let a1 = vec2(ang.x.sin(), ang.x.cos());
    let a2 = vec2(ang.y.sin(), ang.y.cos());
    let a3 = vec2(ang.z.sin(), ang.z.cos());
    Mat3::from_cols(
        vec3(
            a1.y * a3.y + a1.x * a2.x * a3.x,
            a1.y * a2.x * a3.x + a3.y * a1.x,
            -a2.y * a3.x,
        ),
        vec3(-a2.y * a1.x, a1.y * a2.y, a2.x),
        vec3(
            a3.y * a1.x * a2.x + a1.y * a3.x,
            a1.x * a3.x - a1.y * a3.y * a2.x,
            a2.y * a3.y,
        ),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    camera_speed: f32,
    pointer_sensitivity: f32,
}

impl Camera {
    pub fn new(params: &SeaParams) -> Self {
        Self {
            camera_speed: params.camera_speed,
            pointer_sensitivity: params.pointer_sensitivity,
        }
    }

    /// Camera time: scaled elapsed time plus the pointer parallax offset.
    pub fn time(&self, elapsed: f32, pointer_x: f32) -> f32 {
        elapsed * TIME_SCALE + pointer_x * POINTER_TIME_SCALE * self.pointer_sensitivity
    }

    /// Eye position along the fly-through path.
    pub fn origin(&self, time: f32) -> Vec3 {
        vec3(0.0, EYE_HEIGHT, time * 5.0 * self.camera_speed)
    }

    /// Small swaying rotation applied to every view ray.
    pub fn sway(time: f32) -> Vec3 {
        vec3((time * 3.0).sin() * 0.1, time.sin() * 0.2 + 0.3, time)
    }

    /// View ray through `coord` (pixels, bottom-left origin).
    pub fn ray(&self, coord: Vec2, resolution: Vec2, time: f32) -> Ray {
        let mut uv = coord / resolution * 2.0 - Vec2::ONE;
        uv.x *= resolution.x / resolution.y;

        let mut dir = uv.extend(-2.0).normalize();
        dir.z += uv.length() * LENS_BEND;
        let dir = from_euler(Self::sway(time)).transpose() * dir.normalize();

        Ray {
            origin: self.origin(time),
            dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_matrix_is_orthonormal() {
        let m = from_euler(vec3(0.3, -1.1, 2.4));
        let product = m * m.transpose();
        assert!(product.abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn pointer_offsets_camera_time_by_sensitivity() {
        let camera = Camera::new(&SeaParams::default());
        let base = camera.time(10.0, 0.0);
        let shifted = camera.time(10.0, 250.0);
        assert!((base - 3.0).abs() < 1e-6);
        assert!((shifted - base - 250.0 * 0.01 * 0.1).abs() < 1e-5);
    }

    #[test]
    fn rays_are_unit_length_and_start_at_eye_height() {
        let camera = Camera::new(&SeaParams::default());
        let resolution = vec2(800.0, 600.0);
        for coord in [vec2(0.5, 0.5), vec2(400.0, 300.0), vec2(799.5, 599.5)] {
            let ray = camera.ray(coord, resolution, 1.7);
            assert!((ray.dir.length() - 1.0).abs() < 1e-5);
            assert!((ray.origin.y - EYE_HEIGHT).abs() < 1e-6);
        }
    }

    #[test]
    fn origin_advances_with_camera_speed() {
        let params = SeaParams {
            camera_speed: 0.5,
            ..SeaParams::default()
        };
        let camera = Camera::new(&params);
        assert!((camera.origin(4.0).z - 10.0).abs() < 1e-6);
    }
}
