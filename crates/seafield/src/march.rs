//! Ray / height-field intersection by guarded false position.

use glam::Vec3;

use crate::camera::Ray;
use crate::height::HeightField;

/// Convergence threshold on signed heights.
pub const EPSILON: f32 = 1e-3;
/// Far bound of the search interval along the ray.
pub const FAR_DISTANCE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Still above the surface at the far bound; the ray reaches the horizon.
    Escaped,
    /// A sample landed within [`EPSILON`] of the surface.
    Converged,
    /// The budget ran out or the bounds degenerated; best estimate returned.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,
    pub iterations: u32,
    pub kind: HitKind,
}

/// False-position estimate between a near bound `(tm, hm)` and a far bound
/// `(tx, hx)`. The weight is clamped so the estimate never leaves the
/// interval, even when the heights do not straddle zero. A non-finite weight
/// falls back to the near bound.
fn false_position(tm: f32, tx: f32, hm: f32, hx: f32) -> f32 {
    let weight = hm / (hm - hx);
    if !weight.is_finite() {
        return tm;
    }
    tm + (tx - tm) * weight.clamp(0.0, 1.0)
}

fn degenerate(hm: f32, hx: f32) -> bool {
    (hm - hx).abs() < EPSILON
}

/// Finds where `ray` meets the coarse height field within `step_budget`
/// iterations. Never fails: an exhausted budget yields the best estimate.
pub fn trace(field: &HeightField, ray: &Ray, step_budget: u32) -> Hit {
    let mut tm = 0.0_f32;
    let mut tx = FAR_DISTANCE;
    let mut hx = field.coarse(ray.at(tx));
    if hx > 0.0 {
        return Hit {
            distance: tx,
            point: ray.at(tx),
            iterations: 0,
            kind: HitKind::Escaped,
        };
    }

    let mut hm = field.coarse(ray.origin);
    let mut last_sample = None;
    let mut iterations = 0;
    while iterations < step_budget && !degenerate(hm, hx) {
        let tmid = false_position(tm, tx, hm, hx);
        let hmid = field.coarse(ray.at(tmid));
        iterations += 1;
        last_sample = Some(tmid);

        if hmid.abs() < EPSILON {
            return Hit {
                distance: tmid,
                point: ray.at(tmid),
                iterations,
                kind: HitKind::Converged,
            };
        }
        if hmid < 0.0 {
            tx = tmid;
            hx = hmid;
        } else {
            tm = tmid;
            hm = hmid;
        }
    }

    let distance = if degenerate(hm, hx) {
        last_sample.unwrap_or(tm)
    } else {
        false_position(tm, tx, hm, hx)
    };
    Hit {
        distance,
        point: ray.at(distance),
        iterations,
        kind: HitKind::BestEffort,
    }
}
