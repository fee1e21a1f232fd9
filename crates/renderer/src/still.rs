//! Single-frame PNG export through the CPU model, no GPU required.

use std::path::{Path, PathBuf};

use glam::Vec2;
use image::RgbaImage;
use seafield::{SeaParams, Scene};

use crate::error::RendererError;
use crate::input::{PointerState, Viewport};

/// Frame to capture.
#[derive(Debug, Clone, PartialEq)]
pub struct StillRequest {
    pub params: SeaParams,
    pub width: u32,
    pub height: u32,
    /// Seconds since the clock started.
    pub time: f32,
    pub path: PathBuf,
}

/// Renders one frame with the pointer at rest and writes it as PNG.
pub fn export_still(request: &StillRequest) -> Result<PathBuf, RendererError> {
    if request.width == 0 || request.height == 0 {
        return Err(RendererError::Export(format!(
            "still size must be non-zero, got {}x{}",
            request.width, request.height
        )));
    }

    let started = std::time::Instant::now();
    let scene = Scene::new(
        request.params,
        request.width,
        request.height,
        request.time,
        Vec2::from_array(
            PointerState::centered(Viewport::new(request.width, request.height)).position(),
        ),
    );
    let pixels = scene.render_rgba();
    let image = RgbaImage::from_raw(request.width, request.height, pixels)
        .ok_or_else(|| RendererError::Export("pixel buffer size mismatch".into()))?;

    ensure_parent(&request.path)?;
    image.save(&request.path).map_err(|err| {
        RendererError::Export(format!("failed to write {}: {err}", request.path.display()))
    })?;

    tracing::info!(
        path = %request.path.display(),
        width = request.width,
        height = request.height,
        time = request.time,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "still frame written"
    );
    Ok(request.path.clone())
}

fn ensure_parent(path: &Path) -> Result<(), RendererError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|err| {
                RendererError::Export(format!("failed to create {}: {err}", parent.display()))
            })
        }
        _ => Ok(()),
    }
}
