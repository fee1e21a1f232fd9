use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::WindowBuilder;

use crate::driver::FrameDriver;
use crate::error::RendererError;
use crate::gpu::GpuBackend;
use crate::runtime::SystemTimeSource;
use crate::types::RendererConfig;

type WindowDriver = FrameDriver<GpuBackend, SystemTimeSource>;

/// Opens a window and animates the seascape until it is closed.
pub fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut driver: WindowDriver = FrameDriver::new(
        config.params,
        SystemTimeSource::new(),
        size.width,
        size.height,
    );
    let attached = driver.attach(|| GpuBackend::new(window.clone(), size, config.gpu_power));
    if !attached {
        return Err(anyhow!("renderer setup failed; see the log above"));
    }
    driver
        .start()
        .map_err(|err| anyhow!("failed to start renderer: {err}"))?;
    info!(
        width = size.width,
        height = size.height,
        "seascape window running"
    );
    window.request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                driver.stop();
                elwt.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                driver.pointer_moved(position.x, position.y);
            }
            WindowEvent::Resized(new_size) => {
                driver.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => match driver.render_frame() {
                Ok(_) => {}
                Err(RendererError::NotReady(reason)) if driver.is_frame_scheduled() => {
                    debug!(reason, "frame skipped");
                }
                Err(RendererError::Surface(surface_err)) => match surface_err {
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                        if let Some(backend) = driver.backend_mut() {
                            backend.reconfigure();
                        }
                    }
                    wgpu::SurfaceError::OutOfMemory => {
                        error!("surface out of memory; shutting down");
                        driver.stop();
                        elwt.exit();
                    }
                    wgpu::SurfaceError::Timeout => {
                        warn!("surface timeout; retrying next frame");
                    }
                    other => {
                        warn!("surface error: {other}; retrying next frame");
                    }
                },
                Err(err) => {
                    error!(error = %err, "frame failed");
                    driver.stop();
                    elwt.exit();
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            if driver.is_frame_scheduled() && !driver.viewport().is_empty() {
                window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::Wait);
        }
        Event::LoopExiting => driver.stop(),
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
