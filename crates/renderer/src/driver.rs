//! Per-frame orchestration.
//!
//! [`FrameDriver`] owns the render backend and the clock. Window events are
//! forwarded to its handler methods, which run between frames, and each
//! redraw becomes one `render_frame` call: sample the clock, write every
//! uniform, upload the block, draw the quad.
//!
//! ```text
//!   Uninitialized ──attach──▶ Ready ──start──▶ Running ──stop──▶ TornDown
//!         │                                                        ▲
//!         └──────────────────────────stop──────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use seafield::{Camera, SeaParams};
use tracing::{debug, error, info, warn};

use crate::error::RendererError;
use crate::input::{PointerState, Viewport};
use crate::runtime::TimeSource;
use crate::uniforms::{names, UniformBindings, UniformBlock};

/// Vertices in the full-screen triangle strip.
pub const QUAD_VERTEX_COUNT: u32 = 4;

const STATS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Ready,
    Running,
    TornDown,
}

/// GPU objects released at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Program,
    VertexStage,
    FragmentStage,
    VertexBuffer,
}

/// Teardown order.
pub const RELEASE_ORDER: [Resource; 4] = [
    Resource::Program,
    Resource::VertexStage,
    Resource::FragmentStage,
    Resource::VertexBuffer,
];

/// What the driver needs from a graphics API.
pub trait RenderBackend {
    /// Uniform slots reflected from the linked program.
    fn uniform_bindings(&self) -> &UniformBindings;
    /// Matches the output surface to `viewport`.
    fn set_viewport(&mut self, viewport: Viewport);
    fn upload_uniforms(&mut self, block: &UniformBlock);
    /// Draws `vertex_count` vertices of the quad and presents the frame.
    fn draw(&mut self, vertex_count: u32) -> Result<(), RendererError>;
    /// Frees one resource. Called at most once per resource.
    fn release(&mut self, resource: Resource);
}

/// Values fed to the shader for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub frame_index: u64,
    pub elapsed: f32,
    pub camera_time: f32,
    pub pointer: [f32; 4],
    pub resolution: [f32; 3],
}

struct RenderStats {
    last_update: Instant,
    frames: u32,
    total_frames: u64,
}

impl RenderStats {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frames: 0,
            total_frames: 0,
        }
    }

    fn record(&mut self, elapsed: f32) {
        self.frames += 1;
        self.total_frames += 1;
        let since = self.last_update.elapsed();
        if since >= STATS_INTERVAL {
            let fps = self.frames as f32 / since.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame_count = self.total_frames,
                time = elapsed,
                "render stats"
            );
            self.frames = 0;
            self.last_update = Instant::now();
        }
    }
}

pub struct FrameDriver<B: RenderBackend, T: TimeSource> {
    params: SeaParams,
    clock: T,
    state: DriverState,
    backend: Option<B>,
    uniforms: Option<UniformBlock>,
    viewport: Viewport,
    pointer: PointerState,
    frame_scheduled: bool,
    listening: bool,
    setup_attempted: bool,
    stats: RenderStats,
}

impl<B: RenderBackend, T: TimeSource> FrameDriver<B, T> {
    pub fn new(params: SeaParams, clock: T, width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height);
        Self {
            params,
            clock,
            state: DriverState::Uninitialized,
            backend: None,
            uniforms: None,
            viewport,
            pointer: PointerState::centered(viewport),
            frame_scheduled: false,
            listening: false,
            setup_attempted: false,
            stats: RenderStats::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn is_frame_scheduled(&self) -> bool {
        self.frame_scheduled
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    /// Runs `setup` to obtain a backend and binds it.
    ///
    /// `setup` runs at most once over the driver's life. A failure is logged
    /// here and leaves the driver `Uninitialized`; later calls do nothing.
    pub fn attach<F>(&mut self, setup: F) -> bool
    where
        F: FnOnce() -> Result<B, RendererError>,
    {
        if self.setup_attempted || self.state != DriverState::Uninitialized {
            debug!(state = ?self.state, "renderer setup already attempted");
            return self.backend.is_some();
        }
        self.setup_attempted = true;

        let mut backend = match setup() {
            Ok(backend) => backend,
            Err(err) => {
                error!(error = %err, "renderer setup failed");
                return false;
            }
        };

        backend.set_viewport(self.viewport);
        let bindings = backend.uniform_bindings().clone();
        let missing = bindings.missing(&names::ALL);
        if !missing.is_empty() {
            warn!(?missing, "fragment stage does not declare every uniform");
        }

        self.pointer = PointerState::centered(self.viewport);
        self.clock.reset();
        self.uniforms = Some(UniformBlock::new(bindings));
        self.backend = Some(backend);
        self.state = DriverState::Ready;
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            step_budget = self.params.step_budget,
            geometry_octaves = self.params.geometry_octaves,
            fragment_octaves = self.params.fragment_octaves,
            "renderer ready"
        );
        true
    }

    /// Schedules the first frame and starts accepting input.
    pub fn start(&mut self) -> Result<(), RendererError> {
        if self.state != DriverState::Ready {
            return Err(RendererError::NotReady("start requires an attached renderer"));
        }
        self.state = DriverState::Running;
        self.frame_scheduled = true;
        self.listening = true;
        Ok(())
    }

    /// Renders the scheduled frame and schedules the next one.
    ///
    /// Nothing is drawn while the viewport has a zero dimension; the frame
    /// stays scheduled until a resize makes it drawable.
    pub fn render_frame(&mut self) -> Result<FrameSnapshot, RendererError> {
        if self.state != DriverState::Running {
            return Err(RendererError::NotReady("frame driver is not running"));
        }
        if !self.frame_scheduled {
            return Err(RendererError::NotReady("no frame scheduled"));
        }
        if self.viewport.is_empty() {
            return Err(RendererError::NotReady("viewport is empty"));
        }
        let (Some(backend), Some(block)) = (self.backend.as_mut(), self.uniforms.as_mut()) else {
            return Err(RendererError::NotReady("renderer resources released"));
        };

        let sample = self.clock.sample();
        let snapshot = FrameSnapshot {
            frame_index: sample.frame_index,
            elapsed: sample.seconds,
            camera_time: Camera::new(&self.params).time(sample.seconds, self.pointer.position()[0]),
            pointer: self.pointer.as_uniform(),
            resolution: self.viewport.resolution(),
        };
        write_uniforms(block, &self.params, &snapshot);
        backend.upload_uniforms(block);

        // A failed draw leaves the next frame scheduled.
        backend.draw(QUAD_VERTEX_COUNT)?;

        self.stats.record(snapshot.elapsed);
        Ok(snapshot)
    }

    /// Applies a new surface size. Never rebuilds the program.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.listening {
            return;
        }
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if let Some(backend) = self.backend.as_mut() {
            backend.set_viewport(viewport);
        }
        self.pointer = PointerState::centered(viewport);
        debug!(width, height, "viewport resized");
    }

    /// Records a cursor position in surface pixels from the top-left.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.listening {
            self.pointer.handle_cursor_moved(x, y, self.viewport);
        }
    }

    /// Cancels rendering and releases every GPU resource. Safe to call twice.
    pub fn stop(&mut self) {
        if self.state == DriverState::TornDown {
            return;
        }
        self.frame_scheduled = false;
        self.listening = false;
        if let Some(mut backend) = self.backend.take() {
            for resource in RELEASE_ORDER {
                backend.release(resource);
            }
        }
        self.uniforms = None;
        self.state = DriverState::TornDown;
        info!("renderer stopped");
    }
}

impl<B: RenderBackend, T: TimeSource> Drop for FrameDriver<B, T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn write_uniforms(block: &mut UniformBlock, params: &SeaParams, frame: &FrameSnapshot) {
    block.set_vec3(names::RESOLUTION, frame.resolution);
    block.set_float(names::TIME, frame.elapsed);
    block.set_vec4(names::POINTER, frame.pointer);
    block.set_int(names::STEP_BUDGET, saturating_i32(params.step_budget));
    block.set_int(names::GEOMETRY_OCTAVES, saturating_i32(params.geometry_octaves));
    block.set_int(names::FRAGMENT_OCTAVES, saturating_i32(params.fragment_octaves));
    block.set_float(names::SEA_HEIGHT, params.sea_height);
    block.set_float(names::SEA_CHOPPY, params.sea_choppy);
    block.set_float(names::SEA_SPEED, params.sea_speed);
    block.set_float(names::SEA_FREQ, params.sea_freq);
    block.set_float(names::CAMERA_SPEED, params.camera_speed);
    block.set_float(names::POINTER_SENSITIVITY, params.pointer_sensitivity);
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::StageKind;
    use crate::runtime::FixedTimeSource;
    use crate::shader::{compile_stage, reflect_uniforms, OCEAN_FRAGMENT};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Viewport(Viewport),
        Upload,
        Draw(u32),
        Release(Resource),
    }

    #[derive(Default)]
    struct Record {
        calls: Vec<Call>,
        last_upload: Option<UniformBlock>,
    }

    type Log = Rc<RefCell<Record>>;

    struct RecordingBackend {
        bindings: UniformBindings,
        log: Log,
        fail_draw: bool,
    }

    impl RecordingBackend {
        fn new(log: &Log) -> Self {
            let fragment = compile_stage(StageKind::Fragment, OCEAN_FRAGMENT).unwrap();
            Self {
                bindings: reflect_uniforms(fragment.module()),
                log: Rc::clone(log),
                fail_draw: false,
            }
        }
    }

    impl RenderBackend for RecordingBackend {
        fn uniform_bindings(&self) -> &UniformBindings {
            &self.bindings
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.log.borrow_mut().calls.push(Call::Viewport(viewport));
        }

        fn upload_uniforms(&mut self, block: &UniformBlock) {
            let mut log = self.log.borrow_mut();
            log.calls.push(Call::Upload);
            log.last_upload = Some(block.clone());
        }

        fn draw(&mut self, vertex_count: u32) -> Result<(), RendererError> {
            if self.fail_draw {
                return Err(RendererError::Surface(wgpu::SurfaceError::Lost));
            }
            self.log.borrow_mut().calls.push(Call::Draw(vertex_count));
            Ok(())
        }

        fn release(&mut self, resource: Resource) {
            self.log.borrow_mut().calls.push(Call::Release(resource));
        }
    }

    type TestDriver = FrameDriver<RecordingBackend, FixedTimeSource>;

    fn running_driver(log: &Log, time: f32, width: u32, height: u32) -> TestDriver {
        let mut driver = FrameDriver::new(
            SeaParams::default(),
            FixedTimeSource::new(time),
            width,
            height,
        );
        assert!(driver.attach(|| Ok(RecordingBackend::new(log))));
        driver.start().unwrap();
        driver
    }

    fn releases(log: &Log) -> Vec<Resource> {
        log.borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Release(resource) => Some(*resource),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn attach_binds_viewport_and_centres_pointer() {
        let log = Log::default();
        let mut driver: TestDriver =
            FrameDriver::new(SeaParams::default(), FixedTimeSource::new(0.0), 800, 600);
        assert!(driver.attach(|| Ok(RecordingBackend::new(&log))));

        assert_eq!(driver.state(), DriverState::Ready);
        assert!(!driver.is_frame_scheduled());
        assert_eq!(driver.pointer().position(), [400.0, 300.0]);
        assert_eq!(
            log.borrow().calls,
            vec![Call::Viewport(Viewport::new(800, 600))]
        );
    }

    #[test]
    fn resize_from_empty_surface_recentres_pointer() {
        let log = Log::default();
        let mut driver = running_driver(&log, 1.0, 0, 0);

        driver.resize(800, 600);
        assert_eq!(driver.viewport(), Viewport::new(800, 600));
        assert_eq!(driver.pointer().position(), [400.0, 300.0]);

        let frame = driver.render_frame().unwrap();
        assert_eq!(frame.resolution, [800.0, 600.0, 1.0]);
        let upload = log.borrow().last_upload.clone().unwrap();
        assert_eq!(upload.vec3(names::RESOLUTION), Some([800.0, 600.0, 1.0]));
    }

    #[test]
    fn empty_viewport_skips_drawing_until_resized() {
        let log = Log::default();
        let mut driver = running_driver(&log, 1.0, 640, 480);
        driver.resize(0, 0);

        assert!(matches!(
            driver.render_frame(),
            Err(RendererError::NotReady(_))
        ));
        assert!(driver.is_frame_scheduled());
        assert!(!log
            .borrow()
            .calls
            .iter()
            .any(|call| matches!(call, Call::Upload | Call::Draw(_))));

        driver.resize(640, 480);
        let frame = driver.render_frame().unwrap();
        assert_eq!(frame.resolution, [640.0, 480.0, 1.0]);
    }

    #[test]
    fn repeated_resize_to_same_size_is_ignored() {
        let log = Log::default();
        let mut driver = running_driver(&log, 0.0, 640, 480);
        driver.resize(1024, 768);
        driver.pointer_moved(10.0, 10.0);
        driver.resize(1024, 768);

        let viewports = log
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Viewport(_)))
            .count();
        assert_eq!(viewports, 2);
        assert_eq!(driver.pointer().position(), [5.0, 379.0]);
    }

    #[test]
    fn events_before_start_are_dropped() {
        let log = Log::default();
        let mut driver: TestDriver =
            FrameDriver::new(SeaParams::default(), FixedTimeSource::new(0.0), 320, 200);
        driver.attach(|| Ok(RecordingBackend::new(&log)));

        driver.resize(100, 100);
        driver.pointer_moved(50.0, 50.0);
        assert_eq!(driver.viewport(), Viewport::new(320, 200));
        assert_eq!(driver.pointer().position(), [160.0, 100.0]);
        assert!(matches!(
            driver.render_frame(),
            Err(RendererError::NotReady(_))
        ));
    }

    #[test]
    fn pointer_offsets_camera_time() {
        let log = Log::default();
        let mut driver = running_driver(&log, 10.0, 1000, 1000);
        driver.pointer_moved(500.0, 500.0);

        let frame = driver.render_frame().unwrap();
        assert_eq!(frame.pointer[0], 250.0);
        assert_eq!(frame.elapsed, 10.0);
        let expected = 10.0 * 0.3 + 250.0 * 0.01 * 0.1;
        assert!((frame.camera_time - expected).abs() < 1e-5);

        let upload = log.borrow().last_upload.clone().unwrap();
        assert_eq!(upload.vec4(names::POINTER), Some([250.0, 250.0, 0.0, 0.0]));
        assert_eq!(upload.float(names::TIME), Some(10.0));
    }

    #[test]
    fn frame_writes_every_tunable_and_draws_the_quad() {
        let log = Log::default();
        let mut driver = running_driver(&log, 2.0, 64, 64);
        driver.render_frame().unwrap();

        let record = log.borrow();
        assert_eq!(
            &record.calls[1..],
            &[Call::Upload, Call::Draw(QUAD_VERTEX_COUNT)]
        );
        let upload = record.last_upload.as_ref().unwrap();
        assert_eq!(upload.int(names::STEP_BUDGET), Some(40));
        assert_eq!(upload.int(names::GEOMETRY_OCTAVES), Some(3));
        assert_eq!(upload.int(names::FRAGMENT_OCTAVES), Some(4));
        assert_eq!(upload.float(names::SEA_HEIGHT), Some(0.4));
        assert_eq!(upload.float(names::SEA_CHOPPY), Some(2.0));
        assert_eq!(upload.float(names::SEA_SPEED), Some(0.2));
        assert_eq!(upload.float(names::SEA_FREQ), Some(0.2));
        assert_eq!(upload.float(names::CAMERA_SPEED), Some(0.2));
        assert_eq!(upload.float(names::POINTER_SENSITIVITY), Some(0.1));
        assert!(driver.is_frame_scheduled());
    }

    #[test]
    fn failed_setup_is_not_retried() {
        let mut driver: TestDriver =
            FrameDriver::new(SeaParams::default(), FixedTimeSource::new(0.0), 800, 600);
        let attached =
            driver.attach(|| Err(RendererError::UnsupportedContext("no adapter".into())));
        assert!(!attached);
        assert_eq!(driver.state(), DriverState::Uninitialized);

        let attached = driver.attach(|| panic!("setup must not run twice"));
        assert!(!attached);
        assert!(matches!(driver.start(), Err(RendererError::NotReady(_))));
    }

    #[test]
    fn surface_error_keeps_next_frame_scheduled() {
        let log = Log::default();
        let mut driver: TestDriver =
            FrameDriver::new(SeaParams::default(), FixedTimeSource::new(0.0), 32, 32);
        driver.attach(|| {
            let mut backend = RecordingBackend::new(&log);
            backend.fail_draw = true;
            Ok(backend)
        });
        driver.start().unwrap();

        assert!(matches!(
            driver.render_frame(),
            Err(RendererError::Surface(wgpu::SurfaceError::Lost))
        ));
        assert!(driver.is_frame_scheduled());
    }

    #[test]
    fn stop_releases_in_order_exactly_once() {
        let log = Log::default();
        let mut driver = running_driver(&log, 0.0, 100, 100);
        driver.render_frame().unwrap();

        driver.stop();
        driver.stop();
        assert_eq!(driver.state(), DriverState::TornDown);
        assert!(!driver.is_frame_scheduled());
        assert!(!driver.is_listening());
        assert_eq!(releases(&log), RELEASE_ORDER.to_vec());
        assert!(matches!(
            driver.render_frame(),
            Err(RendererError::NotReady(_))
        ));

        drop(driver);
        assert_eq!(releases(&log).len(), RELEASE_ORDER.len());
    }

    #[test]
    fn dropping_a_running_driver_tears_it_down() {
        let log = Log::default();
        let driver = running_driver(&log, 0.0, 100, 100);
        drop(driver);
        assert_eq!(releases(&log), RELEASE_ORDER.to_vec());
    }

    #[test]
    fn stop_before_attach_releases_nothing() {
        let mut driver: TestDriver =
            FrameDriver::new(SeaParams::default(), FixedTimeSource::new(0.0), 10, 10);
        driver.stop();
        assert_eq!(driver.state(), DriverState::TornDown);
        assert!(!driver.attach(|| panic!("torn down driver must not attach")));
    }
}
