use seafield::SeaParams;

/// Adapter selection hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    /// Prefer an integrated or otherwise low-power adapter.
    Low,
    /// Prefer a discrete or otherwise high-performance adapter.
    #[default]
    High,
}

/// Immutable configuration passed to the window renderer at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Sea, march and camera tunables written to the uniform block.
    pub params: SeaParams,
    pub gpu_power: GpuPowerPreference,
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            params: SeaParams::default(),
            gpu_power: GpuPowerPreference::default(),
            title: "Seascape".to_string(),
        }
    }
}
