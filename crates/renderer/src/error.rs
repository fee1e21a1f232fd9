use std::fmt;

/// Shader stage a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn naga_stage(self) -> wgpu::naga::ShaderStage {
        match self {
            StageKind::Vertex => wgpu::naga::ShaderStage::Vertex,
            StageKind::Fragment => wgpu::naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// No adapter, device or surface could be obtained. Terminal.
    #[error("graphics context unavailable: {0}")]
    UnsupportedContext(String),
    #[error("{stage} stage failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("shader program failed to link: {0}")]
    Link(String),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("renderer not ready: {0}")]
    NotReady(&'static str),
    #[error("still export failed: {0}")]
    Export(String),
}
