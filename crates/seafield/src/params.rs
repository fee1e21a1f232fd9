/// Tunable inputs of the sea surface and camera.
///
/// These map one-to-one onto the non-frame uniforms of the fragment stage;
/// the defaults are the values the renderer ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeaParams {
    /// Maximum false-position iterations per pixel.
    pub step_budget: u32,
    /// Octaves evaluated while searching for the intersection.
    pub geometry_octaves: u32,
    /// Octaves evaluated for normals and surface colour.
    pub fragment_octaves: u32,
    /// Amplitude of the first octave.
    pub sea_height: f32,
    /// Ridge sharpness exponent of the first octave.
    pub sea_choppy: f32,
    /// Temporal drift rate of the two counter-translating wave copies.
    pub sea_speed: f32,
    /// Spatial frequency of the first octave.
    pub sea_freq: f32,
    /// Forward fly-through rate of the camera.
    pub camera_speed: f32,
    /// Scale applied to the pointer x position before it offsets camera time.
    pub pointer_sensitivity: f32,
}

impl Default for SeaParams {
    fn default() -> Self {
        Self {
            step_budget: 40,
            geometry_octaves: 3,
            fragment_octaves: 4,
            sea_height: 0.4,
            sea_choppy: 2.0,
            sea_speed: 0.2,
            sea_freq: 0.2,
            camera_speed: 0.2,
            pointer_sensitivity: 0.1,
        }
    }
}
