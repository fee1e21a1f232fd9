/// Scale applied to raw cursor coordinates before they reach the shader.
const POINTER_SCALE: f32 = 0.5;

/// Surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True while either dimension is zero, e.g. a minimised window.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Value of `iResolution`.
    pub fn resolution(&self) -> [f32; 3] {
        [self.width as f32, self.height as f32, 1.0]
    }
}

/// Last pointer position, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    x: f32,
    y: f32,
}

impl PointerState {
    /// Rest position for a freshly sized surface: its centre, unscaled.
    pub fn centered(viewport: Viewport) -> Self {
        Self {
            x: viewport.width as f32 / 2.0,
            y: viewport.height as f32 / 2.0,
        }
    }

    /// Records a cursor position given in surface pixels from the top-left.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64, viewport: Viewport) {
        self.x = x as f32 * POINTER_SCALE;
        self.y = (viewport.height as f32 - y as f32) * POINTER_SCALE;
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Value of `iPointer`.
    pub fn as_uniform(&self) -> [f32; 4] {
        [self.x, self.y, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_halved_and_flipped() {
        let viewport = Viewport::new(1000, 800);
        let mut pointer = PointerState::centered(viewport);
        assert_eq!(pointer.position(), [500.0, 400.0]);

        pointer.handle_cursor_moved(500.0, 500.0, viewport);
        assert_eq!(pointer.position(), [250.0, 150.0]);
        assert_eq!(pointer.as_uniform(), [250.0, 150.0, 0.0, 0.0]);
    }

    #[test]
    fn resolution_carries_unit_depth() {
        assert_eq!(Viewport::new(640, 480).resolution(), [640.0, 480.0, 1.0]);
    }
}
