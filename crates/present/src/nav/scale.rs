/// Native width of the slide container.
pub const DESIGN_WIDTH: f32 = 1220.0;
/// Native height of the slide container.
pub const DESIGN_HEIGHT: f32 = 760.0;

const GRID_COLUMNS: f32 = 16.0;
const GRID_ROWS: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Uniform scale that fits the design size into `viewport` on a 16:9 grid.
///
/// Never upscales past 1. Returns `None` for an empty viewport.
pub fn scale_factor(viewport: Viewport) -> Option<f32> {
    if viewport.is_degenerate() {
        return None;
    }
    let width_unit = viewport.width / GRID_COLUMNS;
    let height_unit = viewport.height / GRID_ROWS;
    let ratio = if width_unit < height_unit {
        width_unit / (DESIGN_WIDTH / GRID_COLUMNS)
    } else {
        height_unit / (DESIGN_HEIGHT / GRID_ROWS)
    };
    Some(ratio.min(1.0))
}
