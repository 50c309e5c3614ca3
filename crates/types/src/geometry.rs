use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// The uniform scale factor that fits `src` inside `target` while preserving
/// the aspect ratio: `min(target.w / src.w, target.h / src.h)`.
///
/// Returns 0.0 for a degenerate source so callers never divide by zero.
pub fn fit_scale(src: Size, target: Size) -> f32 {
    if src.width <= 0.0 || src.height <= 0.0 {
        return 0.0;
    }
    (target.width / src.width).min(target.height / src.height)
}

/// Top-left offset that centers a `src`-sized box scaled by `scale` within
/// `target`.
pub fn center_offset(src: Size, scale: f32, target: Size) -> (f32, f32) {
    (
        (target.width - src.width * scale) / 2.0,
        (target.height - src.height * scale) / 2.0,
    )
}
