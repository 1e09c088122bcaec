use crate::foundation::error::{FlameError, FlameResult};

pub use kurbo::{Affine, Point, Vec2};

/// Output canvas dimensions in device pixels. Both sides are > 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> FlameResult<Self> {
        if width == 0 || height == 0 {
            return Err(FlameError::validation(
                "canvas size must be greater than zero in both dimensions",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn half(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from channels in `[0, 1]`; out of range inputs are clamped.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        fn quantize(v: f64) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        Self::new(quantize(r), quantize(g), quantize(b))
    }

    pub fn to_unit(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
