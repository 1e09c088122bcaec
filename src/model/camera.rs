use crate::foundation::{
    core::{Canvas, Point, Vec2},
    math::rotate,
};

const FLIP_Y: Vec2 = Vec2::new(1.0, -1.0);

/// Values derived from a flame's camera parameters, refreshed by every
/// setter that touches canvas size, zoom, scale or angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraCache {
    pub half: Point,
    pub scale_factor: f64,
    /// Pixels per world unit, y flipped.
    pub scale: Vec2,
    /// World units per pixel, y flipped.
    pub scale_inv: Vec2,
    pub sin: f64,
    pub cos: f64,
    pub sin_inv: f64,
    pub cos_inv: f64,
}

impl CameraCache {
    pub fn new(canvas: Canvas, pixels_per_unit: f64, zoom: f64, angle: f64) -> Self {
        let scale_factor = 2f64.powf(zoom) * pixels_per_unit;
        let flip = |f: f64| Vec2::new(FLIP_Y.x * f, FLIP_Y.y * f);
        let (sin, cos) = angle.sin_cos();
        let (sin_inv, cos_inv) = (-angle).sin_cos();
        Self {
            half: canvas.half(),
            scale_factor,
            scale: flip(scale_factor),
            scale_inv: flip(1.0 / scale_factor),
            sin,
            cos,
            sin_inv,
            cos_inv,
        }
    }

    /// Device pixel to world coordinates. `scale` overrides the inverse
    /// scale vector.
    pub fn canvas_to_world(
        &self,
        p: Point,
        origin: Vec2,
        center: Option<Point>,
        scale: Option<Vec2>,
    ) -> Point {
        let c = center.unwrap_or(self.half);
        let s = scale.unwrap_or(self.scale_inv);
        let u = Vec2::new((p.x - c.x) * s.x, (p.y - c.y) * s.y);
        let u = rotate(u, self.cos_inv, self.sin_inv);
        Point::new(u.x - origin.x, u.y + origin.y)
    }

    /// World to device pixel coordinates. `scale` overrides the forward
    /// scale vector.
    pub fn world_to_canvas(
        &self,
        p: Point,
        origin: Vec2,
        center: Option<Point>,
        scale: Option<Vec2>,
    ) -> Point {
        let c = center.unwrap_or(self.half);
        let s = scale.unwrap_or(self.scale);
        let u = Vec2::new(p.x + origin.x, p.y - origin.y);
        let u = rotate(u, self.cos, self.sin);
        Point::new(u.x * s.x + c.x, u.y * s.y + c.y)
    }
}
