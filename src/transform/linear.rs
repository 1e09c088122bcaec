//! Linear interpolation helpers.

#[inline]
/// Linearly interpolate between two scalars with clamped parameter `t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}
