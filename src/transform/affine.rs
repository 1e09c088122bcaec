//! Affine helpers: document coefficient convention and triangle edits.
//!
//! Coefficients follow `kurbo::Affine` order `[a, b, c, d, e, f]`, mapping
//! `x' = a·x + c·y + e` and `y' = b·x + d·y + f`. The columns `(a, b)` and
//! `(c, d)` are the transform's x and y axes, `(e, f)` its origin.

use crate::foundation::core::{Affine, Vec2};

/// Components negated when moving between the document and the in-memory matrix.
const DOCUMENT_SIGNS: [f64; 6] = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0];

pub fn is_identity(m: Affine) -> bool {
    m.as_coeffs() == Affine::IDENTITY.as_coeffs()
}

/// Interpret six `coefs`/`post` numbers from a document.
pub fn from_document_coefs(v: [f64; 6]) -> Affine {
    Affine::new(apply_signs(v))
}

/// Inverse of [`from_document_coefs`].
pub fn to_document_coefs(m: Affine) -> [f64; 6] {
    apply_signs(m.as_coeffs())
}

fn apply_signs(v: [f64; 6]) -> [f64; 6] {
    let mut out = v;
    for (o, s) in out.iter_mut().zip(DOCUMENT_SIGNS) {
        *o *= s;
    }
    out
}

pub fn x_axis(m: Affine) -> Vec2 {
    let [a, b, ..] = m.as_coeffs();
    Vec2::new(a, b)
}

pub fn y_axis(m: Affine) -> Vec2 {
    let [_, _, c, d, ..] = m.as_coeffs();
    Vec2::new(c, d)
}

pub fn origin(m: Affine) -> Vec2 {
    let [.., e, f] = m.as_coeffs();
    Vec2::new(e, f)
}

pub fn from_parts(x: Vec2, y: Vec2, o: Vec2) -> Affine {
    Affine::new([x.x, x.y, y.x, y.y, o.x, o.y])
}

/// Rotate both axes by `angle` radians around the transform origin.
pub fn rotate_axes(m: Affine, angle: f64) -> Affine {
    let (sin, cos) = angle.sin_cos();
    let r = |v: Vec2| crate::foundation::math::rotate(v, cos, sin);
    from_parts(r(x_axis(m)), r(y_axis(m)), origin(m))
}

/// Mirror the axes horizontally around the transform origin.
pub fn flip_horizontal(m: Affine) -> Affine {
    let (x, y) = (x_axis(m), y_axis(m));
    from_parts(Vec2::new(-x.x, x.y), Vec2::new(-y.x, y.y), origin(m))
}

/// Mirror the axes vertically around the transform origin.
pub fn flip_vertical(m: Affine) -> Affine {
    let (x, y) = (x_axis(m), y_axis(m));
    from_parts(Vec2::new(x.x, -x.y), Vec2::new(y.x, -y.y), origin(m))
}

pub fn reset_origin(m: Affine) -> Affine {
    from_parts(x_axis(m), y_axis(m), Vec2::ZERO)
}

/// Rotate so the x axis points along +x, keeping axis lengths and the origin.
pub fn reset_angle(m: Affine) -> Affine {
    let x = x_axis(m);
    if x.hypot() == 0.0 {
        return m;
    }
    rotate_axes(m, -x.y.atan2(x.x))
}

/// Normalize both axes to unit length; degenerate axes are left untouched.
pub fn reset_scale(m: Affine) -> Affine {
    fn unit(v: Vec2) -> Vec2 {
        let len = v.hypot();
        if len == 0.0 { v } else { v / len }
    }
    from_parts(unit(x_axis(m)), unit(y_axis(m)), origin(m))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
