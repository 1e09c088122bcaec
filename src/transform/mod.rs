//! Shared transform helpers (affine conventions, interpolation).

pub mod affine;
pub mod linear;
