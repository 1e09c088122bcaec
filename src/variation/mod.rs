//! Variation framework.
//!
//! A variation is a per-point function that adds `weight · V(pre)` into the
//! post accumulators of an [`IterationPoint`]. Kinds are registered by name in
//! a [`VariationRegistry`]; every iterator owns a [`VariationCollection`] with
//! one instance per registered kind.

pub mod builtin;
pub mod collection;
pub mod registry;

use std::fmt;

use crate::{config::VariationStyle, foundation::core::Affine};

pub use collection::{VariationCollection, VariationEntry};
pub use registry::{VariationFactory, VariationRegistry};

/// Working point of one flame step: pre-transform input and post accumulators.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IterationPoint {
    pub pre_x: f64,
    pub pre_y: f64,
    pub pre_z: f64,
    pub post_x: f64,
    pub post_y: f64,
    pub post_z: f64,
}

impl IterationPoint {
    /// Point with the given pre-transform coordinates and zeroed accumulators.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            pre_x: x,
            pre_y: y,
            pre_z: z,
            ..Self::default()
        }
    }

    /// `x² + y²` of the pre-transform point.
    pub fn pre_sum_sq(&self) -> f64 {
        self.pre_x * self.pre_x + self.pre_y * self.pre_y
    }

    pub fn pre_length(&self) -> f64 {
        self.pre_sum_sq().sqrt()
    }

    /// `atan2(x, y)`: the angle convention shared by the classic formulas.
    pub fn pre_atan_xy(&self) -> f64 {
        self.pre_x.atan2(self.pre_y)
    }
}

/// Snapshot handed to [`Variation::prepare`] so `calculate` never reads
/// shared state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrepareContext {
    pub style: VariationStyle,
    /// Pre-affine of the iterator the variation belongs to.
    pub pre_affine: Affine,
}

impl PrepareContext {
    pub fn new(style: VariationStyle, pre_affine: Affine) -> Self {
        Self { style, pre_affine }
    }
}

impl Default for PrepareContext {
    fn default() -> Self {
        Self::new(VariationStyle::default(), Affine::IDENTITY)
    }
}

/// One variation kind. Instances own their variable values.
pub trait Variation: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Names of the variables this variation reads, in enumeration order.
    /// Variable names are unique across all registered variations.
    fn variables(&self) -> &[&'static str] {
        &[]
    }

    fn variable(&self, _name: &str) -> Option<f64> {
        None
    }

    /// Returns `false` when `name` is not one of [`Variation::variables`].
    fn set_variable(&mut self, _name: &str, _value: f64) -> bool {
        false
    }

    /// Called once before a batch of [`Variation::calculate`] calls.
    fn prepare(&mut self, ctx: &PrepareContext);

    /// Add `weight` times this variation's output into the post accumulators.
    fn calculate(&self, weight: f64, p: &mut IterationPoint);

    fn clone_box(&self) -> Box<dyn Variation>;
}

impl Clone for Box<dyn Variation> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
