use std::sync::Arc;

use super::{IterationPoint, PrepareContext, Variation, VariationRegistry};
use crate::foundation::{
    error::{FlameError, FlameResult},
    math::EPSILON,
};

/// One variation instance together with its blend weight.
#[derive(Clone, Debug)]
pub struct VariationEntry {
    weight: f64,
    variation: Box<dyn Variation>,
}

impl VariationEntry {
    pub fn name(&self) -> &str {
        self.variation.name()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn is_active(&self) -> bool {
        self.weight.abs() > EPSILON
    }

    pub fn variation(&self) -> &dyn Variation {
        self.variation.as_ref()
    }

    /// `(name, value)` of each variable, in enumeration order.
    pub fn variables(&self) -> Vec<(&'static str, f64)> {
        self.variation
            .variables()
            .iter()
            .filter_map(|&n| self.variation.variable(n).map(|v| (n, v)))
            .collect()
    }
}

/// Per-iterator weights and variable values for every registered variation.
///
/// All kinds stay in memory; only non-zero weights take part in evaluation,
/// serialization, copies and equality.
#[derive(Clone, Debug)]
pub struct VariationCollection {
    registry: Arc<VariationRegistry>,
    entries: Vec<VariationEntry>,
}

impl VariationCollection {
    pub fn new(registry: Arc<VariationRegistry>) -> Self {
        Self {
            entries: registry
                .instantiate_all()
                .into_iter()
                .map(|variation| VariationEntry {
                    weight: 0.0,
                    variation,
                })
                .collect(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<VariationRegistry> {
        &self.registry
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut VariationEntry> {
        self.entries.iter_mut().find(|e| e.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&VariationEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.get(name).map(|e| e.weight)
    }

    pub fn set_weight(&mut self, name: &str, weight: f64) -> FlameResult<()> {
        if !weight.is_finite() {
            return Err(FlameError::validation(format!(
                "weight of variation \"{name}\" must be finite"
            )));
        }
        let entry = self
            .entry_mut(name)
            .ok_or_else(|| FlameError::validation(format!("unknown variation \"{name}\"")))?;
        entry.weight = weight;
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.entries.iter().find_map(|e| e.variation.variable(name))
    }

    /// Write a variable regardless of the owning variation's weight.
    pub fn set_variable(&mut self, name: &str, value: f64) -> FlameResult<()> {
        for e in &mut self.entries {
            if e.variation.set_variable(name, value) {
                return Ok(());
            }
        }
        Err(FlameError::validation(format!("unknown variable \"{name}\"")))
    }

    pub fn clear_weights(&mut self) {
        for e in &mut self.entries {
            e.weight = 0.0;
        }
    }

    /// Every entry, active or not, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &VariationEntry> {
        self.entries.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &VariationEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Fresh collection carrying only the active weights and their variables.
    pub fn active_copy(&self) -> VariationCollection {
        let mut out = VariationCollection::new(Arc::clone(&self.registry));
        for src in self.active() {
            if let Some(dst) = out.entry_mut(src.name()) {
                dst.weight = src.weight;
                dst.variation = src.variation.clone();
            }
        }
        out
    }

    pub fn prepare(&mut self, ctx: &PrepareContext) {
        for e in self.entries.iter_mut().filter(|e| e.is_active()) {
            e.variation.prepare(ctx);
        }
    }

    /// Sum every active variation's weighted output into `p`'s accumulators.
    pub fn calculate(&self, p: &mut IterationPoint) {
        for e in self.active() {
            e.variation.calculate(e.weight, p);
        }
    }

    /// Same active variations with identical weights and variable values.
    pub fn is_equal(&self, other: &VariationCollection) -> bool {
        let mut a = self.active();
        let mut b = other.active();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if x.name() != y.name()
                        || x.weight != y.weight
                        || x.variables() != y.variables()
                    {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/variation/collection.rs"]
mod tests;
