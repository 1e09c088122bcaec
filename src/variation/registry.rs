use std::{collections::HashMap, fmt, sync::Arc};

use super::{Variation, builtin};
use crate::foundation::error::{FlameError, FlameResult};

/// Produces a fresh instance of one variation kind.
pub type VariationFactory = Arc<dyn Fn() -> Box<dyn Variation> + Send + Sync>;

struct Kind {
    name: String,
    variables: Vec<String>,
    factory: VariationFactory,
}

/// Name-keyed table of variation kinds, in registration order.
///
/// Names and variable names are case-sensitive and unique across the table.
#[derive(Default)]
pub struct VariationRegistry {
    kinds: Vec<Kind>,
    by_name: HashMap<String, usize>,
    by_variable: HashMap<String, usize>,
}

impl fmt::Debug for VariationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariationRegistry")
            .field("kinds", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl VariationRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Add a new kind. Fails when its name or one of its variable names is
    /// already taken.
    pub fn register<F>(&mut self, factory: F) -> FlameResult<()>
    where
        F: Fn() -> Box<dyn Variation> + Send + Sync + 'static,
    {
        self.register_factory(Arc::new(factory))
    }

    pub fn register_factory(&mut self, factory: VariationFactory) -> FlameResult<()> {
        let probe = factory();
        let name = probe.name().to_string();
        if name.is_empty() {
            return Err(FlameError::validation("variation name must be non-empty"));
        }
        if self.by_name.contains_key(&name) || self.by_variable.contains_key(&name) {
            return Err(FlameError::validation(format!(
                "variation \"{name}\" is already registered"
            )));
        }

        let variables: Vec<String> = probe.variables().iter().map(|v| v.to_string()).collect();
        for v in &variables {
            if self.by_variable.contains_key(v) || self.by_name.contains_key(v) || *v == name {
                return Err(FlameError::validation(format!(
                    "variable \"{v}\" of variation \"{name}\" is already registered"
                )));
            }
        }

        let idx = self.kinds.len();
        self.by_name.insert(name.clone(), idx);
        for v in &variables {
            self.by_variable.insert(v.clone(), idx);
        }
        tracing::debug!(variation = %name, "registered variation");
        self.kinds.push(Kind {
            name,
            variables,
            factory,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn is_variation(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.by_variable.contains_key(name)
    }

    /// Name of the variation that owns variable `name`.
    pub fn variation_of_variable(&self, name: &str) -> Option<&str> {
        self.by_variable
            .get(name)
            .map(|&i| self.kinds[i].name.as_str())
    }

    pub fn variables_of(&self, name: &str) -> Option<&[String]> {
        self.by_name
            .get(name)
            .map(|&i| self.kinds[i].variables.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|k| k.name.as_str())
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Variation>> {
        self.by_name.get(name).map(|&i| (self.kinds[i].factory)())
    }

    /// One fresh instance of every kind, in registration order.
    pub fn instantiate_all(&self) -> Vec<Box<dyn Variation>> {
        self.kinds.iter().map(|k| (k.factory)()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/variation/registry.rs"]
mod tests;
