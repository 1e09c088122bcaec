//! Editing session: the explicit context every flame is built in.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    config::FlameConfig,
    foundation::{
        ids::{FlameId, FlameIdAllocator},
        math::Rng64,
    },
    palette::Palette,
    variation::VariationRegistry,
};

/// Receives non-fatal notices raised while reading documents.
pub trait MessageSink: Send + Sync {
    /// An attribute on `element` was neither a known field nor a registered
    /// variation or variable.
    fn unknown_attribute(&self, element: &str, name: &str);
}

/// Discards every notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn unknown_attribute(&self, _element: &str, _name: &str) {}
}

/// Keeps notices in memory, formatted as `element.attribute`.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessageSink for CollectingSink {
    fn unknown_attribute(&self, element: &str, name: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{element}.{name}"));
    }
}

struct Inner {
    config: FlameConfig,
    registry: Arc<VariationRegistry>,
    ids: FlameIdAllocator,
    rng: Mutex<Rng64>,
    sink: Arc<dyn MessageSink>,
}

/// Shared handle to configuration, the variation registry, the flame id
/// allocator, the random source and the notification channel.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .field("ids_issued", &self.inner.ids.issued())
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FlameConfig::default())
    }
}

impl Session {
    pub fn new(config: FlameConfig) -> Self {
        Self::with_sink(config, Arc::new(NullSink))
    }

    pub fn with_sink(config: FlameConfig, sink: Arc<dyn MessageSink>) -> Self {
        Self::with_registry(config, VariationRegistry::with_builtins(), sink)
    }

    /// Session over a caller-built registry, e.g. one with extra kinds.
    pub fn with_registry(
        config: FlameConfig,
        registry: VariationRegistry,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        let seed = config.palette_seed.unwrap_or_else(clock_seed);
        tracing::debug!(seed, variations = registry.len(), "session created");
        Self {
            inner: Arc::new(Inner {
                config,
                registry: Arc::new(registry),
                ids: FlameIdAllocator::new(),
                rng: Mutex::new(Rng64::new(seed)),
                sink,
            }),
        }
    }

    pub fn config(&self) -> &FlameConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<VariationRegistry> {
        &self.inner.registry
    }

    pub fn allocate_id(&self) -> FlameId {
        self.inner.ids.allocate()
    }

    pub fn ids_issued(&self) -> u32 {
        self.inner.ids.issued()
    }

    /// Run `f` with exclusive access to the session's random source.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut Rng64) -> T) -> T {
        let mut rng = self
            .inner
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    pub fn random_palette(&self) -> Palette {
        self.with_rng(Palette::random)
    }

    pub fn notify_unknown_attribute(&self, element: &str, name: &str) {
        self.inner.sink.unknown_attribute(element, name);
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
