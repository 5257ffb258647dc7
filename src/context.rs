//! Per-run state handed to every build: configuration and identifier source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::BuildConfig;

/// Source of unique GML identifiers.
///
/// Implementations must be safe to share across threads; buildings may be
/// built in parallel against one generator.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier for an entity of the given kind.
    fn next_id(&self, kind: &str) -> String;
}

/// Monotonic counter-based identifiers, `<prefix><kind>_<n>`.
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator whose identifiers start with `prefix`.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of identifiers handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, kind: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{kind}_{n}", self.prefix)
    }
}

/// Configuration and identifier source for a build run.
#[derive(Clone)]
pub struct BuildContext {
    config: BuildConfig,
    ids: Arc<dyn IdGenerator>,
}

impl BuildContext {
    /// Creates a context with sequential identifiers.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self::with_ids(config, Arc::new(SequentialIds::with_prefix("GML_")))
    }

    /// Creates a context with a caller-supplied identifier source.
    #[must_use]
    pub fn with_ids(config: BuildConfig, ids: Arc<dyn IdGenerator>) -> Self {
        Self { config, ids }
    }

    /// The build configuration.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Returns a fresh identifier for an entity of the given kind.
    #[must_use]
    pub fn next_id(&self, kind: &str) -> String {
        self.ids.next_id(kind)
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
