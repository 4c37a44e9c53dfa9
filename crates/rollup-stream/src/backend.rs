//! The injectable bundling backend and the two-phase invocation step.
//!
//! A backend is anything exposing a `build` phase (produce a bundle handle
//! from a configuration snapshot) and a `generate` phase (produce code plus
//! optional map data from that handle). The stream pipeline drives exactly
//! one build and one generate per invocation, with no retry, and passes
//! backend failures through unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::builtin::DefaultBundler;
use crate::config::ConfigSnapshot;
use crate::sourcemap::SourceMap;
use crate::Result;

/// Output of a backend's generate phase.
#[derive(Debug, Clone, Default)]
pub struct GeneratedBundle {
    /// Generated bundle code.
    pub code: String,
    /// Source map data, when the backend produced any.
    pub map: Option<SourceMap>,
}

/// The build phase of a bundling backend.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Build a bundle from the snapshot.
    ///
    /// The snapshot carries the entry, the cache handle (identity
    /// preserved, so backend-side incremental state survives across
    /// invocations sharing one handle), the plugin list, and all
    /// pass-through options.
    async fn build(&self, options: &ConfigSnapshot) -> Result<Box<dyn BundleHandle>>;
}

/// A built bundle, ready to generate output.
#[async_trait]
pub trait BundleHandle: Send + Sync {
    /// Generate code (and optionally map data) from the built bundle.
    ///
    /// Receives the same snapshot as `build` so generation-relevant options
    /// like `sourceMap` are visible.
    async fn generate(&self, options: &ConfigSnapshot) -> Result<GeneratedBundle>;
}

impl std::fmt::Debug for dyn BundleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn BundleHandle")
    }
}

/// Run the two-phase bundle operation for one snapshot.
///
/// Uses the injected backend when the snapshot carries one, otherwise the
/// built-in [`DefaultBundler`]. Single attempt; the snapshot is not mutated.
pub(crate) async fn invoke(snapshot: &ConfigSnapshot) -> Result<GeneratedBundle> {
    let backend: Arc<dyn Bundler> = match snapshot.bundler() {
        Some(injected) => Arc::clone(injected),
        None => Arc::new(DefaultBundler::new()),
    };

    tracing::debug!(entry = %snapshot.entry(), "build phase starting");
    let handle = backend.build(snapshot).await?;

    tracing::debug!(entry = %snapshot.entry(), "generate phase starting");
    handle.generate(snapshot).await
}
