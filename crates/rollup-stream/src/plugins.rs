//! Plugin hooks understood by the built-in backend.
//!
//! This is the load/transform subset of the usual bundler plugin surface:
//! `load` turns a module id into source text, `transform` rewrites source
//! text. Both hooks default to "not handled" so a plugin implements only
//! what it needs. Injected backends are free to interpret the plugin list
//! however they like (or ignore it); the stream core passes it through
//! untouched.

use async_trait::async_trait;

use crate::Result;

/// A bundler plugin with `load` and `transform` hooks.
///
/// Hooks run in plugin order. For `load`, the first plugin returning
/// `Some` wins; for `transform`, each plugin sees the previous plugin's
/// output.
#[async_trait]
pub trait TransformPlugin: Send + Sync {
    /// Plugin name, used in log events.
    fn name(&self) -> &str {
        "plugin"
    }

    /// Provide source text for `id`, or `None` to defer to the next plugin
    /// (and ultimately the filesystem).
    async fn load(&self, id: &str) -> Result<Option<String>> {
        let _ = id;
        Ok(None)
    }

    /// Rewrite `code`, or `None` to leave it unchanged.
    async fn transform(&self, code: &str, id: &str) -> Result<Option<String>> {
        let _ = (code, id);
        Ok(None)
    }
}
