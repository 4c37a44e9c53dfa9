//! The built-in bundling backend.
//!
//! `DefaultBundler` is deliberately small: it bundles a single module by
//! running plugin `load` hooks (falling back to the filesystem) and then
//! plugin `transform` hooks, consulting the caller's cache handle to skip
//! transforms whose input has not changed. It exists so the crate works out
//! of the box; full-graph bundlers are injected through
//! [`InputOptions::bundler`](crate::InputOptions::bundler).

use async_trait::async_trait;

use crate::backend::{BundleHandle, Bundler, GeneratedBundle};
use crate::config::ConfigSnapshot;
use crate::plugins::TransformPlugin;
use crate::sourcemap::SourceMap;
use crate::{Error, Result};

/// Minimal plugin-driven backend used when no bundler is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBundler;

impl DefaultBundler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Bundler for DefaultBundler {
    async fn build(&self, options: &ConfigSnapshot) -> Result<Box<dyn BundleHandle>> {
        let id = options.entry().to_string();
        let source = load_module(&id, options.plugins()).await?;
        let source_hash = seahash::hash(source.as_bytes());

        let code = match options.cache().and_then(|c| c.lookup(&id, source_hash)) {
            Some(cached) => {
                tracing::debug!(module = %id, "transform cache hit");
                cached
            }
            None => {
                let code = transform_module(&source, &id, options.plugins()).await?;
                if let Some(cache) = options.cache() {
                    cache.store(&id, source_hash, code.clone());
                }
                code
            }
        };

        Ok(Box::new(BuiltBundle { id, source, code }))
    }
}

/// Ask each plugin's `load` hook for the module source, falling back to the
/// filesystem when no plugin claims it.
async fn load_module(id: &str, plugins: &[std::sync::Arc<dyn TransformPlugin>]) -> Result<String> {
    for plugin in plugins {
        if let Some(source) = plugin.load(id).await? {
            tracing::trace!(module = %id, plugin = plugin.name(), "module loaded by plugin");
            return Ok(source);
        }
    }

    tokio::fs::read_to_string(id)
        .await
        .map_err(|e| Error::Build(format!("could not load {}: {}", id, e)))
}

/// Run each plugin's `transform` hook in order over the loaded source.
async fn transform_module(
    source: &str,
    id: &str,
    plugins: &[std::sync::Arc<dyn TransformPlugin>],
) -> Result<String> {
    let mut code = source.to_string();
    for plugin in plugins {
        if let Some(transformed) = plugin.transform(&code, id).await? {
            tracing::trace!(module = %id, plugin = plugin.name(), "module transformed");
            code = transformed;
        }
    }
    Ok(code)
}

/// A single-module bundle produced by [`DefaultBundler::build`].
struct BuiltBundle {
    id: String,
    source: String,
    code: String,
}

#[async_trait]
impl BundleHandle for BuiltBundle {
    async fn generate(&self, options: &ConfigSnapshot) -> Result<GeneratedBundle> {
        let map = options
            .source_map()
            .then(|| SourceMap::for_module(&self.id, &self.source, &self.code));

        Ok(GeneratedBundle {
            code: self.code.clone(),
            map,
        })
    }
}
