//! Shared test utilities for rollup-stream tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rollup_stream::{Result, TransformPlugin};

/// Serves module source from an in-memory map, so tests never touch disk.
pub struct VirtualModules {
    files: HashMap<String, String>,
}

impl VirtualModules {
    pub fn new<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl TransformPlugin for VirtualModules {
    fn name(&self) -> &str {
        "virtual-modules"
    }

    async fn load(&self, id: &str) -> Result<Option<String>> {
        Ok(self.files.get(id).cloned())
    }
}

/// Counts transform invocations without changing the code.
pub struct CountingTransform {
    calls: Arc<AtomicUsize>,
}

impl CountingTransform {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl TransformPlugin for CountingTransform {
    fn name(&self) -> &str {
        "counting-transform"
    }

    async fn transform(&self, _code: &str, _id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}
