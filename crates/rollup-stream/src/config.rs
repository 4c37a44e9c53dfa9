//! Invocation-argument normalization and the configuration snapshot.
//!
//! The entry point accepts three shapes of argument: structured
//! [`InputOptions`], a path to an external configuration file, or a dynamic
//! [`serde_json::Value`] (the wire form a host application might hand us).
//! Resolution turns any of them into one immutable [`ConfigSnapshot`] per
//! invocation, failing fast on arguments of the wrong shape and on a
//! missing `entry`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::Bundler;
use crate::cache::CacheHandle;
use crate::plugins::TransformPlugin;
use crate::{Error, Result};

/// The caller's invocation argument.
///
/// Strings and paths select configuration-file mode; a dynamic JSON value
/// is routed by shape (object = inline options, string = file path,
/// anything else = [`Error::InvalidOptionsType`]). `Value::Null` models
/// "called with no argument".
pub enum ConfigInput {
    /// Inline options supplied directly.
    Options(InputOptions),
    /// Path to an external configuration file.
    ConfigFile(PathBuf),
    /// A dynamic value, routed by shape during resolution.
    Value(Value),
}

impl From<InputOptions> for ConfigInput {
    fn from(options: InputOptions) -> Self {
        ConfigInput::Options(options)
    }
}

impl From<&str> for ConfigInput {
    fn from(path: &str) -> Self {
        ConfigInput::ConfigFile(PathBuf::from(path))
    }
}

impl From<String> for ConfigInput {
    fn from(path: String) -> Self {
        ConfigInput::ConfigFile(PathBuf::from(path))
    }
}

impl From<&Path> for ConfigInput {
    fn from(path: &Path) -> Self {
        ConfigInput::ConfigFile(path.to_path_buf())
    }
}

impl From<PathBuf> for ConfigInput {
    fn from(path: PathBuf) -> Self {
        ConfigInput::ConfigFile(path)
    }
}

impl From<Value> for ConfigInput {
    fn from(value: Value) -> Self {
        ConfigInput::Value(value)
    }
}

/// Caller-facing configuration options.
///
/// Use the builder methods for ergonomic construction, or fill the fields
/// directly. The serde shape matches external configuration files: `entry`,
/// `sourceMap`, and arbitrary backend-specific keys collected into `extra`.
/// The cache handle, the injected backend, and plugins exist only in
/// process and are never read from files.
#[derive(Clone, Default, Deserialize)]
pub struct InputOptions {
    /// Module specifier to bundle. Required by the time resolution runs.
    #[serde(default)]
    pub entry: Option<String>,

    /// Append an inline source-map comment to the output (default: false).
    #[serde(default, rename = "sourceMap")]
    pub source_map: bool,

    /// Caller-owned cache handle, forwarded to the backend untouched.
    #[serde(skip)]
    pub cache: Option<CacheHandle>,

    /// Injected backend; the built-in one is used when absent.
    #[serde(skip)]
    pub bundler: Option<Arc<dyn Bundler>>,

    /// Plugins, passed through to the backend.
    #[serde(skip)]
    pub plugins: Vec<Arc<dyn TransformPlugin>>,

    /// Backend-specific options, passed through without interpretation.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl InputOptions {
    /// Create options for bundling `entry`.
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: Some(entry.into()),
            ..Self::default()
        }
    }

    /// Enable or disable inline source-map annotation.
    pub fn source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    /// Attach a cache handle (clone one handle across invocations that
    /// should share transform state).
    pub fn cache(mut self, cache: CacheHandle) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Inject a backend in place of the built-in one.
    pub fn bundler(mut self, bundler: impl Bundler + 'static) -> Self {
        self.bundler = Some(Arc::new(bundler));
        self
    }

    /// Add a plugin.
    pub fn plugin(mut self, plugin: impl TransformPlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Add a backend-specific pass-through option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for InputOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputOptions")
            .field("entry", &self.entry)
            .field("source_map", &self.source_map)
            .field("cache", &self.cache.is_some())
            .field("bundler", &self.bundler.is_some().then_some("injected"))
            .field("plugins", &self.plugins.len())
            .field("extra", &self.extra)
            .finish()
    }
}

/// The immutable, point-in-time configuration used for the remainder of an
/// invocation. Exactly one exists per invocation; it is never mutated after
/// resolution.
pub struct ConfigSnapshot {
    entry: String,
    source_map: bool,
    cache: Option<CacheHandle>,
    bundler: Option<Arc<dyn Bundler>>,
    plugins: Vec<Arc<dyn TransformPlugin>>,
    extra: serde_json::Map<String, Value>,
}

impl ConfigSnapshot {
    /// Module specifier to bundle.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Whether inline source-map annotation was requested.
    pub fn source_map(&self) -> bool {
        self.source_map
    }

    /// The caller's cache handle, if one was supplied.
    pub fn cache(&self) -> Option<&CacheHandle> {
        self.cache.as_ref()
    }

    /// The injected backend, if one was supplied.
    pub fn bundler(&self) -> Option<&Arc<dyn Bundler>> {
        self.bundler.as_ref()
    }

    /// Plugins, in caller order.
    pub fn plugins(&self) -> &[Arc<dyn TransformPlugin>] {
        &self.plugins
    }

    /// A backend-specific pass-through option by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// All backend-specific pass-through options.
    pub fn extra(&self) -> &serde_json::Map<String, Value> {
        &self.extra
    }
}

impl fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("entry", &self.entry)
            .field("source_map", &self.source_map)
            .field("cache", &self.cache.is_some())
            .field("bundler", &self.bundler.is_some().then_some("injected"))
            .field("plugins", &self.plugins.len())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Resolve the invocation argument into a configuration snapshot.
///
/// Suspends only in configuration-file mode, while the file is read and
/// parsed. Loader errors propagate with their message intact.
pub(crate) async fn resolve(input: ConfigInput) -> Result<ConfigSnapshot> {
    let options = match input {
        ConfigInput::Options(options) => options,
        ConfigInput::ConfigFile(path) => load_config_file(&path).await?,
        ConfigInput::Value(value) => match value {
            Value::Object(_) => from_config_value(value)?,
            Value::String(path) => load_config_file(Path::new(&path)).await?,
            _ => return Err(Error::InvalidOptionsType),
        },
    };

    let entry = options.entry.ok_or(Error::MissingEntry)?;
    tracing::debug!(%entry, source_map = options.source_map, "configuration resolved");

    Ok(ConfigSnapshot {
        entry,
        source_map: options.source_map,
        cache: options.cache,
        bundler: options.bundler,
        plugins: options.plugins,
        extra: options.extra,
    })
}

/// Load options from an external configuration file (TOML or JSON, by
/// extension).
async fn load_config_file(path: &Path) -> Result<InputOptions> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::ConfigLoad(e.to_string()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let value = match extension.as_str() {
        "toml" => {
            let parsed: toml::Value =
                toml::from_str(&content).map_err(|e| Error::ConfigLoad(e.to_string()))?;
            serde_json::to_value(parsed).map_err(|e| Error::ConfigLoad(e.to_string()))?
        }
        "json" => {
            serde_json::from_str(&content).map_err(|e| Error::ConfigLoad(e.to_string()))?
        }
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };

    match value {
        Value::Object(_) => from_config_value(value),
        _ => Err(Error::ConfigLoad(format!(
            "configuration file {} must contain an object",
            path.display()
        ))),
    }
}

fn from_config_value(value: Value) -> Result<InputOptions> {
    serde_json::from_value(value).map_err(|e| Error::ConfigLoad(e.to_string()))
}
