//! # rollup-stream
//!
//! A push-based streaming adapter over a two-phase bundling backend.
//!
//! The bundling backend (anything implementing [`Bundler`]) exposes a
//! `build` phase that produces a bundle handle and a `generate` phase that
//! produces code plus optional source-map data. This crate normalizes the
//! caller's invocation argument into an immutable configuration snapshot,
//! drives the backend, optionally annotates the output with an inline
//! source map, and surfaces the result as a single-item stream so it can be
//! consumed by stream-oriented pipelines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use rollup_stream::{InputOptions, rollup};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stream = rollup(InputOptions::new("./src/index.js").source_map(true));
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Configuration files
//!
//! Passing a string or path instead of [`InputOptions`] loads the
//! configuration from that file (TOML or JSON, by extension):
//!
//! ```no_run
//! # async fn example() -> rollup_stream::Result<()> {
//! let code = rollup_stream::rollup("rollup.config.toml").into_string().await?;
//! # Ok(()) }
//! ```
//!
//! ## Caching
//!
//! A [`CacheHandle`] is caller-owned and opaque to the stream core; it is
//! threaded through the snapshot into the backend's `build` call so that
//! sequential invocations sharing one handle (by cloning it - clones share
//! identity) can skip re-transforming unchanged modules. Sharing a handle
//! between two *concurrently running* pipelines is not guarded against;
//! sequential reuse only is supported.

pub mod backend;
pub mod builtin;
pub mod cache;
pub mod config;
pub mod plugins;
pub mod sourcemap;
pub mod stream;

pub use backend::{BundleHandle, Bundler, GeneratedBundle};
pub use builtin::DefaultBundler;
pub use cache::{CacheHandle, CachedModule};
pub use config::{ConfigInput, ConfigSnapshot, InputOptions};
pub use plugins::TransformPlugin;
pub use sourcemap::SourceMap;
pub use stream::{RollupStream, rollup};

/// Error types for rollup-stream operations.
///
/// The two validation messages are load-bearing: downstream consumers match
/// on their literal text, so they are reproduced byte-for-byte.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The invocation argument was neither an options object nor a path.
    #[error("options must be an object or a string!")]
    InvalidOptionsType,

    /// The resolved configuration has no `entry`.
    #[error("You must supply options.entry to rollup")]
    MissingEntry,

    /// Loading or parsing an external configuration file failed.
    ///
    /// Carries the loader's message unwrapped so it surfaces verbatim.
    #[error("{0}")]
    ConfigLoad(String),

    /// A configuration file had an extension the loader does not handle.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The backend's build phase failed.
    #[error("{0}")]
    Build(String),

    /// The backend's generate phase failed.
    #[error("{0}")]
    Generate(String),
}

/// Result type alias for rollup-stream operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidOptionsType => "INVALID_OPTIONS_TYPE",
            Error::MissingEntry => "MISSING_ENTRY",
            Error::ConfigLoad(_) => "CONFIG_LOAD_FAILURE",
            Error::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Error::Build(_) => "BUILD_FAILURE",
            Error::Generate(_) => "GENERATE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidOptionsType => Some(Box::new(
                "Pass either InputOptions (or a JSON object) or a path to a configuration file."
                    .to_string(),
            )),
            Error::MissingEntry => Some(Box::new(
                "Set `entry` to the module specifier you want bundled.".to_string(),
            )),
            Error::UnsupportedFormat(ext) => Some(Box::new(format!(
                "Configuration files must be TOML or JSON; '{}' is neither.",
                ext
            ))),
            _ => None,
        }
    }
}
