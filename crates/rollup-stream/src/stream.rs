//! The public entry point and the push stream it returns.
//!
//! [`rollup`] returns a [`RollupStream`] synchronously; the pipeline behind
//! it (resolve configuration, build, generate, annotate) is a boxed future
//! that runs only once the stream is polled, so a consumer always has the
//! stream in hand before any asynchronous work starts. Each `.await` inside
//! the pipeline is a suspension point and the stages run strictly in order.
//!
//! A stream yields at most one code chunk. Success is one `Ok(code)` item
//! (even when the code is empty) followed by the end of the stream; failure
//! at any stage is one `Err` item carrying that stage's error unmodified,
//! after which the stream is terminal.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::StreamExt;

use crate::backend;
use crate::config::{self, ConfigInput};
use crate::sourcemap;
use crate::Result;

type PipelineFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// Bundle per the given options and stream the generated code.
///
/// The argument can be [`InputOptions`](crate::InputOptions), a
/// configuration-file path, or a dynamic [`serde_json::Value`]; see
/// [`ConfigInput`]. The options are moved in here, at call time, so caller
/// mutation of their own copies after this returns cannot affect the
/// invocation.
pub fn rollup(input: impl Into<ConfigInput>) -> RollupStream {
    RollupStream {
        state: State::Pending(Box::pin(run_pipeline(input.into()))),
    }
}

async fn run_pipeline(input: ConfigInput) -> Result<String> {
    let snapshot = config::resolve(input).await?;
    let bundle = backend::invoke(&snapshot).await?;
    tracing::debug!(
        entry = %snapshot.entry(),
        bytes = bundle.code.len(),
        mapped = bundle.map.is_some(),
        "bundle generated"
    );
    Ok(sourcemap::annotate(
        bundle.code,
        bundle.map.as_ref(),
        snapshot.source_map(),
    ))
}

enum State {
    /// Pipeline not yet complete.
    Pending(PipelineFuture),
    /// Code delivered; the next poll ends the stream.
    Emitted,
    /// Terminal, by success or by error.
    Done,
}

/// Single-producer, single-consumer stream of bundler output.
///
/// Yields exactly one item per invocation: the annotated code on success or
/// the pipeline error on failure. See [`rollup`].
pub struct RollupStream {
    state: State,
}

impl RollupStream {
    /// Drain the stream into the complete generated code.
    pub async fn into_string(mut self) -> Result<String> {
        let mut code = String::new();
        while let Some(chunk) = self.next().await {
            code.push_str(&chunk?);
        }
        Ok(code)
    }
}

impl Stream for RollupStream {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match &mut this.state {
            State::Pending(pipeline) => match pipeline.as_mut().poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(code)) => {
                    this.state = State::Emitted;
                    Poll::Ready(Some(Ok(code)))
                }
                Poll::Ready(Err(e)) => {
                    tracing::debug!(error = %e, "pipeline failed");
                    this.state = State::Done;
                    Poll::Ready(Some(Err(e)))
                }
            },
            State::Emitted => {
                this.state = State::Done;
                Poll::Ready(None)
            }
            State::Done => Poll::Ready(None),
        }
    }
}
