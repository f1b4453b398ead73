//! Handler function types.
//!
//! Commands and listeners are plain async functions. They are stored
//! type-erased behind an `Arc` so a sealed registry can hand the same
//! function to any number of concurrently running events.
//!
//! # Example
//!
//! ```rust,ignore
//! // Returning nothing is fine...
//! async fn log_message(ctx: InvocationContext) {
//!     tracing::info!(content = ctx.content(), "message");
//! }
//!
//! // ...and so is returning any error convertible into `BoxError`.
//! async fn roll(ctx: InvocationContext, args: Vec<String>) -> Result<(), ApiError> {
//!     ctx.reply("4").await.map(|_| ())
//! }
//! ```

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

pub use futures::future::BoxFuture;
pub use tower::BoxError;

/// What every handler eventually produces.
pub type HandlerResult = Result<(), BoxError>;

/// A type-erased async function from a context to a [`HandlerResult`].
pub type HandlerFn<C> = Arc<dyn Fn(C) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

// ============================================================================
// IntoHandlerResult
// ============================================================================

/// Types that handlers may return.
///
/// Implemented for `()` (always succeeds) and for `Result<(), E>` where the
/// error converts into [`BoxError`].
pub trait IntoHandlerResult: Send + 'static {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Into<BoxError> + Send + 'static,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

/// Erases an async function into a [`HandlerFn`].
pub fn into_handler_fn<C, F, Fut, R>(f: F) -> HandlerFn<C>
where
    C: Send + 'static,
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    Arc::new(move |ctx| {
        let fut = f(ctx);
        Box::pin(async move { fut.await.into_handler_result() })
    })
}

/// Extracts a readable message from a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
