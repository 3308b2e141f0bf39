//! Request logging middleware.
//!
//! Every request produces two entries:
//!
//! | Message | Level | Fields |
//! |---|---|---|
//! | `started handling request` | INFO | `request`, `method`, `remote`, `request_id`¹ |
//! | `completed handling request` | WARN on 404, else INFO | the above plus `status`, `text_status`, `took` |
//!
//! ¹ only when the request carries a non-empty `X-Request-ID` header.

use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use tracing::Level;

use crate::context::Context;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::logging::{Entry, Sink, TracingSink, field};
use crate::middleware::Middleware;

/// Header whose value is logged as `request_id`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const STARTED: &str = "started handling request";
const COMPLETED: &str = "completed handling request";

/// Logs the start and completion of every request it wraps.
///
/// ```rust
/// use std::sync::Arc;
/// use reqlog::logging::RecordingSink;
/// use reqlog::middleware::RequestLogger;
/// use reqlog::Router;
///
/// // logs through the installed `tracing` subscriber
/// let app = Router::new().with(RequestLogger::new());
///
/// // or anywhere else
/// let sink = Arc::new(RecordingSink::new());
/// let app = Router::new().with(RequestLogger::with_sink("api", sink));
/// ```
///
/// A handler failure is forwarded to [`Context::error`] and the wrapped
/// chain reports success: the error lives on in the context's error slot,
/// where the default error handler (or an outer middleware) deals with it.
///
/// The name is kept for the caller's own bookkeeping; it does not appear in
/// any log field.
#[derive(Clone)]
pub struct RequestLogger {
    name: Arc<str>,
    sink: Arc<dyn Sink>,
}

impl RequestLogger {
    pub const DEFAULT_NAME: &'static str = "reqlog";

    /// Default name, logging through whichever `tracing` subscriber is
    /// installed when a request is handled.
    pub fn new() -> Self {
        Self::named(Self::DEFAULT_NAME)
    }

    /// Custom name, logging like [`RequestLogger::new`].
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::with_sink(name, TracingSink::global())
    }

    /// Custom name and sink. The sink is shared, not owned: the logger never
    /// sets it up or tears it down.
    pub fn with_sink(name: impl Into<Arc<str>>, sink: impl Sink) -> Self {
        Self { name: name.into(), sink: Arc::new(sink) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for RequestLogger {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(Logged { sink: Arc::clone(&self.sink), next })
    }
}

/// The wrapped handler. Read-only once built and shared by every request.
struct Logged {
    sink: Arc<dyn Sink>,
    next: BoxedHandler,
}

impl Handler for Logged {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a> {
        Box::pin(async move {
            let start = Instant::now();

            let entry = started(ctx);
            self.sink.emit(Level::INFO, STARTED, &entry);

            if let Err(err) = self.next.call(ctx).await {
                ctx.error(err);
            }

            let took = start.elapsed();
            let status = ctx.status();
            let entry = entry
                .with(field::STATUS, status.as_u16())
                .with(field::TEXT_STATUS, status.canonical_reason().unwrap_or_default())
                .with(field::TOOK, took);

            let level = if status == StatusCode::NOT_FOUND { Level::WARN } else { Level::INFO };
            self.sink.emit(level, COMPLETED, &entry);

            Ok(())
        })
    }
}

fn started(ctx: &Context) -> Entry {
    let req = ctx.request();
    let entry = Entry::new()
        .with(field::REQUEST, req.uri())
        .with(field::METHOD, req.method().as_str())
        .with(field::REMOTE, req.remote_address());

    match req.header(REQUEST_ID_HEADER) {
        Some(id) if !id.is_empty() => entry.with(field::REQUEST_ID, id),
        _ => entry,
    }
}
