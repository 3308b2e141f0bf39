//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured access logs, metrics, request-id
//! injection, authentication-header inspection.
//!
//! A middleware is anything that wraps a handler and returns a handler. The
//! wrapped handler is called with the same `&mut Context`, so whatever it
//! writes is visible to the middleware once it returns.
//!
//! ```rust
//! use reqlog::middleware::{Pipeline, RequestLogger};
//! use reqlog::{BoxedHandler, Router};
//!
//! let passthrough = |next: BoxedHandler| next;
//!
//! let app = Router::new()
//!     .with(Pipeline::new().with(RequestLogger::new()).with(passthrough));
//! ```
//!
//! Built-in middleware:
//! - [`RequestLogger`] — logs start and completion of every request

mod logger;

use std::sync::Arc;

use crate::handler::BoxedHandler;

pub use logger::{REQUEST_ID_HEADER, RequestLogger};

/// Wraps a handler, producing a handler.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// An ordered list of middleware applied as one.
///
/// The first middleware added is the outermost: it sees the request first
/// and the response last.
#[derive(Clone, Default)]
pub struct Pipeline {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `middleware` inside every layer added so far.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize { self.layers.len() }
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }
}

impl Middleware for Pipeline {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self.layers.iter().rev().fold(next, |handler, layer| layer.wrap(handler))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::StatusCode;

    use super::*;
    use crate::context::Context;
    use crate::handler::{BoxFuture, Handler, IntoHandler};
    use crate::request::Request;
    use crate::HandlerResult;

    /// Records its tag on the way in and on the way out.
    struct Tag {
        tag: &'static str,
        trail: Arc<Mutex<Vec<String>>>,
    }

    struct Tagged {
        tag: &'static str,
        trail: Arc<Mutex<Vec<String>>>,
        next: BoxedHandler,
    }

    impl Middleware for Tag {
        fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
            Arc::new(Tagged { tag: self.tag, trail: Arc::clone(&self.trail), next })
        }
    }

    impl Handler for Tagged {
        fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a> {
            Box::pin(async move {
                self.trail.lock().unwrap().push(format!("{} in", self.tag));
                let res = self.next.call(ctx).await;
                self.trail.lock().unwrap().push(format!("{} out", self.tag));
                res
            })
        }
    }

    async fn ok(ctx: &mut Context) -> HandlerResult {
        ctx.respond(StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn first_added_is_outermost() {
        let trail = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with(Tag { tag: "a", trail: Arc::clone(&trail) })
            .with(Tag { tag: "b", trail: Arc::clone(&trail) });
        assert_eq!(pipeline.len(), 2);

        let handler = pipeline.wrap(ok.into_boxed_handler());
        let mut ctx = Context::new(Request::from(
            http::Request::get("/").body(bytes::Bytes::new()).unwrap(),
        ));
        handler.call(&mut ctx).await.unwrap();

        assert_eq!(*trail.lock().unwrap(), ["a in", "b in", "b out", "a out"]);
    }

    #[test]
    fn empty_pipeline_returns_the_handler_unchanged() {
        let handler = ok.into_boxed_handler();
        let wrapped = Pipeline::new().wrap(Arc::clone(&handler));
        assert!(Arc::ptr_eq(&handler, &wrapped));
    }
}
