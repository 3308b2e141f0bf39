//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Middleware is applied
//! once, when it is added, so the request path only pays for the handlers
//! themselves.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::context::Context;
use crate::error::HttpError;
use crate::handler::{BoxedHandler, HandlerResult, IntoHandler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every method returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<usize>>,
    handlers: Vec<BoxedHandler>,
    not_found: BoxedHandler,
    method_not_allowed: BoxedHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            handlers: Vec::new(),
            not_found: not_found.into_boxed_handler(),
            method_not_allowed: method_not_allowed.into_boxed_handler(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use reqlog::{Context, HandlerResult, Router};
    /// # use http::Method;
    /// # async fn get_user(_: &mut Context) -> HandlerResult { Ok(()) }
    /// # async fn create_user(_: &mut Context) -> HandlerResult { Ok(()) }
    /// # async fn delete_user(_: &mut Context) -> HandlerResult { Ok(()) }
    /// Router::new()
    ///     .on(Method::DELETE, "/users/{id}", delete_user)
    ///     .on(Method::GET,    "/users/{id}", get_user)
    ///     .on(Method::POST,   "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with one
    /// already registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl IntoHandler) -> Self {
        let index = self.handlers.len();
        self.routes
            .entry(method)
            .or_default()
            .insert(path, index)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.handlers.push(handler.into_boxed_handler());
        self
    }

    pub fn get(self, path: &str, handler: impl IntoHandler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl IntoHandler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl IntoHandler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl IntoHandler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl IntoHandler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Wraps every handler registered so far, plus the 404 and 405
    /// fallbacks, in `middleware`.
    ///
    /// Routes registered afterwards are not wrapped. Middleware added later
    /// wraps middleware added earlier, so the last `with` runs first.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        for handler in &mut self.handlers {
            *handler = middleware.wrap(Arc::clone(handler));
        }
        self.not_found = middleware.wrap(Arc::clone(&self.not_found));
        self.method_not_allowed = middleware.wrap(Arc::clone(&self.method_not_allowed));
        self
    }

    /// Runs one request through the router and returns the response.
    ///
    /// An error that reaches this point is reported to the context, which
    /// renders it unless a response was already written.
    pub async fn handle(&self, request: Request) -> Response {
        let mut ctx = Context::new(request);
        let handler = self.resolve(&mut ctx);
        if let Err(err) = handler.call(&mut ctx).await {
            ctx.error(err);
        }
        ctx.into_response()
    }

    fn resolve(&self, ctx: &mut Context) -> BoxedHandler {
        let req = ctx.request();
        let Some(matched) = self
            .routes
            .get(req.method())
            .and_then(|tree| tree.at(req.path()).ok())
        else {
            return if self.allowed_elsewhere(req.method(), req.path()) {
                Arc::clone(&self.method_not_allowed)
            } else {
                Arc::clone(&self.not_found)
            };
        };

        let index = *matched.value;
        let params: HashMap<String, String> = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        ctx.request_mut().set_params(params);
        Arc::clone(&self.handlers[index])
    }

    fn allowed_elsewhere(&self, method: &Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|(m, tree)| m != method && tree.at(path).is_ok())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

async fn not_found(_ctx: &mut Context) -> HandlerResult {
    Err(HttpError::new(StatusCode::NOT_FOUND).into())
}

async fn method_not_allowed(_ctx: &mut Context) -> HandlerResult {
    Err(HttpError::new(StatusCode::METHOD_NOT_ALLOWED).into())
}
