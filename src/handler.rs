//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* types in one table, and
//! middleware wraps handlers it knows nothing about. Both work through the
//! trait object `dyn Handler`, shared as [`BoxedHandler`].
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(ctx: &mut Context) -> HandlerResult { … }  ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                               ← IntoHandler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                               ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn Handler>
//! handler.call(&mut ctx)  at request time                  ← one vtable dispatch
//!        ↓
//! Box::pin(hello(ctx))                                     ← BoxFuture<'_>
//! ```
//!
//! The handler future borrows the context mutably for its whole lifetime, so
//! `BoxFuture` carries that borrow's lifetime instead of `'static`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;

/// What every handler returns. `Err` is a reported failure; the router (or a
/// middleware) forwards it to [`Context::error`].
pub type HandlerResult = Result<(), Error>;

/// A heap-allocated, type-erased handler future borrowing the context for `'a`.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// A request handler behind a vtable.
///
/// Plain `async fn`s get this through [`IntoHandler`]; implement it directly
/// for handlers that carry state, which is what middleware does to wrap the
/// next handler in the chain.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a>;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

// ── async fn support ──────────────────────────────────────────────────────────

/// Bridges `async fn(&mut Context)` to a bound that names its future.
///
/// An `async fn` taking `&'a mut Context` returns a *different* future type
/// for every `'a`, which `Fn(&mut Context) -> Fut` cannot express with a
/// single `Fut`. Quantifying this trait over `'a` can.
#[doc(hidden)]
pub trait AsyncContextFn<'a> {
    type Future: Future<Output = HandlerResult> + Send + 'a;

    fn call(&self, ctx: &'a mut Context) -> Self::Future;
}

impl<'a, F, Fut> AsyncContextFn<'a> for F
where
    F: Fn(&'a mut Context) -> Fut,
    Fut: Future<Output = HandlerResult> + Send + 'a,
{
    type Future = Fut;

    fn call(&self, ctx: &'a mut Context) -> Fut {
        self(ctx)
    }
}

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(ctx: &mut Context) -> HandlerResult
/// ```
pub trait IntoHandler {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

impl<F> IntoHandler for F
where
    F: for<'a> AsyncContextFn<'a> + Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype wrapper that holds a concrete `async fn` and implements
/// [`Handler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: for<'a> AsyncContextFn<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a> {
        Box::pin(<F as AsyncContextFn<'a>>::call(&self.0, ctx))
    }
}
