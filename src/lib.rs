//! # reqlog
//!
//! A minimal HTTP framework whose one built-in middleware logs every request
//! as two structured entries: one when handling starts, one when it
//! completes.
//!
//! ## The access log
//!
//! ```text
//! INFO  started handling request   request="/users/42" method="GET" remote="10.0.0.7:51234" request_id="abc-123"
//! INFO  completed handling request request="/users/42" method="GET" remote="10.0.0.7:51234" request_id="abc-123" status=200 text_status="OK" took=312µs
//! WARN  completed handling request request="/nope" ... status=404 text_status="Not Found" took=41µs
//! ```
//!
//! `request_id` appears only when the client sent a non-empty
//! `X-Request-ID` header. A `404` completes at WARN, everything else at INFO.
//! Entries go to a [`logging::Sink`]; the default one hands them to
//! `tracing`, so format and destination are whatever subscriber the
//! application installs.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reqlog::middleware::RequestLogger;
//! use reqlog::{Context, HandlerResult, HttpError, Router, Server};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     let app = Router::new()
//!         .get("/users/{id}", get_user)
//!         .post("/users", create_user)
//!         .with(RequestLogger::new());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(ctx: &mut Context) -> HandlerResult {
//!     let id = ctx.request().param("id").unwrap_or("unknown").to_owned();
//!     ctx.respond(format!(r#"{{"id":"{id}"}}"#));
//!     Ok(())
//! }
//!
//! async fn create_user(ctx: &mut Context) -> HandlerResult {
//!     if ctx.request().body().is_empty() {
//!         return Err(HttpError::new(StatusCode::BAD_REQUEST).into());
//!     }
//!     ctx.respond(StatusCode::CREATED);
//!     Ok(())
//! }
//! ```

mod context;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod logging;
pub mod middleware;

pub use context::Context;
pub use error::{Error, HttpError};
pub use handler::{BoxFuture, BoxedHandler, Handler, HandlerResult, IntoHandler};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
