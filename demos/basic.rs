//! Minimal reqlog example — a few JSON endpoints behind the request logger.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -H 'x-request-id: abc-123' http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl http://localhost:3000/nope            # completes at WARN
//!   curl -X DELETE http://localhost:3000/users/7

use http::StatusCode;
use reqlog::middleware::RequestLogger;
use reqlog::{Context, HandlerResult, HttpError, Response, Router, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .get("/users/{id}",    get_user)
        .post("/users",        create_user)
        .delete("/users/{id}", delete_user)
        .with(RequestLogger::named("demo"));

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(app).await {
        tracing::error!("server error: {e}");
    }
}

// GET /users/{id}
async fn get_user(ctx: &mut Context) -> HandlerResult {
    let id = ctx.request().param("id").unwrap_or("unknown").to_owned();
    ctx.respond(Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#)));
    Ok(())
}

// POST /users
async fn create_user(ctx: &mut Context) -> HandlerResult {
    if ctx.request().body().is_empty() {
        return Err(HttpError::new(StatusCode::BAD_REQUEST).with_message("empty body").into());
    }

    ctx.respond(
        Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/99")
            .json(r#"{"id":"99","name":"new_user"}"#),
    );
    Ok(())
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(ctx: &mut Context) -> HandlerResult {
    ctx.respond(StatusCode::NO_CONTENT);
    Ok(())
}
