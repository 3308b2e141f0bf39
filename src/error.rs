//! Unified error type.

use std::borrow::Cow;

use http::StatusCode;
use thiserror::Error;

use crate::response::Response;

/// The error type returned by reqlog's fallible operations.
///
/// Two audiences share it. The server surfaces infrastructure failures
/// (binding a port, accepting a connection) as [`Error::Io`]. Handlers report
/// request-level failures as [`Error::Http`] or, for anything opaque,
/// [`Error::Other`]; those end up in the context's error slot and are
/// rendered by the default error handler.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps any error type as an opaque handler failure.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }

    /// The status the default error handler answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Http(e) => e.status,
            Self::Io(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error the way the default error handler does.
    ///
    /// Only [`HttpError`] messages reach the client; everything else becomes
    /// a bare `500 Internal Server Error` so internals do not leak.
    pub(crate) fn to_response(&self) -> Response {
        match self {
            Self::Http(e) => Response::builder().status(e.status).text(e.message.clone()),
            Self::Io(_) | Self::Other(_) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                Response::builder()
                    .status(status)
                    .text(status.canonical_reason().unwrap_or_default())
            }
        }
    }
}

/// A handler failure that maps onto an HTTP status.
///
/// ```rust
/// use reqlog::{Context, HandlerResult, HttpError};
/// use http::StatusCode;
///
/// async fn get_user(ctx: &mut Context) -> HandlerResult {
///     let id = ctx.request().param("id").unwrap_or_default();
///     if id != "42" {
///         return Err(HttpError::new(StatusCode::NOT_FOUND).into());
///     }
///     ctx.respond("alice");
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: Cow<'static, str>,
}

impl HttpError {
    /// An error carrying the canonical reason phrase as its message.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: Cow::Borrowed(status.canonical_reason().unwrap_or_default()),
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<StatusCode> for HttpError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_defaults_to_reason_phrase() {
        let err = HttpError::new(StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Not Found");
        assert_eq!(err.to_string(), "404 Not Found: Not Found");
    }

    #[test]
    fn opaque_errors_render_as_500() {
        let err = Error::other(std::fmt::Error);
        let res = err.to_response();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), b"Internal Server Error");
    }

    #[test]
    fn http_errors_keep_their_status_and_message() {
        let err: Error = HttpError::new(StatusCode::CONFLICT).with_message("taken").into();
        let res = err.to_response();
        assert_eq!(res.status_code(), StatusCode::CONFLICT);
        assert_eq!(res.body(), b"taken");
    }
}
