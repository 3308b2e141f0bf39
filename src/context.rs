//! Per-request context shared by middleware and handlers.

use http::StatusCode;
use tracing::debug;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Everything one request carries through the handler chain: the request,
/// the response written so far, and the error-reporting slot.
///
/// One `Context` exists per request and is handed down the chain as
/// `&mut Context`, so middleware sees exactly what the handler left behind.
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Option<Response>,
    error: Option<Error>,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self { request, response: None, error: None }
    }

    pub fn request(&self) -> &Request { &self.request }
    pub fn request_mut(&mut self) -> &mut Request { &mut self.request }

    /// Writes the response. A later call replaces an earlier one.
    pub fn respond(&mut self, res: impl IntoResponse) {
        self.response = Some(res.into_response());
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// The status the client will see: that of the written response, or
    /// `200 OK` when nothing has been written yet.
    pub fn status(&self) -> StatusCode {
        self.response.as_ref().map_or(StatusCode::OK, Response::status_code)
    }

    /// Reports a failure for this request.
    ///
    /// The error is kept in the context's error slot, replacing any earlier
    /// one. If no response has been written yet, the default error handler
    /// renders the error as the response; a response the handler already
    /// wrote is left alone.
    pub fn error(&mut self, err: Error) {
        if self.response.is_none() {
            debug!(error = %err, status = err.status().as_u16(), "rendering reported error");
            self.response = Some(err.to_response());
        }
        self.error = Some(err);
    }

    /// The last error reported through [`Context::error`].
    pub fn reported_error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    pub(crate) fn into_response(self) -> Response {
        self.response.unwrap_or_else(|| Response::status(StatusCode::OK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    fn ctx() -> Context {
        Context::new(Request::from(http::Request::get("/").body(bytes::Bytes::new()).unwrap()))
    }

    #[test]
    fn status_defaults_to_ok() {
        let ctx = ctx();
        assert_eq!(ctx.status(), StatusCode::OK);
        assert_eq!(ctx.into_response().status_code(), StatusCode::OK);
    }

    #[test]
    fn error_renders_when_nothing_was_written() {
        let mut ctx = ctx();
        ctx.error(HttpError::new(StatusCode::NOT_FOUND).into());

        assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
        assert!(matches!(
            ctx.reported_error(),
            Some(Error::Http(e)) if e.status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn error_keeps_a_written_response() {
        let mut ctx = ctx();
        ctx.respond((StatusCode::ACCEPTED, "queued"));
        ctx.error(Error::other(std::fmt::Error));

        assert_eq!(ctx.status(), StatusCode::ACCEPTED);
        assert!(ctx.reported_error().is_some());
        assert!(ctx.take_error().is_some());
        assert!(ctx.reported_error().is_none());
    }
}
