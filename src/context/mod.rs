//! Per-request context.
//!
//! A [`Context`] pairs the inbound [`Request`] with the [`Response`] being
//! produced for it. It moves by value through the middleware chain, so the
//! task that holds it owns both halves exclusively.

use std::io::Write;

use crate::http::{Request, Response, ResponseBody};

/// The request/response pair for one in-flight request.
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Response,
}

impl Context {
    /// Creates a context whose response is buffered in memory.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::new(),
        }
    }

    /// Creates a context whose response body streams into `sink`.
    pub fn with_sink(request: Request, sink: impl Write + Send + 'static) -> Self {
        Self {
            request,
            response: Response::with_body(ResponseBody::stream(sink)),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Borrows the request and the response at the same time.
    pub fn parts_mut(&mut self) -> (&Request, &mut Response) {
        (&self.request, &mut self.response)
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}
