//! Inbound request view.
//!
//! The interceptors only read the method and a handful of request headers, so
//! a request is just those plus the path for log context.

use super::{Headers, Method};

/// An inbound HTTP request as seen by the pipeline.
///
/// # Examples
///
/// ```
/// use etagger::http::{Method, Request};
///
/// let request = Request::new(Method::Get, "/articles/7")
///     .header("If-None-Match", "\"abc123\"");
///
/// assert_eq!(request.method(), &Method::Get);
/// assert_eq!(request.headers().get("if-none-match"), Some("\"abc123\""));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: Headers,
}

impl Request {
    /// Creates a request with no headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a mutable reference to the request headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
