//! HTTP/1.1 response under construction.
//!
//! Handlers mutate the status and headers and write body bytes through
//! [`Response::write`]; where those bytes land depends on the current
//! [`ResponseBody`].

use std::io;

use bytes::{BufMut, BytesMut};

use super::{Headers, ResponseBody, StatusCode};

/// An HTTP response being produced by the pipeline.
///
/// # Examples
///
/// ```
/// use etagger::http::{Response, StatusCode};
///
/// let mut response = Response::new();
/// response.set_header("Content-Type", "application/json");
/// response.write(br#"{"status":"ok"}"#).unwrap();
///
/// let bytes = response.into_bytes().unwrap();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(text.contains("Content-Length: 15\r\n"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: ResponseBody,
}

impl Response {
    /// Creates a `200 OK` response backed by an in-memory buffer.
    pub fn new() -> Self {
        Self::with_body(ResponseBody::buffer())
    }

    /// Creates a `200 OK` response writing into `body`.
    pub fn with_body(body: ResponseBody) -> Self {
        Self {
            status: StatusCode::Ok,
            headers: Headers::new(),
            body,
        }
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a mutable reference to the response headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Appends a header. Multiple calls with the same name are additive.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    /// Sets a header, replacing any existing values.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Writes body bytes into the current sink.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.body.write(data)
    }

    /// Returns the current sink.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Returns a mutable reference to the current sink.
    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    /// Installs `body` as the output sink and returns the previous one.
    pub fn replace_body(&mut self, body: ResponseBody) -> ResponseBody {
        std::mem::replace(&mut self.body, body)
    }

    /// Serializes a buffered response into HTTP/1.1 wire format.
    ///
    /// Returns `None` when the body streams to a host sink, since those bytes
    /// have already left. A `Content-Length` header is always written last;
    /// `304 Not Modified` never carries body bytes.
    pub fn into_bytes(mut self) -> Option<BytesMut> {
        let ResponseBody::Buffer(body) = self.body else {
            return None;
        };
        let body: &[u8] = if self.status == StatusCode::NotModified {
            &[]
        } else {
            &body
        };

        if !body.is_empty() && !self.headers.contains("content-type") {
            self.headers
                .insert("Content-Type", "text/plain; charset=utf-8");
        }
        self.headers.remove("content-length");

        let estimated_size = 128 + self.headers.len() * 64 + body.len();
        let mut buf = BytesMut::with_capacity(estimated_size);

        buf.put(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason()
            )
            .as_bytes(),
        );
        buf.put(self.headers.to_string().as_bytes());
        buf.put(format!("Content-Length: {}\r\n", body.len()).as_bytes());
        buf.put(&b"\r\n"[..]);
        buf.put_slice(body);

        Some(buf)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
