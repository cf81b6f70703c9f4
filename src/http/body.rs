//! The response output sink.
//!
//! A response writes either into an in-memory [`BytesMut`] or straight through
//! to a host-provided [`Write`] implementation (a socket, a file, a test
//! capture). Interceptors swap one for the other with
//! [`Response::replace_body`](super::Response::replace_body).

use std::fmt;
use std::io::{self, Write};

use bytes::{BufMut, BytesMut};

/// Where response bytes go while a handler runs.
pub enum ResponseBody {
    /// An in-memory accumulator owned by the response.
    Buffer(BytesMut),
    /// A host sink; bytes written here are already on their way out.
    Stream(Box<dyn Write + Send>),
}

impl ResponseBody {
    /// Creates an empty in-memory buffer.
    pub fn buffer() -> Self {
        Self::Buffer(BytesMut::new())
    }

    /// Wraps a host sink.
    pub fn stream(sink: impl Write + Send + 'static) -> Self {
        Self::Stream(Box::new(sink))
    }

    /// Returns `true` if this body is an in-memory buffer.
    pub fn is_buffer(&self) -> bool {
        matches!(self, Self::Buffer(_))
    }

    /// Returns the buffered bytes, or `None` for a streaming body.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(buf) => Some(&buf[..]),
            Self::Stream(_) => None,
        }
    }

    /// Writes `data` into the body.
    ///
    /// Buffer writes cannot fail; stream writes surface the sink's error.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        match self {
            Self::Buffer(buf) => {
                buf.put_slice(data);
                Ok(())
            }
            Self::Stream(sink) => sink.write_all(data),
        }
    }

    /// Flushes a streaming sink. No-op for buffers.
    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Buffer(_) => Ok(()),
            Self::Stream(sink) => sink.flush(),
        }
    }

    /// Discards buffered bytes. Streamed bytes cannot be recalled.
    pub fn clear(&mut self) {
        if let Self::Buffer(buf) = self {
            buf.clear();
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::buffer()
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(buf) => f.debug_tuple("Buffer").field(&buf.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
