//! Encoder for outgoing Booky requests.
//!
//! Used by clients, and by tests to produce wire input for the parser.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::body::SENTINEL;
use crate::codec::head::HeadEncoder;
use crate::protocol::{Request, SendError};

/// Serializes a [`Request`] into the request wire format, closing the body with the sentinel byte.
#[derive(Debug, Default)]
pub struct RequestEncoder;

impl RequestEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<&Request> for RequestEncoder {
    type Error = SendError;

    /// # Errors
    ///
    /// Returns an error if the request could not be parsed back unchanged:
    /// - the resource contains whitespace or a line break
    /// - a header contains a delimiter or surrounding whitespace
    /// - the body contains the sentinel byte
    fn encode(&mut self, request: &Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let resource = request.resource();
        if resource.contains([' ', '\r', '\n']) {
            return Err(SendError::invalid_head(format!("resource {resource:?} contains whitespace")));
        }

        if request.body().contains(&SENTINEL) {
            return Err(SendError::invalid_body("body contains the sentinel byte"));
        }

        let method = request.method().as_str();
        dst.reserve(method.len() + 1 + resource.len() + 2);
        dst.put_slice(method.as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(resource.as_bytes());
        dst.put_slice(b"\r\n");

        HeadEncoder::REQUEST.encode(request.headers(), dst)?;

        dst.reserve(request.body().len() + 1);
        dst.put_slice(request.body());
        dst.put_u8(SENTINEL);
        Ok(())
    }
}
