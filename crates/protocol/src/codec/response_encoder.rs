use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::head::HeadEncoder;
use crate::protocol::{Response, SendError};

/// Serializes a [`Response`]: status byte, space, CRLF, `key:value` headers, end marker and raw body.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<&Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(4);
        dst.put_u8(response.status().as_u8());
        dst.put_slice(b" \r\n");

        HeadEncoder::RESPONSE.encode(response.headers(), dst)?;

        dst.extend_from_slice(response.body());
        Ok(())
    }
}
