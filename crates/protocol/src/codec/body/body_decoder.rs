//! Decoder for sentinel-terminated request bodies.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, PayloadItem};

/// The byte that ends a request body
pub const SENTINEL: u8 = 0x00;

/// A decoder that hands out body chunks until it meets [`SENTINEL`].
///
/// The sentinel itself is consumed but never part of a chunk. Bytes following it are left
/// in the buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct BodyDecoder {
    finished: bool,
}

impl BodyDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Decoder for BodyDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// # Returns
    /// * `Ok(Some(PayloadItem::Chunk(bytes)))` for the bytes in front of the sentinel, or the whole buffer
    /// * `Ok(Some(PayloadItem::Eof))` once the sentinel has been consumed
    /// * `Ok(None)` when the buffer is empty and more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.finished {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        match src.iter().position(|b| *b == SENTINEL) {
            Some(0) => {
                src.advance(1);
                self.finished = true;
                trace!(trailing = src.len(), "found body sentinel");
                Ok(Some(PayloadItem::Eof))
            }
            // hand out the data first, the sentinel is consumed on the next call
            Some(index) => Ok(Some(PayloadItem::Chunk(src.split_to(index).freeze()))),
            None => Ok(Some(PayloadItem::Chunk(src.split().freeze()))),
        }
    }

    /// The end of the stream terminates the body just like the sentinel does.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(item) => Ok(Some(item)),
            None => {
                trace!("body terminated by end of stream");
                self.finished = true;
                Ok(Some(PayloadItem::Eof))
            }
        }
    }
}
