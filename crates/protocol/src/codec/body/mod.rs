//! Request body processing.
//!
//! The body of a request runs until the sentinel byte `0x00` or the end of the stream,
//! whichever comes first.

mod body_decoder;

pub(crate) use body_decoder::BodyDecoder;
pub use body_decoder::SENTINEL;
