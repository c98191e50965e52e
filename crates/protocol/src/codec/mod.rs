//! Booky codec module for encoding and decoding protocol messages.
//!
//! - Request handling:
//!   - [`RequestDecoder`]: the incremental request state machine
//!   - [`RequestEncoder`]: writes requests, used by clients
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: writes responses
//!
//! All codecs implement the `tokio_util::codec` traits and work on `BytesMut`, so they can be
//! driven by the blocking [`RequestParser`](crate::parser::RequestParser) as well as by a framed stream.

mod body;
mod head;
mod request_decoder;
mod request_encoder;
mod response_encoder;

pub use body::SENTINEL;
pub use request_decoder::RequestDecoder;
pub use request_encoder::RequestEncoder;
pub use response_encoder::ResponseEncoder;
