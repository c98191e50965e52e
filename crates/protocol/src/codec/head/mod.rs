//! Request head processing: the method, resource and header phases.
//!
//! - [`HeadDecoder`]: decodes the head of an incoming request
//! - [`HeadEncoder`]: writes header blocks shared by requests and responses

mod head_decoder;
mod head_encoder;

pub(crate) use head_decoder::HeadDecoder;
pub(crate) use head_encoder::HeadEncoder;
