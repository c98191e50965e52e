//! Core Booky protocol types.
//!
//! - **Requests** ([`Request`], [`Method`]): the immutable result of a successful parse
//! - **Responses** ([`Response`], [`StatusCode`]): what the business layer sends back
//! - **Errors** ([`ParseError`], [`ErrorKind`], [`SendError`]): typed parse and send failures
//! - **Decoding state** ([`Phase`], [`PayloadItem`], [`Limits`])

mod error;
pub use error::ErrorKind;
pub use error::ParseError;
pub use error::SendError;

mod limits;
pub use limits::Limits;
pub use limits::MAX_HEADER_NUM;
pub use limits::MAX_LINE_BYTES;

mod message;
pub use message::PayloadItem;

mod method;
pub use method::Method;

mod phase;
pub use phase::Phase;

mod request;
pub use request::Request;
pub(crate) use request::RequestBuilder;

mod response;
pub use response::REASON_HEADER;
pub use response::Response;

mod status;
pub use status::StatusCode;
