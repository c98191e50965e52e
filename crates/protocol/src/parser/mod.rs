//! Blocking parse sessions over [`Read`](std::io::Read) sources.
//!
//! - [`BufferedSource`]: the fixed-capacity window refilled from the source
//! - [`Dispatcher`]: the success and error listeners of a session
//! - [`RequestParser`]: drives a [`RequestDecoder`](crate::codec::RequestDecoder) until one
//!   request is parsed or the session fails

mod buffered_source;
mod dispatch;
mod request_parser;

pub use buffered_source::BufferedSource;
pub use dispatch::Dispatcher;
pub use request_parser::DEFAULT_CAPACITY;
pub use request_parser::Lifecycle;
pub use request_parser::RequestParser;
