//! Business layer invoked for every successfully parsed request.

use std::error::Error;

use booky_protocol::protocol::{Method, Request, Response};

mod file_store;
pub use file_store::FileStore;
pub use file_store::StoreError;

/// Answers parsed requests.
///
/// Implementations provide one operation per [`Method`], [`Handler::call`] routes a request
/// to the matching one. Handlers run on blocking threads and may block freely.
pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Answers a `SYC` request
    fn sync(&self, request: &Request) -> Result<Response, Self::Error>;

    /// Answers an `UPL` request
    fn upload(&self, request: &Request) -> Result<Response, Self::Error>;

    /// Answers a `DWN` request
    fn download(&self, request: &Request) -> Result<Response, Self::Error>;

    fn call(&self, request: &Request) -> Result<Response, Self::Error> {
        match request.method() {
            Method::Sync => self.sync(request),
            Method::Upload => self.upload(request),
            Method::Download => self.download(request),
        }
    }
}

/// A [`Handler`] answering every method with the same function.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Err> Handler for HandlerFn<F>
where
    F: Fn(&Request) -> Result<Response, Err> + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type Error = Err;

    fn sync(&self, request: &Request) -> Result<Response, Self::Error> {
        (self.f)(request)
    }

    fn upload(&self, request: &Request) -> Result<Response, Self::Error> {
        (self.f)(request)
    }

    fn download(&self, request: &Request) -> Result<Response, Self::Error> {
        (self.f)(request)
    }

    fn call(&self, request: &Request) -> Result<Response, Self::Error> {
        (self.f)(request)
    }
}

pub fn make_handler<F, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(&Request) -> Result<Response, Err> + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
