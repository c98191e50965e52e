//! A [`Handler`] storing resources as files below a root directory.
//!
//! | method | effect                                   | headers                         |
//! |--------|------------------------------------------|---------------------------------|
//! | `SYC`  | none                                     | `Exists`, `Length`, `Modified`  |
//! | `UPL`  | writes the body, creating parent folders | `Length`                        |
//! | `DWN`  | none, the body is the file content       | `Length`                        |

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use booky_protocol::protocol::{Request, Response};
use thiserror::Error;
use tracing::{debug, info};

use crate::handler::Handler;

pub const EXISTS_HEADER: &str = "Exists";
pub const LENGTH_HEADER: &str = "Length";
pub const MODIFIED_HEADER: &str = "Modified";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid resource path: {resource:?}")]
    InvalidResource { resource: String },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StoreError {
    fn invalid_resource<S: ToString>(resource: S) -> Self {
        Self::InvalidResource { resource: resource.to_string() }
    }

    fn not_found<S: ToString>(resource: S) -> Self {
        Self::NotFound { resource: resource.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a resource onto a path below the root.
    ///
    /// Only relative paths made of plain names are accepted, so a resource can never
    /// leave the root.
    fn resolve(&self, resource: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(resource);
        let mut components = relative.components().peekable();

        if components.peek().is_none() || !components.all(|component| matches!(component, Component::Normal(_))) {
            return Err(StoreError::invalid_resource(resource));
        }

        Ok(self.root.join(relative))
    }
}

impl Handler for FileStore {
    type Error = StoreError;

    fn sync(&self, request: &Request) -> Result<Response, Self::Error> {
        let path = self.resolve(request.resource())?;

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(StoreError::invalid_resource(request.resource())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(resource = request.resource(), "sync of a missing resource");
                return Ok(Response::success().with_header(EXISTS_HEADER, false).with_header(LENGTH_HEADER, 0));
            }
            Err(e) => return Err(e.into()),
        };

        // file systems without modification times report the epoch
        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |duration| duration.as_secs());

        Ok(Response::success()
            .with_header(EXISTS_HEADER, true)
            .with_header(LENGTH_HEADER, metadata.len())
            .with_header(MODIFIED_HEADER, modified))
    }

    fn upload(&self, request: &Request) -> Result<Response, Self::Error> {
        let path = self.resolve(request.resource())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, request.body())?;

        info!(resource = request.resource(), length = request.body().len(), "stored resource");
        Ok(Response::success().with_header(LENGTH_HEADER, request.body().len()))
    }

    fn download(&self, request: &Request) -> Result<Response, Self::Error> {
        let path = self.resolve(request.resource())?;

        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::not_found(request.resource())),
            Err(e) => return Err(e.into()),
        };

        Ok(Response::success().with_header(LENGTH_HEADER, content.len()).with_body(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TempRoot;
    use booky_protocol::protocol::Method;

    fn request(method: Method, resource: &str, body: &'static [u8]) -> Request {
        Request::new(method, resource, Vec::new(), body)
    }

    #[test]
    fn upload_then_download() {
        let root = TempRoot::new();
        let store = FileStore::new(root.path());

        let response = store.call(&request(Method::Upload, "docs/notes.md", b"hello")).unwrap();
        assert_eq!(response.header(LENGTH_HEADER), Some("5"));
        assert_eq!(fs::read(root.path().join("docs/notes.md")).unwrap(), b"hello");

        let response = store.call(&request(Method::Download, "docs/notes.md", b"")).unwrap();
        assert_eq!(&response.body()[..], b"hello");
        assert_eq!(response.header(LENGTH_HEADER), Some("5"));
    }

    #[test]
    fn sync_reports_metadata() {
        let root = TempRoot::new();
        let store = FileStore::new(root.path());

        let response = store.call(&request(Method::Sync, "a.txt", b"")).unwrap();
        assert_eq!(response.header(EXISTS_HEADER), Some("false"));
        assert_eq!(response.header(MODIFIED_HEADER), None);

        fs::write(root.path().join("a.txt"), b"abc").unwrap();
        let response = store.call(&request(Method::Sync, "a.txt", b"")).unwrap();
        assert_eq!(response.header(EXISTS_HEADER), Some("true"));
        assert_eq!(response.header(LENGTH_HEADER), Some("3"));
        assert!(response.header(MODIFIED_HEADER).unwrap().parse::<u64>().unwrap() > 0);
    }

    #[test]
    fn download_of_missing_file() {
        let root = TempRoot::new();
        let store = FileStore::new(root.path());

        let error = store.call(&request(Method::Download, "missing.txt", b"")).unwrap_err();
        assert!(matches!(error, StoreError::NotFound { .. }));
    }

    #[test]
    fn resources_stay_below_the_root() {
        let root = TempRoot::new();
        let store = FileStore::new(root.path());

        for resource in ["../escape.txt", "/etc/passwd", "a/../../b", "./a", ""] {
            let error = store.call(&request(Method::Upload, resource, b"x")).unwrap_err();
            assert!(matches!(error, StoreError::InvalidResource { .. }), "{resource}");
        }
    }
}
