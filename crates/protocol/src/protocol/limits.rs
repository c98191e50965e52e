/// Maximum number of bytes of a single request or header line
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Maximum number of headers allowed in a request
pub const MAX_HEADER_NUM: usize = 64;

/// Size limits applied while decoding a request head.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    max_line_bytes: usize,
    max_headers: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_line_bytes: MAX_LINE_BYTES, max_headers: MAX_HEADER_NUM }
    }
}

impl Limits {
    #[must_use]
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    #[must_use]
    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    #[inline]
    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    #[inline]
    pub fn max_headers(&self) -> usize {
        self.max_headers
    }
}
