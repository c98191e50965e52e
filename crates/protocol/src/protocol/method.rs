//! Request methods of the Booky protocol.

use std::fmt;

/// A request method, carried on the wire as a case-sensitive 3-byte code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `SYC`
    Sync,
    /// `UPL`
    Upload,
    /// `DWN`
    Download,
}

impl Method {
    /// Length in bytes of every method code
    pub const CODE_LEN: usize = 3;

    /// Maps a wire code to its method, `None` for anything that is not exactly `SYC`, `UPL` or `DWN`.
    pub fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            b"SYC" => Some(Method::Sync),
            b"UPL" => Some(Method::Upload),
            b"DWN" => Some(Method::Download),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Sync => "SYC",
            Method::Upload => "UPL",
            Method::Download => "DWN",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(Method::from_code(b"SYC"), Some(Method::Sync));
        assert_eq!(Method::from_code(b"UPL"), Some(Method::Upload));
        assert_eq!(Method::from_code(b"DWN"), Some(Method::Download));

        assert_eq!(Method::from_code(b"syc"), None);
        assert_eq!(Method::from_code(b"DEL"), None);
        assert_eq!(Method::from_code(b"SY"), None);
        assert_eq!(Method::from_code(b"SYCC"), None);
    }

    #[test]
    fn code_matches_display() {
        for method in [Method::Sync, Method::Upload, Method::Download] {
            assert_eq!(method.to_string(), method.as_str());
            assert_eq!(Method::from_code(method.as_str().as_bytes()), Some(method));
        }
    }
}
