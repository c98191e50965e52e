//! Response status codes and their fixed reason phrases.

use crate::protocol::ErrorKind;

/// The one-byte status code that starts every response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusCode {
    UnknownMethod,
    IncorrectFormat,
    HeaderError,
    DeadParser,
    Success,
    ServerError,
}

impl StatusCode {
    pub fn as_u8(self) -> u8 {
        match self {
            StatusCode::UnknownMethod => 1,
            StatusCode::IncorrectFormat => 2,
            StatusCode::HeaderError => 3,
            StatusCode::DeadParser => 4,
            StatusCode::Success => 100,
            StatusCode::ServerError => 200,
        }
    }

    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(StatusCode::UnknownMethod),
            2 => Some(StatusCode::IncorrectFormat),
            3 => Some(StatusCode::HeaderError),
            4 => Some(StatusCode::DeadParser),
            100 => Some(StatusCode::Success),
            200 => Some(StatusCode::ServerError),
            _ => None,
        }
    }

    pub fn canonical_reason(self) -> &'static str {
        match self {
            StatusCode::UnknownMethod => "Unknown Method",
            StatusCode::IncorrectFormat => "Incorrect Format",
            StatusCode::HeaderError => "Header Error",
            StatusCode::DeadParser => "Dead Parser",
            StatusCode::Success => "Success",
            StatusCode::ServerError => "Server Error",
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UnknownMethod => StatusCode::UnknownMethod,
            ErrorKind::Format => StatusCode::IncorrectFormat,
            ErrorKind::Header => StatusCode::HeaderError,
            ErrorKind::DeadParser => StatusCode::DeadParser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=u8::MAX {
            if let Some(status) = StatusCode::from_u8(code) {
                assert_eq!(status.as_u8(), code);
            }
        }
        assert_eq!(StatusCode::from_u8(5), None);
        assert_eq!(StatusCode::from_u8(101), None);
    }

    #[test]
    fn error_kinds_map_to_their_own_status() {
        assert_eq!(StatusCode::from(ErrorKind::UnknownMethod).as_u8(), 1);
        assert_eq!(StatusCode::from(ErrorKind::Format).as_u8(), 2);
        assert_eq!(StatusCode::from(ErrorKind::Header).as_u8(), 3);
        assert_eq!(StatusCode::from(ErrorKind::DeadParser).as_u8(), 4);
    }
}
