//! Header block encoder shared by requests and responses.
//!
//! Requests write `key: value` lines, responses write `key:value` lines. Both close
//! the block with the `-\r\n` end marker.

use bytes::{BufMut, BytesMut};

use crate::protocol::SendError;

const CRLF: &[u8] = b"\r\n";
const HEADER_END_LINE: &[u8] = b"-\r\n";

#[derive(Debug, Clone, Copy)]
pub(crate) struct HeadEncoder {
    separator: &'static [u8],
}

impl HeadEncoder {
    pub(crate) const REQUEST: Self = Self { separator: b": " };
    pub(crate) const RESPONSE: Self = Self { separator: b":" };

    /// Writes every header line followed by the end marker.
    ///
    /// # Errors
    ///
    /// Returns `SendError::InvalidHead` if a header could not be read back unchanged
    pub(crate) fn encode(self, headers: &[(String, String)], dst: &mut BytesMut) -> Result<(), SendError> {
        for (key, value) in headers {
            check_header(key, value)?;

            dst.reserve(key.len() + self.separator.len() + value.len() + CRLF.len());
            dst.put_slice(key.as_bytes());
            dst.put_slice(self.separator);
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF);
        }

        dst.put_slice(HEADER_END_LINE);
        Ok(())
    }
}

fn check_header(key: &str, value: &str) -> Result<(), SendError> {
    if key.starts_with('-') {
        return Err(SendError::invalid_head(format!("header key {key:?} starts with the end marker")));
    }

    for part in [key, value] {
        if part.contains([':', '\r', '\n']) {
            return Err(SendError::invalid_head(format!("header part {part:?} contains a delimiter")));
        }
        if part.trim() != part {
            return Err(SendError::invalid_head(format!("header part {part:?} has surrounding whitespace")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn request_and_response_separators() {
        let pairs = headers(&[("Encoding", "UTF8"), ("Content-Type", "json")]);

        let mut dst = BytesMut::new();
        HeadEncoder::REQUEST.encode(&pairs, &mut dst).unwrap();
        assert_eq!(&dst[..], b"Encoding: UTF8\r\nContent-Type: json\r\n-\r\n");

        let mut dst = BytesMut::new();
        HeadEncoder::RESPONSE.encode(&pairs, &mut dst).unwrap();
        assert_eq!(&dst[..], b"Encoding:UTF8\r\nContent-Type:json\r\n-\r\n");
    }

    #[test]
    fn rejects_unreadable_headers() {
        for pairs in [
            headers(&[("-Key", "value")]),
            headers(&[("Key", "a:b")]),
            headers(&[("Key", "line\r\nbreak")]),
            headers(&[(" Key", "value")]),
            headers(&[("Key", "value ")]),
        ] {
            let mut dst = BytesMut::new();
            let result = HeadEncoder::REQUEST.encode(&pairs, &mut dst);
            assert!(matches!(result, Err(SendError::InvalidHead { .. })), "{pairs:?}");
        }
    }
}
