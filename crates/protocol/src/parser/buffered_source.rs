//! A fixed-capacity read buffer over a blocking byte source.

use std::io::{self, Read};

use bytes::BytesMut;
use tracing::trace;

/// Owns a buffer of fixed capacity and refills it from a [`Read`] source on demand.
///
/// The unconsumed window is the content of the underlying `BytesMut`: consuming bytes
/// advances its start (the cursor), refilling appends at its end (the fill length).
/// The window never grows beyond the capacity.
#[derive(Debug)]
pub struct BufferedSource<R> {
    reader: R,
    buffer: BytesMut,
    capacity: usize,
}

impl<R> BufferedSource<R> {
    /// Creates a source reading at most `capacity` bytes per refill, a zero capacity is raised to one byte.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { reader, buffer: BytesMut::with_capacity(capacity), capacity }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the unconsumed bytes.
    #[inline]
    pub fn window(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub(crate) fn window_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> BufferedSource<R> {
    /// Performs one blocking read behind the unconsumed window.
    ///
    /// Returns the number of bytes obtained, `0` means the source is exhausted. Interrupted
    /// reads are retried, every other error is returned as is.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying source, or `ErrorKind::OutOfMemory` if the window
    /// already fills the whole capacity.
    pub fn refill(&mut self) -> io::Result<usize> {
        let filled = self.buffer.len();
        if filled >= self.capacity {
            return Err(io::Error::new(io::ErrorKind::OutOfMemory, "buffer window already fills the capacity"));
        }

        // reclaims the consumed front of the buffer when there is room for it
        self.buffer.resize(self.capacity, 0);

        let result = loop {
            match self.reader.read(&mut self.buffer[filled..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                result => break result,
            }
        };

        let read = *result.as_ref().unwrap_or(&0);
        self.buffer.truncate(filled + read);

        trace!(read, window = self.buffer.len(), capacity = self.capacity, "refilled buffer");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    #[test]
    fn refill_reads_at_most_capacity() {
        let mut source = BufferedSource::with_capacity(&b"0123456789"[..], 4);

        assert_eq!(source.refill().unwrap(), 4);
        assert_eq!(source.window(), b"0123");

        source.window_mut().advance(4);
        assert_eq!(source.refill().unwrap(), 4);
        assert_eq!(source.window(), b"4567");

        source.window_mut().advance(4);
        assert_eq!(source.refill().unwrap(), 2);
        assert_eq!(source.window(), b"89");

        source.window_mut().advance(2);
        assert_eq!(source.refill().unwrap(), 0);
        assert!(source.window().is_empty());
    }

    #[test]
    fn refill_keeps_unconsumed_bytes() {
        let mut source = BufferedSource::with_capacity(&b"abcdef"[..], 4);

        source.refill().unwrap();
        source.window_mut().advance(3);
        assert_eq!(source.window(), b"d");

        assert_eq!(source.refill().unwrap(), 2);
        assert_eq!(source.window(), b"def");
        assert!(source.window().len() <= source.capacity());
    }

    #[test]
    fn refill_with_full_window_is_an_error() {
        let mut source = BufferedSource::with_capacity(&b"abcdef"[..], 2);
        source.refill().unwrap();

        let error = source.refill().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::OutOfMemory);
        assert_eq!(source.window(), b"ab");
    }

    #[test]
    fn zero_capacity_is_raised() {
        let source = BufferedSource::with_capacity(io::empty(), 0);
        assert_eq!(source.capacity(), 1);
    }
}
