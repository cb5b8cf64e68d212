// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use super::{FiniteStream, ReadBytes};
use crate::errors::out_of_bounds_error;

/// A `ScopedStream` restricts the number of bytes that may be read to an upper limit.
///
/// A read that would cross the limit fails with [`io::ErrorKind::InvalidData`] and consumes
/// nothing. Errors from the inner stream, such as running out of data, are passed through as-is.
pub struct ScopedStream<B: ReadBytes> {
    inner: B,
    len: u64,
    read: u64,
}

impl<B: ReadBytes> ScopedStream<B> {
    /// Instantiates a new `ScopedStream` with an upper limit on the number of bytes that can be
    /// read from the inner source.
    pub fn new(inner: B, len: u64) -> Self {
        ScopedStream { inner, len, read: 0 }
    }

    /// Fails, consuming nothing, if fewer than `count` bytes remain in the scope.
    #[inline(always)]
    fn check_remaining(&self, count: u64) -> io::Result<()> {
        if self.len - self.read < count {
            return out_of_bounds_error();
        }
        Ok(())
    }
}

impl<B: ReadBytes> FiniteStream for ScopedStream<B> {
    /// Returns the length of the the `ScopedStream`.
    fn byte_len(&self) -> u64 {
        self.len
    }

    /// Returns the number of bytes read.
    fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Returns the number of bytes available to read.
    fn bytes_available(&self) -> u64 {
        self.len - self.read
    }
}

impl<B: ReadBytes> ReadBytes for ScopedStream<B> {
    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        self.check_remaining(4)?;

        let bytes = self.inner.read_quad_bytes()?;
        self.read += 4;
        Ok(bytes)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.check_remaining(buf.len() as u64)?;

        self.inner.read_buf_exact(buf)?;
        self.read += buf.len() as u64;
        Ok(())
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        self.check_remaining(count)?;

        self.inner.ignore_bytes(count)?;
        self.read += count;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.inner.pos()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::ScopedStream;
    use crate::io::{FiniteStream, ReadBytes, SourceStream, SourceStreamOptions};

    fn source(data: &[u8]) -> SourceStream<Cursor<&[u8]>> {
        SourceStream::new(Cursor::new(data), SourceStreamOptions { buffer_len: 64 }).unwrap()
    }

    #[test]
    fn verify_scoped_stream_bounds() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut reader = source(&data);
        reader.ignore_bytes(1).unwrap();

        let mut scoped = ScopedStream::new(&mut reader, 6);
        assert_eq!(scoped.pos(), 1);
        assert_eq!(scoped.read_quad_bytes().unwrap(), [2, 3, 4, 5]);
        assert_eq!(scoped.bytes_available(), 2);

        // Crossing the scope is rejected without consuming anything.
        let err = scoped.read_quad_bytes().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(scoped.bytes_read(), 4);
        assert!(scoped.ignore_bytes(3).is_err());

        let mut buf = [0u8; 2];
        scoped.read_buf_exact(&mut buf).unwrap();
        assert_eq!(buf, [6, 7]);
        assert_eq!(scoped.bytes_available(), 0);
        assert_eq!(reader.pos(), 7);
    }

    #[test]
    fn verify_scoped_stream_passes_through_end_of_stream() {
        let data = [1u8, 2];
        let mut reader = source(&data);

        // The scope claims more bytes than the stream has.
        let mut scoped = ScopedStream::new(&mut reader, 16);
        let err = scoped.read_quad_bytes().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(scoped.bytes_read(), 0);
    }
}
