// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::{Read, Seek, SeekFrom};

use log::debug;

use super::ReadBytes;
use crate::errors::end_of_stream_error;

/// `SourceStreamOptions` specifies the buffering behaviour of a `SourceStream`.
pub struct SourceStreamOptions {
    /// The read-ahead buffer size. Must be atleast 64 bytes.
    pub buffer_len: usize,
}

impl Default for SourceStreamOptions {
    fn default() -> Self {
        SourceStreamOptions { buffer_len: 32 * 1024 }
    }
}

/// A `SourceStream` is the common `Read`er type for wavinspect. It wraps any seekable reader and
/// implements [`ReadBytes`] on top of a read-ahead buffer, tracking the absolute stream position.
///
/// The source is taken by value, so a caller that wants to keep its handle (and close it itself)
/// should pass `&mut R`. Since data is read ahead, the position of the inner reader is unspecified
/// while the `SourceStream` is in use.
///
/// A read that fails because the source ran out of data does not consume anything: [`pos`] still
/// points at the first byte of the field that could not be read.
///
/// [`pos`]: ReadBytes::pos
pub struct SourceStream<R: Read + Seek> {
    /// The source reader.
    inner: R,
    /// The read-ahead buffer.
    buf: Box<[u8]>,
    /// The read position within the buffer.
    read_pos: usize,
    /// The end of valid data within the buffer.
    end_pos: usize,
    /// Absolute position of the next byte to be read. The inner reader is always positioned at
    /// `abs_pos + (end_pos - read_pos)`.
    abs_pos: u64,
}

impl<R: Read + Seek> SourceStream<R> {
    const MIN_BUFFER_LEN: usize = 64;

    /// Instantiate a new `SourceStream`. Reading starts at the current position of the source.
    pub fn new(mut inner: R, options: SourceStreamOptions) -> io::Result<Self> {
        assert!(options.buffer_len >= Self::MIN_BUFFER_LEN);

        let abs_pos = inner.stream_position()?;

        Ok(SourceStream {
            inner,
            buf: vec![0; options.buffer_len].into_boxed_slice(),
            read_pos: 0,
            end_pos: 0,
            abs_pos,
        })
    }

    /// Get the total length of the source in bytes. The read position is unchanged.
    pub fn byte_len(&mut self) -> io::Result<u64> {
        let inner_pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(inner_pos))?;
        Ok(len)
    }

    /// Seek to an absolute position in the stream. Seeking past the end of the source is allowed,
    /// the next read will then fail.
    pub fn seek_to(&mut self, pos: u64) -> io::Result<u64> {
        // The range of absolute positions currently held in the buffer.
        let buf_start = self.abs_pos - self.read_pos as u64;
        let buf_end = self.abs_pos + self.unread_len() as u64;

        if pos >= buf_start && pos <= buf_end {
            self.read_pos = (pos - buf_start) as usize;
        }
        else {
            debug!("seeking source from {} to {}", self.abs_pos, pos);

            self.inner.seek(SeekFrom::Start(pos))?;
            self.read_pos = 0;
            self.end_pos = 0;
        }

        self.abs_pos = pos;
        Ok(pos)
    }

    #[inline(always)]
    fn unread_len(&self) -> usize {
        self.end_pos - self.read_pos
    }

    #[inline(always)]
    fn consume(&mut self, len: usize) {
        self.read_pos += len;
        self.abs_pos += len as u64;
    }

    /// Ensure that atleast `len` bytes are buffered and unread. `len` must not exceed the buffer
    /// length.
    fn fill(&mut self, len: usize) -> io::Result<()> {
        debug_assert!(len <= self.buf.len());

        if self.unread_len() >= len {
            return Ok(());
        }

        // Move the unread bytes to the front of the buffer to make room for the read-ahead.
        self.buf.copy_within(self.read_pos..self.end_pos, 0);
        self.end_pos -= self.read_pos;
        self.read_pos = 0;

        while self.end_pos < len {
            match self.inner.read(&mut self.buf[self.end_pos..]) {
                Ok(0) => return end_of_stream_error(),
                Ok(n) => self.end_pos += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl<R: Read + Seek> ReadBytes for SourceStream<R> {
    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        self.fill(4)?;
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.buf[self.read_pos..self.read_pos + 4]);
        self.consume(4);
        Ok(bytes)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let len = buf.len();

        if len <= self.buf.len() {
            self.fill(len)?;
            buf.copy_from_slice(&self.buf[self.read_pos..self.read_pos + len]);
            self.consume(len);
            return Ok(());
        }

        // Large reads drain the buffer and then read directly from the source.
        let start = self.abs_pos;
        let buffered = self.unread_len();

        buf[..buffered].copy_from_slice(&self.buf[self.read_pos..self.end_pos]);
        self.consume(buffered);

        if let Err(err) = self.inner.read_exact(&mut buf[buffered..]) {
            // Rewind so that the failed read consumes nothing.
            self.read_pos = 0;
            self.end_pos = 0;
            self.inner.seek(SeekFrom::Start(start))?;
            self.abs_pos = start;
            return Err(err);
        }

        self.abs_pos += (len - buffered) as u64;
        Ok(())
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        if count <= self.unread_len() as u64 {
            self.consume(count as usize);
            Ok(())
        }
        else {
            let pos = self.abs_pos.checked_add(count).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "ignore past maximum stream position")
            })?;
            self.seek_to(pos).map(|_| ())
        }
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.abs_pos
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Seek, SeekFrom};

    use super::{SourceStream, SourceStreamOptions};
    use crate::io::ReadBytes;

    /// Generate a vector of bytes of the specified length using a PRNG.
    fn generate_bytes(len: usize) -> Vec<u8> {
        let mut lcg: u32 = 0xec57c4bf;

        let mut bytes = vec![0; len];

        for quad in bytes.chunks_mut(4) {
            lcg = lcg.wrapping_mul(1664525).wrapping_add(1013904223);
            for (src, dest) in quad.iter_mut().zip(&lcg.to_ne_bytes()) {
                *src = *dest;
            }
        }

        bytes
    }

    fn small_stream(data: &[u8]) -> SourceStream<Cursor<&[u8]>> {
        SourceStream::new(Cursor::new(data), SourceStreamOptions { buffer_len: 64 }).unwrap()
    }

    fn read_one(ss: &mut SourceStream<Cursor<&[u8]>>) -> u8 {
        let mut buf = [0u8; 1];
        ss.read_buf_exact(&mut buf).unwrap();
        buf[0]
    }

    #[test]
    fn verify_reads_across_refills() {
        let data = generate_bytes(1000);
        let mut ss = small_stream(&data);

        // Odd sized reads make every refill straddle the end of the buffer.
        let mut pos = 0;
        while pos + 7 <= data.len() {
            let mut triple = [0u8; 3];
            ss.read_buf_exact(&mut triple).unwrap();
            assert_eq!(triple, data[pos..pos + 3]);
            assert_eq!(ss.read_quad_bytes().unwrap(), data[pos + 3..pos + 7]);
            pos += 7;
            assert_eq!(ss.pos(), pos as u64);
        }
    }

    #[test]
    fn verify_large_read() {
        let data = generate_bytes(1000);
        let mut ss = small_stream(&data);

        ss.ignore_bytes(3).unwrap();

        let mut buf = vec![0; 500];
        ss.read_buf_exact(&mut buf).unwrap();
        assert_eq!(&buf[..], &data[3..503]);
        assert_eq!(ss.pos(), 503);
        assert_eq!(read_one(&mut ss), data[503]);
    }

    #[test]
    fn verify_failed_read_consumes_nothing() {
        let data = generate_bytes(10);
        let mut ss = small_stream(&data);

        ss.ignore_bytes(8).unwrap();
        assert!(ss.read_quad_bytes().is_err());
        assert_eq!(ss.pos(), 8);

        let mut buf = vec![0; 200];
        assert!(ss.read_buf_exact(&mut buf).is_err());
        assert_eq!(ss.pos(), 8);

        let mut buf = [0u8; 2];
        ss.read_buf_exact(&mut buf).unwrap();
        assert_eq!(buf, data[8..10]);
    }

    #[test]
    fn verify_seek() {
        let data = generate_bytes(1000);
        let mut ss = small_stream(&data);

        ss.read_quad_bytes().unwrap();

        // Within the buffer, backwards and forwards.
        ss.seek_to(1).unwrap();
        assert_eq!(read_one(&mut ss), data[1]);
        ss.seek_to(12).unwrap();
        assert_eq!(read_one(&mut ss), data[12]);

        // Outside of the buffer.
        ss.seek_to(900).unwrap();
        assert_eq!(read_one(&mut ss), data[900]);
        ss.ignore_bytes(50).unwrap();
        assert_eq!(ss.pos(), 951);
        assert_eq!(read_one(&mut ss), data[951]);

        // Past the end.
        ss.seek_to(2000).unwrap();
        assert!(ss.read_quad_bytes().is_err());
        assert_eq!(ss.pos(), 2000);
    }

    #[test]
    fn verify_byte_len() {
        let data = generate_bytes(300);
        let mut ss = small_stream(&data);

        ss.ignore_bytes(5).unwrap();
        assert_eq!(read_one(&mut ss), data[5]);
        assert_eq!(ss.byte_len().unwrap(), 300);
        assert_eq!(ss.pos(), 6);
        assert_eq!(read_one(&mut ss), data[6]);

        // Past the buffered data.
        ss.ignore_bytes(100).unwrap();
        assert_eq!(read_one(&mut ss), data[107]);
    }

    #[test]
    fn verify_starts_at_source_position() {
        let data = generate_bytes(100);
        let mut cursor = Cursor::new(&data[..]);
        cursor.seek(SeekFrom::Start(10)).unwrap();

        let mut ss = SourceStream::new(&mut cursor, Default::default()).unwrap();
        assert_eq!(ss.pos(), 10);
        assert_eq!(ss.read_quad_bytes().unwrap(), data[10..14]);
    }
}
