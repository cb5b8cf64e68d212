// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `io` module implements byte-level I/O over seekable sources.
//!
//! [`SourceStream`] buffers any source implementing [`std::io::Read`] and [`std::io::Seek`], and
//! [`ScopedStream`] bounds another stream to a fixed number of bytes. Both implement the
//! [`ReadBytes`] trait. Byte-order dependent fields are read through the [`ReadFields`] extension
//! trait which every [`ReadBytes`] gets for free.

use std::io;

mod field;
mod scoped_stream;
mod source_stream;

pub use field::{ByteOrder, ReadFields};
pub use scoped_stream::ScopedStream;
pub use source_stream::{SourceStream, SourceStreamOptions};

/// `ReadBytes` provides methods to read raw bytes from a stream and to skip over them.
///
/// Every read either completes in full or fails. A failed read never leaves partially filled data
/// for the caller to consume.
pub trait ReadBytes {
    /// Reads four bytes from the stream and returns them in read-order or an error.
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]>;

    /// Reads exactly the number of bytes required to fill be provided buffer or returns an error.
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Ignores the specified number of bytes from the stream or returns an error.
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()>;

    /// Gets the position of the stream.
    fn pos(&self) -> u64;
}

impl<R: ReadBytes + ?Sized> ReadBytes for &mut R {
    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        (**self).read_quad_bytes()
    }

    #[inline(always)]
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_buf_exact(buf)
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        (**self).ignore_bytes(count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        (**self).pos()
    }
}

/// A `FiniteStream` is a stream that has a known length in bytes.
pub trait FiniteStream {
    /// Returns the length of the the stream in bytes.
    fn byte_len(&self) -> u64;

    /// Returns the number of bytes that have been read.
    fn bytes_read(&self) -> u64;

    /// Returns the number of bytes available for reading.
    fn bytes_available(&self) -> u64;
}
