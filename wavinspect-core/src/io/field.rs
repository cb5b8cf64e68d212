// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::io;

use super::ReadBytes;

/// The byte order of the multi-byte numeric fields in a RIFF stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn is_big_endian(&self) -> bool {
        *self == ByteOrder::BigEndian
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::LittleEndian => f.write_str("LITTLE_ENDIAN"),
            ByteOrder::BigEndian => f.write_str("BIG_ENDIAN"),
        }
    }
}

/// `ReadFields` reads byte-order dependent fields from any [`ReadBytes`].
///
/// All typed reads are built on [`ReadFields::read_field`]: the field is normalized to
/// little-endian byte order and then decoded, so the result does not depend on the host.
pub trait ReadFields: ReadBytes {
    /// Reads `buf.len()` bytes of a field made of `width`-byte elements into `buf`.
    ///
    /// If `order` is big-endian, the bytes of the *first* `width`-byte element are reversed and the
    /// rest are left untouched. This covers the two shapes of field found in chunk payloads: a
    /// single multi-byte scalar (one element) which gets swapped, and a run of single bytes
    /// (`width == 1`), such as text, which never does.
    ///
    /// Either the whole field is read or an error is returned.
    fn read_field(&mut self, buf: &mut [u8], width: usize, order: ByteOrder) -> io::Result<()> {
        debug_assert!(width > 0);

        self.read_buf_exact(buf)?;

        if order.is_big_endian() {
            let span = width.min(buf.len());
            buf[..span].reverse();
        }

        Ok(())
    }

    /// Reads a signed 8-bit field.
    #[inline(always)]
    fn read_field_i8(&mut self, order: ByteOrder) -> io::Result<i8> {
        let mut buf = [0u8; 1];
        self.read_field(&mut buf, 1, order)?;
        Ok(buf[0] as i8)
    }

    /// Reads an unsigned 16-bit field.
    #[inline(always)]
    fn read_field_u16(&mut self, order: ByteOrder) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_field(&mut buf, 2, order)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Reads an unsigned 32-bit field.
    #[inline(always)]
    fn read_field_u32(&mut self, order: ByteOrder) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_field(&mut buf, 4, order)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads an unsigned 64-bit field.
    #[inline(always)]
    fn read_field_u64(&mut self, order: ByteOrder) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_field(&mut buf, 8, order)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Reads a 32-bit IEEE-754 floating-point field.
    #[inline(always)]
    fn read_field_f32(&mut self, order: ByteOrder) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.read_field(&mut buf, 4, order)?;
        Ok(f32::from_le_bytes(buf))
    }

    /// Reads a run of `len` single-byte elements. The bytes are returned as stored.
    fn read_field_bytes(&mut self, len: usize, order: ByteOrder) -> io::Result<Box<[u8]>> {
        let mut buf = vec![0u8; len];
        self.read_field(&mut buf, 1, order)?;
        Ok(buf.into_boxed_slice())
    }

    /// Reads a fixed-size array of single-byte elements. The bytes are returned as stored.
    fn read_field_array<const N: usize>(&mut self, order: ByteOrder) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_field(&mut buf, 1, order)?;
        Ok(buf)
    }
}

impl<B: ReadBytes + ?Sized> ReadFields for B {}
