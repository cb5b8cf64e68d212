// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builders for synthetic RIFF streams.

use std::io::Cursor;

use wavinspect_core::io::{ByteOrder, ScopedStream, SourceStream, SourceStreamOptions};

/// A chunk payload stream, bounded to the payload the same way the walker bounds it.
pub fn payload_stream(buf: &[u8]) -> ScopedStream<SourceStream<Cursor<&[u8]>>> {
    let source =
        SourceStream::new(Cursor::new(buf), SourceStreamOptions { buffer_len: 64 }).unwrap();
    ScopedStream::new(source, buf.len() as u64)
}

/// Writes chunk payload fields in the given byte order.
pub struct Payload {
    order: ByteOrder,
    buf: Vec<u8>,
}

impl Payload {
    pub fn new(order: ByteOrder) -> Self {
        Payload { order, buf: Vec::new() }
    }

    pub fn u16(mut self, val: u16) -> Self {
        match self.order {
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&val.to_le_bytes()),
            ByteOrder::BigEndian => self.buf.extend_from_slice(&val.to_be_bytes()),
        }
        self
    }

    pub fn u32(mut self, val: u32) -> Self {
        match self.order {
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&val.to_le_bytes()),
            ByteOrder::BigEndian => self.buf.extend_from_slice(&val.to_be_bytes()),
        }
        self
    }

    pub fn u64(mut self, val: u64) -> Self {
        match self.order {
            ByteOrder::LittleEndian => self.buf.extend_from_slice(&val.to_le_bytes()),
            ByteOrder::BigEndian => self.buf.extend_from_slice(&val.to_be_bytes()),
        }
        self
    }

    pub fn f32(self, val: f32) -> Self {
        self.u32(val.to_bits())
    }

    pub fn i8(mut self, val: i8) -> Self {
        self.buf.push(val as u8);
        self
    }

    /// Raw bytes, never swapped.
    pub fn bytes(mut self, val: &[u8]) -> Self {
        self.buf.extend_from_slice(val);
        self
    }

    /// Raw bytes, zero-padded or cut to `len`.
    pub fn text(mut self, val: &[u8], len: usize) -> Self {
        let mut field = val.to_vec();
        field.resize(len, 0);
        self.buf.extend_from_slice(&field);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Writes a complete RIFF stream, chunk by chunk.
pub struct RiffBuilder {
    order: ByteOrder,
    body: Vec<u8>,
}

impl RiffBuilder {
    pub fn new(order: ByteOrder) -> Self {
        RiffBuilder { order, body: Vec::new() }
    }

    /// Append a chunk, adding the pad byte for odd sizes (except for `bext`).
    pub fn chunk(self, id: &[u8; 4], payload: &[u8]) -> Self {
        self.chunk_with_len(id, payload.len() as u32, payload)
    }

    /// Append a chunk with an arbitrary declared size.
    pub fn chunk_with_len(mut self, id: &[u8; 4], len: u32, payload: &[u8]) -> Self {
        self.body.extend_from_slice(id);
        self.body.extend_from_slice(&Payload::new(self.order).u32(len).build());
        self.body.extend_from_slice(payload);
        if payload.len() % 2 == 1 && id != b"bext" {
            self.body.push(0);
        }
        self
    }

    /// Append a `LIST` chunk of the given list type.
    pub fn list(self, list_type: &[u8; 4], payload: &[u8]) -> Self {
        let mut body = list_type.to_vec();
        body.extend_from_slice(payload);
        self.chunk(b"LIST", &body)
    }

    /// Finish the stream with a declared size that matches the written body.
    pub fn build(self, master: &[u8; 4]) -> Vec<u8> {
        let len = 4 + self.body.len() as u32;
        self.build_with_len(master, len)
    }

    /// Finish the stream with an arbitrary declared size.
    pub fn build_with_len(self, master: &[u8; 4], len: u32) -> Vec<u8> {
        let mut out = master.to_vec();
        out.extend_from_slice(&Payload::new(self.order).u32(len).build());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&self.body);
        out
    }
}

/// A 16-byte PCM `fmt ` payload.
pub fn pcm_format(order: ByteOrder, n_channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let block_align = n_channels * (bits / 8);
    Payload::new(order)
        .u16(1)
        .u16(n_channels)
        .u32(sample_rate)
        .u32(sample_rate * u32::from(block_align))
        .u16(block_align)
        .u16(bits)
        .build()
}

/// A `bext` payload with the given coding history.
pub fn bext_payload(order: ByteOrder, history: &[u8]) -> Vec<u8> {
    Payload::new(order)
        .text(b"Interview, take 3", 256)
        .text(b"wavinspect", 32)
        .text(b"REF-0042", 32)
        .text(b"2024:05:17", 10)
        .text(b"13:45:07", 8)
        .u32(0x8000_0000)
        .u32(0x1)
        .u16(2)
        .text(&[0x06, 0x0a, 0x2b, 0x34], 64)
        .u16(0xfde8)
        .u16(500)
        .u16(0xff9c)
        .u16(0xfe0c)
        .u16(0xfe70)
        .text(&[], 180)
        .bytes(history)
        .build()
}

/// An 80-byte stereo PVOC-EX `fmt ` payload.
pub fn pvoc_ex_format(order: ByteOrder) -> Vec<u8> {
    Payload::new(order)
        .u16(0xfffe)
        .u16(2)
        .u32(44100)
        .u32(44100 * 8)
        .u16(8)
        .u16(32)
        .u16(62)
        .u16(32)
        .u32(0x3)
        .bytes(&crate::chunks::KSDATAFORMAT_SUBTYPE_PVOCEX)
        .u32(1)
        .u32(32)
        .u16(0)
        .u16(0)
        .u16(3)
        .u16(1)
        .u32(513)
        .u32(1024)
        .u32(256)
        .u32(0)
        .f32(172.265625)
        .f32(0.5)
        .build()
}
