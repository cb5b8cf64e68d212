// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chunk records and the chunk decoder registry.
//!
//! Every known chunk type has a record implementing [`ParseChunk`]. The [`WaveChunks`] registry
//! maps a chunk identifier to the parser for that record. Identifiers without a registered
//! parser are acknowledged but not decoded.

use std::marker::PhantomData;

use wavinspect_core::errors::{decode_error, out_of_bounds_error, Result};
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

mod bext;
mod ds64;
mod format;
mod info;
mod loops;
mod misc;

pub use bext::BextChunk;
pub use ds64::{Ds64Chunk, Ds64TableEntry};
pub use format::{
    FormatExtensible, FormatPvocEx, WaveFormatChunk, KSDATAFORMAT_SUBTYPE_PVOCEX,
    WAVE_FORMAT_EXTENSIBLE,
};
pub use info::{info_label, InfoEnd, InfoList, InfoTag};
pub use loops::{AcidChunk, AcidFlags, InstChunk};
pub use misc::{DispChunk, FactChunk, LevlChunk, Md5Chunk};

/// `ParseChunkTag` implements `parse_tag` to map between the 4-byte chunk identifier and the
/// enumeration.
pub trait ParseChunkTag: Sized {
    fn parse_tag(tag: FourCc, len: u64) -> Option<Self>;
}

/// Common trait implemented for all chunks that are parsed by a `ChunkParser`.
///
/// `reader` is bounded to the chunk payload, `len` is the payload length, and `order` is the byte
/// order of the container.
pub trait ParseChunk: Sized {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<Self>;
}

/// `ChunkParser` is a utility struct for unifying the parsing of chunks.
pub struct ChunkParser<P: ParseChunk> {
    tag: FourCc,
    pub len: u64,
    phantom: PhantomData<P>,
}

impl<P: ParseChunk> ChunkParser<P> {
    pub fn new(tag: FourCc, len: u64) -> Self {
        ChunkParser { tag, len, phantom: PhantomData }
    }

    pub fn parse<B: ReadBytes + FiniteStream>(
        &self,
        reader: &mut B,
        order: ByteOrder,
    ) -> Result<P> {
        P::parse(reader, self.tag, self.len, order)
    }
}

macro_rules! parser {
    ($class:expr, $result:ty, $tag:expr, $len:expr) => {
        Some($class(ChunkParser::<$result>::new($tag, $len)))
    };
}

/// The registry of decodable chunks, keyed by effective identifier. For a `LIST` chunk the
/// effective identifier is its list type.
pub enum WaveChunks {
    Format(ChunkParser<WaveFormatChunk>),
    Bext(ChunkParser<BextChunk>),
    Acid(ChunkParser<AcidChunk>),
    Inst(ChunkParser<InstChunk>),
    Fact(ChunkParser<FactChunk>),
    Disp(ChunkParser<DispChunk>),
    Levl(ChunkParser<LevlChunk>),
    Md5(ChunkParser<Md5Chunk>),
    Info(ChunkParser<InfoList>),
    Ds64(ChunkParser<Ds64Chunk>),
}

impl ParseChunkTag for WaveChunks {
    fn parse_tag(tag: FourCc, len: u64) -> Option<Self> {
        match &tag.get() {
            b"fmt " => parser!(WaveChunks::Format, WaveFormatChunk, tag, len),
            b"bext" => parser!(WaveChunks::Bext, BextChunk, tag, len),
            b"acid" => parser!(WaveChunks::Acid, AcidChunk, tag, len),
            b"inst" => parser!(WaveChunks::Inst, InstChunk, tag, len),
            b"fact" => parser!(WaveChunks::Fact, FactChunk, tag, len),
            b"DISP" => parser!(WaveChunks::Disp, DispChunk, tag, len),
            b"levl" => parser!(WaveChunks::Levl, LevlChunk, tag, len),
            b"MD5 " => parser!(WaveChunks::Md5, Md5Chunk, tag, len),
            b"INFO" => parser!(WaveChunks::Info, InfoList, tag, len),
            b"ds64" => parser!(WaveChunks::Ds64, Ds64Chunk, tag, len),
            // Includes `data`, `strc`, and list types other than INFO.
            _ => None,
        }
    }
}

impl WaveChunks {
    /// Decode the chunk payload into its record.
    pub fn parse<B: ReadBytes + FiniteStream>(
        &self,
        reader: &mut B,
        order: ByteOrder,
    ) -> Result<ChunkBody> {
        let body = match self {
            WaveChunks::Format(p) => ChunkBody::Format(p.parse(reader, order)?),
            WaveChunks::Bext(p) => ChunkBody::Bext(p.parse(reader, order)?),
            WaveChunks::Acid(p) => ChunkBody::Acid(p.parse(reader, order)?),
            WaveChunks::Inst(p) => ChunkBody::Inst(p.parse(reader, order)?),
            WaveChunks::Fact(p) => ChunkBody::Fact(p.parse(reader, order)?),
            WaveChunks::Disp(p) => ChunkBody::Disp(p.parse(reader, order)?),
            WaveChunks::Levl(p) => ChunkBody::Levl(p.parse(reader, order)?),
            WaveChunks::Md5(p) => ChunkBody::Md5(p.parse(reader, order)?),
            WaveChunks::Info(p) => ChunkBody::Info(p.parse(reader, order)?),
            WaveChunks::Ds64(p) => ChunkBody::Ds64(p.parse(reader, order)?),
        };
        Ok(body)
    }
}

/// Read a run of `len` single-byte elements whose length comes from the stream. Fails like an
/// out-of-bounds read, before allocating, if the run is longer than the bytes left.
fn read_byte_run<B: ReadBytes + FiniteStream>(
    reader: &mut B,
    len: u64,
    order: ByteOrder,
) -> Result<Box<[u8]>> {
    if len > reader.bytes_available() {
        out_of_bounds_error::<()>()?;
    }

    match usize::try_from(len) {
        Ok(len) => Ok(reader.read_field_bytes(len, order)?),
        Err(_) => decode_error("riff: byte run too large"),
    }
}

/// The decoded payload of a chunk.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ChunkBody {
    Format(WaveFormatChunk),
    Bext(BextChunk),
    Acid(AcidChunk),
    Inst(InstChunk),
    Fact(FactChunk),
    Disp(DispChunk),
    Levl(LevlChunk),
    Md5(Md5Chunk),
    Info(InfoList),
    Ds64(Ds64Chunk),
    /// No decoder is registered for the identifier. The payload was skipped.
    Unknown,
    /// The decoder rejected the payload, or tried to read past the end of the chunk.
    Malformed { reason: String },
}
