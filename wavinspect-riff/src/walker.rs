// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::{Read, Seek};

use wavinspect_core::errors::{
    truncated_error, unsupported_container_error, unsupported_form_type_error, Error, Result,
};
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, ReadBytes, ReadFields, ScopedStream, SourceStream};

use log::{debug, error, info, warn};

use crate::chunks::{ChunkBody, Ds64Chunk, ParseChunkTag, WaveChunks};

/// The only supported RIFF form type.
const WAVE_FORM: [u8; 4] = *b"WAVE";

/// Length of a chunk header: the identifier and the size.
const CHUNK_HEADER_LEN: u64 = 8;

/// A size field of `0xffffffff` means the size is unknown, or is stored in a `ds64` chunk.
const UNKNOWN_LEN: u32 = u32::MAX;

/// `WalkOptions` is a common set of options that all walks use.
#[derive(Copy, Clone, Debug)]
pub struct WalkOptions {
    /// Stop the walk, without error, when a chunk identifier repeats the previous one. A repeated
    /// identifier almost always means the rest of the stream is garbage.
    ///
    /// Default: `true`.
    pub corruption_guard: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions { corruption_guard: true }
    }
}

/// The container header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Container {
    /// The master identifier, one of `RIFF`, `RIFX`, `FFIR`, `RF64`, or `BW64`.
    pub master: FourCc,
    /// The byte order of all multi-byte fields, set by the master identifier.
    pub byte_order: ByteOrder,
    /// The size declared in the container header, as stored.
    pub declared_len: u32,
    /// The form type. Always `WAVE`.
    pub form: FourCc,
}

impl Container {
    /// Returns `true` if the container keeps its 64-bit sizes in a `ds64` chunk.
    pub fn is_rf64(&self) -> bool {
        self.master == *b"RF64" || self.master == *b"BW64"
    }
}

/// Get the byte order set by a master identifier, if it is a RIFF family identifier.
fn byte_order_of(master: FourCc) -> Option<ByteOrder> {
    match &master.get() {
        b"RIFF" | b"RF64" | b"BW64" => Some(ByteOrder::LittleEndian),
        b"RIFX" | b"FFIR" => Some(ByteOrder::BigEndian),
        _ => None,
    }
}

/// The header of a chunk and where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChunkHeader {
    pub id: FourCc,
    /// The list type of a `LIST` chunk.
    pub list_type: Option<FourCc>,
    /// The size field, as stored.
    pub declared_len: u32,
    /// The payload size. Differs from `declared_len` only when a `ds64` chunk supplied it.
    pub len: u64,
    /// The payload size including the pad byte of an odd sized chunk.
    pub padded_len: u64,
    /// The number of payload bytes after the list type, if any.
    pub effective_len: u64,
    /// Absolute position of the chunk identifier.
    pub header_offset: u64,
    /// Absolute position of the first byte handed to the decoder.
    pub payload_offset: u64,
}

impl ChunkHeader {
    /// The identifier chunk decoders are registered under: the list type for a `LIST` chunk, and
    /// the chunk identifier otherwise.
    pub fn effective_id(&self) -> FourCc {
        self.list_type.unwrap_or(self.id)
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chunk {
    pub header: ChunkHeader,
    pub body: ChunkBody,
}

/// Why a walk ended without a fatal error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "reason", rename_all = "snake_case"))]
pub enum Termination {
    /// Less than one chunk header remained within the container size.
    EndOfContainer,
    /// The container size is unknown and the stream ended on a chunk boundary.
    EndOfStream,
    /// A chunk identifier repeated the previous one. `offset` is the position of the repeat.
    RepeatedIdentifier { id: FourCc, offset: u64 },
    /// The chunk at `offset` extends past the end of the container. It was still decoded.
    ContainerOverrun { id: FourCc, offset: u64 },
}

/// The result of a complete walk.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiffReport {
    pub container: Container,
    pub chunks: Vec<Chunk>,
    pub termination: Termination,
}

/// Map a failed stream read at `offset` to an error. Running out of data is a truncation.
fn stream_error(offset: u64, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::Truncated { offset },
        _ => Error::IoError(err),
    }
}

fn read_id<B: ReadBytes>(reader: &mut B) -> Result<FourCc> {
    let offset = reader.pos();
    // Identifiers are never byte swapped.
    reader.read_quad_bytes().map(FourCc::new).map_err(|err| stream_error(offset, err))
}

fn read_len<B: ReadBytes>(reader: &mut B, order: ByteOrder) -> Result<u32> {
    let offset = reader.pos();
    reader.read_field_u32(order).map_err(|err| stream_error(offset, err))
}

/// `ChunkWalker` walks the top-level chunks of a RIFF/WAVE stream.
///
/// Every chunk is decoded by the parser registered for its effective identifier in
/// [`WaveChunks`]. Each parser reads through a [`ScopedStream`] bounded to the chunk payload, and
/// the walker always continues from the end of the padded payload, no matter how much of it the
/// parser consumed. A parser that overruns or rejects its payload yields
/// [`ChunkBody::Malformed`]. Only running out of stream is fatal.
pub struct ChunkWalker<R: Read + Seek> {
    reader: SourceStream<R>,
    container: Container,
    options: WalkOptions,
    /// The number of bytes following the container size field, if known.
    riff_len: Option<u64>,
    /// The number of bytes following the container size field that were walked so far.
    consumed: u64,
    prev_id: Option<FourCc>,
    ds64: Option<Ds64Chunk>,
    stream_len: u64,
    termination: Option<Termination>,
}

impl<R: Read + Seek> ChunkWalker<R> {
    /// Read and validate the container header. The walk starts at the first chunk.
    pub fn try_new(mut reader: SourceStream<R>, options: WalkOptions) -> Result<Self> {
        let master = read_id(&mut reader)?;

        let byte_order = match byte_order_of(master) {
            Some(byte_order) => byte_order,
            None => {
                error!("riff: unsupported master identifier: {}", master);
                return unsupported_container_error(master);
            }
        };

        let declared_len = read_len(&mut reader, byte_order)?;

        let form = read_id(&mut reader)?;

        if form != WAVE_FORM {
            error!("riff: unsupported form type: {}", form);
            return unsupported_form_type_error(form);
        }

        debug!("riff: master={}, len={}, order={}", master, declared_len, byte_order);

        // An unknown container size is bounded by the stream, or by the ds64 chunk once read.
        let riff_len = match declared_len {
            UNKNOWN_LEN => None,
            _ => Some(u64::from(declared_len)),
        };

        let stream_len = reader.byte_len()?;

        Ok(ChunkWalker {
            reader,
            container: Container { master, byte_order, declared_len, form },
            options,
            riff_len,
            // The form type.
            consumed: 4,
            prev_id: None,
            ds64: None,
            stream_len,
            termination: None,
        })
    }

    /// Gets the container header.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Gets the `ds64` chunk, if one was walked.
    pub fn ds64(&self) -> Option<&Ds64Chunk> {
        self.ds64.as_ref()
    }

    /// Gets why the walk ended. `None` while chunks remain, or after a fatal error.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Read the next chunk. Returns `None` once the walk has ended.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.termination.is_some() {
            return Ok(None);
        }

        let header_offset = self.reader.pos();

        match self.riff_len {
            Some(riff_len) => {
                if riff_len.saturating_sub(self.consumed) < CHUNK_HEADER_LEN {
                    debug!("riff: end of container at offset {}", header_offset);
                    return Ok(self.finish(Termination::EndOfContainer));
                }
            }
            None => {
                if header_offset == self.stream_len {
                    debug!("riff: end of stream at offset {}", header_offset);
                    return Ok(self.finish(Termination::EndOfStream));
                }
            }
        }

        // The previous chunk ran past the end of the stream.
        if header_offset > self.stream_len {
            error!("riff: chunk payload ends past the end of the stream at {}", self.stream_len);
            return truncated_error(self.stream_len);
        }

        let id = read_id(&mut self.reader)?;

        if self.options.corruption_guard && self.prev_id == Some(id) {
            warn!("riff: repeated chunk identifier {} at offset {}, stopping", id, header_offset);
            return Ok(self.finish(Termination::RepeatedIdentifier { id, offset: header_offset }));
        }

        let declared_len = read_len(&mut self.reader, self.container.byte_order)?;

        let len = match (declared_len, &self.ds64) {
            (UNKNOWN_LEN, Some(ds64)) => match ds64.chunk_len(id) {
                Some(len) => {
                    debug!("riff: chunk {} has ds64 size {}", id, len);
                    len
                }
                None => u64::from(declared_len),
            },
            _ => u64::from(declared_len),
        };

        // Odd sized chunks are followed by a pad byte, except bext whose size is taken as-is.
        let padded_len = if id == *b"bext" { len } else { len.saturating_add(len & 1) };

        let (list_type, effective_len) = if id == *b"LIST" && padded_len >= 4 {
            (Some(read_id(&mut self.reader)?), padded_len - 4)
        }
        else {
            (None, padded_len)
        };

        let header = ChunkHeader {
            id,
            list_type,
            declared_len,
            len,
            padded_len,
            effective_len,
            header_offset,
            payload_offset: self.reader.pos(),
        };

        self.consumed = self.consumed.saturating_add(CHUNK_HEADER_LEN).saturating_add(padded_len);

        let effective_id = header.effective_id();

        debug!(
            "riff: chunk={}, len={}, effective_len={}, offset={}",
            effective_id, len, effective_len, header_offset
        );

        let body = match WaveChunks::parse_tag(effective_id, effective_len) {
            Some(parser) => self.decode(&parser, &header)?,
            None => {
                info!("ignoring unknown chunk: tag={}, len={}.", effective_id, effective_len);
                ChunkBody::Unknown
            }
        };

        if let ChunkBody::Ds64(ds64) = &body {
            if self.container.is_rf64() && self.container.declared_len == UNKNOWN_LEN {
                self.riff_len = Some(ds64.riff_len);
            }
            self.ds64 = Some(ds64.clone());
        }

        // Continue after the payload regardless of how much of it was read.
        let mut next_offset = header.payload_offset.saturating_add(effective_len);

        // A chunk of unknown size in a container of unknown size runs to the end of the stream.
        if self.riff_len.is_none() && len == u64::from(UNKNOWN_LEN) {
            next_offset = next_offset.min(self.stream_len);
        }

        self.reader.seek_to(next_offset)?;

        self.prev_id = Some(effective_id);

        if let Some(riff_len) = self.riff_len {
            if self.consumed > riff_len {
                warn!(
                    "riff: chunk {} at offset {} runs past the end of the container",
                    effective_id, header_offset
                );
                self.termination =
                    Some(Termination::ContainerOverrun { id: effective_id, offset: header_offset });
            }
        }

        Ok(Some(Chunk { header, body }))
    }

    fn decode(&mut self, parser: &WaveChunks, header: &ChunkHeader) -> Result<ChunkBody> {
        let id = header.effective_id();

        // Bound the payload by the end of the stream as well, so that a read past the scope is
        // always either a chunk overrun or a truncated stream.
        let available = self.stream_len.saturating_sub(header.payload_offset);
        let scope_len = header.effective_len.min(available);

        let mut scoped = ScopedStream::new(&mut self.reader, scope_len);

        let reason = match parser.parse(&mut scoped, self.container.byte_order) {
            Ok(body) => return Ok(body),
            Err(Error::IoError(err)) => match err.kind() {
                io::ErrorKind::InvalidData if scope_len < header.effective_len => {
                    return truncated_error(scoped.pos());
                }
                io::ErrorKind::InvalidData => err.to_string(),
                _ => return Err(stream_error(scoped.pos(), err)),
            },
            Err(Error::DecodeError(msg)) => msg.to_string(),
            Err(err) => return Err(err),
        };

        warn!("riff: malformed chunk {} at offset {}: {}", id, header.header_offset, reason);

        Ok(ChunkBody::Malformed { reason })
    }

    fn finish(&mut self, termination: Termination) -> Option<Chunk> {
        self.termination = Some(termination);
        None
    }
}

/// Walk a whole RIFF/WAVE stream, starting at the current position of `source`.
pub fn read_riff<R: Read + Seek>(source: R, options: WalkOptions) -> Result<RiffReport> {
    let reader = SourceStream::new(source, Default::default())?;

    let mut walker = ChunkWalker::try_new(reader, options)?;

    let mut chunks = Vec::new();

    while let Some(chunk) = walker.next_chunk()? {
        chunks.push(chunk);
    }

    Ok(RiffReport {
        container: walker.container().clone(),
        chunks,
        termination: walker.termination().unwrap_or(Termination::EndOfContainer),
    })
}
