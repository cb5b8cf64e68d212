// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wavinspect_core::errors::Result;
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use log::debug;

use super::ParseChunk;

/// A 64-bit chunk size override from the `ds64` table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ds64TableEntry {
    pub chunk_id: FourCc,
    pub chunk_len: u64,
}

/// The data size (`ds64`) chunk of RF64 (EBU Tech 3306) and BW64 (ITU-R BS.2088) files.
///
/// Sizes that do not fit in the 32-bit size field of their header are stored as `0xffffffff`, and
/// the true 64-bit size is found here.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ds64Chunk {
    pub riff_len: u64,
    pub data_len: u64,
    pub n_frames: u64,
    pub table: Vec<Ds64TableEntry>,
}

impl Ds64Chunk {
    /// Get the true length of a chunk whose header declares `0xffffffff`, if known.
    pub fn chunk_len(&self, id: FourCc) -> Option<u64> {
        if id == *b"data" {
            return Some(self.data_len);
        }
        self.table.iter().find(|entry| entry.chunk_id == id).map(|entry| entry.chunk_len)
    }
}

/// Read a 64-bit size stored as a low word followed by a high word.
fn read_split_u64<B: ReadBytes>(reader: &mut B, order: ByteOrder) -> Result<u64> {
    let low = reader.read_field_u32(order)?;
    let high = reader.read_field_u32(order)?;
    Ok((u64::from(high) << 32) | u64::from(low))
}

impl ParseChunk for Ds64Chunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        _len: u64,
        order: ByteOrder,
    ) -> Result<Ds64Chunk> {
        let riff_len = read_split_u64(reader, order)?;
        let data_len = read_split_u64(reader, order)?;
        let n_frames = read_split_u64(reader, order)?;

        let n_entries = reader.read_field_u32(order)?;

        // The table length is untrusted, do not preallocate.
        let mut table = Vec::new();

        for _ in 0..n_entries {
            let chunk_id = FourCc::new(reader.read_quad_bytes()?);
            let chunk_len = read_split_u64(reader, order)?;
            table.push(Ds64TableEntry { chunk_id, chunk_len });
        }

        debug!("ds64: riff_len={}, data_len={}, table={}", riff_len, data_len, table.len());

        Ok(Ds64Chunk { riff_len, data_len, n_frames, table })
    }
}
