// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wavinspect_core::errors::{decode_error, Result};
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use super::{read_byte_run, ParseChunk};
use crate::text::fixed_text;

/// Length of the peak envelope header. Anything after it is peak envelope data.
const LEVL_HEADER_LEN: u64 = 120;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FactChunk {
    pub n_frames: u32,
}

impl ParseChunk for FactChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        _len: u64,
        order: ByteOrder,
    ) -> Result<FactChunk> {
        // Only the first field of a fact chunk is documented for every format.
        Ok(FactChunk { n_frames: reader.read_field_u32(order)? })
    }
}

/// The display (`DISP`) chunk. Holds clipboard data, usually a CF_TEXT title.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DispChunk {
    /// The clipboard format type.
    pub cf_type: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub data: Box<[u8]>,
}

impl DispChunk {
    pub fn data_text(&self) -> String {
        fixed_text(&self.data)
    }
}

impl ParseChunk for DispChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<DispChunk> {
        if len < 4 {
            return decode_error("disp: chunk too small");
        }

        let cf_type = reader.read_field_u32(order)?;

        let data = read_byte_run(reader, len - 4, order)?;

        Ok(DispChunk { cf_type, data })
    }
}

/// The peak envelope (`levl`) chunk header (EBU Tech 3285 Supplement 3).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LevlChunk {
    pub version: u32,
    pub format: u32,
    pub points_per_value: u32,
    pub block_size: u32,
    pub n_channels: u32,
    pub n_frames: u32,
    pub position: u32,
    pub offset: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub timestamp: Box<[u8]>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub reserved: Box<[u8]>,
    /// Number of peak envelope bytes following the header. They are not decoded.
    pub envelope_len: u64,
}

impl LevlChunk {
    pub fn timestamp_text(&self) -> String {
        fixed_text(&self.timestamp)
    }

    pub fn reserved_text(&self) -> String {
        fixed_text(&self.reserved)
    }
}

impl ParseChunk for LevlChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<LevlChunk> {
        Ok(LevlChunk {
            version: reader.read_field_u32(order)?,
            format: reader.read_field_u32(order)?,
            points_per_value: reader.read_field_u32(order)?,
            block_size: reader.read_field_u32(order)?,
            n_channels: reader.read_field_u32(order)?,
            n_frames: reader.read_field_u32(order)?,
            position: reader.read_field_u32(order)?,
            offset: reader.read_field_u32(order)?,
            timestamp: reader.read_field_bytes(28, order)?,
            reserved: reader.read_field_bytes(60, order)?,
            envelope_len: len.saturating_sub(LEVL_HEADER_LEN),
        })
    }
}

/// The `MD5 ` checksum chunk.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Md5Chunk {
    pub front: u64,
    pub back: u64,
}

impl Md5Chunk {
    /// The checksum as the decimal rendering of both halves, front first.
    pub fn checksum(&self) -> String {
        format!("{}{}", self.front, self.back)
    }
}

impl ParseChunk for Md5Chunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        _len: u64,
        order: ByteOrder,
    ) -> Result<Md5Chunk> {
        Ok(Md5Chunk { front: reader.read_field_u64(order)?, back: reader.read_field_u64(order)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{payload_stream, Payload};

    fn parse<P: ParseChunk>(buf: &[u8], tag: &[u8; 4], order: ByteOrder) -> Result<P> {
        let mut reader = payload_stream(buf);
        P::parse(&mut reader, FourCc::new(*tag), buf.len() as u64, order)
    }

    #[test]
    fn verify_fact_chunk() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let buf = Payload::new(order).u32(1_323_000).build();
            let fact: FactChunk = parse(&buf, b"fact", order).unwrap();
            assert_eq!(fact.n_frames, 1_323_000);
        }
    }

    #[test]
    fn verify_disp_chunk() {
        let buf = Payload::new(ByteOrder::LittleEndian).u32(1).bytes(b"Title\0").build();

        let disp: DispChunk = parse(&buf, b"DISP", ByteOrder::LittleEndian).unwrap();
        assert_eq!(disp.cf_type, 1);
        assert_eq!(disp.data.len(), 6);
        assert_eq!(disp.data_text(), "Title");

        assert!(parse::<DispChunk>(&[0, 0], b"DISP", ByteOrder::LittleEndian).is_err());
    }

    #[test]
    fn verify_levl_chunk() {
        let buf = Payload::new(ByteOrder::LittleEndian)
            .u32(1)
            .u32(2)
            .u32(1)
            .u32(256)
            .u32(2)
            .u32(1024)
            .u32(0)
            .u32(128)
            .text(b"2024:05:17:13:45:07:00", 28)
            .text(&[], 60)
            .bytes(&[0x12, 0x34, 0x56, 0x78])
            .build();

        let levl: LevlChunk = parse(&buf, b"levl", ByteOrder::LittleEndian).unwrap();
        assert_eq!(levl.version, 1);
        assert_eq!(levl.format, 2);
        assert_eq!(levl.points_per_value, 1);
        assert_eq!(levl.block_size, 256);
        assert_eq!(levl.n_channels, 2);
        assert_eq!(levl.n_frames, 1024);
        assert_eq!(levl.position, 0);
        assert_eq!(levl.offset, 128);
        assert_eq!(levl.timestamp_text(), "2024:05:17:13:45:07:00");
        assert_eq!(levl.reserved_text(), "");
        assert_eq!(levl.envelope_len, 4);
    }

    #[test]
    fn verify_md5_checksum() {
        let buf = Payload::new(ByteOrder::BigEndian).u64(12).u64(345).build();

        let md5: Md5Chunk = parse(&buf, b"MD5 ", ByteOrder::BigEndian).unwrap();
        assert_eq!(md5.front, 12);
        assert_eq!(md5.back, 345);
        assert_eq!(md5.checksum(), "12345");
    }
}
