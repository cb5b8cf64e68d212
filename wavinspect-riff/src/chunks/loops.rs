// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loop and instrument chunks.

use wavinspect_core::errors::Result;
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use bitflags::bitflags;

use super::ParseChunk;

bitflags! {
    /// Property flags of an `acid` chunk.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct AcidFlags: u32 {
        const ONE_SHOT      = 0x01;
        const ROOT_NOTE_SET = 0x02;
        const STRETCH       = 0x04;
        const DISK_BASED    = 0x08;
        /// Set by some tools, meaning unknown.
        const UNKNOWN       = 0x10;
    }
}

/// The loop and tempo (`acid`) chunk written by ACID and compatible tools.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AcidChunk {
    /// Raw property bits. See [`AcidChunk::flags`].
    pub properties: u32,
    pub root_note: u16,
    pub unknown1: u16,
    pub unknown2: f32,
    pub n_beats: u32,
    pub meter_numerator: u16,
    pub meter_denominator: u16,
    pub tempo: f32,
}

impl AcidChunk {
    pub fn flags(&self) -> AcidFlags {
        AcidFlags::from_bits_retain(self.properties)
    }
}

impl ParseChunk for AcidChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        _len: u64,
        order: ByteOrder,
    ) -> Result<AcidChunk> {
        Ok(AcidChunk {
            properties: reader.read_field_u32(order)?,
            root_note: reader.read_field_u16(order)?,
            unknown1: reader.read_field_u16(order)?,
            unknown2: reader.read_field_f32(order)?,
            n_beats: reader.read_field_u32(order)?,
            meter_numerator: reader.read_field_u16(order)?,
            meter_denominator: reader.read_field_u16(order)?,
            tempo: reader.read_field_f32(order)?,
        })
    }
}

/// The instrument (`inst`) chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InstChunk {
    pub unshifted_note: i8,
    pub fine_tune: i8,
    pub gain: i8,
    pub low_note: i8,
    pub high_note: i8,
    pub low_velocity: i8,
    pub high_velocity: i8,
}

impl ParseChunk for InstChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        _len: u64,
        order: ByteOrder,
    ) -> Result<InstChunk> {
        Ok(InstChunk {
            unshifted_note: reader.read_field_i8(order)?,
            fine_tune: reader.read_field_i8(order)?,
            gain: reader.read_field_i8(order)?,
            low_note: reader.read_field_i8(order)?,
            high_note: reader.read_field_i8(order)?,
            low_velocity: reader.read_field_i8(order)?,
            high_velocity: reader.read_field_i8(order)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::testutil::{payload_stream, Payload};

    fn parse<P: ParseChunk>(buf: &[u8], tag: &[u8; 4], order: ByteOrder) -> Result<P> {
        let mut reader = payload_stream(buf);
        P::parse(&mut reader, FourCc::new(*tag), buf.len() as u64, order)
    }

    fn acid_payload(order: ByteOrder, acid: &AcidChunk) -> Vec<u8> {
        Payload::new(order)
            .u32(acid.properties)
            .u16(acid.root_note)
            .u16(acid.unknown1)
            .f32(acid.unknown2)
            .u32(acid.n_beats)
            .u16(acid.meter_numerator)
            .u16(acid.meter_denominator)
            .f32(acid.tempo)
            .build()
    }

    #[test]
    fn verify_acid_chunk() {
        let expected = AcidChunk {
            properties: 0x1a,
            root_note: 60,
            unknown1: 0x8000,
            unknown2: 0.0,
            n_beats: 8,
            meter_numerator: 4,
            meter_denominator: 4,
            tempo: 128.0,
        };

        let buf = acid_payload(ByteOrder::LittleEndian, &expected);
        let acid: AcidChunk = parse(&buf, b"acid", ByteOrder::LittleEndian).unwrap();

        assert_eq!(
            acid.flags(),
            AcidFlags::ROOT_NOTE_SET | AcidFlags::DISK_BASED | AcidFlags::UNKNOWN
        );
        assert!(!acid.flags().contains(AcidFlags::ONE_SHOT));
        assert_eq!(acid.root_note, 60);
        assert_eq!(acid.unknown1, 0x8000);
        assert_eq!(acid.n_beats, 8);
        assert_eq!(acid.meter_numerator, 4);
        assert_eq!(acid.meter_denominator, 4);
        assert_eq!(acid.tempo, 128.0);
    }

    #[test]
    fn verify_acid_byte_order_symmetry() {
        let mut rng = SmallRng::seed_from_u64(0x6163_6964);

        for _ in 0..64 {
            let expected = AcidChunk {
                properties: rng.random(),
                root_note: rng.random(),
                unknown1: rng.random(),
                unknown2: f32::from_bits(rng.random::<u32>() & 0x7f7f_ffff),
                n_beats: rng.random(),
                meter_numerator: rng.random(),
                meter_denominator: rng.random(),
                tempo: f32::from_bits(rng.random::<u32>() & 0x7f7f_ffff),
            };

            let buf = acid_payload(ByteOrder::LittleEndian, &expected);
            let le: AcidChunk = parse(&buf, b"acid", ByteOrder::LittleEndian).unwrap();

            let buf = acid_payload(ByteOrder::BigEndian, &expected);
            let be: AcidChunk = parse(&buf, b"acid", ByteOrder::BigEndian).unwrap();

            for acid in [le, be] {
                assert_eq!(acid.properties, expected.properties);
                assert_eq!(acid.root_note, expected.root_note);
                assert_eq!(acid.unknown1, expected.unknown1);
                assert_eq!(acid.unknown2.to_bits(), expected.unknown2.to_bits());
                assert_eq!(acid.n_beats, expected.n_beats);
                assert_eq!(acid.meter_numerator, expected.meter_numerator);
                assert_eq!(acid.meter_denominator, expected.meter_denominator);
                assert_eq!(acid.tempo.to_bits(), expected.tempo.to_bits());
            }
        }
    }

    #[test]
    fn verify_inst_chunk_is_signed() {
        let buf = Payload::new(ByteOrder::BigEndian)
            .i8(60)
            .i8(-12)
            .i8(-3)
            .i8(0)
            .i8(127)
            .i8(1)
            .i8(-128)
            .build();

        let inst: InstChunk = parse(&buf, b"inst", ByteOrder::BigEndian).unwrap();
        assert_eq!(
            inst,
            InstChunk {
                unshifted_note: 60,
                fine_tune: -12,
                gain: -3,
                low_note: 0,
                high_note: 127,
                low_velocity: 1,
                high_velocity: -128,
            }
        );
    }
}
