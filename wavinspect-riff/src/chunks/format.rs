// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wavinspect_core::channels::speaker_layout;
use wavinspect_core::errors::Result;
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use log::debug;

use super::ParseChunk;
use crate::text::hex_string;

/// Format tag of `WAVEFORMATEXTENSIBLE`.
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xfffe;

/// Sub-format GUID of the PVOC-EX phase vocoder analysis format, as stored in the stream.
pub const KSDATAFORMAT_SUBTYPE_PVOCEX: [u8; 16] = [
    0xc2, 0xb9, 0x12, 0x83, 0x6e, 0x2e, 0xd4, 0x11, 0xa8, 0x24, 0xde, 0x5b, 0x96, 0xc3, 0xab, 0x21,
];

/// The only `fmt ` chunk length that carries a PVOC-EX block.
const PVOCEX_FMT_CHUNK_LEN: u64 = 80;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WaveFormatChunk {
    /// The format tag. `WAVE_FORMAT_EXTENSIBLE` if the chunk has an extensible block.
    pub format_tag: u16,
    /// The number of channels.
    pub n_channels: u16,
    /// The sample rate in Hz.
    pub sample_rate: u32,
    /// The average data rate in bytes/second.
    pub avg_bytes_per_sec: u32,
    /// The byte alignment of one audio frame.
    pub block_align: u16,
    /// The number of bits per sample.
    pub bits_per_sample: u16,
    /// The length of the extension, present if the chunk is longer than 16 bytes.
    pub extension_len: Option<u16>,
    /// The extensible block, present if the format tag is `WAVE_FORMAT_EXTENSIBLE`.
    pub extensible: Option<FormatExtensible>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormatExtensible {
    /// The number of bits per sample that are valid.
    pub valid_bits_per_sample: u16,
    /// Speaker position bitmask.
    pub channel_mask: u32,
    /// Globally unique identifier of the sub-format, as stored.
    #[cfg_attr(feature = "serde", serde(serialize_with = "ser_guid"))]
    pub sub_format_guid: [u8; 16],
    /// The PVOC-EX block, present if the sub-format is PVOC-EX and the chunk is 80 bytes long.
    pub pvoc_ex: Option<FormatPvocEx>,
}

impl FormatExtensible {
    /// The legacy format tag packed into the first two bytes of the sub-format GUID.
    pub fn legacy_format_tag(&self) -> u16 {
        u16::from_le_bytes([self.sub_format_guid[0], self.sub_format_guid[1]])
    }

    /// The sub-format GUID as an `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` string. Bytes are written
    /// in stream order.
    pub fn guid_string(&self) -> String {
        guid_string(&self.sub_format_guid)
    }

    /// The named speaker positions of the channel mask.
    pub fn speaker_layout(&self) -> Vec<&'static str> {
        speaker_layout(self.channel_mask)
    }
}

fn guid_string(guid: &[u8; 16]) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        hex_string(&guid[0..4]),
        hex_string(&guid[4..6]),
        hex_string(&guid[6..8]),
        hex_string(&guid[8..10]),
        hex_string(&guid[10..16])
    )
}

#[cfg(feature = "serde")]
fn ser_guid<S: serde::Serializer>(guid: &[u8; 16], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&guid_string(guid))
}

/// The phase vocoder analysis block of a PVOC-EX format chunk.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormatPvocEx {
    pub version: u32,
    /// Size of the PVOC-EX block in bytes.
    pub block_len: u32,
    pub word_format: u16,
    pub analysis_format: u16,
    pub source_format: u16,
    pub window_type: u16,
    pub n_bins: u32,
    pub window_len: u32,
    pub overlap: u32,
    pub frame_align: u32,
    pub analysis_rate: f32,
    pub window_param: f32,
}

impl WaveFormatChunk {
    fn read_ext_fmt<B: ReadBytes>(
        reader: &mut B,
        len: u64,
        order: ByteOrder,
    ) -> Result<FormatExtensible> {
        let valid_bits_per_sample = reader.read_field_u16(order)?;
        let channel_mask = reader.read_field_u32(order)?;
        let sub_format_guid = reader.read_field_array::<16>(order)?;

        let is_pvoc_ex =
            sub_format_guid == KSDATAFORMAT_SUBTYPE_PVOCEX && len == PVOCEX_FMT_CHUNK_LEN;

        let pvoc_ex = if is_pvoc_ex { Some(Self::read_pvoc_ex(reader, order)?) } else { None };

        Ok(FormatExtensible { valid_bits_per_sample, channel_mask, sub_format_guid, pvoc_ex })
    }

    fn read_pvoc_ex<B: ReadBytes>(reader: &mut B, order: ByteOrder) -> Result<FormatPvocEx> {
        Ok(FormatPvocEx {
            version: reader.read_field_u32(order)?,
            block_len: reader.read_field_u32(order)?,
            word_format: reader.read_field_u16(order)?,
            analysis_format: reader.read_field_u16(order)?,
            source_format: reader.read_field_u16(order)?,
            window_type: reader.read_field_u16(order)?,
            n_bins: reader.read_field_u32(order)?,
            window_len: reader.read_field_u32(order)?,
            overlap: reader.read_field_u32(order)?,
            frame_align: reader.read_field_u32(order)?,
            analysis_rate: reader.read_field_f32(order)?,
            window_param: reader.read_field_f32(order)?,
        })
    }
}

impl ParseChunk for WaveFormatChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<WaveFormatChunk> {
        let format_tag = reader.read_field_u16(order)?;
        let n_channels = reader.read_field_u16(order)?;
        let sample_rate = reader.read_field_u32(order)?;
        let avg_bytes_per_sec = reader.read_field_u32(order)?;
        let block_align = reader.read_field_u16(order)?;
        let bits_per_sample = reader.read_field_u16(order)?;

        // WaveFormatEx adds the extension length field after the basic 16 byte WaveFormat.
        let extension_len = if len > 16 { Some(reader.read_field_u16(order)?) } else { None };

        let extensible = if format_tag == WAVE_FORMAT_EXTENSIBLE {
            Some(Self::read_ext_fmt(reader, len, order)?)
        }
        else {
            None
        };

        debug!(
            "fmt: tag={:#06x}, channels={}, rate={}, bits={}",
            format_tag, n_channels, sample_rate, bits_per_sample
        );

        Ok(WaveFormatChunk {
            format_tag,
            n_channels,
            sample_rate,
            avg_bytes_per_sec,
            block_align,
            bits_per_sample,
            extension_len,
            extensible,
        })
    }
}
