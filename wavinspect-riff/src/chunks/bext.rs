// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wavinspect_core::errors::Result;
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use super::{read_byte_run, ParseChunk};
use crate::text::{fixed_text, hex_string, text_without_nuls};

/// Length of the fixed part of a broadcast extension chunk. Anything after it is coding history.
const BEXT_MIN_CHUNK_LEN: u64 = 602;

/// The broadcast audio extension (`bext`) chunk of the Broadcast Wave Format (EBU Tech 3285).
///
/// Text fields are kept as stored. Use the `*_text` accessors for display.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BextChunk {
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub description: Box<[u8]>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub originator: Box<[u8]>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub originator_reference: Box<[u8]>,
    /// `yyyy:mm:dd`
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub origination_date: Box<[u8]>,
    /// `hh:mm:ss`
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub origination_time: Box<[u8]>,
    /// First sample count since midnight, low word.
    pub time_reference_low: u32,
    /// First sample count since midnight, high word.
    pub time_reference_high: u32,
    pub version: u16,
    /// SMPTE ST 330 UMID.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::hex"))]
    pub umid: Box<[u8]>,
    pub loudness_value: u16,
    pub loudness_range: u16,
    pub max_true_peak_level: u16,
    pub max_momentary_loudness: u16,
    pub max_short_term_loudness: u16,
    /// Present if the chunk is longer than its fixed part.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::optional_history"))]
    pub coding_history: Option<Box<[u8]>>,
}

impl BextChunk {
    pub fn description_text(&self) -> String {
        fixed_text(&self.description)
    }

    pub fn originator_text(&self) -> String {
        fixed_text(&self.originator)
    }

    pub fn originator_reference_text(&self) -> String {
        fixed_text(&self.originator_reference)
    }

    pub fn origination_date_text(&self) -> String {
        fixed_text(&self.origination_date)
    }

    pub fn origination_time_text(&self) -> String {
        fixed_text(&self.origination_time)
    }

    /// The SMPTE UMID as uppercase hex.
    pub fn umid_hex(&self) -> String {
        hex_string(&self.umid)
    }

    /// The coding history with all NUL bytes dropped.
    pub fn coding_history_text(&self) -> Option<String> {
        self.coding_history.as_deref().map(text_without_nuls)
    }

    /// The 64-bit time reference.
    pub fn time_reference(&self) -> u64 {
        (u64::from(self.time_reference_high) << 32) | u64::from(self.time_reference_low)
    }
}

impl ParseChunk for BextChunk {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<BextChunk> {
        let description = reader.read_field_bytes(256, order)?;
        let originator = reader.read_field_bytes(32, order)?;
        let originator_reference = reader.read_field_bytes(32, order)?;
        let origination_date = reader.read_field_bytes(10, order)?;
        let origination_time = reader.read_field_bytes(8, order)?;
        let time_reference_low = reader.read_field_u32(order)?;
        let time_reference_high = reader.read_field_u32(order)?;
        let version = reader.read_field_u16(order)?;
        let umid = reader.read_field_bytes(64, order)?;
        let loudness_value = reader.read_field_u16(order)?;
        let loudness_range = reader.read_field_u16(order)?;
        let max_true_peak_level = reader.read_field_u16(order)?;
        let max_momentary_loudness = reader.read_field_u16(order)?;
        let max_short_term_loudness = reader.read_field_u16(order)?;

        // Reserved.
        reader.ignore_bytes(180)?;

        let coding_history = if len > BEXT_MIN_CHUNK_LEN {
            Some(read_byte_run(reader, len - BEXT_MIN_CHUNK_LEN, order)?)
        }
        else {
            None
        };

        Ok(BextChunk {
            description,
            originator,
            originator_reference,
            origination_date,
            origination_time,
            time_reference_low,
            time_reference_high,
            version,
            umid,
            loudness_value,
            loudness_range,
            max_true_peak_level,
            max_momentary_loudness,
            max_short_term_loudness,
            coding_history,
        })
    }
}
