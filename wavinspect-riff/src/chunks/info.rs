// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The RIFF `LIST`/`INFO` tag list.

use std::collections::HashMap;

use wavinspect_core::errors::Result;
use wavinspect_core::fourcc::FourCc;
use wavinspect_core::io::{ByteOrder, FiniteStream, ReadBytes, ReadFields};

use lazy_static::lazy_static;
use log::debug;

use super::{read_byte_run, ParseChunk};
use crate::text::fixed_text;

lazy_static! {
    static ref RIFF_INFO_LABELS: HashMap<[u8; 4], &'static str> = {
        let mut m = HashMap::new();
        m.insert(*b"IARL", "Archival location");
        m.insert(*b"IART", "Artist");
        m.insert(*b"ICMS", "Commissioned");
        m.insert(*b"ICMT", "Comments");
        m.insert(*b"ICOP", "Copyright");
        m.insert(*b"ICRD", "Creation date");
        m.insert(*b"ICRP", "Cropped");
        m.insert(*b"IDIM", "Dimensions");
        m.insert(*b"IDPI", "Dots per inch");
        m.insert(*b"IENG", "Engineer");
        m.insert(*b"IGNR", "Genre");
        m.insert(*b"IKEY", "Keywords");
        m.insert(*b"ILGT", "Lightness");
        m.insert(*b"IMED", "Medium");
        m.insert(*b"INAM", "Name (title)");
        m.insert(*b"IPLT", "Palette");
        m.insert(*b"IPRD", "Product (album)");
        m.insert(*b"ISBJ", "Subject");
        m.insert(*b"ISFT", "Software");
        m.insert(*b"ISRC", "Source");
        m.insert(*b"ISRF", "Source form");
        m.insert(*b"ITCH", "Technician");
        m
    };
}

/// Get the label of a recognized INFO tag identifier.
pub fn info_label(id: FourCc) -> Option<&'static str> {
    RIFF_INFO_LABELS.get(&id.get()).copied()
}

/// A single INFO tag.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoTag {
    pub id: FourCc,
    pub label: &'static str,
    /// The size declared for the value, before padding.
    pub declared_len: u32,
    /// The padded value, as stored.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::text::ser::fixed_text"))]
    pub value: Box<[u8]>,
}

impl InfoTag {
    /// The value up to its first NUL byte.
    pub fn value_text(&self) -> String {
        fixed_text(&self.value)
    }
}

/// Why the tag sequence of an INFO list ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InfoEnd {
    /// Fewer than 4 bytes of the list remained.
    EndOfList,
    /// The tag identifier repeated the previous one.
    RepeatedTag(FourCc),
    /// The tag identifier is not one of the known INFO tags.
    UnrecognizedTag(FourCc),
    /// The tag declared a zero size.
    ZeroSize(FourCc),
    /// The tag value runs past the end of the list.
    Overrun(FourCc),
}

/// The tags of an INFO list, in stream order. Duplicates are kept.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoList {
    pub tags: Vec<InfoTag>,
    pub end: InfoEnd,
}

impl InfoList {
    /// The tags as ordered `(label, value)` pairs.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        self.tags.iter().map(|tag| (tag.label, tag.value_text())).collect()
    }
}

impl ParseChunk for InfoList {
    fn parse<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        _tag: FourCc,
        len: u64,
        order: ByteOrder,
    ) -> Result<InfoList> {
        let mut tags: Vec<InfoTag> = Vec::new();
        let mut consumed = 0u64;
        let mut prev_id = None;

        let end = loop {
            if len.saturating_sub(consumed) < 4 {
                break InfoEnd::EndOfList;
            }

            // Tag identifiers are never byte swapped.
            let id = FourCc::new(reader.read_quad_bytes()?);
            consumed += 4;

            if prev_id == Some(id) {
                break InfoEnd::RepeatedTag(id);
            }

            let label = match info_label(id) {
                Some(label) => label,
                None => break InfoEnd::UnrecognizedTag(id),
            };

            if reader.bytes_available() < 4 {
                break InfoEnd::Overrun(id);
            }

            let declared_len = reader.read_field_u32(order)?;
            consumed += 4;

            if declared_len == 0 {
                break InfoEnd::ZeroSize(id);
            }

            let available = reader.bytes_available();

            if u64::from(declared_len) > available {
                debug!("info: tag={}, len={} overruns the list", id, declared_len);
                break InfoEnd::Overrun(id);
            }

            // The pad byte of the last tag may be missing.
            let padded_len = (u64::from(declared_len) + u64::from(declared_len & 1)).min(available);

            let value = read_byte_run(reader, padded_len, order)?;
            consumed += padded_len;

            debug!("info: tag={}, len={}", id, declared_len);

            tags.push(InfoTag { id, label, declared_len, value });
            prev_id = Some(id);
        };

        Ok(InfoList { tags, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{payload_stream, Payload};

    fn parse(buf: &[u8], order: ByteOrder) -> Result<InfoList> {
        let mut reader = payload_stream(buf);
        InfoList::parse(&mut reader, FourCc::new(*b"INFO"), buf.len() as u64, order)
    }

    #[test]
    fn verify_single_artist_tag() {
        let buf = Payload::new(ByteOrder::LittleEndian)
            .bytes(b"IART")
            .u32(12)
            .bytes(b"Test Artist\0")
            .build();

        let info = parse(&buf, ByteOrder::LittleEndian).unwrap();
        assert_eq!(info.pairs(), [("Artist", "Test Artist".to_string())]);
        assert_eq!(info.end, InfoEnd::EndOfList);
    }

    #[test]
    fn verify_odd_values_are_padded() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let buf = Payload::new(order)
                .bytes(b"INAM")
                .u32(5)
                .bytes(b"Song\0\0")
                .bytes(b"ISFT")
                .u32(3)
                .bytes(b"wi\0\0")
                .build();

            let info = parse(&buf, order).unwrap();
            assert_eq!(
                info.pairs(),
                [("Name (title)", "Song".to_string()), ("Software", "wi".to_string())]
            );
            assert_eq!(info.tags[0].declared_len, 5);
            assert_eq!(info.tags[0].value.len(), 6);
        }
    }

    #[test]
    fn verify_duplicates_are_preserved() {
        let buf = Payload::new(ByteOrder::LittleEndian)
            .bytes(b"ICMT")
            .u32(2)
            .bytes(b"a\0")
            .bytes(b"IART")
            .u32(2)
            .bytes(b"b\0")
            .bytes(b"ICMT")
            .u32(2)
            .bytes(b"c\0")
            .build();

        let info = parse(&buf, ByteOrder::LittleEndian).unwrap();
        assert_eq!(info.tags.len(), 3);
        assert_eq!(info.tags[2].label, "Comments");
        assert_eq!(info.tags[2].value_text(), "c");
    }

    #[test]
    fn verify_sequence_end_reasons() {
        let repeated = Payload::new(ByteOrder::LittleEndian)
            .bytes(b"IART")
            .u32(2)
            .bytes(b"a\0")
            .bytes(b"IART")
            .u32(2)
            .bytes(b"b\0")
            .build();

        let info = parse(&repeated, ByteOrder::LittleEndian).unwrap();
        assert_eq!(info.tags.len(), 1);
        assert_eq!(info.end, InfoEnd::RepeatedTag(FourCc::new(*b"IART")));

        let unrecognized = Payload::new(ByteOrder::LittleEndian)
            .bytes(b"IART")
            .u32(2)
            .bytes(b"a\0")
            .bytes(b"ITRK")
            .u32(2)
            .bytes(b"1\0")
            .build();

        let info = parse(&unrecognized, ByteOrder::LittleEndian).unwrap();
        assert_eq!(info.tags.len(), 1);
        assert_eq!(info.end, InfoEnd::UnrecognizedTag(FourCc::new(*b"ITRK")));

        let zero = Payload::new(ByteOrder::LittleEndian).bytes(b"ICOP").u32(0).u32(0).build();

        let info = parse(&zero, ByteOrder::LittleEndian).unwrap();
        assert!(info.tags.is_empty());
        assert_eq!(info.end, InfoEnd::ZeroSize(FourCc::new(*b"ICOP")));

        let info = parse(&[], ByteOrder::LittleEndian).unwrap();
        assert!(info.tags.is_empty());
        assert_eq!(info.end, InfoEnd::EndOfList);
    }

    #[test]
    fn verify_value_past_end_keeps_earlier_tags() {
        let buf = Payload::new(ByteOrder::LittleEndian)
            .bytes(b"IART")
            .u32(12)
            .bytes(b"Test Artist\0")
            .bytes(b"INAM")
            .u32(1000)
            .bytes(b"abcd")
            .build();

        let info = parse(&buf, ByteOrder::LittleEndian).unwrap();
        assert_eq!(info.pairs(), [("Artist", "Test Artist".to_string())]);
        assert_eq!(info.end, InfoEnd::Overrun(FourCc::new(*b"INAM")));
    }

    #[test]
    fn verify_missing_final_pad_byte() {
        let buf = Payload::new(ByteOrder::BigEndian).bytes(b"ICMT").u32(3).bytes(b"ok\0").build();

        let info = parse(&buf, ByteOrder::BigEndian).unwrap();
        assert_eq!(info.pairs(), [("Comments", "ok".to_string())]);
        assert_eq!(info.tags[0].value.len(), 3);
        assert_eq!(info.end, InfoEnd::EndOfList);
    }

    #[test]
    fn verify_info_labels() {
        assert_eq!(RIFF_INFO_LABELS.len(), 22);
        assert_eq!(info_label(FourCc::new(*b"IPRD")), Some("Product (album)"));
        assert_eq!(info_label(FourCc::new(*b"iart")), None);
    }
}
