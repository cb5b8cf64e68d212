// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line-oriented text rendering of a walk.

use std::io::{self, Write};

use wavinspect_riff::chunks::{
    AcidChunk, AcidFlags, BextChunk, ChunkBody, DispChunk, Ds64Chunk, FormatExtensible, InfoEnd,
    InfoList, InstChunk, LevlChunk, WaveFormatChunk,
};
use wavinspect_riff::{ChunkHeader, Container, Termination};

const CODING_HISTORY_LEGEND: &[&str] = &[
    " Coding history field info:",
    "  A=(Coding algorithm)",
    "  F=(Sampling frequency in Hz)",
    "  B=(bitrate for MPEG 2 in kbit/s per channel)",
    "  W=(Word length for MPEG coding in bits)",
    "  M=(mode)",
    "  T=(text, could be ID-No, codec-type, A/D type..)",
];

pub fn write_container<W: Write>(w: &mut W, container: &Container) -> io::Result<()> {
    writeln!(w, "Master identifier: {}", container.master)?;
    writeln!(w, "Endianness: {}", container.byte_order)?;
    writeln!(w, "File size: {}", container.declared_len)?;
    writeln!(w, "Form type: {}", container.form)
}

pub fn write_header<W: Write>(w: &mut W, header: &ChunkHeader) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "Chunk identifier: {}", header.id)?;

    if let Some(list_type) = header.list_type {
        writeln!(w, "  List type: {}", list_type)?;
        writeln!(w, "  Size: {} ({})", header.len, header.effective_len)?;
    }
    else if header.padded_len > header.len {
        writeln!(w, "Size: {} (+{})", header.len, header.padded_len - header.len)?;
    }
    else {
        writeln!(w, "Size: {}", header.len)?;
    }

    if header.len != u64::from(header.declared_len) {
        writeln!(w, "  Declared size: 0x{:X} (size from ds64)", header.declared_len)?;
    }

    Ok(())
}

pub fn write_body<W: Write>(w: &mut W, body: &ChunkBody) -> io::Result<()> {
    match body {
        ChunkBody::Format(fmt) => write_format(w, fmt),
        ChunkBody::Bext(bext) => write_bext(w, bext),
        ChunkBody::Acid(acid) => write_acid(w, acid),
        ChunkBody::Inst(inst) => write_inst(w, inst),
        ChunkBody::Fact(fact) => writeln!(w, "Samples: {}", fact.n_frames),
        ChunkBody::Disp(disp) => write_disp(w, disp),
        ChunkBody::Levl(levl) => write_levl(w, levl),
        ChunkBody::Md5(md5) => writeln!(w, "Checksum: {}", md5.checksum()),
        ChunkBody::Info(info) => write_info(w, info),
        ChunkBody::Ds64(ds64) => write_ds64(w, ds64),
        ChunkBody::Unknown => Ok(()),
        ChunkBody::Malformed { reason } => writeln!(w, "Malformed chunk: {}", reason),
    }
}

pub fn write_termination<W: Write>(w: &mut W, termination: Termination) -> io::Result<()> {
    match termination {
        Termination::EndOfContainer | Termination::EndOfStream => Ok(()),
        Termination::RepeatedIdentifier { id, offset } => {
            writeln!(w)?;
            writeln!(w, "Stopped at repeated chunk identifier {} (offset {})", id, offset)
        }
        Termination::ContainerOverrun { id, offset } => {
            writeln!(w)?;
            writeln!(w, "Chunk {} (offset {}) runs past the end of the file size", id, offset)
        }
    }
}

fn write_format<W: Write>(w: &mut W, fmt: &WaveFormatChunk) -> io::Result<()> {
    writeln!(w, "Audio format: {}", fmt.format_tag)?;
    writeln!(w, "Channel count: {}", fmt.n_channels)?;
    writeln!(w, "Sample rate: {}", fmt.sample_rate)?;
    writeln!(w, "Byte rate: {}", fmt.avg_bytes_per_sec)?;
    writeln!(w, "Block align: {}", fmt.block_align)?;
    writeln!(w, "Bits per sample: {}", fmt.bits_per_sample)?;

    if let Some(extension_len) = fmt.extension_len {
        writeln!(w, "Extension size: {}", extension_len)?;
    }

    match &fmt.extensible {
        Some(ext) => write_format_extensible(w, ext),
        None => Ok(()),
    }
}

fn write_format_extensible<W: Write>(w: &mut W, ext: &FormatExtensible) -> io::Result<()> {
    writeln!(w, "Valid bits per sample: {}", ext.valid_bits_per_sample)?;
    writeln!(w, "Channel mask: 0x{:X}", ext.channel_mask)?;

    writeln!(w, "  Speaker layout:")?;
    for speaker in ext.speaker_layout() {
        writeln!(w, "    {}", speaker)?;
    }

    writeln!(w, "Format code: {}", ext.legacy_format_tag())?;
    writeln!(w, "GUID: {}", ext.guid_string())?;

    if let Some(pvoc_ex) = &ext.pvoc_ex {
        writeln!(w, "Version: {}", pvoc_ex.version)?;
        writeln!(w, "PVOC-EX size: {}", pvoc_ex.block_len)?;
        writeln!(w, "Word format: {}", pvoc_ex.word_format)?;
        writeln!(w, "Analysis format: {}", pvoc_ex.analysis_format)?;
        writeln!(w, "Source format: {}", pvoc_ex.source_format)?;
        writeln!(w, "Window type: {}", pvoc_ex.window_type)?;
        writeln!(w, "Bin count: {}", pvoc_ex.n_bins)?;
        writeln!(w, "Window length: {}", pvoc_ex.window_len)?;
        writeln!(w, "Overlap: {}", pvoc_ex.overlap)?;
        writeln!(w, "Frame align: {}", pvoc_ex.frame_align)?;
        writeln!(w, "Analysis rate: {:.6}", pvoc_ex.analysis_rate)?;
        writeln!(w, "Window parameter: {:.6}", pvoc_ex.window_param)?;
    }

    Ok(())
}

fn write_bext<W: Write>(w: &mut W, bext: &BextChunk) -> io::Result<()> {
    writeln!(w, "Description: {}", bext.description_text())?;
    writeln!(w, "Originator: {}", bext.originator_text())?;
    writeln!(w, "Originator reference: {}", bext.originator_reference_text())?;
    writeln!(w, "Origin date: {}", bext.origination_date_text())?;
    writeln!(w, "Origin time: {}", bext.origination_time_text())?;
    writeln!(w, "Time reference low: {}", bext.time_reference_low)?;
    writeln!(w, "Time reference high: {}", bext.time_reference_high)?;
    writeln!(w, "Version: {}", bext.version)?;
    writeln!(w, "SMPTE umid: {}", bext.umid_hex())?;
    writeln!(w, "Loudness value: {}", bext.loudness_value)?;
    writeln!(w, "Loudness range: {}", bext.loudness_range)?;
    writeln!(w, "Max true peak level: {}", bext.max_true_peak_level)?;
    writeln!(w, "Max momentary loudness: {}", bext.max_momentary_loudness)?;
    writeln!(w, "Max short term loudness: {}", bext.max_short_term_loudness)?;

    if let Some(history) = bext.coding_history_text() {
        writeln!(w, "Coding history: {}", history)?;
        for line in CODING_HISTORY_LEGEND {
            writeln!(w, "{}", line)?;
        }
    }

    Ok(())
}

fn write_acid<W: Write>(w: &mut W, acid: &AcidChunk) -> io::Result<()> {
    let flags = acid.flags();

    writeln!(w, "Properties: 0x{:x}", acid.properties)?;
    writeln!(w, "  Oneshot: {}", u8::from(flags.contains(AcidFlags::ONE_SHOT)))?;
    writeln!(w, "  Root note: {}", u8::from(flags.contains(AcidFlags::ROOT_NOTE_SET)))?;
    writeln!(w, "  Stretched: {}", u8::from(flags.contains(AcidFlags::STRETCH)))?;
    writeln!(w, "  Disk based: {}", u8::from(flags.contains(AcidFlags::DISK_BASED)))?;
    writeln!(w, "  Unknown: {}", u8::from(flags.contains(AcidFlags::UNKNOWN)))?;
    writeln!(w, "Root note: {}", acid.root_note)?;
    writeln!(w, "Unknown 1: {}", acid.unknown1)?;
    writeln!(w, "Unknown 2: {:.6}", acid.unknown2)?;
    writeln!(w, "Beat count: {}", acid.n_beats)?;
    writeln!(w, "Meter numerator: {}", acid.meter_numerator)?;
    writeln!(w, "Meter denominator: {}", acid.meter_denominator)?;
    writeln!(w, "Tempo: {:.6}", acid.tempo)
}

fn write_inst<W: Write>(w: &mut W, inst: &InstChunk) -> io::Result<()> {
    writeln!(w, "Unshifted note: {}", inst.unshifted_note)?;
    writeln!(w, "Fine-tuning: {}", inst.fine_tune)?;
    writeln!(w, "Gain: {}", inst.gain)?;
    writeln!(w, "Low note: {}", inst.low_note)?;
    writeln!(w, "High note: {}", inst.high_note)?;
    writeln!(w, "Low velocity: {}", inst.low_velocity)?;
    writeln!(w, "High velocity: {}", inst.high_velocity)
}

fn write_disp<W: Write>(w: &mut W, disp: &DispChunk) -> io::Result<()> {
    writeln!(w, "CF type: {}", disp.cf_type)?;
    writeln!(w, "CF data: {}", disp.data_text())
}

fn write_levl<W: Write>(w: &mut W, levl: &LevlChunk) -> io::Result<()> {
    writeln!(w, "Version: {}", levl.version)?;
    writeln!(w, "Format: {}", levl.format)?;
    writeln!(w, "Points per value: {}", levl.points_per_value)?;
    writeln!(w, "Block size: {}", levl.block_size)?;
    writeln!(w, "Channel count: {}", levl.n_channels)?;
    writeln!(w, "Frame count: {}", levl.n_frames)?;
    writeln!(w, "Position: {}", levl.position)?;
    writeln!(w, "Offset: {}", levl.offset)?;
    writeln!(w, "Timestamp: {}", levl.timestamp_text())?;
    writeln!(w, "Reserved: {}", levl.reserved_text())?;
    writeln!(w, "Peak envelope data: {} bytes", levl.envelope_len)
}

fn write_info<W: Write>(w: &mut W, info: &InfoList) -> io::Result<()> {
    for tag in &info.tags {
        writeln!(w, "    Tag: {}", tag.id)?;

        let padded_len = tag.value.len() as u64;
        let declared_len = u64::from(tag.declared_len);

        if padded_len > declared_len {
            writeln!(w, "    Tsize: {} (+{})", declared_len, padded_len - declared_len)?;
        }
        else {
            writeln!(w, "    Tsize: {}", declared_len)?;
        }

        writeln!(w, "    {}: {}", tag.label, tag.value_text())?;
        writeln!(w)?;
    }

    match info.end {
        InfoEnd::EndOfList => Ok(()),
        InfoEnd::RepeatedTag(id) => writeln!(w, "    Stopped at repeated tag: {}", id),
        InfoEnd::UnrecognizedTag(id) => writeln!(w, "    Stopped at unrecognized tag: {}", id),
        InfoEnd::ZeroSize(id) => writeln!(w, "    Stopped at empty tag: {}", id),
        InfoEnd::Overrun(id) => writeln!(w, "    Stopped at tag running past the list: {}", id),
    }
}

fn write_ds64<W: Write>(w: &mut W, ds64: &Ds64Chunk) -> io::Result<()> {
    writeln!(w, "RIFF size: {}", ds64.riff_len)?;
    writeln!(w, "Data size: {}", ds64.data_len)?;
    writeln!(w, "Sample count: {}", ds64.n_frames)?;
    writeln!(w, "Table length: {}", ds64.table.len())?;

    for entry in &ds64.table {
        writeln!(w, "  {}: {}", entry.chunk_id, entry.chunk_len)?;
    }

    Ok(())
}
