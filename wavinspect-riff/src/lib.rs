// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RIFF/WAVE structure inspection.
//!
//! [`ChunkWalker`] reads the container header of a RIFF, RIFX, FFIR, RF64, or BW64 stream and then
//! walks the top-level chunk list, handing every chunk payload to the decoder registered for its
//! identifier in [`chunks::WaveChunks`]. [`read_riff`] runs a whole walk and collects the result.

pub mod chunks;
mod text;
mod walker;

#[cfg(test)]
mod testutil;

pub use walker::{
    read_riff, Chunk, ChunkHeader, ChunkWalker, Container, RiffReport, Termination, WalkOptions,
};
