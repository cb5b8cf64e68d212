// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Speaker positions of the `WAVEFORMATEXTENSIBLE` channel mask.

use bitflags::bitflags;

bitflags! {
    /// A bitmask representing the speaker positions of an extensible format chunk.
    ///
    /// The positions are identical to the first 16 positions of the channel mask in Microsoft's
    /// `WAVEFORMATEXTENSIBLE` structure. The remaining bits have no assigned speaker.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct SpeakerMask: u32 {
        const FRONT_LEFT            = 1 << 0;
        const FRONT_RIGHT           = 1 << 1;
        const FRONT_CENTER          = 1 << 2;
        const LOW_FREQUENCY         = 1 << 3;
        const BACK_LEFT             = 1 << 4;
        const BACK_RIGHT            = 1 << 5;
        const FRONT_LEFT_OF_CENTER  = 1 << 6;
        const FRONT_RIGHT_OF_CENTER = 1 << 7;
        const BACK_CENTER           = 1 << 8;
        const SIDE_LEFT             = 1 << 9;
        const SIDE_RIGHT            = 1 << 10;
        const TOP_CENTER            = 1 << 11;
        const TOP_FRONT_LEFT        = 1 << 12;
        const TOP_FRONT_RIGHT       = 1 << 13;
        const TOP_BACK_LEFT         = 1 << 14;
        const TOP_BACK_RIGHT        = 1 << 15;
    }
}

/// Human readable speaker names, in bit-ascending order.
const SPEAKER_NAMES: [(SpeakerMask, &str); 16] = [
    (SpeakerMask::FRONT_LEFT, "Front Left"),
    (SpeakerMask::FRONT_RIGHT, "Front Right"),
    (SpeakerMask::FRONT_CENTER, "Front Center"),
    (SpeakerMask::LOW_FREQUENCY, "Low Frequency"),
    (SpeakerMask::BACK_LEFT, "Back Left"),
    (SpeakerMask::BACK_RIGHT, "Back Right"),
    (SpeakerMask::FRONT_LEFT_OF_CENTER, "Front Left of Center"),
    (SpeakerMask::FRONT_RIGHT_OF_CENTER, "Front Right of Center"),
    (SpeakerMask::BACK_CENTER, "Back Center"),
    (SpeakerMask::SIDE_LEFT, "Side Left"),
    (SpeakerMask::SIDE_RIGHT, "Side Right"),
    (SpeakerMask::TOP_CENTER, "Top Center"),
    (SpeakerMask::TOP_FRONT_LEFT, "Top Front Left"),
    (SpeakerMask::TOP_FRONT_RIGHT, "Top Front Right"),
    (SpeakerMask::TOP_BACK_LEFT, "Top Back Left"),
    (SpeakerMask::TOP_BACK_RIGHT, "Top Back Right"),
];

impl SpeakerMask {
    /// Get the ordered list of named speaker positions present in the mask.
    pub fn layout(&self) -> Vec<&'static str> {
        SPEAKER_NAMES
            .iter()
            .filter(|(position, _)| self.contains(*position))
            .map(|&(_, name)| name)
            .collect()
    }
}

/// Decode a raw channel mask into the ordered list of named speaker positions it describes. Bits
/// with no assigned speaker are ignored.
pub fn speaker_layout(channel_mask: u32) -> Vec<&'static str> {
    SpeakerMask::from_bits_truncate(channel_mask).layout()
}
