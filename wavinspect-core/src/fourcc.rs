// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// A four character code identifying a RIFF container, form, chunk, list type, or INFO tag.
///
/// The bytes are kept in the order they appear in the stream. Four character codes are never byte
/// swapped, regardless of the byte order of the container.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
#[repr(transparent)]
pub struct FourCc {
    val: [u8; 4],
}

impl FourCc {
    /// Construct a new FourCC code from the given byte array.
    pub const fn new(val: [u8; 4]) -> Self {
        Self { val }
    }

    /// Get the raw bytes of the code.
    pub const fn get(&self) -> [u8; 4] {
        self.val
    }
}

impl PartialEq<[u8; 4]> for FourCc {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.val == other
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Non-printable bytes are shown as '.', so that garbage identifiers still line up.
        for &byte in self.val.iter() {
            let c = if byte.is_ascii_graphic() || byte == b' ' { byte as char } else { '.' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.val) {
            Ok(name) => f.write_str(name),
            _ => write!(f, "{:x?}", self.val),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FourCc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::FourCc;

    #[test]
    fn verify_fourcc_display() {
        assert_eq!(FourCc::new(*b"fmt ").to_string(), "fmt ");
        assert_eq!(FourCc::new([b'a', 0, 0xff, b'z']).to_string(), "a..z");
        assert_eq!(format!("{:?}", FourCc::new(*b"LIST")), "LIST");
    }

    #[test]
    fn verify_fourcc_comparison() {
        assert!(FourCc::new(*b"WAVE") == *b"WAVE");
        assert!(FourCc::new(*b"WAVE") != *b"wave");
    }
}
