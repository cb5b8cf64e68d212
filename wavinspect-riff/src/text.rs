// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text helpers for fixed-width byte fields.

/// Decode a fixed-width text field. The field ends at the first NUL byte, or at the end of the
/// buffer if there is none. Invalid UTF-8 is replaced.
pub(crate) fn fixed_text(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Decode a free-form text field, dropping every NUL byte wherever it appears.
pub(crate) fn text_without_nuls(buf: &[u8]) -> String {
    let bytes: Vec<u8> = buf.iter().copied().filter(|&b| b != 0).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Render bytes as contiguous uppercase hex.
pub(crate) fn hex_string(buf: &[u8]) -> String {
    buf.iter().map(|b| format!("{:02X}", b)).collect()
}

#[cfg(feature = "serde")]
pub(crate) mod ser {
    use serde::Serializer;

    pub fn fixed_text<T: AsRef<[u8]>, S: Serializer>(buf: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::fixed_text(buf.as_ref()))
    }

    pub fn hex<T: AsRef<[u8]>, S: Serializer>(buf: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::hex_string(buf.as_ref()))
    }

    pub fn optional_history<S: Serializer>(
        buf: &Option<Box<[u8]>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match buf {
            Some(buf) => s.serialize_some(&super::text_without_nuls(buf)),
            None => s.serialize_none(),
        }
    }
}
