// wavinspect
// Copyright (c) 2024 The wavinspect Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

use crate::fourcc::FourCc;

/// `Error` provides an enumeration of all fatal errors reported by wavinspect.
///
/// Conditions that do not stop an inspection, such as unknown chunks or the repeated-identifier
/// guard, are not errors. They are reported as part of the inspection result instead.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while reading or seeking the stream.
    IoError(io::Error),
    /// The stream ended before a field could be fully read. The offset is the absolute position of
    /// the first byte of the field that could not be read.
    Truncated { offset: u64 },
    /// The master identifier is not one of the RIFF family codes.
    UnsupportedContainer(FourCc),
    /// The RIFF form type is not `WAVE`.
    UnsupportedFormType(FourCc),
    /// A chunk payload contained malformed data and could not be decoded.
    DecodeError(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::Truncated { offset } => {
                write!(f, "stream truncated at offset {}", offset)
            }
            Error::UnsupportedContainer(code) => {
                write!(f, "unsupported container: unknown master identifier {}", code)
            }
            Error::UnsupportedFormType(code) => {
                write!(f, "unsupported form type: {} is not WAVE", code)
            }
            Error::DecodeError(msg) => {
                write!(f, "malformed chunk: {}", msg)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a decode error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecodeError(desc))
}

/// Convenience function to create a truncation error at the given absolute offset.
pub fn truncated_error<T>(offset: u64) -> Result<T> {
    Err(Error::Truncated { offset })
}

/// Convenience function to create an unsupported container error.
pub fn unsupported_container_error<T>(code: FourCc) -> Result<T> {
    Err(Error::UnsupportedContainer(code))
}

/// Convenience function to create an unsupported form type error.
pub fn unsupported_form_type_error<T>(code: FourCc) -> Result<T> {
    Err(Error::UnsupportedFormType(code))
}

/// Convenience function to create an end-of-stream error.
pub fn end_of_stream_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream"))
}

/// Convenience function to create an error for a read past the end of a bounded view.
///
/// The error kind is `InvalidData`, never `UnexpectedEof`, so that an overrun chunk can be told
/// apart from a truncated stream.
pub fn out_of_bounds_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::InvalidData, "read exceeds bounds of scoped stream"))
}
