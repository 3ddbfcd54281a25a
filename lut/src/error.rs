// dimmer/lut/src/error.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// Errors that can occur when building, writing, or reading a table.
#[derive(Debug)]
pub enum LutError {
    /// The brightness was outside `[0, 1]`. No table was produced.
    InvalidParameter(f64),
    /// The table artifact could not be written or read.
    Io(io::Error),
    /// A serialized table held the wrong number of bytes.
    UnexpectedSize {
        expected: usize,
        actual: usize,
    },
}

impl Display for LutError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match *self {
            LutError::InvalidParameter(value) => {
                write!(formatter, "brightness must be between 0 and 1, got {}", value)
            }
            LutError::Io(ref error) => write!(formatter, "table I/O failed: {}", error),
            LutError::UnexpectedSize { expected, actual } => {
                write!(formatter, "expected a {}-byte table, found {} bytes", expected, actual)
            }
        }
    }
}

impl Error for LutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            LutError::Io(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for LutError {
    #[inline]
    fn from(error: io::Error) -> LutError {
        LutError::Io(error)
    }
}
