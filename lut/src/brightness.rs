// dimmer/lut/src/brightness.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::LutError;
use std::fmt::{self, Display, Formatter};

/// A brightness factor in `[0, 1]`.
///
/// Out-of-range values are rejected at construction, never clamped.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Brightness(f64);

impl Brightness {
    pub const FULL: Brightness = Brightness(1.0);

    pub fn new(value: f64) -> Result<Brightness, LutError> {
        // NaN fails both comparisons.
        if value >= 0.0 && value <= 1.0 {
            Ok(Brightness(value))
        } else {
            error!("Invalid brightness {}", value);
            Err(LutError::InvalidParameter(value))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Scales the `index`-th of `size` evenly spaced levels by this brightness.
    #[inline]
    pub(crate) fn scale_level(self, index: usize, size: usize) -> f64 {
        index as f64 / (size - 1) as f64 * self.0
    }
}

impl Display for Brightness {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
