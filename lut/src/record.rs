// dimmer/lut/src/record.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::quantize::quantize;

/// One table entry: quantized red, green, and blue plus a zero pad channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TableRecord {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub pad: u16,
}

impl TableRecord {
    /// Size of one serialized record in bytes.
    pub const SIZE: usize = 8;

    #[inline]
    pub fn new(r: u16, g: u16, b: u16) -> TableRecord {
        TableRecord { r, g, b, pad: 0 }
    }

    #[inline]
    pub fn gray(value: u16) -> TableRecord {
        TableRecord::new(value, value, value)
    }

    /// Quantizes three unit-interval channels.
    #[inline]
    pub fn from_unit(r: f64, g: f64, b: f64) -> TableRecord {
        TableRecord::new(quantize(r), quantize(g), quantize(b))
    }
}
