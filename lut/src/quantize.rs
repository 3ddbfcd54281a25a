// dimmer/lut/src/quantize.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion from unit-interval reals to 16-bit fixed point.

/// The fixed-point value that represents full intensity.
pub const QUANTIZATION_SCALE: f64 = 65535.0;

/// Converts `x` in `[0, 1]` to `round(x × 65535)`.
///
/// Inputs outside the unit interval are a caller bug; they are caught in debug
/// builds and saturate otherwise.
#[inline]
pub fn quantize(x: f64) -> u16 {
    debug_assert!(x >= 0.0 && x <= 1.0, "quantize: {} is outside [0, 1]", x);
    (x * QUANTIZATION_SCALE).round() as u16
}
