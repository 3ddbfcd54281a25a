// dimmer/lut/src/lib.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lookup tables that gamescope reads to dim the screen.
//!
//! Two kinds of table are built here: a 1D shaper table that scales every
//! channel by a brightness factor, and a 17×17×17 3D color table. Both are
//! stored as packed little-endian `(u16 R, u16 G, u16 B, u16 pad)` records.

#[macro_use]
extern crate log;

pub mod brightness;
pub mod concurrent;
pub mod error;
pub mod lut1d;
pub mod lut3d;
pub mod quantize;
pub mod record;
pub mod serialization;

pub use crate::brightness::Brightness;
pub use crate::error::LutError;
pub use crate::lut1d::Lut1D;
pub use crate::lut3d::Lut3D;
pub use crate::record::TableRecord;
