// dimmer/lut/src/lut1d.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The 1D shaper table: a brightness ramp applied equally to every channel.

use crate::brightness::Brightness;
use crate::concurrent::executor::{Executor, SequentialExecutor};
use crate::error::LutError;
use crate::record::TableRecord;
use crate::serialization;
use std::io::Read;

/// Number of records in a shaper table.
pub const LUT1D_SIZE: usize = 4096;

// Records computed per executor task.
const ROW_LENGTH: usize = 256;

/// A shaper table of exactly `LUT1D_SIZE` records.
///
/// Record `i` maps input level `i / 4095` to `quantize(i / 4095 × brightness)`
/// on all three channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Lut1D {
    records: Vec<TableRecord>,
}

impl Lut1D {
    /// Builds the table for `brightness`, failing with `InvalidParameter` if it
    /// is outside `[0, 1]`.
    pub fn generate(brightness: f64) -> Result<Lut1D, LutError> {
        Ok(Lut1D::from_brightness(Brightness::new(brightness)?))
    }

    #[inline]
    pub fn from_brightness(brightness: Brightness) -> Lut1D {
        Lut1D::build(brightness, &SequentialExecutor)
    }

    pub fn build<E>(brightness: Brightness, executor: &E) -> Lut1D where E: Executor {
        debug!("building 1D LUT at brightness {}", brightness);
        let records = executor.build_rows(LUT1D_SIZE / ROW_LENGTH, |row| {
            let start = row * ROW_LENGTH;
            (start..(start + ROW_LENGTH)).map(|index| {
                let unit = brightness.scale_level(index, LUT1D_SIZE);
                TableRecord::from_unit(unit, unit, unit)
            }).collect()
        });
        debug_assert_eq!(records.len(), LUT1D_SIZE);
        Lut1D { records }
    }

    /// Parses a serialized shaper table, checking its length.
    pub fn read_from<R>(reader: &mut R) -> Result<Lut1D, LutError> where R: Read {
        let records = serialization::read_records(reader, LUT1D_SIZE)?;
        Ok(Lut1D { records })
    }

    #[inline]
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }
}
