// dimmer/lut/src/lut3d.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The 3D color table.
//!
//! Gamescope expects blue to be the slowest-varying axis and red the fastest,
//! so the record for lattice point `(r, g, b)` lives at `b·17² + g·17 + r`.
//! A table with the axes swapped has the same size and still parses; only its
//! colors are wrong.

use crate::brightness::Brightness;
use crate::concurrent::executor::{Executor, SequentialExecutor};
use crate::error::LutError;
use crate::record::TableRecord;
use crate::serialization;
use std::io::Read;

/// Number of lattice points along each axis.
pub const LUT3D_AXIS_SIZE: usize = 17;
/// Total number of records in a 3D table.
pub const LUT3D_SIZE: usize = LUT3D_AXIS_SIZE * LUT3D_AXIS_SIZE * LUT3D_AXIS_SIZE;

#[derive(Clone, Debug, PartialEq)]
pub struct Lut3D {
    records: Vec<TableRecord>,
}

impl Lut3D {
    /// Builds the table for `brightness`, failing with `InvalidParameter` if it
    /// is outside `[0, 1]`.
    pub fn generate(brightness: f64) -> Result<Lut3D, LutError> {
        Ok(Lut3D::from_brightness(Brightness::new(brightness)?))
    }

    /// The color identity table that the session attaches once per activation.
    #[inline]
    pub fn identity() -> Lut3D {
        Lut3D::from_brightness(Brightness::FULL)
    }

    #[inline]
    pub fn from_brightness(brightness: Brightness) -> Lut3D {
        Lut3D::build(brightness, &SequentialExecutor)
    }

    /// Builds one blue plane per executor task.
    pub fn build<E>(brightness: Brightness, executor: &E) -> Lut3D where E: Executor {
        debug!("building 3D LUT at brightness {}", brightness);
        let records = executor.build_rows(LUT3D_AXIS_SIZE, |b| {
            let mut plane = Vec::with_capacity(LUT3D_AXIS_SIZE * LUT3D_AXIS_SIZE);
            let blue = brightness.scale_level(b, LUT3D_AXIS_SIZE);
            for g in 0..LUT3D_AXIS_SIZE {
                let green = brightness.scale_level(g, LUT3D_AXIS_SIZE);
                for r in 0..LUT3D_AXIS_SIZE {
                    let red = brightness.scale_level(r, LUT3D_AXIS_SIZE);
                    plane.push(TableRecord::from_unit(red, green, blue));
                }
            }
            plane
        });
        debug_assert_eq!(records.len(), LUT3D_SIZE);
        Lut3D { records }
    }

    /// Parses a serialized 3D table, checking its length.
    pub fn read_from<R>(reader: &mut R) -> Result<Lut3D, LutError> where R: Read {
        let records = serialization::read_records(reader, LUT3D_SIZE)?;
        Ok(Lut3D { records })
    }

    #[inline]
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    /// Returns the record for lattice point `(r, g, b)`.
    #[inline]
    pub fn get(&self, r: usize, g: usize, b: usize) -> TableRecord {
        self.records[(b * LUT3D_AXIS_SIZE + g) * LUT3D_AXIS_SIZE + r]
    }
}
