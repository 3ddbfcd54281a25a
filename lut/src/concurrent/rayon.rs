// dimmer/lut/src/concurrent/rayon.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An implementation of the executor using the Rayon library.

use crate::concurrent::executor::Executor;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Builds rows on the global Rayon thread pool.
pub struct RayonExecutor;

impl Executor for RayonExecutor {
    fn build_rows<T, F>(&self, row_count: usize, build_row: F) -> Vec<T>
                        where T: Send, F: Fn(usize) -> Vec<T> + Send + Sync {
        // Collecting an indexed parallel iterator preserves row order.
        let rows: Vec<Vec<T>> = (0..row_count).into_par_iter().map(build_row).collect();
        rows.into_iter().flatten().collect()
    }
}
