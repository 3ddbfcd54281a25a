// dimmer/lut/src/concurrent/executor.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An abstraction over how table rows get computed.

/// Computes rows of a table, possibly in parallel.
///
/// Whatever the scheduling, the rows are concatenated in index order: table
/// consumers address records by position.
pub trait Executor {
    fn build_rows<T, F>(&self, row_count: usize, build_row: F) -> Vec<T>
                        where T: Send, F: Fn(usize) -> Vec<T> + Send + Sync;
}

/// Builds every row on the calling thread.
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn build_rows<T, F>(&self, row_count: usize, build_row: F) -> Vec<T>
                        where T: Send, F: Fn(usize) -> Vec<T> + Send + Sync {
        let mut table = vec![];
        for row_index in 0..row_count {
            table.extend(build_row(row_index));
        }
        table
    }
}
