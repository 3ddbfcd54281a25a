// dimmer/session/src/testing.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An in-memory property publisher for tests.

use crate::property::{PropertyFailure, PropertyOperation, PropertyPublisher, PropertyType};

#[derive(Debug, Default)]
pub struct RecordingPublisher {
    /// Operations that succeeded, in the order they were issued.
    pub operations: Vec<PropertyOperation>,
    /// Every operation matching this one fails.
    pub failing: Option<PropertyOperation>,
}

impl RecordingPublisher {
    pub fn count(&self, name: &str) -> usize {
        self.operations.iter().filter(|operation| operation.name() == name).count()
    }

    fn record(&mut self, operation: PropertyOperation) -> Result<(), PropertyFailure> {
        if self.failing.as_ref() == Some(&operation) {
            return Err(PropertyFailure { operation, detail: "exit status: 1".to_owned() });
        }
        self.operations.push(operation);
        Ok(())
    }
}

impl PropertyPublisher for RecordingPublisher {
    fn set_property(&mut self, display: &str, name: &str, kind: PropertyType, value: &str)
                    -> Result<(), PropertyFailure> {
        self.record(PropertyOperation::set(display, name, kind, value))
    }

    fn remove_property(&mut self, display: &str, name: &str) -> Result<(), PropertyFailure> {
        self.record(PropertyOperation::remove(display, name))
    }
}
