// dimmer/session/src/property.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Root-window properties that gamescope reads.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Forces gamescope to composite instead of scanning out directly, so that the
/// color tables apply.
pub const COMPOSITE_FORCE: &str = "GAMESCOPE_COMPOSITE_FORCE";
/// Path of the 3D color table.
pub const COLOR_3DLUT_OVERRIDE: &str = "GAMESCOPE_COLOR_3DLUT_OVERRIDE";
/// Path of the 1D shaper table.
pub const COLOR_SHAPERLUT_OVERRIDE: &str = "GAMESCOPE_COLOR_SHAPERLUT_OVERRIDE";

/// The X property format of a published value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyType {
    /// `8c`: 8-bit cardinal, used for flags.
    Cardinal8,
    /// `8u`: 8-bit string, used for paths.
    String8,
}

impl PropertyType {
    pub fn tag(self) -> &'static str {
        match self {
            PropertyType::Cardinal8 => "8c",
            PropertyType::String8 => "8u",
        }
    }
}

/// A property operation against one display.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyOperation {
    Set {
        display: String,
        name: String,
        kind: PropertyType,
        value: String,
    },
    Remove {
        display: String,
        name: String,
    },
}

impl PropertyOperation {
    pub fn set(display: &str, name: &str, kind: PropertyType, value: &str) -> PropertyOperation {
        PropertyOperation::Set {
            display: display.to_owned(),
            name: name.to_owned(),
            kind,
            value: value.to_owned(),
        }
    }

    pub fn remove(display: &str, name: &str) -> PropertyOperation {
        PropertyOperation::Remove { display: display.to_owned(), name: name.to_owned() }
    }

    pub fn display(&self) -> &str {
        match *self {
            PropertyOperation::Set { ref display, .. } |
            PropertyOperation::Remove { ref display, .. } => display,
        }
    }

    pub fn name(&self) -> &str {
        match *self {
            PropertyOperation::Set { ref name, .. } |
            PropertyOperation::Remove { ref name, .. } => name,
        }
    }
}

impl Display for PropertyOperation {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match *self {
            PropertyOperation::Set { ref display, ref name, kind, ref value } => {
                write!(formatter, "set {}({})={:?} on {}", name, kind.tag(), value, display)
            }
            PropertyOperation::Remove { ref display, ref name } => {
                write!(formatter, "remove {} on {}", name, display)
            }
        }
    }
}

/// A property operation that did not complete, with whatever the backend
/// reported about it.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyFailure {
    pub operation: PropertyOperation,
    pub detail: String,
}

impl Display for PropertyFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "failed to {}: {}", self.operation, self.detail)
    }
}

impl Error for PropertyFailure {}

/// Sets and removes properties on a display's root window.
///
/// Every call must have completed, successfully or not, by the time it returns.
pub trait PropertyPublisher {
    fn set_property(&mut self, display: &str, name: &str, kind: PropertyType, value: &str)
                    -> Result<(), PropertyFailure>;

    fn remove_property(&mut self, display: &str, name: &str) -> Result<(), PropertyFailure>;

    fn apply(&mut self, operation: &PropertyOperation) -> Result<(), PropertyFailure> {
        match *operation {
            PropertyOperation::Set { ref display, ref name, kind, ref value } => {
                self.set_property(display, name, kind, value)
            }
            PropertyOperation::Remove { ref display, ref name } => {
                self.remove_property(display, name)
            }
        }
    }
}

impl<'a, P> PropertyPublisher for &'a mut P where P: PropertyPublisher + ?Sized {
    #[inline]
    fn set_property(&mut self, display: &str, name: &str, kind: PropertyType, value: &str)
                    -> Result<(), PropertyFailure> {
        (**self).set_property(display, name, kind, value)
    }

    #[inline]
    fn remove_property(&mut self, display: &str, name: &str) -> Result<(), PropertyFailure> {
        (**self).remove_property(display, name)
    }
}

/// Logs operations instead of performing them.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunPublisher;

impl PropertyPublisher for DryRunPublisher {
    fn set_property(&mut self, display: &str, name: &str, kind: PropertyType, value: &str)
                    -> Result<(), PropertyFailure> {
        info!("(dry run) {}", PropertyOperation::set(display, name, kind, value));
        Ok(())
    }

    fn remove_property(&mut self, display: &str, name: &str) -> Result<(), PropertyFailure> {
        info!("(dry run) {}", PropertyOperation::remove(display, name));
        Ok(())
    }
}
