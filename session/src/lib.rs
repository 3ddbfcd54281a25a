// dimmer/session/src/lib.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attaches dimming lookup tables to gamescope displays.
//!
//! A `DisplaySession` generates the tables from `dimmer_lut`, writes them to
//! the runtime directory, and publishes their paths as root-window properties
//! on every display that steam's gamescope owns.

#[macro_use]
extern crate log;

pub mod concurrent;
pub mod dimmer;
pub mod discovery;
pub mod error;
pub mod options;
pub mod property;
pub mod session;
pub mod xprop;

#[cfg(test)]
mod testing;

pub use crate::dimmer::Dimmer;
pub use crate::error::SessionError;
pub use crate::options::SessionOptions;
pub use crate::session::{DisplaySession, SessionState};
