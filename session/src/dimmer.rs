// dimmer/session/src/dimmer.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A user-facing dimmer level on top of a display session.
//!
//! Level 1.0 means "off": rather than publishing an identity shaper table, the
//! dimmer resets the session so gamescope stops forcing composition.

use crate::error::SessionError;
use crate::property::PropertyPublisher;
use crate::session::DisplaySession;
use dimmer_lut::LutError;

/// Number of `brighten()` steps from fully dark to off.
pub const STEPS_PER_UNIT: f64 = 20.0;

pub struct Dimmer<P> {
    session: DisplaySession<P>,
    level: f64,
}

impl<P> Dimmer<P> where P: PropertyPublisher {
    pub fn new(session: DisplaySession<P>) -> Dimmer<P> {
        Dimmer { session, level: 1.0 }
    }

    /// The last level that was applied successfully.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    #[inline]
    pub fn session(&self) -> &DisplaySession<P> {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut DisplaySession<P> {
        &mut self.session
    }

    #[inline]
    pub fn into_session(self) -> DisplaySession<P> {
        self.session
    }

    /// Clamps `level` to `[0, 1]` and applies it.
    pub fn set_level(&mut self, level: f64) -> Result<(), SessionError> {
        if level.is_nan() {
            return Err(LutError::InvalidParameter(level).into());
        }
        let level = level.max(0.0).min(1.0);
        info!("Setting dimmer brightness to {}", level);
        if level == 1.0 {
            self.session.reset()?;
        } else {
            self.session.set_brightness(level)?;
        }
        self.level = level;
        Ok(())
    }

    /// Applies `brightness` exactly, without clamping or the "1.0 means off"
    /// rule, and makes it the level the next step starts from.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<(), SessionError> {
        self.session.set_brightness(brightness)?;
        self.level = brightness;
        Ok(())
    }

    /// Resets the session. The dimmer is off afterwards.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.session.reset()?;
        self.level = 1.0;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session.clear()?;
        self.level = 1.0;
        Ok(())
    }

    pub fn unload(&mut self) -> Result<(), SessionError> {
        self.session.unload()?;
        self.level = 1.0;
        Ok(())
    }

    pub fn uninstall(&mut self) -> Result<(), SessionError> {
        self.session.uninstall()?;
        self.level = 1.0;
        Ok(())
    }

    pub fn brighten(&mut self) -> Result<(), SessionError> {
        let level = self.stepped(1.0);
        self.set_level(level)
    }

    pub fn darken(&mut self) -> Result<(), SessionError> {
        let level = self.stepped(-1.0);
        self.set_level(level)
    }

    // Steps along multiples of 1/20 so that repeated steps land exactly on 1.0.
    fn stepped(&self, direction: f64) -> f64 {
        ((self.level * STEPS_PER_UNIT).round() + direction) / STEPS_PER_UNIT
    }
}
