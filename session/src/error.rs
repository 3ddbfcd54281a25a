// dimmer/session/src/error.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors.

use crate::property::PropertyFailure;
use dimmer_lut::LutError;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// An error that aborted a session transition. The session state is left as
/// it was before the transition began.
#[derive(Debug)]
pub enum SessionError {
    /// A brightness change was requested before the session was activated.
    NotActivated,
    /// A table could not be generated or written.
    Lut(LutError),
    /// A display rejected a property operation.
    PropertyOperationFailed(PropertyFailure),
    /// The thread that owned the session has gone away.
    Disconnected,
}

impl Display for SessionError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match *self {
            SessionError::NotActivated => write!(formatter, "the session has not been activated"),
            SessionError::Lut(ref error) => write!(formatter, "{}", error),
            SessionError::PropertyOperationFailed(ref failure) => write!(formatter, "{}", failure),
            SessionError::Disconnected => write!(formatter, "the session thread has exited"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            SessionError::Lut(ref error) => Some(error),
            SessionError::PropertyOperationFailed(ref failure) => Some(failure),
            SessionError::NotActivated | SessionError::Disconnected => None,
        }
    }
}

impl From<LutError> for SessionError {
    #[inline]
    fn from(error: LutError) -> SessionError {
        SessionError::Lut(error)
    }
}

impl From<io::Error> for SessionError {
    #[inline]
    fn from(error: io::Error) -> SessionError {
        SessionError::Lut(LutError::Io(error))
    }
}

impl From<PropertyFailure> for SessionError {
    #[inline]
    fn from(failure: PropertyFailure) -> SessionError {
        SessionError::PropertyOperationFailed(failure)
    }
}
