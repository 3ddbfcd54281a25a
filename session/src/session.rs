// dimmer/session/src/session.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The display session: when tables are generated, published, and torn down.

use crate::discovery::DisplaySource;
use crate::error::SessionError;
use crate::options::SessionOptions;
use crate::property::{PropertyOperation, PropertyPublisher, PropertyType};
use crate::property::{COLOR_3DLUT_OVERRIDE, COLOR_SHAPERLUT_OVERRIDE, COMPOSITE_FORCE};
use dimmer_lut::serialization::TableSerialize;
use dimmer_lut::{Brightness, Lut1D, Lut3D};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Not activated, or unloaded.
    Uninitialized,
    /// Activated: displays are known and the 3D table is on disk, but nothing
    /// has been published.
    Ready,
    /// Compositing is forced and both tables are attached.
    Initialized,
}

/// One activation cycle's worth of display state.
///
/// Transitions either complete or leave the state untouched, so a failed call
/// can simply be retried.
pub struct DisplaySession<P> {
    publisher: P,
    options: SessionOptions,
    displays: Vec<String>,
    state: SessionState,
}

impl<P> DisplaySession<P> where P: PropertyPublisher {
    pub fn new(publisher: P, options: SessionOptions) -> DisplaySession<P> {
        DisplaySession {
            publisher,
            options,
            displays: vec![],
            state: SessionState::Uninitialized,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Initialized
    }

    #[inline]
    pub fn displays(&self) -> &[String] {
        &self.displays
    }

    #[inline]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[inline]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    #[inline]
    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Discovers the target displays and writes the full-brightness 3D table.
    ///
    /// Activating an initialized session resets it first, so that displays
    /// which are about to be forgotten don't keep stale properties.
    pub fn activate<S>(&mut self, source: &S) -> Result<(), SessionError>
                       where S: DisplaySource + ?Sized {
        info!("Activating");
        self.reset()?;

        let displays = source.list_target_displays();
        fs::create_dir_all(&self.options.runtime_dir)?;
        Lut3D::identity().write_to(&self.options.lut3d_path())?;
        info!("Found steam displays: {:?}", displays);

        self.displays = displays;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Attaches a shaper table for `brightness` to every display, preparing
    /// the displays first if this is the first request of the cycle.
    ///
    /// If preparing fails partway, the state stays `Ready` but some displays
    /// may already carry the force-composite or 3D-table properties. `reset`
    /// and `unload` only clean up an initialized session, so use `clear` to
    /// remove them.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<(), SessionError> {
        let brightness = Brightness::new(brightness)?;
        match self.state {
            SessionState::Uninitialized => return Err(SessionError::NotActivated),
            SessionState::Ready => {
                self.prepare()?;
                self.state = SessionState::Initialized;
            }
            SessionState::Initialized => {}
        }

        debug!("Setting brightness to {}", brightness);
        let lut1d_path = self.options.lut1d_path();
        Lut1D::from_brightness(brightness).write_to(&lut1d_path)?;
        let value = path_value(&lut1d_path);
        let operations: Vec<_> = self.displays.iter().map(|display| {
            PropertyOperation::set(display, COLOR_SHAPERLUT_OVERRIDE, PropertyType::String8, &value)
        }).collect();
        self.apply_all(&operations)
    }

    // Forces compositing everywhere, then attaches the 3D table everywhere.
    // Stops at the first failure without undoing earlier sets.
    fn prepare(&mut self) -> Result<(), SessionError> {
        info!("Preparing");
        let lut3d_value = path_value(&self.options.lut3d_path());
        let mut operations = vec![];
        for display in &self.displays {
            operations.push(PropertyOperation::set(display,
                                                   COMPOSITE_FORCE,
                                                   PropertyType::Cardinal8,
                                                   "1"));
        }
        for display in &self.displays {
            operations.push(PropertyOperation::set(display,
                                                   COLOR_3DLUT_OVERRIDE,
                                                   PropertyType::String8,
                                                   &lut3d_value));
        }
        self.apply_all(&operations)
    }

    /// Detaches everything from every display. Does nothing unless the session
    /// is initialized.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Initialized {
            return Ok(());
        }
        info!("Resetting");
        self.remove_properties()?;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Removes the properties from every known display whatever the state,
    /// for cleaning up after another process.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Uninitialized {
            return Err(SessionError::NotActivated);
        }
        info!("Clearing");
        self.remove_properties()?;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Ends the session, resetting it first if needed.
    pub fn unload(&mut self) -> Result<(), SessionError> {
        info!("Unloading");
        self.reset()?;
        self.displays.clear();
        self.state = SessionState::Uninitialized;
        Ok(())
    }

    /// Unloads and deletes the table artifacts.
    pub fn uninstall(&mut self) -> Result<(), SessionError> {
        info!("Uninstalling");
        self.unload()?;
        for path in &[self.options.lut1d_path(), self.options.lut3d_path()] {
            match fs::remove_file(path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(ref error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    fn remove_properties(&mut self) -> Result<(), SessionError> {
        let mut operations = vec![];
        for display in &self.displays {
            for &name in &[COMPOSITE_FORCE, COLOR_SHAPERLUT_OVERRIDE, COLOR_3DLUT_OVERRIDE] {
                operations.push(PropertyOperation::remove(display, name));
            }
        }
        self.apply_all(&operations)
    }

    // Runs the operations in order, stopping at the first failure.
    fn apply_all(&mut self, operations: &[PropertyOperation]) -> Result<(), SessionError> {
        for operation in operations {
            self.publisher.apply(operation)?;
        }
        Ok(())
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod test {
    use super::{DisplaySession, SessionState};
    use crate::discovery::StaticDisplays;
    use crate::error::SessionError;
    use crate::options::SessionOptions;
    use crate::property::{PropertyOperation, PropertyType};
    use crate::property::{COLOR_3DLUT_OVERRIDE, COLOR_SHAPERLUT_OVERRIDE, COMPOSITE_FORCE};
    use crate::testing::RecordingPublisher;
    use dimmer_lut::serialization::TableSerialize;
    use dimmer_lut::{LutError, Lut1D, Lut3D};
    use std::fs;
    use tempfile::{self, TempDir};

    fn displays(names: &[&str]) -> StaticDisplays {
        StaticDisplays(names.iter().map(|name| name.to_string()).collect())
    }

    fn new_session() -> (TempDir, DisplaySession<RecordingPublisher>) {
        let dir = tempfile::tempdir().unwrap();
        let options = SessionOptions::default().with_runtime_dir(dir.path());
        (dir, DisplaySession::new(RecordingPublisher::default(), options))
    }

    fn path_string(path: std::path::PathBuf) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_brightness_then_reset() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.publisher().operations.is_empty());

        session.set_brightness(0.5).unwrap();
        assert!(session.is_initialized());
        let lut1d_path = path_string(session.options().lut1d_path());
        let lut3d_path = path_string(session.options().lut3d_path());
        assert_eq!(session.publisher().operations, vec![
            PropertyOperation::set(":0", COMPOSITE_FORCE, PropertyType::Cardinal8, "1"),
            PropertyOperation::set(":0", COLOR_3DLUT_OVERRIDE, PropertyType::String8, &lut3d_path),
            PropertyOperation::set(":0",
                                   COLOR_SHAPERLUT_OVERRIDE,
                                   PropertyType::String8,
                                   &lut1d_path),
        ]);
        assert_eq!(fs::read(&lut3d_path).unwrap(), Lut3D::identity().to_bytes());
        assert_eq!(fs::read(&lut1d_path).unwrap(), Lut1D::generate(0.5).unwrap().to_bytes());

        session.publisher_mut().operations.clear();
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.publisher().operations, vec![
            PropertyOperation::remove(":0", COMPOSITE_FORCE),
            PropertyOperation::remove(":0", COLOR_SHAPERLUT_OVERRIDE),
            PropertyOperation::remove(":0", COLOR_3DLUT_OVERRIDE),
        ]);
    }

    #[test]
    fn test_brightness_before_activation_is_rejected() {
        let (_dir, mut session) = new_session();
        match session.set_brightness(0.5) {
            Err(SessionError::NotActivated) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.publisher().operations.is_empty());
        assert!(!session.options().lut1d_path().exists());
    }

    #[test]
    fn test_reset_without_initialization_does_nothing() {
        let (_dir, mut session) = new_session();
        session.reset().unwrap();
        session.activate(&displays(&[":0", ":1"])).unwrap();
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.publisher().operations.is_empty());
    }

    #[test]
    fn test_prepares_once_per_cycle() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        session.set_brightness(0.5).unwrap();
        session.set_brightness(0.2).unwrap();
        assert_eq!(session.publisher().count(COMPOSITE_FORCE), 1);
        assert_eq!(session.publisher().count(COLOR_3DLUT_OVERRIDE), 1);
        assert_eq!(session.publisher().count(COLOR_SHAPERLUT_OVERRIDE), 2);
        let lut1d = fs::read(session.options().lut1d_path()).unwrap();
        assert_eq!(lut1d, Lut1D::generate(0.2).unwrap().to_bytes());

        // A reset starts a new cycle.
        session.reset().unwrap();
        session.set_brightness(0.4).unwrap();
        assert_eq!(session.publisher().count(COMPOSITE_FORCE), 3);
        assert_eq!(session.publisher().count(COLOR_3DLUT_OVERRIDE), 3);
    }

    #[test]
    fn test_3d_lut_goes_to_every_display() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0", ":1"])).unwrap();
        session.set_brightness(0.7).unwrap();
        let lut3d_path = path_string(session.options().lut3d_path());
        let operations = &session.publisher().operations;
        assert_eq!(&operations[..4], &[
            PropertyOperation::set(":0", COMPOSITE_FORCE, PropertyType::Cardinal8, "1"),
            PropertyOperation::set(":1", COMPOSITE_FORCE, PropertyType::Cardinal8, "1"),
            PropertyOperation::set(":0", COLOR_3DLUT_OVERRIDE, PropertyType::String8, &lut3d_path),
            PropertyOperation::set(":1", COLOR_3DLUT_OVERRIDE, PropertyType::String8, &lut3d_path),
        ][..]);
        assert_eq!(session.publisher().count(COLOR_SHAPERLUT_OVERRIDE), 2);
    }

    #[test]
    fn test_failed_prepare_leaves_session_ready() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0", ":1"])).unwrap();
        let lut3d_path = path_string(session.options().lut3d_path());
        let failing = PropertyOperation::set(":1",
                                             COLOR_3DLUT_OVERRIDE,
                                             PropertyType::String8,
                                             &lut3d_path);
        session.publisher_mut().failing = Some(failing.clone());

        match session.set_brightness(0.5) {
            Err(SessionError::PropertyOperationFailed(failure)) => {
                assert_eq!(failure.operation, failing);
                assert_eq!(failure.detail, "exit status: 1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.publisher().count(COLOR_SHAPERLUT_OVERRIDE), 0);

        // Retrying runs the whole preparation again.
        session.publisher_mut().failing = None;
        session.set_brightness(0.5).unwrap();
        assert!(session.is_initialized());
        assert_eq!(session.publisher().count(COMPOSITE_FORCE), 4);
    }

    #[test]
    fn test_clear_cleans_up_after_failed_prepare() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0", ":1"])).unwrap();
        session.publisher_mut().failing =
            Some(PropertyOperation::set(":1", COMPOSITE_FORCE, PropertyType::Cardinal8, "1"));
        assert!(session.set_brightness(0.5).is_err());
        session.publisher_mut().failing = None;

        // ":0" is already forced to composite, but the session is not initialized.
        let sets = session.publisher().operations.len();
        session.reset().unwrap();
        assert_eq!(session.publisher().operations.len(), sets);

        session.clear().unwrap();
        let removes = &session.publisher().operations[sets..];
        assert!(removes.contains(&PropertyOperation::remove(":0", COMPOSITE_FORCE)));
        assert!(removes.contains(&PropertyOperation::remove(":0", COLOR_3DLUT_OVERRIDE)));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_invalid_brightness_changes_nothing() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        for &brightness in &[-0.1, 1.1] {
            match session.set_brightness(brightness) {
                Err(SessionError::Lut(LutError::InvalidParameter(_))) => {}
                other => panic!("unexpected result: {:?}", other),
            }
        }
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.publisher().operations.is_empty());
        assert!(!session.options().lut1d_path().exists());
    }

    #[test]
    fn test_failed_reset_can_be_retried() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        session.set_brightness(0.5).unwrap();
        session.publisher_mut().failing =
            Some(PropertyOperation::remove(":0", COLOR_SHAPERLUT_OVERRIDE));

        assert!(session.reset().is_err());
        assert_eq!(session.state(), SessionState::Initialized);

        session.publisher_mut().failing = None;
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_unload_resets_only_when_initialized() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        session.unload().unwrap();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.publisher().operations.is_empty());

        session.activate(&displays(&[":0"])).unwrap();
        session.set_brightness(0.3).unwrap();
        session.publisher_mut().operations.clear();
        session.unload().unwrap();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.publisher().operations.len(), 3);
        assert!(session.displays().is_empty());
    }

    #[test]
    fn test_uninstall_removes_artifacts() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        session.set_brightness(0.3).unwrap();
        assert!(session.options().lut1d_path().exists());

        session.uninstall().unwrap();
        assert!(!session.options().lut1d_path().exists());
        assert!(!session.options().lut3d_path().exists());
        assert_eq!(session.publisher().count(COMPOSITE_FORCE), 2);

        // Nothing left to delete.
        session.uninstall().unwrap();
    }

    #[test]
    fn test_activation_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("file");
        fs::write(&not_a_dir, b"").unwrap();
        let options = SessionOptions::default().with_runtime_dir(&not_a_dir);
        let mut session = DisplaySession::new(RecordingPublisher::default(), options);

        match session.activate(&displays(&[":0"])) {
            Err(SessionError::Lut(LutError::Io(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn test_reactivation_resets_old_displays() {
        let (_dir, mut session) = new_session();
        session.activate(&displays(&[":0"])).unwrap();
        session.set_brightness(0.5).unwrap();
        session.publisher_mut().operations.clear();

        session.activate(&displays(&[":1"])).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.displays(), &[":1".to_owned()][..]);
        assert!(session.publisher().operations.iter().all(|operation| {
            operation.display() == ":0" && match *operation {
                PropertyOperation::Remove { .. } => true,
                _ => false,
            }
        }));
        assert_eq!(session.publisher().operations.len(), 3);
    }

    #[test]
    fn test_clear_ignores_state() {
        let (_dir, mut session) = new_session();
        match session.clear() {
            Err(SessionError::NotActivated) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        session.activate(&displays(&[":0"])).unwrap();
        session.clear().unwrap();
        assert_eq!(session.publisher().operations.len(), 3);
        assert_eq!(session.state(), SessionState::Ready);
    }
}
