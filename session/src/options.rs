// dimmer/session/src/options.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Options that control where tables go and how properties get published.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LUT1D_FILE_NAME: &str = "dim.lut1d";
const LUT3D_FILE_NAME: &str = "dim.lut3d";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    /// Directory that receives the table artifacts. Their paths are published
    /// verbatim, so this must stay stable for the life of the session.
    pub runtime_dir: PathBuf,
    /// Deadline for a single property operation.
    pub timeout: Duration,
    /// The `xprop` executable.
    pub xprop_program: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> SessionOptions {
        SessionOptions {
            runtime_dir: default_runtime_dir(),
            timeout: DEFAULT_TIMEOUT,
            xprop_program: PathBuf::from("xprop"),
        }
    }
}

impl SessionOptions {
    pub fn with_runtime_dir<P>(mut self, runtime_dir: P) -> SessionOptions where P: AsRef<Path> {
        self.runtime_dir = absolute(runtime_dir.as_ref());
        self
    }

    #[inline]
    pub fn lut1d_path(&self) -> PathBuf {
        self.runtime_dir.join(LUT1D_FILE_NAME)
    }

    #[inline]
    pub fn lut3d_path(&self) -> PathBuf {
        self.runtime_dir.join(LUT3D_FILE_NAME)
    }
}

// Picks the first of `DIMMER_RUNTIME_DIR`, decky's plugin runtime directory,
// `$XDG_RUNTIME_DIR/dimmer`, and `$TMPDIR/dimmer`.
fn default_runtime_dir() -> PathBuf {
    let dir = env::var_os("DIMMER_RUNTIME_DIR")
        .or_else(|| env::var_os("DECKY_PLUGIN_RUNTIME_DIR"))
        .map(PathBuf::from)
        .or_else(|| env::var_os("XDG_RUNTIME_DIR").map(|dir| PathBuf::from(dir).join("dimmer")))
        .unwrap_or_else(|| env::temp_dir().join("dimmer"));
    absolute(&dir)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_owned();
    }
    match env::current_dir() {
        Ok(current_dir) => current_dir.join(path),
        Err(_) => path.to_owned(),
    }
}
