// dimmer/session/src/discovery.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Finding the X displays that gamescope serves to steam.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lists the displays a session should target.
///
/// Discovery is best effort: sources skip whatever they can't inspect and
/// return what they found.
pub trait DisplaySource {
    fn list_target_displays(&self) -> Vec<String>;
}

impl<S> DisplaySource for Box<S> where S: DisplaySource + ?Sized {
    #[inline]
    fn list_target_displays(&self) -> Vec<String> {
        (**self).list_target_displays()
    }
}

/// A fixed list of displays.
#[derive(Clone, Debug, Default)]
pub struct StaticDisplays(pub Vec<String>);

impl DisplaySource for StaticDisplays {
    fn list_target_displays(&self) -> Vec<String> {
        let mut displays = vec![];
        for display in &self.0 {
            push_unique(&mut displays, display.clone());
        }
        displays
    }
}

/// Collects `DISPLAY` from the environment of every running steam process.
#[derive(Clone, Debug)]
pub struct SteamDisplaySource {
    proc_root: PathBuf,
}

impl Default for SteamDisplaySource {
    fn default() -> SteamDisplaySource {
        SteamDisplaySource::new("/proc")
    }
}

impl SteamDisplaySource {
    pub fn new<P>(proc_root: P) -> SteamDisplaySource where P: Into<PathBuf> {
        SteamDisplaySource { proc_root: proc_root.into() }
    }

    fn inspect_process(&self, process_dir: &Path, displays: &mut Vec<String>) -> io::Result<()> {
        let cmdline = fs::read(process_dir.join("cmdline"))?;
        let program = cmdline.split(|&byte| byte == 0).next().unwrap_or(&[]);
        if !program.ends_with(b"steam") {
            return Ok(());
        }
        debug!("Found steam process: {}", process_dir.display());

        let environ = fs::read(process_dir.join("environ"))?;
        for variable in environ.split(|&byte| byte == 0) {
            if !variable.starts_with(b"DISPLAY=") {
                continue;
            }
            let display = String::from_utf8_lossy(&variable[b"DISPLAY=".len()..]).into_owned();
            debug!("Found steam display: {}", display);
            push_unique(displays, display);
        }
        Ok(())
    }
}

impl DisplaySource for SteamDisplaySource {
    fn list_target_displays(&self) -> Vec<String> {
        let mut displays = vec![];
        let entries = match fs::read_dir(&self.proc_root) {
            Ok(entries) => entries,
            Err(error) => {
                warn!("Could not list {}: {}", self.proc_root.display(), error);
                return displays;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let is_pid = entry.file_name()
                              .to_str()
                              .map_or(false, |name| name.bytes().all(|byte| byte.is_ascii_digit()));
            if !is_pid {
                continue;
            }
            // Processes exit and permissions vary; skip whatever we can't read.
            if let Err(error) = self.inspect_process(&entry.path(), &mut displays) {
                debug!("Skipping {}: {}", entry.path().display(), error);
            }
        }
        displays
    }
}

fn push_unique(displays: &mut Vec<String>, display: String) {
    if !displays.contains(&display) {
        displays.push(display);
    }
}

#[cfg(test)]
mod test {
    use super::{DisplaySource, StaticDisplays, SteamDisplaySource};
    use std::fs;
    use std::path::Path;
    use tempfile;

    fn add_process(proc_root: &Path, pid: &str, cmdline: &[u8], environ: Option<&str>) {
        let dir = proc_root.join(pid);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("cmdline"), cmdline).unwrap();
        if let Some(environ) = environ {
            fs::write(dir.join("environ"), environ).unwrap();
        }
    }

    #[test]
    fn test_finds_steam_displays() {
        let proc_root = tempfile::tempdir().unwrap();
        add_process(proc_root.path(), "100", b"/usr/bin/steam\0-gamepadui\0",
                    Some("HOME=/home/deck\0DISPLAY=:0\0"));
        add_process(proc_root.path(), "200", b"/home/deck/.steam/ubuntu12_32/steam\0",
                    Some("DISPLAY=:1\0LANG=C\0"));
        add_process(proc_root.path(), "300", b"/usr/bin/steamwebhelper\0",
                    Some("DISPLAY=:5\0"));
        add_process(proc_root.path(), "400", b"steam\0", Some("DISPLAY=:0\0"));

        let mut displays = SteamDisplaySource::new(proc_root.path()).list_target_displays();
        displays.sort();
        assert_eq!(displays, vec![":0".to_owned(), ":1".to_owned()]);
    }

    #[test]
    fn test_skips_unreadable_processes() {
        let proc_root = tempfile::tempdir().unwrap();
        // No `environ`: reading it fails and the process is skipped.
        add_process(proc_root.path(), "10", b"/usr/bin/steam\0", None);
        add_process(proc_root.path(), "11", b"/usr/bin/steam\0", Some("DISPLAY=:2\0"));
        fs::create_dir(proc_root.path().join("12")).unwrap();
        fs::create_dir(proc_root.path().join("self")).unwrap();

        let displays = SteamDisplaySource::new(proc_root.path()).list_target_displays();
        assert_eq!(displays, vec![":2".to_owned()]);
    }

    #[test]
    fn test_missing_proc_root_finds_nothing() {
        let proc_root = tempfile::tempdir().unwrap();
        let source = SteamDisplaySource::new(proc_root.path().join("gone"));
        assert!(source.list_target_displays().is_empty());
    }

    #[test]
    fn test_static_displays_deduplicate() {
        let source = StaticDisplays(vec![":1".to_owned(), ":0".to_owned(), ":1".to_owned()]);
        assert_eq!(source.list_target_displays(), vec![":1".to_owned(), ":0".to_owned()]);
    }
}
