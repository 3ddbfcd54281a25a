// dimmer/session/src/xprop.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Publishes properties by running `xprop` against the display's root window.

use crate::options::SessionOptions;
use crate::property::{PropertyFailure, PropertyOperation, PropertyPublisher, PropertyType};
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct XpropPublisher {
    program: PathBuf,
    timeout: Duration,
}

impl XpropPublisher {
    pub fn new(options: &SessionOptions) -> XpropPublisher {
        XpropPublisher { program: options.xprop_program.clone(), timeout: options.timeout }
    }

    fn run(&self, operation: PropertyOperation, args: Vec<OsString>)
           -> Result<(), PropertyFailure> {
        debug!("{}", operation);
        let arg_list: Vec<_> = args.iter().map(|arg| arg.to_string_lossy()).collect();
        let command_line = format!("{} {}", self.program.display(), arg_list.join(" "));
        let output = match self.run_with_deadline(&args) {
            Ok(output) => output,
            Err(detail) => {
                error!("Failed to run xprop, cmd: {}", command_line);
                error!("{}", detail);
                return Err(PropertyFailure { operation, detail });
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("Failed to {}, cmd: {}", operation, command_line);
        error!("stdout: {}", stdout);
        error!("stderr: {}", stderr);
        Err(PropertyFailure {
            operation,
            detail: format!("{}; stdout: {:?}; stderr: {:?}", output.status, stdout, stderr),
        })
    }

    // Waits for the child until the deadline, then kills it. The pipes are
    // drained on their own threads so a chatty child can't fill them and stall.
    fn run_with_deadline(&self, args: &[OsString]) -> Result<Output, String> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| format!("could not start {}: {}", self.program.display(), error))?;

        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    warn!("xprop did not finish within {:?}, killing it", self.timeout);
                    drop(child.kill());
                    drop(child.wait());
                    return Err(format!("timed out after {:?}", self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(error) => return Err(format!("could not wait for xprop: {}", error)),
            }
        };

        Ok(Output { status, stdout: collect(stdout_reader)?, stderr: collect(stderr_reader)? })
    }
}

fn drain<R>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> where R: Read + Send + 'static {
    thread::spawn(move || {
        let mut bytes = vec![];
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, String> {
    match reader.map(JoinHandle::join) {
        None => Ok(vec![]),
        Some(Ok(Ok(bytes))) => Ok(bytes),
        Some(Ok(Err(error))) => Err(format!("could not read xprop output: {}", error)),
        Some(Err(_)) => Err("the xprop output reader panicked".to_owned()),
    }
}

impl PropertyPublisher for XpropPublisher {
    fn set_property(&mut self, display: &str, name: &str, kind: PropertyType, value: &str)
                    -> Result<(), PropertyFailure> {
        let args = ["-root", "-d", display, "-f", name, kind.tag(), "-set", name, value];
        self.run(PropertyOperation::set(display, name, kind, value),
                 args.iter().map(OsString::from).collect())
    }

    fn remove_property(&mut self, display: &str, name: &str) -> Result<(), PropertyFailure> {
        let args = ["-root", "-d", display, "-remove", name];
        self.run(PropertyOperation::remove(display, name),
                 args.iter().map(OsString::from).collect())
    }
}
