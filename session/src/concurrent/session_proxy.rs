// dimmer/session/src/concurrent/session_proxy.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A version of `Dimmer` that proxies all method calls out to a separate
//! thread.
//!
//! Every call waits for the worker's reply, so lifecycle transitions never
//! overlap even when the proxy is shared between callers.

use crate::dimmer::Dimmer;
use crate::discovery::DisplaySource;
use crate::error::SessionError;
use crate::property::PropertyPublisher;
use crate::session::{DisplaySession, SessionState};
use crossbeam_channel::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const MAX_MESSAGES_IN_FLIGHT: usize = 16;

type Reply<T> = Sender<Result<T, SessionError>>;

pub struct SessionProxy {
    sender: Sender<MainToWorkerMsg>,
    thread: Option<JoinHandle<()>>,
}

impl SessionProxy {
    /// Moves `session` onto a new worker thread.
    pub fn new<P>(session: DisplaySession<P>) -> SessionProxy
                  where P: PropertyPublisher + Send + 'static {
        let (main_to_worker_sender, main_to_worker_receiver) =
            crossbeam_channel::bounded(MAX_MESSAGES_IN_FLIGHT);
        let dimmer = Dimmer::new(session);
        let thread = thread::spawn(move || session_thread(dimmer, main_to_worker_receiver));
        SessionProxy { sender: main_to_worker_sender, thread: Some(thread) }
    }

    /// Activates the session and returns the displays it found.
    pub fn activate<S>(&self, source: S) -> Result<Vec<String>, SessionError>
                       where S: DisplaySource + Send + 'static {
        self.call(|reply| MainToWorkerMsg::Activate(Box::new(source), reply))
    }

    pub fn set_brightness(&self, brightness: f64) -> Result<(), SessionError> {
        self.call(|reply| MainToWorkerMsg::SetBrightness(brightness, reply))
    }

    pub fn set_level(&self, level: f64) -> Result<(), SessionError> {
        self.call(|reply| MainToWorkerMsg::SetLevel(level, reply))
    }

    /// Steps the dimmer level up and returns the new level.
    pub fn brighten(&self) -> Result<f64, SessionError> {
        self.call(|reply| MainToWorkerMsg::Step(Step::Brighten, reply))
    }

    /// Steps the dimmer level down and returns the new level.
    pub fn darken(&self) -> Result<f64, SessionError> {
        self.call(|reply| MainToWorkerMsg::Step(Step::Darken, reply))
    }

    pub fn reset(&self) -> Result<(), SessionError> {
        self.call(MainToWorkerMsg::Reset)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.call(MainToWorkerMsg::Clear)
    }

    pub fn uninstall(&self) -> Result<(), SessionError> {
        self.call(MainToWorkerMsg::Uninstall)
    }

    #[inline]
    pub fn state(&self) -> Result<SessionState, SessionError> {
        self.call(MainToWorkerMsg::State)
    }

    /// Unloads the session and waits for the worker thread to exit.
    pub fn shutdown(mut self) -> Result<(), SessionError> {
        let result = self.call(MainToWorkerMsg::Unload);
        self.stop();
        result
    }

    fn call<T, F>(&self, message: F) -> Result<T, SessionError>
                  where F: FnOnce(Reply<T>) -> MainToWorkerMsg {
        let (reply_sender, reply_receiver) = crossbeam_channel::bounded(1);
        self.sender.send(message(reply_sender)).map_err(|_| SessionError::Disconnected)?;
        reply_receiver.recv().map_err(|_| SessionError::Disconnected)?
    }

    fn stop(&mut self) {
        // Swapping in a dead sender closes the channel and ends the worker loop.
        let (dead_sender, _) = crossbeam_channel::bounded(0);
        drop(std::mem::replace(&mut self.sender, dead_sender));
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("The session thread panicked");
            }
        }
    }
}

impl Drop for SessionProxy {
    fn drop(&mut self) {
        self.stop();
    }
}

fn session_thread<P>(mut dimmer: Dimmer<P>, main_to_worker_receiver: Receiver<MainToWorkerMsg>)
                     where P: PropertyPublisher {
    while let Ok(msg) = main_to_worker_receiver.recv() {
        // A caller that gave up on its reply is not an error.
        match msg {
            MainToWorkerMsg::Activate(source, reply) => {
                let result = dimmer.session_mut().activate(&*source);
                drop(reply.send(result.map(|()| dimmer.session().displays().to_vec())));
            }
            MainToWorkerMsg::SetBrightness(brightness, reply) => {
                drop(reply.send(dimmer.set_brightness(brightness)))
            }
            MainToWorkerMsg::SetLevel(level, reply) => drop(reply.send(dimmer.set_level(level))),
            MainToWorkerMsg::Step(step, reply) => {
                let result = match step {
                    Step::Brighten => dimmer.brighten(),
                    Step::Darken => dimmer.darken(),
                };
                drop(reply.send(result.map(|()| dimmer.level())));
            }
            MainToWorkerMsg::Reset(reply) => drop(reply.send(dimmer.reset())),
            MainToWorkerMsg::Clear(reply) => drop(reply.send(dimmer.clear())),
            MainToWorkerMsg::Unload(reply) => drop(reply.send(dimmer.unload())),
            MainToWorkerMsg::Uninstall(reply) => {
                drop(reply.send(dimmer.uninstall()))
            }
            MainToWorkerMsg::State(reply) => drop(reply.send(Ok(dimmer.session().state()))),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Brighten,
    Darken,
}

enum MainToWorkerMsg {
    Activate(Box<dyn DisplaySource + Send>, Reply<Vec<String>>),
    SetBrightness(f64, Reply<()>),
    SetLevel(f64, Reply<()>),
    Step(Step, Reply<f64>),
    Reset(Reply<()>),
    Clear(Reply<()>),
    Unload(Reply<()>),
    Uninstall(Reply<()>),
    State(Reply<SessionState>),
}
