//! Shared test doubles for the loader crate.
//!
//! Each double keeps its state behind an `Rc` so a test can hand one clone
//! to the controller and inspect the other.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use retrovision_types::config::AssetKind;
use retrovision_types::error::{Result, RetroError};

use crate::playback::{Clip, Playback};
use crate::preload::{AssetId, AssetLoader, LoadOutcome, Settled};
use crate::timer::Millis;

#[derive(Debug, Default)]
struct ScriptState {
    /// url -> (settle time, outcome). Unscripted urls never settle.
    script: HashMap<String, (Millis, LoadOutcome)>,
    pending: Vec<(AssetId, Millis, LoadOutcome)>,
    requests: Vec<(String, AssetKind)>,
    abandon_calls: usize,
}

/// Asset loader whose loads settle at scripted times.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLoader {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `url` loads successfully at `at`.
    pub fn resolve(self, url: &str, at: Millis) -> Self {
        self.script(url, at, LoadOutcome::Loaded)
    }

    /// `url` fails at `at`.
    pub fn reject(self, url: &str, at: Millis, reason: &str) -> Self {
        self.script(url, at, LoadOutcome::Failed(reason.to_string()))
    }

    fn script(self, url: &str, at: Millis, outcome: LoadOutcome) -> Self {
        self.state
            .borrow_mut()
            .script
            .insert(url.to_string(), (at, outcome));
        self
    }

    pub fn requests(&self) -> Vec<(String, AssetKind)> {
        self.state.borrow().requests.clone()
    }

    pub fn abandon_calls(&self) -> usize {
        self.state.borrow().abandon_calls
    }

    /// Loads begun but not yet delivered.
    pub fn outstanding(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

impl AssetLoader for ScriptedLoader {
    fn begin(&mut self, asset: AssetId, url: &str, kind: AssetKind) {
        let mut state = self.state.borrow_mut();
        state.requests.push((url.to_string(), kind));
        if let Some((at, outcome)) = state.script.get(url).cloned() {
            state.pending.push((asset, at, outcome));
        }
    }

    fn poll(&mut self, now: Millis) -> Vec<Settled> {
        let mut state = self.state.borrow_mut();
        let (due, rest): (Vec<_>, Vec<_>) = state
            .pending
            .drain(..)
            .partition(|(_, at, _)| *at <= now);
        state.pending = rest;
        due.into_iter()
            .map(|(asset, _, outcome)| Settled { asset, outcome })
            .collect()
    }

    fn abandon(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pending.clear();
        state.abandon_calls += 1;
    }
}

/// Playback sink that records every clip it is asked to start.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayback {
    played: Rc<RefCell<Vec<Clip>>>,
    fail: bool,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records requests and then reports an error for each.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<Clip> {
        self.played.borrow().clone()
    }
}

impl Playback for RecordingPlayback {
    fn play_from_start(&mut self, clip: Clip) -> Result<()> {
        self.played.borrow_mut().push(clip);
        if self.fail {
            Err(RetroError::Playback(format!("{clip} cannot start")))
        } else {
            Ok(())
        }
    }
}

/// Counts completion callback invocations.
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter {
    count: Rc<Cell<u32>>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that bumps the counter.
    pub fn callback(&self) -> impl FnOnce() + 'static {
        let count = Rc::clone(&self.count);
        move || count.set(count.get() + 1)
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }
}
