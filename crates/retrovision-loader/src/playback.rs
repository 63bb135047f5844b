//! Playback-control capability for the two clips.

use std::fmt;

use serde::Serialize;

use retrovision_types::error::Result;

/// One of the two clips shown on the TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Clip {
    A,
    B,
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clip::A => write!(f, "clip A"),
            Clip::B => write!(f, "clip B"),
        }
    }
}

/// Starts clip playback on behalf of the sequencer.
///
/// Errors are logged by the caller and never stop the sequence.
pub trait Playback {
    /// Rewind `clip` and start playing it.
    fn play_from_start(&mut self, clip: Clip) -> Result<()>;
}

/// Playback sink that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlayback;

impl Playback for NullPlayback {
    fn play_from_start(&mut self, _clip: Clip) -> Result<()> {
        Ok(())
    }
}
