//! Phases, cues, and the cue-to-flags table.
//!
//! A [`Phase`] is the coarse stage of the narrative shown to the viewer.
//! A [`Cue`] is one row of the timeline: every phase change plus the two
//! flag-only steps (zoom in, power off). All visual flags are derived from
//! the current cue through [`Cue::flags`]; nothing stores them separately.

use std::fmt;

use serde::Serialize;

use crate::playback::Clip;

/// Stage of the loading narrative. Ordered; the sequence only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    Preload,
    Startup,
    ClipA,
    Transition,
    ClipB,
    Shutdown,
    Complete,
}

impl Phase {
    /// Every phase in order.
    pub const ALL: [Phase; 7] = [
        Phase::Preload,
        Phase::Startup,
        Phase::ClipA,
        Phase::Transition,
        Phase::ClipB,
        Phase::Shutdown,
        Phase::Complete,
    ];

    /// Zero-based position in [`Phase::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Status line shown under the TV.
    pub fn caption(self) -> &'static str {
        match self {
            Phase::Preload => "BUFFERING...",
            Phase::Startup => "INITIALIZING...",
            Phase::ClipA => "LOADING SEQUENCE A...",
            Phase::Transition => "SWITCHING FEED...",
            Phase::ClipB => "LOADING SEQUENCE B...",
            Phase::Shutdown => "POWERING DOWN...",
            Phase::Complete => "READY",
        }
    }

    /// `Complete` is the only terminal phase.
    pub fn is_terminal(self) -> bool {
        self == Phase::Complete
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Preload => "preload",
            Phase::Startup => "startup",
            Phase::ClipA => "clip-a",
            Phase::Transition => "transition",
            Phase::ClipB => "clip-b",
            Phase::Shutdown => "shutdown",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Visual state of the TV set at one cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualFlags {
    /// Power LED lit and picture on.
    pub power_on: bool,
    /// Static noise over the screen.
    pub static_noise: bool,
    /// 0.0 = clean picture, 1.0 = full glitch.
    pub glitch_intensity: f32,
    /// Scanline overlay.
    pub scanlines: bool,
    /// Camera zoom, 1.0 = no zoom.
    pub zoom: f32,
}

/// Side effect a cue triggers when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueAction {
    /// Restart a clip from its first frame.
    Play(Clip),
    /// Fire the completion callback.
    NotifyComplete,
}

/// One step of the loading timeline. Ordered; the sequencer never applies
/// a cue at or before the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Cue {
    Preload,
    PowerOn,
    ClipA,
    Transition,
    ClipB,
    ZoomIn,
    Shutdown,
    PowerOff,
    Complete,
}

impl Cue {
    /// Cues driven by the timeline, in order. `Preload` is the initial cue
    /// and is never scheduled.
    pub const SCHEDULED: [Cue; 8] = [
        Cue::PowerOn,
        Cue::ClipA,
        Cue::Transition,
        Cue::ClipB,
        Cue::ZoomIn,
        Cue::Shutdown,
        Cue::PowerOff,
        Cue::Complete,
    ];

    /// Phase shown while this cue is current.
    pub fn phase(self) -> Phase {
        match self {
            Cue::Preload => Phase::Preload,
            Cue::PowerOn => Phase::Startup,
            Cue::ClipA => Phase::ClipA,
            Cue::Transition => Phase::Transition,
            Cue::ClipB | Cue::ZoomIn => Phase::ClipB,
            Cue::Shutdown | Cue::PowerOff => Phase::Shutdown,
            Cue::Complete => Phase::Complete,
        }
    }

    /// Whether applying this cue moves to a new phase.
    pub fn changes_phase(self) -> bool {
        !matches!(self, Cue::ZoomIn | Cue::PowerOff)
    }

    /// Side effect run once when the cue is applied.
    pub fn action(self) -> Option<CueAction> {
        match self {
            Cue::ClipA => Some(CueAction::Play(Clip::A)),
            Cue::ClipB => Some(CueAction::Play(Clip::B)),
            Cue::Complete => Some(CueAction::NotifyComplete),
            _ => None,
        }
    }

    /// The flag table. Each row holds the full state, not a delta.
    pub fn flags(self) -> VisualFlags {
        let (power_on, static_noise, glitch_intensity, scanlines, zoom) = match self {
            Cue::Preload => (false, true, 0.0, true, 1.0),
            Cue::PowerOn => (true, false, 0.8, true, 1.0),
            Cue::ClipA => (true, false, 0.3, true, 1.0),
            Cue::Transition => (true, false, 1.0, true, 1.0),
            Cue::ClipB => (true, false, 0.2, true, 1.0),
            Cue::ZoomIn => (true, false, 0.2, true, 1.2),
            Cue::Shutdown => (true, false, 0.9, false, 1.2),
            Cue::PowerOff | Cue::Complete => (false, true, 0.9, false, 1.2),
        };
        VisualFlags {
            power_on,
            static_noise,
            glitch_intensity,
            scanlines,
            zoom,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
