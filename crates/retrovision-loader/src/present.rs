//! Render-ready description of the TV for one [`SequenceState`].
//!
//! Pure mapping: no timing, no randomness. A renderer draws exactly what a
//! [`Screen`] says and never inspects the phase itself.

use serde::Serialize;

use crate::phase::Phase;
use crate::playback::Clip;
use crate::sequence::SequenceState;

/// Glitch level above which the heavy effects kick in.
pub const HEAVY_GLITCH: f32 = 0.5;

/// Number of digital-noise blocks drawn during heavy glitch.
pub const NOISE_BLOCKS: u32 = 8;

/// Tube brightness when the set is off.
const TUBE_OFF_BRIGHTNESS: f32 = 0.1;

/// Power indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Led {
    Green,
    Red,
}

/// The clip currently on the tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipLayer {
    pub clip: Clip,
    pub opacity: f32,
    pub contrast: f32,
    pub saturation: f32,
    /// Extra brightness multiplier applied to the clip alone.
    pub brightness: f32,
    pub hue_shift: bool,
}

/// Effect layers drawn above the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Overlays {
    pub static_noise: bool,
    pub startup_flash: bool,
    pub glitch: bool,
    /// Number of noise blocks; zero when off.
    pub noise_blocks: u32,
    pub scanlines: bool,
    pub shutdown_collapse: bool,
}

/// Everything the renderer needs for one frame of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Screen {
    pub caption: &'static str,
    pub clip: Option<ClipLayer>,
    pub overlays: Overlays,
    pub led: Led,
    /// Tube brightness, 1.0 when powered.
    pub brightness: f32,
    pub glitch_intensity: f32,
    pub zoom: f32,
    /// Whole-loader opacity; drops to zero once ready.
    pub opacity: f32,
    /// Progress bar fill in `[0, 1]`.
    pub progress: f32,
}

impl Screen {
    pub fn from_state(state: &SequenceState) -> Self {
        let phase = state.phase;
        let heavy = state.glitch_intensity > HEAVY_GLITCH;
        Self {
            caption: phase.caption(),
            clip: clip_layer(phase, heavy),
            overlays: Overlays {
                static_noise: state.static_noise_visible,
                startup_flash: phase == Phase::Startup,
                glitch: state.glitch_intensity > 0.0,
                noise_blocks: if heavy { NOISE_BLOCKS } else { 0 },
                scanlines: state.scanlines_visible && state.power_on,
                shutdown_collapse: phase == Phase::Shutdown,
            },
            led: if state.power_on { Led::Green } else { Led::Red },
            brightness: if state.power_on {
                1.0
            } else {
                TUBE_OFF_BRIGHTNESS
            },
            glitch_intensity: state.glitch_intensity,
            zoom: state.zoom,
            opacity: if phase.is_terminal() { 0.0 } else { 1.0 },
            progress: progress(state),
        }
    }
}

fn clip_layer(phase: Phase, heavy_glitch: bool) -> Option<ClipLayer> {
    match phase {
        Phase::ClipA | Phase::Transition => Some(ClipLayer {
            clip: Clip::A,
            opacity: if phase == Phase::ClipA { 1.0 } else { 0.0 },
            contrast: 1.2,
            saturation: 1.1,
            brightness: 1.0,
            hue_shift: heavy_glitch,
        }),
        Phase::ClipB | Phase::Shutdown => Some(ClipLayer {
            clip: Clip::B,
            opacity: if phase == Phase::ClipB { 1.0 } else { 0.6 },
            contrast: 1.3,
            saturation: 1.2,
            brightness: if phase == Phase::Shutdown { 0.3 } else { 1.0 },
            hue_shift: false,
        }),
        _ => None,
    }
}

/// Preload fills the first sixth by load ratio; each later phase adds one.
fn progress(state: &SequenceState) -> f32 {
    let steps = (Phase::ALL.len() - 1) as f32;
    match state.phase {
        Phase::Preload => state.load_ratio() / steps,
        phase => phase.index() as f32 / steps,
    }
}
