//! Loading sequence controller for the RETRO-VISION loading screen.
//!
//! The controller preloads a fixed set of media assets, then walks a fixed
//! timeline (power on, clip A, glitch transition, clip B, power off) and
//! invokes a one-shot completion callback. It is single-threaded and
//! cooperative: the host calls [`LoadingSequence::tick`] once per frame and
//! every collaborator (timers, asset loading, clip playback) is injected.

pub mod animation;
pub mod notifier;
pub mod phase;
pub mod playback;
pub mod preload;
pub mod present;
pub mod sequence;
pub mod timeline;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use phase::{Cue, Phase, VisualFlags};
pub use playback::{Clip, NullPlayback, Playback};
pub use preload::{AssetId, AssetLoader, LoadOutcome, Settled};
pub use present::Screen;
pub use sequence::{Collaborators, LoadingSequence, SequenceState};
pub use timer::{Clock, ManualClock, Millis, SystemClock, TimerQueue, TimerService};
