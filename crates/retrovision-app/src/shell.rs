//! Application shell: hides the main UI until the loader completes.

use std::cell::Cell;
use std::rc::Rc;

use retrovision_loader::animation::{Tween, easing};
use retrovision_loader::{Collaborators, LoadingSequence, Screen, SequenceState};
use retrovision_types::config::LoaderConfig;
use retrovision_types::error::Result;

/// Camera zoom glide between table values.
const ZOOM_GLIDE_MS: u32 = 500;
/// Fade-in of the main UI once the loader is gone.
const MAIN_FADE_MS: u32 = 1000;

/// What the shell shows this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellFrame {
    /// The loader covers the screen. `zoom` is the smoothed camera zoom.
    Loading { screen: Screen, zoom: f32 },
    /// The loader is unmounted; the main UI fades in.
    Main { opacity: f32 },
}

pub struct Shell {
    sequence: Option<LoadingSequence>,
    ready: Rc<Cell<bool>>,
    zoom: Tween,
    fade: Tween,
}

impl Shell {
    /// Build and start the loading sequence.
    pub fn new(config: &LoaderConfig, collaborators: Collaborators) -> Result<Self> {
        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);
        let mut sequence = LoadingSequence::new(config, collaborators, move || flag.set(true))?;
        sequence.start();
        Ok(Self {
            sequence: Some(sequence),
            ready,
            zoom: Tween::settled(1.0, ZOOM_GLIDE_MS, easing::ease_out_cubic),
            fade: Tween::new(0.0, 1.0, MAIN_FADE_MS, easing::linear),
        })
    }

    /// Advance one frame of `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: u32) -> ShellFrame {
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.tick();
            if !self.ready.get() {
                let screen = Screen::from_state(&sequence.state());
                self.zoom.retarget(screen.zoom);
                let zoom = self.zoom.tick(dt_ms);
                return ShellFrame::Loading { screen, zoom };
            }
            self.sequence = None;
            log::info!("Loader unmounted; revealing main UI");
            return ShellFrame::Main {
                opacity: self.fade.value(),
            };
        }
        ShellFrame::Main {
            opacity: self.fade.tick(dt_ms),
        }
    }

    /// Current loader state while it is mounted.
    pub fn state(&self) -> Option<SequenceState> {
        self.sequence.as_ref().map(LoadingSequence::state)
    }

    pub fn is_loading(&self) -> bool {
        self.sequence.is_some()
    }

    /// The loader is gone and the main UI is fully visible.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && self.fade.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use retrovision_loader::{Clock, ManualClock, NullPlayback, Phase, TimerQueue};

    use super::*;
    use crate::desktop::FsAssetLoader;

    fn shell(clock: &ManualClock) -> Shell {
        let config = LoaderConfig {
            assets: Vec::new(),
            ..LoaderConfig::default()
        };
        let collaborators = Collaborators {
            timers: Box::new(TimerQueue::new(clock.clone())),
            loader: Box::new(FsAssetLoader::new("/nonexistent")),
            playback: Box::new(NullPlayback),
        };
        Shell::new(&config, collaborators).unwrap()
    }

    fn step(shell: &mut Shell, clock: &ManualClock, dt: u32) -> ShellFrame {
        clock.advance(dt as u64);
        shell.tick(dt)
    }

    #[test]
    fn main_ui_hidden_until_complete() {
        let clock = ManualClock::new();
        let mut shell = shell(&clock);
        while clock.now() < 4990 {
            let frame = step(&mut shell, &clock, 10);
            assert!(matches!(frame, ShellFrame::Loading { .. }));
        }
        assert!(shell.is_loading());
        assert_eq!(shell.state().map(|s| s.phase), Some(Phase::Shutdown));

        let frame = step(&mut shell, &clock, 10);
        assert_eq!(frame, ShellFrame::Main { opacity: 0.0 });
        assert!(!shell.is_loading());
        assert!(shell.state().is_none());
    }

    #[test]
    fn fade_in_takes_one_second() {
        let clock = ManualClock::new();
        let mut shell = shell(&clock);
        while shell.is_loading() {
            step(&mut shell, &clock, 10);
        }
        let unmounted_at = clock.now();
        assert!(!shell.is_settled());

        let half = (0..50).map(|_| step(&mut shell, &clock, 10)).last().unwrap();
        assert_eq!(half, ShellFrame::Main { opacity: 0.5 });

        while !shell.is_settled() {
            step(&mut shell, &clock, 10);
        }
        assert_eq!(clock.now() - unmounted_at, 1000);
        assert_eq!(step(&mut shell, &clock, 10), ShellFrame::Main { opacity: 1.0 });
    }

    #[test]
    fn zoom_glides_towards_the_table_value() {
        let clock = ManualClock::new();
        let mut shell = shell(&clock);
        while clock.now() < 4000 {
            step(&mut shell, &clock, 10);
        }
        let ShellFrame::Loading { screen, zoom } = step(&mut shell, &clock, 100) else {
            panic!("loader should still be mounted");
        };
        assert_eq!(screen.zoom, 1.2);
        assert!(zoom > 1.0 && zoom < 1.2);
    }
}
