//! The loading sequence controller.
//!
//! Ties the preloader, the timeline and the completion notifier together.
//! The host calls [`LoadingSequence::tick`] once per frame; all state
//! changes happen inside that call, in timer order.
//!
//! ```text
//!  start() ── begin loads ── schedule preload deadline
//!     │
//!  tick() ── drain loader ──┐
//!     │                     ├── all settled / deadline ──> arm timeline (t0 + offset)
//!     └── drain due timers ─┘
//!                                 cue ... cue ── Complete ──> notifier fires once
//! ```


use serde::Serialize;

use retrovision_types::config::LoaderConfig;
use retrovision_types::error::Result;

use crate::notifier::CompletionNotifier;
use crate::phase::{Cue, CueAction, Phase, VisualFlags};
use crate::playback::Playback;
use crate::preload::{AssetLoader, Preloader};
use crate::timeline::Timeline;
use crate::timer::{Millis, TimerEvent, TimerId, TimerScope, TimerService};

/// Snapshot of the controller for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequenceState {
    pub phase: Phase,
    pub glitch_intensity: f32,
    pub scanlines_visible: bool,
    pub power_on: bool,
    pub zoom: f32,
    pub static_noise_visible: bool,
    pub loaded_asset_count: usize,
    pub total_asset_count: usize,
}

impl SequenceState {
    /// Settled fraction of the preload list; 1.0 for an empty list.
    pub fn load_ratio(&self) -> f32 {
        if self.total_asset_count == 0 {
            1.0
        } else {
            self.loaded_asset_count as f32 / self.total_asset_count as f32
        }
    }
}

/// Capabilities the controller drives.
pub struct Collaborators {
    pub timers: Box<dyn TimerService>,
    pub loader: Box<dyn AssetLoader>,
    pub playback: Box<dyn Playback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    Finished,
    TornDown,
}

/// Timed phase machine for the retro-TV loading screen.
pub struct LoadingSequence {
    timeline: Timeline,
    preload_timeout_ms: Millis,
    timers: Box<dyn TimerService>,
    loader: Box<dyn AssetLoader>,
    playback: Box<dyn Playback>,
    preloader: Preloader,
    notifier: CompletionNotifier,
    scope: TimerScope,
    deadline: Option<TimerId>,
    cue: Cue,
    started_at: Millis,
    armed: bool,
    lifecycle: Lifecycle,
}

impl LoadingSequence {
    /// Validate `config` and build an idle controller. Nothing is scheduled
    /// until [`start`](Self::start).
    pub fn new(
        config: &LoaderConfig,
        collaborators: Collaborators,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let timeline = Timeline::from_config(&config.timeline)?;
        let Collaborators {
            timers,
            loader,
            playback,
        } = collaborators;
        Ok(Self {
            timeline,
            preload_timeout_ms: config.preload_timeout_ms,
            timers,
            loader,
            playback,
            preloader: Preloader::new(&config.assets),
            notifier: CompletionNotifier::new(on_complete),
            scope: TimerScope::new(),
            deadline: None,
            cue: Cue::Preload,
            started_at: 0,
            armed: false,
            lifecycle: Lifecycle::Idle,
        })
    }

    /// Capture the start instant, begin every load and schedule the preload
    /// deadline. An empty preload list arms the timeline right away.
    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Idle {
            log::warn!("Loading sequence already started; ignoring start()");
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.started_at = self.timers.now();
        log::info!(
            "Loading sequence started: {} assets, completes at +{}ms",
            self.preloader.total(),
            self.timeline.complete_at()
        );

        self.preloader.start(self.loader.as_mut());
        let deadline = self.started_at.saturating_add(self.preload_timeout_ms);
        self.deadline = Some(self.scope.schedule_at(
            self.timers.as_mut(),
            deadline,
            TimerEvent::PreloadDeadline,
        ));

        if self.preloader.pump(self.loader.as_mut(), self.started_at) {
            log::info!("Nothing to preload; skipping straight to the timeline");
            self.arm();
        }
    }

    /// Process loader results and due timers. Returns `true` if the visible
    /// state changed.
    pub fn tick(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Running {
            return false;
        }
        let before = self.state();
        let now = self.timers.now();

        if self.preloader.pump(self.loader.as_mut(), now) {
            if self.armed {
                log::trace!("Preload finished after the timeline started; ignoring");
            } else {
                log::info!(
                    "Preload settled at +{}ms ({} failed)",
                    self.elapsed(),
                    self.preloader.failed_count()
                );
                self.arm();
            }
        }

        while self.lifecycle == Lifecycle::Running {
            let Some(fired) = self.timers.pop_due() else {
                break;
            };
            if !self.scope.release(fired.id) {
                log::trace!("Ignoring foreign timer {:?}", fired.id);
                continue;
            }
            match fired.event {
                TimerEvent::PreloadDeadline => {
                    self.deadline = None;
                    if !self.armed {
                        log::warn!(
                            "Preload still pending after {}ms ({}/{} settled); starting anyway",
                            self.preload_timeout_ms,
                            self.preloader.loaded_count(),
                            self.preloader.total()
                        );
                        self.arm();
                    }
                }
                TimerEvent::Cue(cue) => self.apply(cue),
            }
        }

        self.state() != before
    }

    /// Schedule every cue at its absolute offset from the start instant.
    fn arm(&mut self) {
        if self.armed {
            return;
        }
        self.armed = true;
        if let Some(id) = self.deadline.take() {
            self.scope.cancel(self.timers.as_mut(), id);
        }
        for entry in self.timeline.entries() {
            let at = self.started_at.saturating_add(entry.offset_ms);
            self.scope
                .schedule_at(self.timers.as_mut(), at, TimerEvent::Cue(entry.cue));
        }
        log::debug!("Timeline armed at +{}ms", self.elapsed());
    }

    fn apply(&mut self, cue: Cue) {
        if cue <= self.cue {
            log::trace!("Skipping {cue}: already at {}", self.cue);
            return;
        }
        self.cue = cue;
        log::debug!("{cue} ({}) at +{}ms", cue.phase(), self.elapsed());
        match cue.action() {
            Some(CueAction::Play(clip)) => {
                if let Err(e) = self.playback.play_from_start(clip) {
                    log::warn!("Could not start {clip}: {e}");
                }
            }
            Some(CueAction::NotifyComplete) => self.finish(),
            None => {}
        }
    }

    fn finish(&mut self) {
        self.lifecycle = Lifecycle::Finished;
        self.preloader.stop(self.loader.as_mut());
        let leftover = self.scope.cancel_all(self.timers.as_mut());
        if leftover > 0 {
            log::trace!("Cancelled {leftover} leftover timers at completion");
        }
        log::info!("Loading sequence complete at +{}ms", self.elapsed());
        self.notifier.fire();
    }

    /// Cancel every pending timer, stop listening for loads and drop the
    /// completion callback. Safe to call repeatedly; also runs on drop.
    pub fn teardown(&mut self) {
        match self.lifecycle {
            Lifecycle::TornDown => return,
            Lifecycle::Running => log::warn!(
                "Loading sequence torn down during {} at +{}ms",
                self.phase(),
                self.elapsed()
            ),
            Lifecycle::Idle | Lifecycle::Finished => {}
        }
        self.lifecycle = Lifecycle::TornDown;
        let cancelled = self.scope.cancel_all(self.timers.as_mut());
        self.deadline = None;
        self.preloader.stop(self.loader.as_mut());
        self.notifier.disarm();
        log::debug!("Loading sequence released {cancelled} pending timers");
    }

    pub fn state(&self) -> SequenceState {
        let flags = self.flags();
        SequenceState {
            phase: self.phase(),
            glitch_intensity: flags.glitch_intensity,
            scanlines_visible: flags.scanlines,
            power_on: flags.power_on,
            zoom: flags.zoom,
            static_noise_visible: flags.static_noise,
            loaded_asset_count: self.preloader.loaded_count(),
            total_asset_count: self.preloader.total(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.cue.phase()
    }

    pub fn cue(&self) -> Cue {
        self.cue
    }

    pub fn flags(&self) -> VisualFlags {
        self.cue.flags()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle != Lifecycle::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.cue == Cue::Complete
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    /// Milliseconds since [`start`](Self::start); zero before it.
    pub fn elapsed(&self) -> Millis {
        if self.lifecycle == Lifecycle::Idle {
            0
        } else {
            self.timers.now().saturating_sub(self.started_at)
        }
    }

    /// Timers this controller still owns.
    pub fn pending_timers(&self) -> usize {
        self.scope.len()
    }
}

impl Drop for LoadingSequence {
    fn drop(&mut self) {
        self.teardown();
    }
}
