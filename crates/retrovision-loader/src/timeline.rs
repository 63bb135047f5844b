//! The fixed cue schedule.
//!
//! Offsets are absolute from the sequence start, so a host that resumes
//! late sees the skipped cues fire back-to-back instead of drifting.

use retrovision_types::config::TimelineConfig;
use retrovision_types::error::Result;

use crate::phase::Cue;
use crate::timer::{Millis, TimerEvent};

/// One scheduled cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Milliseconds after the sequence start.
    pub offset_ms: Millis,
    pub cue: Cue,
}

/// Cues with their offsets, in firing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Build from configuration. Offsets must be non-decreasing in cue
    /// order.
    pub fn from_config(config: &TimelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &TimelineConfig) -> Self {
        let mut entries: Vec<TimelineEntry> = Cue::SCHEDULED
            .iter()
            .zip(config.named_offsets())
            .map(|(&cue, (_, offset_ms))| TimelineEntry { offset_ms, cue })
            .collect();
        entries.sort_by_key(|e| (e.offset_ms, TimerEvent::Cue(e.cue).rank(), e.cue));
        Self { entries }
    }

    /// Every scheduled cue, sorted by firing order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Offset of a scheduled cue. `Preload` sits at zero.
    pub fn offset_of(&self, cue: Cue) -> Millis {
        self.entries
            .iter()
            .find(|e| e.cue == cue)
            .map_or(0, |e| e.offset_ms)
    }

    /// When the sequence completes.
    pub fn complete_at(&self) -> Millis {
        self.offset_of(Cue::Complete)
    }

    /// The cue a sequence armed at zero should show after `elapsed`
    /// milliseconds. Entries rejected by the monotonic guard are skipped.
    pub fn cue_at(&self, elapsed: Millis) -> Cue {
        self.entries
            .iter()
            .take_while(|e| e.offset_ms <= elapsed)
            .fold(Cue::Preload, |current, e| current.max(e.cue))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::build(&TimelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    #[test]
    fn default_matches_stock_offsets() {
        let t = Timeline::default();
        let offsets: Vec<_> = t.entries().iter().map(|e| e.offset_ms).collect();
        assert_eq!(offsets, vec![200, 500, 2500, 3000, 4000, 4500, 4800, 5000]);
        assert_eq!(t.complete_at(), 5000);
        assert_eq!(t, Timeline::from_config(&TimelineConfig::default()).unwrap());
    }

    #[test]
    fn cue_at_walks_the_table() {
        let t = Timeline::default();
        assert_eq!(t.cue_at(0), Cue::Preload);
        assert_eq!(t.cue_at(199), Cue::Preload);
        assert_eq!(t.cue_at(200), Cue::PowerOn);
        assert_eq!(t.cue_at(500).phase(), Phase::ClipA);
        assert_eq!(t.cue_at(2999).phase(), Phase::Transition);
        assert_eq!(t.cue_at(3000).phase(), Phase::ClipB);
        assert_eq!(t.cue_at(4000), Cue::ZoomIn);
        assert_eq!(t.cue_at(4799), Cue::Shutdown);
        assert_eq!(t.cue_at(4800), Cue::PowerOff);
        assert_eq!(t.cue_at(5000), Cue::Complete);
        assert_eq!(t.cue_at(u64::MAX), Cue::Complete);
    }

    #[test]
    fn ties_put_phase_changes_first() {
        let config = TimelineConfig {
            zoom_ms: 4500,
            ..TimelineConfig::default()
        };
        let t = Timeline::from_config(&config).unwrap();
        let at_4500: Vec<_> = t
            .entries()
            .iter()
            .filter(|e| e.offset_ms == 4500)
            .map(|e| e.cue)
            .collect();
        assert_eq!(at_4500, vec![Cue::Shutdown, Cue::ZoomIn]);
        assert_eq!(t.cue_at(4500), Cue::Shutdown);
    }

    #[test]
    fn rejects_out_of_order_config() {
        let config = TimelineConfig {
            clip_a_ms: 100,
            ..TimelineConfig::default()
        };
        assert!(Timeline::from_config(&config).is_err());
    }

    #[test]
    fn offset_of_preload_is_zero() {
        assert_eq!(Timeline::default().offset_of(Cue::Preload), 0);
        assert_eq!(Timeline::default().offset_of(Cue::ZoomIn), 4000);
    }
}
