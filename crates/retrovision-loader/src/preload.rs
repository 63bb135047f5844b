//! Best-effort one-shot asset preloading.
//!
//! Every asset load runs independently; the preloader only counts how many
//! have settled. A failed asset counts as settled so one bad URL can never
//! hold the sequence back. There are no retries.

use retrovision_types::config::{AssetEntry, AssetKind};

use crate::timer::Millis;

/// Index of an asset in the preload list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub usize);

/// How a single load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Failed with a loader-supplied reason.
    Failed(String),
}

impl LoadOutcome {
    /// The load ended in an error.
    pub fn is_failure(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }
}

/// A load that reached success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub asset: AssetId,
    pub outcome: LoadOutcome,
}

/// Media loader capability: load-by-URL with independent resolution.
pub trait AssetLoader {
    /// Issue a load request. Must not block.
    fn begin(&mut self, asset: AssetId, url: &str, kind: AssetKind);

    /// Loads that settled since the last poll.
    fn poll(&mut self, now: Millis) -> Vec<Settled>;

    /// Stop listening for outstanding loads. Later results are dropped.
    fn abandon(&mut self);
}

/// Counts settled loads and signals once when all of them have settled.
#[derive(Debug)]
pub struct Preloader {
    assets: Vec<AssetEntry>,
    outcomes: Vec<Option<LoadOutcome>>,
    settled: usize,
    failed: usize,
    signalled: bool,
    listening: bool,
}

impl Preloader {
    pub fn new(assets: &[AssetEntry]) -> Self {
        Self {
            assets: assets.to_vec(),
            outcomes: vec![None; assets.len()],
            settled: 0,
            failed: 0,
            signalled: false,
            listening: false,
        }
    }

    /// Issue every load request.
    pub fn start(&mut self, loader: &mut dyn AssetLoader) {
        if self.listening {
            return;
        }
        self.listening = true;
        for (idx, asset) in self.assets.iter().enumerate() {
            log::debug!("Preloading {} ({:?})", asset.url, asset.resolved_kind());
            loader.begin(AssetId(idx), &asset.url, asset.resolved_kind());
        }
    }

    /// Drain settled loads from `loader`. Returns `true` exactly once: on
    /// the pump that observes the last asset settle (or the first pump for
    /// an empty list).
    pub fn pump(&mut self, loader: &mut dyn AssetLoader, now: Millis) -> bool {
        if !self.listening {
            return false;
        }
        for settled in loader.poll(now) {
            self.record(settled);
        }
        self.take_completion()
    }

    /// Record one settled load. Duplicates and unknown ids are ignored.
    pub fn record(&mut self, settled: Settled) -> bool {
        let Some(slot) = self.outcomes.get_mut(settled.asset.0) else {
            log::trace!("Ignoring settle for unknown asset {:?}", settled.asset);
            return false;
        };
        if slot.is_some() {
            log::trace!("Ignoring duplicate settle for asset {:?}", settled.asset);
            return false;
        }
        let url = &self.assets[settled.asset.0].url;
        match &settled.outcome {
            LoadOutcome::Loaded => log::debug!("Asset ready: {url}"),
            LoadOutcome::Failed(reason) => {
                log::warn!("Asset failed to load, continuing without it: {url}: {reason}");
                self.failed += 1;
            }
        }
        *slot = Some(settled.outcome);
        self.settled += 1;
        true
    }

    /// Stop listening and tell the loader to drop outstanding requests.
    pub fn stop(&mut self, loader: &mut dyn AssetLoader) {
        if self.listening {
            self.listening = false;
            loader.abandon();
        }
    }

    fn take_completion(&mut self) -> bool {
        if !self.signalled && self.is_settled() {
            self.signalled = true;
            true
        } else {
            false
        }
    }

    /// Settled loads so far, successes and failures alike.
    pub fn loaded_count(&self) -> usize {
        self.settled
    }

    /// Settled loads that failed.
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Number of assets in the preload list.
    pub fn total(&self) -> usize {
        self.assets.len()
    }

    /// Every asset has settled.
    pub fn is_settled(&self) -> bool {
        self.settled == self.assets.len()
    }

    /// Between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Fraction settled; 1.0 for an empty list.
    pub fn ratio(&self) -> f32 {
        if self.assets.is_empty() {
            1.0
        } else {
            self.settled as f32 / self.assets.len() as f32
        }
    }

    /// How an asset settled, if it has.
    pub fn outcome(&self, asset: AssetId) -> Option<&LoadOutcome> {
        self.outcomes.get(asset.0).and_then(Option::as_ref)
    }
}
