//! Loading-screen configuration (`retrovision.toml`).
//!
//! Every field has a default, so an empty document yields the stock
//! two-clip sequence. The timeline offsets are tuned to the bundled clips
//! and are fixed once a sequence is built from them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetroError};

/// Media category of a preloaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Image,
}

impl AssetKind {
    /// Guess the kind from the extension of a URL or path.
    ///
    /// Query strings and fragments are ignored. Returns `None` for
    /// unrecognised extensions.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let file = path.rsplit('/').next().unwrap_or("");
        let (_, ext) = file.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "mp4" | "webm" | "mov" | "ogv" | "m4v" => Some(AssetKind::Video),
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "avif" | "bmp" => Some(AssetKind::Image),
            _ => None,
        }
    }
}

/// One entry of the preload list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub url: String,
    /// Explicit kind; inferred from the URL when absent.
    #[serde(default)]
    pub kind: Option<AssetKind>,
}

impl AssetEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: None,
        }
    }

    /// Declared kind, falling back to the URL extension, then to video.
    pub fn resolved_kind(&self) -> AssetKind {
        self.kind
            .or_else(|| AssetKind::from_url(&self.url))
            .unwrap_or(AssetKind::Video)
    }
}

/// Absolute offsets (milliseconds from sequence start) of each cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub power_on_ms: u64,
    pub clip_a_ms: u64,
    pub transition_ms: u64,
    pub clip_b_ms: u64,
    pub zoom_ms: u64,
    pub shutdown_ms: u64,
    pub power_off_ms: u64,
    pub complete_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            power_on_ms: 200,
            clip_a_ms: 500,
            transition_ms: 2500,
            clip_b_ms: 3000,
            zoom_ms: 4000,
            shutdown_ms: 4500,
            power_off_ms: 4800,
            complete_ms: 5000,
        }
    }
}

impl TimelineConfig {
    /// Offsets paired with their field names, in cue order.
    pub fn named_offsets(&self) -> [(&'static str, u64); 8] {
        [
            ("power_on_ms", self.power_on_ms),
            ("clip_a_ms", self.clip_a_ms),
            ("transition_ms", self.transition_ms),
            ("clip_b_ms", self.clip_b_ms),
            ("zoom_ms", self.zoom_ms),
            ("shutdown_ms", self.shutdown_ms),
            ("power_off_ms", self.power_off_ms),
            ("complete_ms", self.complete_ms),
        ]
    }

    /// Offsets must be non-decreasing in cue order and end after zero.
    pub fn validate(&self) -> Result<()> {
        let offsets = self.named_offsets();
        for pair in offsets.windows(2) {
            let (prev_name, prev) = pair[0];
            let (name, at) = pair[1];
            if at < prev {
                return Err(RetroError::Timeline(format!(
                    "{name} ({at}) is earlier than {prev_name} ({prev})"
                )));
            }
        }
        if self.complete_ms == 0 {
            return Err(RetroError::Timeline("complete_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Top-level loader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Assets to preload before the sequence starts.
    pub assets: Vec<AssetEntry>,
    /// URL played during the first clip phase.
    pub clip_a: String,
    /// URL played during the second clip phase.
    pub clip_b: String,
    /// Start the sequence anyway once this much time has passed.
    pub preload_timeout_ms: u64,
    pub timeline: TimelineConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let clip_a = "/fantasy1.mp4".to_string();
        let clip_b = "/cynamatic1.mp4".to_string();
        Self {
            assets: vec![AssetEntry::new(&clip_a), AssetEntry::new(&clip_b)],
            clip_a,
            clip_b,
            preload_timeout_ms: 1500,
            timeline: TimelineConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: LoaderConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        log::info!(
            "Loaded loader config from {} ({} assets)",
            path.display(),
            config.assets.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.timeline.validate()?;
        if self.preload_timeout_ms > self.timeline.complete_ms {
            return Err(RetroError::Config(format!(
                "preload_timeout_ms ({}) exceeds complete_ms ({})",
                self.preload_timeout_ms, self.timeline.complete_ms
            )));
        }
        if let Some(pos) = self.assets.iter().position(|a| a.url.trim().is_empty()) {
            return Err(RetroError::Config(format!("asset #{pos} has an empty url")));
        }
        Ok(())
    }
}
