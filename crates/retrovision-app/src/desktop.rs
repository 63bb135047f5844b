//! Desktop collaborators: filesystem asset loader and logging playback.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use retrovision_loader::{AssetId, AssetLoader, Clip, LoadOutcome, Millis, Playback, Settled};
use retrovision_types::config::{AssetKind, LoaderConfig};
use retrovision_types::error::{Result, RetroError};

// ---------------------------------------------------------------------------
// Filesystem loader
// ---------------------------------------------------------------------------

/// Loads assets from a directory, one worker thread per asset.
///
/// Workers report through a channel that the main thread drains in
/// [`poll`](AssetLoader::poll). Abandoning drops the receiving end, so late
/// workers finish into the void.
pub struct FsAssetLoader {
    root: PathBuf,
    tx: Sender<Settled>,
    rx: Option<Receiver<Settled>>,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx: Some(rx),
        }
    }

    /// Map a site-absolute URL (`/clip.mp4`) onto the asset root.
    pub fn resolve(&self, url: &str) -> Result<PathBuf> {
        if url.contains("://") {
            return Err(RetroError::Asset(format!("remote asset not supported: {url}")));
        }
        let relative = url.trim_start_matches('/');
        if relative.split('/').any(|seg| seg == "..") {
            return Err(RetroError::Asset(format!("asset escapes root: {url}")));
        }
        Ok(self.root.join(relative))
    }

    fn settle_now(&self, asset: AssetId, outcome: LoadOutcome) {
        let _ = self.tx.send(Settled { asset, outcome });
    }
}

fn read_asset(path: &Path, kind: AssetKind) -> LoadOutcome {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_file() => LoadOutcome::Failed("not a file".into()),
        Ok(meta) if meta.len() == 0 => LoadOutcome::Failed("file is empty".into()),
        Ok(meta) => {
            log::debug!("Found {:?} {} ({} bytes)", kind, path.display(), meta.len());
            LoadOutcome::Loaded
        }
        Err(e) => LoadOutcome::Failed(e.to_string()),
    }
}

impl AssetLoader for FsAssetLoader {
    fn begin(&mut self, asset: AssetId, url: &str, kind: AssetKind) {
        let path = match self.resolve(url) {
            Ok(path) => path,
            Err(e) => {
                self.settle_now(asset, LoadOutcome::Failed(e.to_string()));
                return;
            }
        };
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("preload-{}", asset.0))
            .spawn(move || {
                let outcome = read_asset(&path, kind);
                let _ = tx.send(Settled { asset, outcome });
            });
        if let Err(e) = spawned {
            self.settle_now(asset, LoadOutcome::Failed(format!("worker spawn failed: {e}")));
        }
    }

    fn poll(&mut self, _now: Millis) -> Vec<Settled> {
        match &self.rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    fn abandon(&mut self) {
        if self.rx.take().is_some() {
            log::debug!("Asset loader stopped listening");
        }
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Playback sink that logs which clip starts. The terminal has no video
/// surface; the renderer shows the active clip instead.
#[derive(Debug, Clone)]
pub struct LogPlayback {
    clip_a: String,
    clip_b: String,
}

impl LogPlayback {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            clip_a: config.clip_a.clone(),
            clip_b: config.clip_b.clone(),
        }
    }
}

impl Playback for LogPlayback {
    fn play_from_start(&mut self, clip: Clip) -> Result<()> {
        let url = match clip {
            Clip::A => &self.clip_a,
            Clip::B => &self.clip_b,
        };
        log::info!("Playing {clip} from start: {url}");
        Ok(())
    }
}
