//! Error types for RETRO-VISION.

use std::io;

/// Errors produced by the RETRO-VISION crates.
#[derive(Debug, thiserror::Error)]
pub enum RetroError {
    #[error("config error: {0}")]
    Config(String),

    #[error("timeline error: {0}")]
    Timeline(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("playback error: {0}")]
    Playback(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RetroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = RetroError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn timeline_error_display() {
        let e = RetroError::Timeline("zoom_ms before clip_b_ms".into());
        assert_eq!(format!("{e}"), "timeline error: zoom_ms before clip_b_ms");
    }

    #[test]
    fn asset_error_display() {
        let e = RetroError::Asset("404".into());
        assert_eq!(format!("{e}"), "asset error: 404");
    }

    #[test]
    fn playback_error_display() {
        let e = RetroError::Playback("decoder busy".into());
        assert_eq!(format!("{e}"), "playback error: decoder busy");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: RetroError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: RetroError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: RetroError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(RetroError::Asset("oops".into()));
        assert!(r.is_err());
    }
}
