//! Foundation types for RETRO-VISION.
//!
//! Shared by the loader and the desktop app: the error type and the TOML
//! configuration describing the assets and timeline of the loading screen.

pub mod config;
pub mod error;
