//! Terminal rendering of shell frames.

use retrovision_loader::present::{Led, Screen};
use retrovision_loader::{Clip, SequenceState};
use retrovision_types::error::Result;

use crate::shell::ShellFrame;

const BAR_WIDTH: usize = 24;

/// Fixed-width progress bar, e.g. `[######..................]`.
fn bar(fill: f32) -> String {
    let filled = ((fill.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn effects(screen: &Screen) -> String {
    let o = &screen.overlays;
    let mut fx = Vec::new();
    if o.static_noise {
        fx.push("static");
    }
    if o.startup_flash {
        fx.push("flash");
    }
    if o.glitch {
        fx.push("glitch");
    }
    if o.noise_blocks > 0 {
        fx.push("noise");
    }
    if o.scanlines {
        fx.push("scanlines");
    }
    if o.shutdown_collapse {
        fx.push("collapse");
    }
    if fx.is_empty() {
        "-".to_string()
    } else {
        fx.join(",")
    }
}

fn clip_label(screen: &Screen) -> String {
    match screen.clip {
        Some(layer) => {
            let name = match layer.clip {
                Clip::A => "A",
                Clip::B => "B",
            };
            format!("{name}@{:.0}%", layer.opacity * 100.0)
        }
        None => "--".to_string(),
    }
}

/// One status line describing the frame.
pub fn status_line(frame: &ShellFrame) -> String {
    match frame {
        ShellFrame::Loading { screen, zoom } => {
            let led = match screen.led {
                Led::Green => "(o)",
                Led::Red => "(x)",
            };
            format!(
                "RETRO-VISION {led} {bar} {caption:<22} clip {clip:<7} glitch {glitch:.1} zoom {zoom:.2} fx {fx}",
                bar = bar(screen.progress),
                caption = screen.caption,
                clip = clip_label(screen),
                glitch = screen.glitch_intensity,
                fx = effects(screen),
            )
        }
        ShellFrame::Main { opacity } => {
            format!("MAIN UI {} {:.0}%", bar(*opacity), opacity * 100.0)
        }
    }
}

/// JSON snapshot of the loader state, or of the shell once unmounted.
pub fn json_line(state: Option<&SequenceState>, frame: &ShellFrame) -> Result<String> {
    let line = match (state, frame) {
        (Some(state), _) => serde_json::to_string(state)?,
        (None, ShellFrame::Main { opacity }) => {
            serde_json::to_string(&serde_json::json!({ "main_opacity": opacity }))?
        }
        (None, ShellFrame::Loading { screen, .. }) => serde_json::to_string(screen)?,
    };
    Ok(line)
}

#[cfg(test)]
mod tests {
    use retrovision_loader::{Cue, Phase};

    use super::*;

    fn state(cue: Cue) -> SequenceState {
        let f = cue.flags();
        SequenceState {
            phase: cue.phase(),
            glitch_intensity: f.glitch_intensity,
            scanlines_visible: f.scanlines,
            power_on: f.power_on,
            zoom: f.zoom,
            static_noise_visible: f.static_noise,
            loaded_asset_count: 0,
            total_asset_count: 2,
        }
    }

    fn loading(cue: Cue) -> ShellFrame {
        let screen = Screen::from_state(&state(cue));
        ShellFrame::Loading {
            screen,
            zoom: screen.zoom,
        }
    }

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(bar(0.0).len(), BAR_WIDTH + 2);
        assert_eq!(bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(7.0), bar(1.0));
    }

    #[test]
    fn preload_line() {
        let line = status_line(&loading(Cue::Preload));
        assert!(line.contains("(x)"));
        assert!(line.contains("BUFFERING..."));
        assert!(line.contains("clip --"));
        assert!(line.contains("fx static"));
    }

    #[test]
    fn clip_line_shows_layer_and_effects() {
        let line = status_line(&loading(Cue::Transition));
        assert!(line.contains("(o)"));
        assert!(line.contains("SWITCHING FEED..."));
        assert!(line.contains("clip A@0%"));
        assert!(line.contains("glitch,noise,scanlines"));
    }

    #[test]
    fn main_line() {
        let line = status_line(&ShellFrame::Main { opacity: 0.5 });
        assert!(line.starts_with("MAIN UI"));
        assert!(line.ends_with("50%"));
    }

    #[test]
    fn json_prefers_sequence_state() {
        let s = state(Cue::ClipB);
        let line = json_line(Some(&s), &loading(Cue::ClipB)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["phase"], serde_json::json!(Phase::ClipB));
        assert_eq!(v["total_asset_count"], 2);

        let line = json_line(None, &ShellFrame::Main { opacity: 1.0 }).unwrap();
        assert_eq!(line, r#"{"main_opacity":1.0}"#);
    }
}
