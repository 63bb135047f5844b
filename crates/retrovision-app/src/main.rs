//! RETRO-VISION desktop entry point.
//!
//! Runs the loading screen in a cooperative frame loop against the system
//! clock, printing one status line whenever the picture changes, then
//! fades in the (placeholder) main UI and exits.
//!
//! Usage: `retrovision [CONFIG.toml] [--assets DIR] [--json]`

mod desktop;
mod render;
mod shell;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use desktop::{FsAssetLoader, LogPlayback};
use retrovision_loader::{Clock, Collaborators, SystemClock, TimerQueue};
use retrovision_types::config::LoaderConfig;
use shell::Shell;

const FRAME: Duration = Duration::from_millis(16);

struct Args {
    config: Option<PathBuf>,
    assets: PathBuf,
    json: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        config: None,
        assets: PathBuf::from("public"),
        json: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--assets" => {
                let dir = args.next().context("--assets needs a directory")?;
                parsed.assets = PathBuf::from(dir);
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            path => {
                if parsed.config.replace(PathBuf::from(path)).is_some() {
                    bail!("only one config file may be given");
                }
            }
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;

    // Config from CLI arg, RETROVISION_CONFIG env var, or built-in defaults.
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("RETROVISION_CONFIG").map(PathBuf::from));
    let config = match &config_path {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    log::info!(
        "Starting RETRO-VISION ({} assets from {})",
        config.assets.len(),
        args.assets.display()
    );

    let clock = SystemClock::new();
    let collaborators = Collaborators {
        timers: Box::new(TimerQueue::new(clock)),
        loader: Box::new(FsAssetLoader::new(&args.assets)),
        playback: Box::new(LogPlayback::new(&config)),
    };
    let mut shell = Shell::new(&config, collaborators)?;

    let mut last_frame = clock.now();
    let mut last_line = String::new();
    loop {
        std::thread::sleep(FRAME);
        let now = clock.now();
        let dt = u32::try_from(now - last_frame).unwrap_or(u32::MAX);
        last_frame = now;

        let frame = shell.tick(dt);
        let line = if args.json {
            render::json_line(shell.state().as_ref(), &frame)?
        } else {
            render::status_line(&frame)
        };
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
        if shell.is_settled() {
            break;
        }
    }

    log::info!("Main UI visible after {}ms", clock.now());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let a = args(&[]).unwrap();
        assert!(a.config.is_none());
        assert_eq!(a.assets, PathBuf::from("public"));
        assert!(!a.json);
    }

    #[test]
    fn config_assets_and_json() {
        let a = args(&["site.toml", "--assets", "/srv/www", "--json"]).unwrap();
        assert_eq!(a.config, Some(PathBuf::from("site.toml")));
        assert_eq!(a.assets, PathBuf::from("/srv/www"));
        assert!(a.json);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--assets"]).is_err());
        assert!(args(&["--loud"]).is_err());
        assert!(args(&["a.toml", "b.toml"]).is_err());
    }
}
