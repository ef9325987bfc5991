//! The tick loop.
//!
//! Wires together the sources of [`Message`]s:
//! - interval timer (sampling cadence)
//! - config file watcher (live reload of colours, size and cadence)
//! - Ctrl-C (shutdown)
//!
//! Everything runs on one task, so ticks, resizes and reloads never overlap.

use anyhow::{Context, Result};
use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tray_config::{default_path, load as load_config, ConfigWatcher, TrayConfig};
use tray_core::{Message, SCALE};
use tray_renderer::{icon, Renderer};
use tray_system::Monitor;
use tray_theme::Palette;

/// Run until Ctrl-C.  Returns an error only when CPU sampling breaks.
pub async fn run() -> Result<()> {
    let path = default_path();
    let config = load_or_default(&path);

    let mut tray = Tray::new(config).context("cannot sample CPU usage")?;
    let (_watcher, mut reloads) = ConfigWatcher::spawn(&path);
    let mut ticker = interval_timer(tray.config.options.interval_ms);

    loop {
        let message = tokio::select! {
            _ = ticker.tick() => Message::Tick,
            Some(()) = reloads.recv() => Message::ConfigReloaded,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };

        let interval = tray.config.options.interval_ms;
        if tray.update(message, &path)?.is_break() {
            break;
        }
        if tray.config.options.interval_ms != interval {
            ticker = interval_timer(tray.config.options.interval_ms);
        }
    }

    info!("cputray stopped after {} ticks", tray.monitor.ticks());
    Ok(())
}

fn interval_timer(interval_ms: u64) -> Interval {
    let mut ticker = time::interval(Duration::from_millis(interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn load_or_default(path: &Path) -> TrayConfig {
    load_config(path).unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        TrayConfig::default()
    })
}

/// Icon state carried between ticks.
struct Tray {
    config:   TrayConfig,
    palette:  Palette,
    monitor:  Monitor,
    renderer: Renderer,
    output:   PathBuf,
}

impl Tray {
    fn new(config: TrayConfig) -> Result<Self> {
        let mut monitor = Monitor::open(SCALE)?;
        monitor.resize(config.options.icon_size as usize);

        let output = config.options.output_path();
        info!("Writing icon to {}", output.display());

        Ok(Self {
            palette: Palette::from_config(&config.colors),
            monitor,
            renderer: Renderer::new(),
            output,
            config,
        })
    }

    fn update(&mut self, message: Message, path: &Path) -> Result<ControlFlow<()>> {
        match message {
            Message::Tick => {
                let reading = self.monitor.tick()?;
                debug!(
                    "{}",
                    reading.sample.summary(reading.freq_khz, SCALE).replace('\n', "; ")
                );
                self.redraw();
            }
            Message::Resize(width) => {
                self.monitor.resize(width as usize);
                self.redraw();
            }
            Message::ConfigReloaded => match load_config(path) {
                Ok(config) => {
                    info!("Config reloaded");
                    self.palette.apply(&config.colors);
                    self.output = config.options.output_path();
                    let resized = config.options.icon_size != self.config.options.icon_size;
                    self.config = config;
                    if resized {
                        return self.update(Message::Resize(self.config.options.icon_size), path);
                    }
                    self.redraw();
                }
                Err(e) => warn!("Config reload failed: {e}"),
            },
            Message::Shutdown => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Render the current history and hand it to the icon host.
    fn redraw(&mut self) {
        let width = self.monitor.width() as u32;
        let img = self.renderer.render(
            self.monitor.visible(),
            &self.palette,
            width,
            SCALE,
            self.monitor.ticks(),
        );

        let key = self.config.options.transparent.then_some(self.palette.background);
        if let Err(e) = icon::export(&img, key, &self.output) {
            warn!("Cannot write icon: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_theme::Color;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cputray-app-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_config(dir: &Path, background: &str) -> PathBuf {
        let path = dir.join("cputray.toml");
        let icon = dir.join("icon.png");
        std::fs::write(
            &path,
            format!(
                "[colors]\nbackground = \"{background}\"\n\n\
                 [options]\ntransparent = false\ninterval_ms = 250\noutput = {icon:?}\n"
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn malformed_reload_keeps_current_settings() {
        let dir = scratch("malformed");
        let path = write_config(&dir, "black");
        let mut tray = Tray::new(load_config(&path).unwrap()).unwrap();
        assert_eq!(tray.palette.background, Color::BLACK);

        std::fs::write(&path, "[colors\nbackground = ").unwrap();
        let flow = tray.update(Message::ConfigReloaded, &path).unwrap();

        assert!(flow.is_continue());
        assert_eq!(tray.palette.background, Color::BLACK);
        assert!(!tray.config.options.transparent);
        assert_eq!(tray.config.options.interval_ms, 250);
        assert_eq!(tray.output, dir.join("icon.png"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn valid_reload_applies_colours_and_redraws() {
        let dir = scratch("valid");
        let path = write_config(&dir, "black");
        let mut tray = Tray::new(load_config(&path).unwrap()).unwrap();

        write_config(&dir, "red");
        tray.update(Message::ConfigReloaded, &path).unwrap();

        assert_eq!(tray.palette.background, Color::RED);
        assert!(dir.join("icon.png").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
