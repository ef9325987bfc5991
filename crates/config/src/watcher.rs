use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Bursts of events closer together than this collapse into one reload.
const SETTLE: Duration = Duration::from_millis(200);

/// Watches the preferences file and fires once per settled change.
///
/// The parent directory is watched rather than the file itself, so the
/// watcher survives editors that save by renaming a temp file over the
/// original, and picks the file up if it is created after start-up.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = tray_config::ConfigWatcher::spawn("/home/user/.config/cputray/cputray.toml");
/// while rx.recv().await.is_some() {
///     println!("preferences changed; rebuilding gradients");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path` on the current Tokio runtime.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether `event` touches the watched file.
fn concerns(event: &notify::Event, path: &Path) -> bool {
    use notify::EventKind::{Create, Modify, Remove};

    let name = path.file_name();
    matches!(event.kind, Modify(_) | Create(_) | Remove(_))
        && event.paths.iter().any(|p| p.file_name() == name)
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        error!("Config path '{}' has no parent directory", path.display());
        return;
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!("Cannot create '{}': {e}", dir.display());
    }

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if concerns(&e, &path) => {
                // Drain whatever else arrives while the writer finishes.
                while let Ok(Some(_)) = tokio::time::timeout(SETTLE, sync_rx.recv()).await {}
                debug!("Config file changed: {}", path.display());
                if tx.send(()).await.is_err() {
                    break; // receiver dropped
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
