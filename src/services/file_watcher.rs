//! File watcher service for watch mode.
//!
//! Monitors the source image and the parameter file, broadcasting raw change
//! events. Bursts are coalesced downstream by the
//! [`Debouncer`](super::Debouncer).

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// Event sent when a watched file changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    /// Watched paths that changed, as they were given to the watcher
    pub paths: Vec<PathBuf>,
}

impl FileChangeEvent {
    pub fn touches(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// File watcher for a fixed set of files
pub struct FileWatcher {
    /// Broadcast sender for file change events
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    /// Flag indicating if watcher is active
    active: bool,
}

impl FileWatcher {
    /// Create a watcher for the given files.
    ///
    /// The parent directories are watched so that editors replacing a file
    /// (write to temp, rename) are still noticed. Files that do not exist are
    /// skipped with a warning.
    pub fn new(targets: Vec<PathBuf>) -> Self {
        let (sender, _) = broadcast::channel(16);

        let targets: Vec<PathBuf> = targets
            .into_iter()
            .filter(|p| {
                let exists = p.exists();
                if !exists {
                    tracing::warn!(path = %p.display(), "Watch target does not exist");
                }
                exists
            })
            .collect();

        let (watcher, active) = if targets.is_empty() {
            tracing::debug!("No watch targets, file watching disabled");
            (None, false)
        } else {
            match Self::start_watcher(&targets, sender.clone()) {
                Ok(watcher) => {
                    tracing::info!(files = targets.len(), "File watcher started");
                    (Some(watcher), true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to start file watcher");
                    (None, false)
                }
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        targets: &[PathBuf],
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        // notify reports absolute paths; match on the canonical form but
        // report the path the caller asked for.
        let lookup: Vec<(PathBuf, PathBuf)> = targets
            .iter()
            .map(|t| (canonical(t), t.clone()))
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                if event.kind.is_access() {
                    return;
                }
                let paths: Vec<PathBuf> = lookup
                    .iter()
                    .filter(|(canon, _)| event.paths.iter().any(|p| canonical(p) == *canon))
                    .map(|(_, original)| original.clone())
                    .collect();
                if !paths.is_empty() {
                    tracing::trace!(paths = ?paths, kind = ?event.kind, "Watched file changed");
                    let _ = sender.send(FileChangeEvent { paths });
                }
            },
            Config::default(),
        )?;

        let dirs: HashSet<PathBuf> = targets
            .iter()
            .map(|t| {
                canonical(t)
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            })
            .collect();
        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Canonical path, or the path itself if it cannot be resolved (deleted).
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // Resolve the parent so a file removed mid-rename still matches.
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf()),
            _ => path.to_path_buf(),
        }
    })
}
