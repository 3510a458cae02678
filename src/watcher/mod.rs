//! External change detection for the open document.
//!
//! [`FileWatcher`] wraps a notify watcher on one file and reports debounced
//! changes. [`WatchRegistry`] owns at most one of them and follows the
//! document's path across loads, saves and New.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches a single file and emits debounced change notifications.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl FileWatcher {
    /// Create a watcher for `path`.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or the path cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Event paths from the OS are absolute and canonical.
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        // Editors often save by rename, which drops a watch on the file itself.
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            debounce,
            pending_since: None,
        })
    }

    /// The canonical path of the file being watched.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Returns true once a debounced file change is ready.
    pub fn take_change_ready(&mut self) -> bool {
        let mut saw_relevant_event = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => saw_relevant_event = true,
                Ok(ev) => trace!(kind = ?ev.kind, paths = ?ev.paths, "ignoring unrelated event"),
                Err(err) => warn!(error = %err, "watcher error"),
            }
        }

        if saw_relevant_event {
            self.pending_since = Some(Instant::now());
        }

        let Some(pending_since) = self.pending_since else {
            return false;
        };
        if pending_since.elapsed() >= self.debounce {
            self.pending_since = None;
            return true;
        }
        false
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// What the editor should do about a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    /// The file is gone or no longer a regular file; say nothing.
    Ignore,
    /// Ask whether to reload `path` from disk.
    PromptReload(PathBuf),
}

/// Decide how to react to a change of `path`.
pub fn classify_change(path: &Path) -> ChangeAction {
    if path.is_file() {
        ChangeAction::PromptReload(path.to_path_buf())
    } else {
        ChangeAction::Ignore
    }
}

/// The single watch on the current document, if any.
pub struct WatchRegistry {
    enabled: bool,
    debounce: Duration,
    active: Option<(PathBuf, FileWatcher)>,
}

impl WatchRegistry {
    pub fn new(enabled: bool) -> Self {
        Self::with_debounce(enabled, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(enabled: bool, debounce: Duration) -> Self {
        Self {
            enabled,
            debounce,
            active: None,
        }
    }

    /// Path as registered, not canonicalized.
    pub fn current(&self) -> Option<&Path> {
        self.active.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Replace any existing watch with one on `path`.
    ///
    /// The old watch is always removed first. Nothing is registered if
    /// watching is disabled, `path` is not an existing file, or the OS
    /// watcher cannot be created.
    pub fn register(&mut self, path: &Path) {
        self.unregister();
        if !self.enabled {
            return;
        }
        if !path.is_file() {
            debug!(path = %path.display(), "not watching: no such file");
            return;
        }
        match FileWatcher::new(path, self.debounce) {
            Ok(watcher) => {
                debug!(path = %watcher.target_path().display(), "watching");
                self.active = Some((path.to_path_buf(), watcher));
            }
            Err(err) => warn!(path = %path.display(), error = %err, "could not watch file"),
        }
    }

    pub fn unregister(&mut self) {
        if let Some((path, _)) = self.active.take() {
            debug!(path = %path.display(), "stopped watching");
        }
    }

    /// Drain pending events; returns an action once a debounced change is ready.
    pub fn poll(&mut self) -> Option<ChangeAction> {
        let (path, watcher) = self.active.as_mut()?;
        if !watcher.take_change_ready() {
            return None;
        }
        let action = classify_change(path);
        debug!(path = %path.display(), ?action, "external change");
        Some(action)
    }
}
