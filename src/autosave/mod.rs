//! Periodic shadow-copy autosave.
//!
//! The monitor keeps the text seen at the previous tick. A tick writes
//! `<file>.autosave` next to the document when the text changed since then
//! and the document has a path. The snapshot is refreshed on every tick,
//! including ones whose write failed, so a failing write is reported once
//! per change rather than on every tick.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::EditorError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
const SHADOW_SUFFIX: &str = ".autosave";

/// Where the shadow copy of `path` is written: the full file name plus `.autosave`.
pub fn shadow_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(SHADOW_SUFFIX);
    PathBuf::from(name)
}

#[derive(Debug)]
pub enum AutosaveOutcome {
    Written(PathBuf),
    Unchanged,
    Untitled,
    Failed(EditorError),
}

#[derive(Debug)]
pub struct AutosaveMonitor {
    interval: Option<Duration>,
    last_text: String,
    last_tick: Instant,
}

impl AutosaveMonitor {
    /// A zero interval disables autosave.
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval: (!interval.is_zero()).then_some(interval),
            last_text: String::new(),
            last_tick: now,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.interval
            .is_some_and(|interval| now.saturating_duration_since(self.last_tick) >= interval)
    }

    /// Run a tick if the interval has elapsed.
    pub fn poll(&mut self, now: Instant, text: &str, path: Option<&Path>) -> Option<AutosaveOutcome> {
        if !self.is_due(now) {
            return None;
        }
        self.last_tick = now;
        Some(self.tick(text, path))
    }

    /// Compare `text` with the snapshot and write the shadow copy if it changed.
    pub fn tick(&mut self, text: &str, path: Option<&Path>) -> AutosaveOutcome {
        let outcome = match path {
            None => AutosaveOutcome::Untitled,
            Some(_) if text == self.last_text => AutosaveOutcome::Unchanged,
            Some(path) => write_shadow(path, text),
        };
        self.last_text.clear();
        self.last_text.push_str(text);
        outcome
    }
}

impl Default for AutosaveMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

fn write_shadow(path: &Path, text: &str) -> AutosaveOutcome {
    let shadow = shadow_path(path);
    match fs::write(&shadow, text.as_bytes()) {
        Ok(()) => {
            debug!(path = %shadow.display(), "autosaved");
            AutosaveOutcome::Written(shadow)
        }
        Err(source) => {
            warn!(path = %shadow.display(), error = %source, "autosave failed");
            AutosaveOutcome::Failed(EditorError::Autosave {
                path: shadow,
                source,
            })
        }
    }
}
