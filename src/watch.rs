//! Directory watching for automatic manifest rebuilds.
//!
//! A [`ChangeWatcher`] subscribes to the artwork directory and turns raw
//! filesystem notifications into typed [`ChangeEvent`]s: a file arrived or
//! a file went away. Edits to an existing file are not reported. A rename
//! shows up once as a removal of the old name and once as an addition of the
//! new one.
//!
//! ## Event Loop
//!
//! [`ChangeWatcher::run`] hands each event to a single handler and waits for
//! it to return before taking the next one, so two rebuilds never write the
//! manifest at the same time. Events that arrive meanwhile queue up in the
//! notification channel and are each handled in turn; nothing is coalesced.
//! A handler error is logged and the loop keeps going.
//!
//! ## Ignored Paths
//!
//! When the manifest lives inside the watched directory, writing it would
//! report a change and trigger another rebuild. Paths registered with
//! [`ChangeWatcher::ignoring`] and the temporary files the manifest is staged
//! in are dropped before they reach the handler.

use crate::scan::TEMP_FILE_PREFIX;
use log::{debug, error, info, warn};
use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watch error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Filesystem event channel closed")]
    Disconnected,
}

/// A file arriving in or leaving the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Added(PathBuf),
    Removed(PathBuf),
}

impl ChangeEvent {
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Added(path) | ChangeEvent::Removed(path) => path,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Added(path) => write!(f, "added {}", path.display()),
            ChangeEvent::Removed(path) => write!(f, "removed {}", path.display()),
        }
    }
}

/// Subscription to file arrivals and removals in one directory.
pub struct ChangeWatcher {
    dir: PathBuf,
    // Dropping the watcher ends the subscription, so it lives as long as we do.
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    pending: VecDeque<ChangeEvent>,
    ignored: Vec<PathBuf>,
}

impl ChangeWatcher {
    /// Start watching the direct entries of `dir`.
    pub fn new(dir: &Path) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            _watcher: watcher,
            events: rx,
            pending: VecDeque::new(),
            ignored: Vec::new(),
        })
    }

    /// Never report changes to `path`.
    pub fn ignoring(mut self, path: &Path) -> Self {
        self.ignored.push(normalize(path));
        self
    }

    /// Block until the next change.
    pub fn next_event(&mut self) -> Result<ChangeEvent, WatchError> {
        loop {
            if let Some(change) = self.pending.pop_front() {
                return Ok(change);
            }
            let raw = self.events.recv().map_err(|_| WatchError::Disconnected)?;
            self.enqueue(raw);
        }
    }

    /// Wait up to `timeout` for the next change.
    pub fn next_event_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<ChangeEvent>, WatchError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(change) = self.pending.pop_front() {
                return Ok(Some(change));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(raw) => self.enqueue(raw),
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(WatchError::Disconnected),
            }
        }
    }

    /// Hand every change to `on_change`, one at a time, for as long as the
    /// subscription lasts. Only returns if the event source goes away.
    pub fn run<F, E>(mut self, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut(&ChangeEvent) -> Result<(), E>,
        E: fmt::Display,
    {
        info!("watching for changes in {}", self.dir.display());
        loop {
            let change = self.next_event()?;
            if let Err(e) = on_change(&change) {
                error!("rebuild after {change} failed: {e}");
            }
        }
    }

    fn enqueue(&mut self, raw: notify::Result<Event>) {
        let event = match raw {
            Ok(event) => event,
            Err(e) => {
                warn!("filesystem watch error: {e}");
                return;
            }
        };
        for change in classify(&event) {
            if self.is_ignored(change.path()) {
                debug!("ignoring {change}");
                continue;
            }
            self.pending.push_back(change);
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let staged = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with(TEMP_FILE_PREFIX))
            .unwrap_or(false);
        staged || self.ignored.contains(&normalize(path))
    }
}

/// Watch `dir` and run `on_change` for every file added or removed.
pub fn watch<F, E>(dir: &Path, on_change: F) -> Result<(), WatchError>
where
    F: FnMut(&ChangeEvent) -> Result<(), E>,
    E: fmt::Display,
{
    ChangeWatcher::new(dir)?.run(on_change)
}

/// Map a raw notification to the additions and removals it describes.
///
/// Directory events and in-place modifications produce nothing.
pub fn classify(event: &Event) -> Vec<ChangeEvent> {
    let paths = event.paths.iter().cloned();
    match event.kind {
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => vec![],
        EventKind::Create(_) => paths.map(ChangeEvent::Added).collect(),
        EventKind::Remove(_) => paths.map(ChangeEvent::Removed).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.map(ChangeEvent::Removed).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(ChangeEvent::Added).collect()
        }
        // Each end of the rename is also reported on its own.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => vec![],
        // Backends that cannot tell the two ends of a rename apart.
        EventKind::Modify(ModifyKind::Name(_)) => paths
            .map(|p| {
                if p.exists() {
                    ChangeEvent::Added(p)
                } else {
                    ChangeEvent::Removed(p)
                }
            })
            .collect(),
        _ => vec![],
    }
}

/// Resolve the parent directory so `./data/x` and `/abs/data/x` compare equal.
/// The file itself may already be gone, so only the parent is canonicalized.
fn normalize(path: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    parent
        .canonicalize()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}
