//! Observable list of the application windows shown by the dock and
//! switcher.
//!
//! Work is split in two: [`observe`] enumerates and classifies (safe to
//! run on a background thread), while [`WindowInventory::diff`] and
//! [`WindowInventory::apply`] run on the UI thread and update the list
//! in place.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::classifier::manageable_windows;
use crate::{ClassifierRules, MutationResult, WindowAttributes, WindowHandle, WindowRegistry};

/// Best-effort reference to a window's icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconRef {
    /// Icon embedded in the owning executable.
    Executable(PathBuf),
}

impl IconRef {
    /// File the icon is loaded from.
    pub fn path(&self) -> &Path {
        match self {
            Self::Executable(path) => path,
        }
    }
}

/// Resolves icons for windows.
pub trait IconSource {
    fn icon_for(&self, attrs: &WindowAttributes) -> Option<IconRef>;
}

/// An [`IconSource`] that never finds anything.
pub struct NoIcons;

impl IconSource for NoIcons {
    fn icon_for(&self, _attrs: &WindowAttributes) -> Option<IconRef> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub handle: WindowHandle,
    pub title: String,
    pub icon: Option<IconRef>,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    Added(InventoryEntry),
    Updated(InventoryEntry),
    Removed(WindowHandle),
}

/// Enumerates the manageable windows and resolves their icons.
///
/// A window that vanishes mid-query is skipped; a missing icon leaves
/// the entry without one.
pub fn observe<R, I>(
    registry: &R,
    rules: &ClassifierRules,
    icons: &I,
) -> MutationResult<Vec<InventoryEntry>>
where
    R: WindowRegistry + ?Sized,
    I: IconSource + ?Sized,
{
    let windows = manageable_windows(registry, rules)?;
    Ok(windows
        .into_iter()
        .map(|attrs| InventoryEntry {
            icon: icons.icon_for(&attrs),
            minimized: attrs.is_minimized(),
            handle: attrs.handle,
            title: attrs.title,
        })
        .collect())
}

type Listener = Box<dyn Fn(&[InventoryChange])>;

/// The current window list, in first-seen order.
#[derive(Default)]
pub struct WindowInventory {
    entries: Vec<InventoryEntry>,
    listeners: Vec<Listener>,
}

impl WindowInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a callback run after every non-empty [`apply`](Self::apply).
    pub fn on_changed(&mut self, listener: impl Fn(&[InventoryChange]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Compares an observation against the current list by handle.
    ///
    /// Removals come first, then updates and additions in observed order.
    pub fn diff(&self, observed: &[InventoryEntry]) -> Vec<InventoryChange> {
        let mut changes: Vec<InventoryChange> = self
            .entries
            .iter()
            .filter(|e| !observed.iter().any(|o| o.handle == e.handle))
            .map(|e| InventoryChange::Removed(e.handle))
            .collect();

        for entry in observed {
            match self.get(entry.handle) {
                None => changes.push(InventoryChange::Added(entry.clone())),
                Some(current) if current != entry => {
                    changes.push(InventoryChange::Updated(entry.clone()))
                }
                Some(_) => {}
            }
        }
        changes
    }

    /// Applies changes in order and notifies listeners.
    pub fn apply(&mut self, changes: Vec<InventoryChange>) {
        if changes.is_empty() {
            return;
        }
        for change in &changes {
            match change {
                InventoryChange::Added(entry) => {
                    if self.get(entry.handle).is_none() {
                        self.entries.push(entry.clone());
                    }
                }
                InventoryChange::Updated(entry) => {
                    if let Some(slot) = self.entries.iter_mut().find(|e| e.handle == entry.handle)
                    {
                        *slot = entry.clone();
                    }
                }
                InventoryChange::Removed(handle) => self.entries.retain(|e| e.handle != *handle),
            }
        }
        debug!(changes = changes.len(), windows = self.entries.len(), "inventory updated");
        for listener in &self.listeners {
            listener(&changes);
        }
    }

    /// Observes, diffs and applies in one step. Returns the number of changes.
    pub fn refresh<R, I>(
        &mut self,
        registry: &R,
        rules: &ClassifierRules,
        icons: &I,
    ) -> MutationResult<usize>
    where
        R: WindowRegistry + ?Sized,
        I: IconSource + ?Sized,
    {
        let observed = observe(registry, rules, icons)?;
        let changes = self.diff(&observed);
        let count = changes.len();
        self.apply(changes);
        Ok(count)
    }

    /// Un-minimizes a window if needed and brings it to the foreground.
    pub fn restore<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
        handle: WindowHandle,
    ) -> MutationResult<()> {
        let minimized = match self.get(handle) {
            Some(entry) => entry.minimized,
            None => registry.attributes(handle)?.is_minimized(),
        };
        if minimized {
            registry.set_minimized(handle, false)?;
        }
        registry.bring_to_foreground(handle)?;

        let updated = self
            .get(handle)
            .filter(|e| e.minimized)
            .map(|e| InventoryEntry {
                minimized: false,
                ..e.clone()
            });
        if let Some(updated) = updated {
            self.apply(vec![InventoryChange::Updated(updated)]);
        }
        Ok(())
    }

    /// Minimizes every listed window that is not minimized yet.
    ///
    /// Best-effort: a failure is logged and the rest are still
    /// minimized. Returns the number of windows minimized.
    pub fn minimize_all<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> usize {
        let mut changes = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.minimized) {
            match registry.set_minimized(entry.handle, true) {
                Ok(()) => {
                    trace!(hwnd = %entry.handle, "minimized");
                    let mut updated = entry.clone();
                    updated.minimized = true;
                    changes.push(InventoryChange::Updated(updated));
                }
                Err(e) => warn!(hwnd = %entry.handle, error = %e, "failed to minimize"),
            }
        }
        let count = changes.len();
        self.apply(changes);
        count
    }
}

#[cfg(test)]
mod tests;
