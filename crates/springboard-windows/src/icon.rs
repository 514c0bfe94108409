use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use springboard_core::{IconRef, IconSource, WindowAttributes};

use crate::process;

/// Resolves a window's icon to the executable of its owning process.
///
/// Lookups are cached per process id for the lifetime of the source.
#[derive(Default)]
pub struct ExecutableIcons {
    cache: RefCell<HashMap<u32, Option<PathBuf>>>,
}

impl ExecutableIcons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops cached paths of processes that no longer own a window.
    pub fn retain_processes(&self, alive: impl Fn(u32) -> bool) {
        self.cache.borrow_mut().retain(|pid, _| alive(*pid));
    }
}

impl IconSource for ExecutableIcons {
    fn icon_for(&self, attrs: &WindowAttributes) -> Option<IconRef> {
        self.cache
            .borrow_mut()
            .entry(attrs.process_id)
            .or_insert_with(|| process::executable_path(attrs.process_id))
            .clone()
            .map(IconRef::Executable)
    }
}
