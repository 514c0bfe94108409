use std::cell::RefCell;
use std::rc::Rc;

use springboard_core::config::Config;
use springboard_core::{
    InventoryEntry, MetaKeyPress, OverlapResizer, RollbackRegistry, TaskbarController,
    WindowInventory,
};

use crate::registry::Win32Registry;

/// Message type for the main daemon thread.
pub enum DaemonMsg {
    /// A Windows-key press from the keyboard hook. Dropping it ends the
    /// in-flight dispatch.
    MetaKey(MetaKeyPress),
    /// A fresh observation from the poll thread.
    Inventory(Vec<InventoryEntry>),
    /// Display resolution or arrangement changed.
    DisplayChanged,
    /// Periodic taskbar watchdog tick.
    TaskbarTick,
    /// Periodic check for windows that entered the reserved strip.
    ReservationTick,
    /// Orderly shutdown (WM_CLOSE on the sink or Ctrl+C).
    Shutdown,
}

/// State owned by the main thread.
///
/// The resizer and taskbar controller are shared with the rollback
/// actions, which run on this same thread.
pub(super) struct Shell {
    pub(super) config: Config,
    pub(super) registry: Win32Registry,
    pub(super) resizer: Rc<RefCell<OverlapResizer>>,
    pub(super) taskbar: Rc<RefCell<TaskbarController>>,
    pub(super) inventory: WindowInventory,
    pub(super) rollback: RollbackRegistry,
}
