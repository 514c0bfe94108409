//! Platform-agnostic core of the Springboard shell.
//!
//! Everything here is expressed against the [`WindowRegistry`] trait so
//! the state machines can be driven by the Win32 backend at runtime and
//! by an in-memory desktop in tests.

pub mod classifier;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod inventory;
pub mod keyfilter;
pub mod log;
pub mod rect;
pub mod registry;
pub mod reservation;
pub mod taskbar;
pub mod window;

#[cfg(test)]
mod testing;

pub use classifier::{ClassifierRules, is_manageable};
pub use cleanup::{CleanupReport, RollbackRegistry};
pub use error::{MutationError, MutationResult, ShellError, ShellResult};
pub use inventory::{IconRef, IconSource, InventoryChange, InventoryEntry, WindowInventory};
pub use keyfilter::{FilterDecision, KeyTransition, MetaKeyFilter, MetaKeyPress};
pub use rect::Rect;
pub use registry::WindowRegistry;
pub use reservation::{OverlapResizer, ReservationReport, ReservedRegion, RestoreReport};
pub use taskbar::{TaskbarController, TaskbarReport};
pub use window::{WindowAttributes, WindowHandle, WindowStyle};
