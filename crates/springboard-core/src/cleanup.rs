//! Undo actions for changes made to OS-global state.
//!
//! Whoever changes something outside the process (hides the taskbar,
//! moves foreign windows, registers as shell) registers the matching
//! undo here at the moment of the change, not at shutdown.

use tracing::{debug, warn};

use crate::ShellResult;

type RollbackAction = Box<dyn FnOnce() -> ShellResult<()>>;

/// Outcome of [`RollbackRegistry::run_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// An ordered list of labelled undo actions.
///
/// Dropping the registry runs whatever is still pending.
#[derive(Default)]
pub struct RollbackRegistry {
    actions: Vec<(String, RollbackAction)>,
}

impl RollbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an undo action to run at cleanup.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        action: impl FnOnce() -> ShellResult<()> + 'static,
    ) {
        let label = label.into();
        debug!(label = %label, "rollback registered");
        self.actions.push((label, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns whether an action with this label is pending.
    pub fn contains(&self, label: &str) -> bool {
        self.actions.iter().any(|(l, _)| l == label)
    }

    /// Runs every action in registration order and clears the list.
    ///
    /// A failing action is logged and counted; the rest still run.
    pub fn run_all(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        for (label, action) in std::mem::take(&mut self.actions) {
            match action() {
                Ok(()) => {
                    debug!(label = %label, "rollback done");
                    report.succeeded += 1;
                }
                Err(e) => {
                    warn!(label = %label, error = %e, "rollback failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

impl Drop for RollbackRegistry {
    fn drop(&mut self) {
        if !self.actions.is_empty() {
            self.run_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ShellError;

    #[test]
    fn actions_run_in_registration_order() {
        // Arrange
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = RollbackRegistry::new();
        for name in ["taskbar", "reservation", "shell"] {
            let log = log.clone();
            registry.register(name, move || {
                log.borrow_mut().push(name);
                Ok(())
            });
        }

        // Act
        let report = registry.run_all();

        // Assert
        assert_eq!(*log.borrow(), vec!["taskbar", "reservation", "shell"]);
        assert_eq!(report, CleanupReport { succeeded: 3, failed: 0 });
        assert!(registry.is_empty());
    }

    #[test]
    fn failing_action_does_not_stop_the_rest() {
        // Arrange
        let ran = Rc::new(RefCell::new(false));
        let mut registry = RollbackRegistry::new();
        registry.register("broken", || Err(ShellError::TaskbarNotFound));
        let flag = ran.clone();
        registry.register("after", move || {
            *flag.borrow_mut() = true;
            Ok(())
        });

        // Act
        let report = registry.run_all();

        // Assert
        assert_eq!(report, CleanupReport { succeeded: 1, failed: 1 });
        assert!(*ran.borrow());
    }

    #[test]
    fn run_all_twice_runs_each_action_once() {
        // Arrange
        let count = Rc::new(RefCell::new(0));
        let mut registry = RollbackRegistry::new();
        let c = count.clone();
        registry.register("once", move || {
            *c.borrow_mut() += 1;
            Ok(())
        });

        // Act
        registry.run_all();
        let second = registry.run_all();

        // Assert
        assert_eq!(*count.borrow(), 1);
        assert_eq!(second, CleanupReport::default());
    }

    #[test]
    fn drop_runs_pending_actions() {
        // Arrange
        let ran = Rc::new(RefCell::new(false));
        let flag = ran.clone();
        let mut registry = RollbackRegistry::new();
        registry.register("pending", move || {
            *flag.borrow_mut() = true;
            Ok(())
        });
        assert!(registry.contains("pending"));

        // Act
        drop(registry);

        // Assert
        assert!(*ran.borrow());
    }
}
