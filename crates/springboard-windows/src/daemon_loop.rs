use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use springboard_core::config::Config;
use springboard_core::{
    ClassifierRules, InventoryChange, OverlapResizer, RollbackRegistry, ShellResult,
    TaskbarController, WindowHandle, WindowInventory,
};
use tracing::{debug, info, warn};

use crate::registry::Win32Registry;
use crate::{ctrl_c, desktop, event_loop};

use super::daemon_loop_handlers;
use super::daemon_threads;
use super::daemon_types::{DaemonMsg, Shell};

/// The inner daemon loop. Every change made to the desktop is paired
/// with a rollback action before the next step runs.
pub(super) fn daemon_loop(config: Config) -> ShellResult<()> {
    let registry = Win32Registry::new();
    let rules = ClassifierRules::from_config(&config.shell).with_process(std::process::id());

    info!(
        height = config.status_bar.height,
        hide_taskbar = config.taskbar.hide,
        intercept_meta = config.keyboard.intercept_meta,
        register_as_shell = config.shell.register_as_shell,
        "config loaded"
    );

    let mut inventory = WindowInventory::new();
    inventory.on_changed(log_inventory_changes);

    let mut shell = Shell {
        resizer: Rc::new(RefCell::new(OverlapResizer::new(
            rules.clone(),
            config.status_bar.min_window_height,
        ))),
        taskbar: Rc::new(RefCell::new(TaskbarController::new())),
        inventory,
        rollback: RollbackRegistry::new(),
        registry,
        config,
    };

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    // Sink window + keyboard hook on their own thread.
    let event_loop = event_loop::start(tx.clone(), shell.config.keyboard.intercept_meta)?;

    let ctrl_c_tx = tx.clone();
    if let Err(e) = ctrl_c::set_handler(move || {
        let _ = ctrl_c_tx.send(DaemonMsg::Shutdown);
    }) {
        warn!(error = %e, "Ctrl+C handling unavailable");
    }

    reserve(&mut shell);
    hide_taskbar(&mut shell);
    if shell.config.shell.register_as_shell {
        register_shell(&mut shell, event_loop.sink());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let poll_thread = daemon_threads::spawn_poll_thread(
        tx.clone(),
        stop.clone(),
        rules,
        Duration::from_millis(shell.config.inventory.poll_interval_ms),
    );
    let mut tick_threads = Vec::new();
    if shell.config.taskbar.hide {
        tick_threads.push(daemon_threads::spawn_tick_thread(
            tx.clone(),
            stop.clone(),
            Duration::from_millis(shell.config.taskbar.check_interval_ms),
            || DaemonMsg::TaskbarTick,
        ));
    }
    if shell.resizer.borrow().is_active() {
        tick_threads.push(daemon_threads::spawn_tick_thread(
            tx.clone(),
            stop.clone(),
            Duration::from_millis(shell.config.status_bar.check_interval_ms),
            || DaemonMsg::ReservationTick,
        ));
    }
    drop(tx);

    info!("daemon running");
    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::MetaKey(press) => daemon_loop_handlers::handle_meta_key(press, &mut shell),
            DaemonMsg::Inventory(observed) => {
                daemon_loop_handlers::handle_inventory(observed, &mut shell);
            }
            DaemonMsg::DisplayChanged => daemon_loop_handlers::handle_display_changed(&mut shell),
            DaemonMsg::TaskbarTick => daemon_loop_handlers::handle_taskbar_tick(&mut shell),
            DaemonMsg::ReservationTick => {
                daemon_loop_handlers::handle_reservation_tick(&mut shell);
            }
            DaemonMsg::Shutdown => break,
        }
    }

    info!("shutting down");
    stop.store(true, Ordering::Relaxed);
    let report = shell.rollback.run_all();
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "desktop restored"
    );
    event_loop.stop();
    // Releases queued key presses; the poll thread's next send fails.
    drop(rx);
    let _ = poll_thread.join();
    for tick_thread in tick_threads {
        let _ = tick_thread.join();
    }
    Ok(())
}

fn reserve(shell: &mut Shell) {
    let Some(region) = daemon_loop_handlers::reserved_region(shell) else {
        return;
    };
    let report = shell.resizer.borrow_mut().activate(&shell.registry, region);
    debug!(affected = report.affected, "initial reservation");

    let resizer = shell.resizer.clone();
    let registry = shell.registry;
    shell.rollback.register("restore reservation", move || {
        resizer.borrow_mut().deactivate(&registry);
        Ok(())
    });
}

fn hide_taskbar(shell: &mut Shell) {
    if !shell.config.taskbar.hide {
        return;
    }
    if let Err(e) = shell.taskbar.borrow_mut().hide(&shell.registry) {
        warn!(error = %e, "taskbar left visible");
        return;
    }
    let taskbar = shell.taskbar.clone();
    let registry = shell.registry;
    shell.rollback.register("show taskbar", move || {
        taskbar.borrow_mut().show(&registry).map(|_| ())
    });
}

fn register_shell(shell: &mut Shell, sink: WindowHandle) {
    match desktop::register_as_shell(sink) {
        Ok(()) => shell
            .rollback
            .register("deregister shell hook", move || desktop::deregister_shell(sink)),
        Err(e) => warn!(error = %e, "continuing as a normal application"),
    }
}

fn log_inventory_changes(changes: &[InventoryChange]) {
    for change in changes {
        match change {
            InventoryChange::Added(entry) => {
                debug!(hwnd = %entry.handle, title = %entry.title, "window added");
            }
            InventoryChange::Updated(entry) => {
                debug!(hwnd = %entry.handle, minimized = entry.minimized, "window updated");
            }
            InventoryChange::Removed(handle) => debug!(hwnd = %handle, "window removed"),
        }
    }
}
