use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use springboard_core::ClassifierRules;
use springboard_core::inventory;
use tracing::{debug, warn};

use crate::icon::ExecutableIcons;
use crate::process;
use crate::registry::Win32Registry;

use super::daemon_types::DaemonMsg;

/// Granularity at which sleeping threads notice the stop flag.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Sleeps for `duration` or until `stop` is set. Returns `false` when stopped.
fn sleep_unless_stopped(stop: &AtomicBool, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

/// Spawns the inventory poll thread.
///
/// Enumeration, classification and icon lookup all happen here; only
/// the resulting entries cross over to the main thread.
pub(super) fn spawn_poll_thread(
    tx: mpsc::Sender<DaemonMsg>,
    stop: Arc<AtomicBool>,
    rules: ClassifierRules,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let registry = Win32Registry::new();
        let icons = ExecutableIcons::new();
        loop {
            match inventory::observe(&registry, &rules, &icons) {
                Ok(observed) => {
                    icons.retain_processes(process::is_process_alive);
                    if tx.send(DaemonMsg::Inventory(observed)).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "inventory poll failed"),
            }
            if !sleep_unless_stopped(&stop, interval) {
                break;
            }
        }
        debug!("poll thread stopped");
    })
}

/// Spawns a thread that sends `tick()` every `interval` until stopped.
pub(super) fn spawn_tick_thread(
    tx: mpsc::Sender<DaemonMsg>,
    stop: Arc<AtomicBool>,
    interval: Duration,
    tick: fn() -> DaemonMsg,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while sleep_unless_stopped(&stop, interval) {
            if tx.send(tick()).is_err() {
                break;
            }
        }
    })
}
