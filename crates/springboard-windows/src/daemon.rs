use springboard_core::config;
use springboard_core::{ShellError, ShellResult, WindowHandle};
use tracing::info;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_CLOSE};

use crate::event_loop::{SINK_CLASS, SINK_TITLE};
use crate::window::Window;
use crate::{enumerate, process};

#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_loop_handlers.rs"]
mod daemon_loop_handlers;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

pub use daemon_types::DaemonMsg;

/// Runs the Springboard daemon until it is asked to stop.
///
/// The message pump (sink window and keyboard hook), the inventory
/// poller and the taskbar watchdog run on background threads; the
/// calling thread is the only one that mutates foreign windows.
pub fn run() -> ShellResult<()> {
    process::enable_dpi_awareness();
    let config = config::load();
    let _log_guard = springboard_core::log::init(&config.logging);
    info!(pid = std::process::id(), "daemon started");

    let result = daemon_loop::daemon_loop(config);

    info!("daemon stopped");
    result
}

/// A running daemon, as seen from another process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonInfo {
    /// The daemon's event sink window.
    pub sink: WindowHandle,
    pub pid: u32,
}

/// Looks for the event sink window of a running daemon.
pub fn find_running() -> Option<DaemonInfo> {
    let sink = enumerate::find_window(SINK_CLASS, Some(SINK_TITLE))?;
    Some(DaemonInfo {
        sink,
        pid: Window::from_handle(sink).process_id(),
    })
}

/// Asks a running daemon to shut down. Returns `false` when none is running.
///
/// Only posts the request; use [`process::is_process_alive`] on
/// [`DaemonInfo::pid`] to wait for the exit.
pub fn request_stop() -> ShellResult<bool> {
    let Some(daemon) = find_running() else {
        return Ok(false);
    };
    // SAFETY: posting WM_CLOSE to a window owned by another process.
    unsafe {
        PostMessageW(
            Some(Window::from_handle(daemon.sink).hwnd()),
            WM_CLOSE,
            WPARAM(0),
            LPARAM(0),
        )
    }
    .map_err(|e| ShellError::EventLoop(format!("could not signal daemon: {}", e.message())))?;
    Ok(true)
}
