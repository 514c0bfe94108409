//! Console interrupt handling via `SetConsoleCtrlHandler`.

use std::sync::OnceLock;

use springboard_core::{ShellError, ShellResult};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

type Callback = Box<dyn Fn() + Send + Sync>;

/// Written once by `set_handler`, read by the console callback.
static CALLBACK: OnceLock<Callback> = OnceLock::new();

/// Runs `on_interrupt` on Ctrl+C or Ctrl+Break.
///
/// The callback runs on a thread the console spawns, so it should only
/// post a message. Only one handler per process.
pub fn set_handler(on_interrupt: impl Fn() + Send + Sync + 'static) -> ShellResult<()> {
    CALLBACK
        .set(Box::new(on_interrupt))
        .map_err(|_| ShellError::EventLoop("Ctrl+C handler already registered".into()))?;

    // SAFETY: registers a plain function pointer with no captured state.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }
        .map_err(|e| ShellError::EventLoop(format!("SetConsoleCtrlHandler: {}", e.message())))
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(callback) = CALLBACK.get()
    {
        callback();
        return BOOL(1);
    }
    BOOL(0)
}
