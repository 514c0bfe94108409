use std::path::PathBuf;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::core::PWSTR;

/// Declares the process per-monitor DPI aware (V2) so every rectangle
/// is in raw pixels.
///
/// Call once at startup, before any window is created.
pub fn enable_dpi_awareness() {
    // SAFETY: fails harmlessly if awareness was already set by a manifest.
    if let Err(e) = unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }
    {
        debug!(error = %e, "DPI awareness already set");
    }
}

/// Checks whether a process with the given PID is still alive.
pub fn is_process_alive(pid: u32) -> bool {
    with_process(pid, |_| ()).is_some()
}

/// Full path of the executable behind `pid`.
///
/// `None` for processes we may not query (elevated or protected).
pub fn executable_path(pid: u32) -> Option<PathBuf> {
    with_process(pid, |handle| {
        let mut buffer = [0u16; 1024];
        let mut len = buffer.len() as u32;
        // SAFETY: `len` holds the buffer capacity and receives the
        // written length.
        unsafe {
            QueryFullProcessImageNameW(
                handle,
                PROCESS_NAME_WIN32,
                PWSTR(buffer.as_mut_ptr()),
                &mut len,
            )
        }
        .ok()
        .map(|()| PathBuf::from(String::from_utf16_lossy(&buffer[..len as usize])))
    })
    .flatten()
}

/// Opens `pid` with least-privilege query rights, runs `f`, and closes
/// the handle again.
fn with_process<T>(pid: u32, f: impl FnOnce(HANDLE) -> T) -> Option<T> {
    if pid == 0 {
        return None;
    }
    // SAFETY: OpenProcess either fails or hands us a handle we close below.
    let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }.ok()?;
    let result = f(handle);
    // SAFETY: the handle was opened above and is not used afterwards.
    unsafe {
        let _ = CloseHandle(handle);
    }
    Some(result)
}
