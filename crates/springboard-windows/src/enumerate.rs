use springboard_core::{MutationError, MutationResult, WindowHandle};
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, FindWindowW};
use windows::core::{BOOL, HSTRING};

use crate::window::Window;

/// Returns every top-level window handle in z-order, topmost first.
///
/// No filtering happens here; classification is the caller's job.
pub fn top_level_windows() -> MutationResult<Vec<WindowHandle>> {
    let mut handles: Vec<WindowHandle> = Vec::new();

    // SAFETY: EnumWindows runs synchronously and calls back with our Vec
    // pointer as LPARAM; the Vec outlives the call.
    unsafe {
        EnumWindows(
            Some(collect_handle),
            LPARAM(&mut handles as *mut _ as isize),
        )
    }
    .map_err(|e| MutationError::Display(format!("EnumWindows failed: {e}")))?;

    Ok(handles)
}

unsafe extern "system" fn collect_handle(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec pointer passed by top_level_windows().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<WindowHandle>) };
    handles.push(Window::new(hwnd).handle());
    BOOL(1)
}

/// Finds the first top-level window with the given class (and title).
pub fn find_window(class_name: &str, title: Option<&str>) -> Option<WindowHandle> {
    let class = HSTRING::from(class_name);
    // SAFETY: FindWindowW reads the two strings and returns a handle.
    let found = match title {
        Some(title) => unsafe { FindWindowW(&class, &HSTRING::from(title)) },
        None => unsafe { FindWindowW(&class, None) },
    };
    found
        .ok()
        .filter(|h| !h.is_invalid())
        .map(|h| Window::new(h).handle())
}

/// Finds every top-level window with the given class, in z-order.
pub fn find_all(class_name: &str) -> Vec<WindowHandle> {
    top_level_windows()
        .unwrap_or_default()
        .into_iter()
        .filter(|h| Window::from_handle(*h).class_name() == class_name)
        .collect()
}
