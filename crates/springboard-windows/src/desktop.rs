//! Shell registration and z-order placement relative to the desktop.

use springboard_core::{MutationError, MutationResult, ShellError, ShellResult, WindowHandle};
use tracing::{debug, info, warn};
use windows::Win32::Foundation::HWND;
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    DeregisterShellHookWindow, FindWindowExW, FindWindowW, GW_HWNDPREV, GetWindow, HWND_BOTTOM,
    HWND_TOPMOST, RegisterShellHookWindow, SET_WINDOW_POS_FLAGS, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_SHOWWINDOW, SetForegroundWindow, SetWindowPos,
};
use windows::core::{BOOL, PCSTR, s, w};

use crate::enumerate;
use crate::window::{Window, os_error};

/// `SetShellWindow` / `SetTaskmanWindow` signature. Both are exported
/// by user32 but absent from the SDK headers.
type SetWindowFn = unsafe extern "system" fn(HWND) -> BOOL;

/// Declares `window` as the shell window and the task-manager window,
/// and subscribes it to shell hook messages.
///
/// Fails when another shell (usually explorer) already owns the role.
pub fn register_as_shell(window: WindowHandle) -> ShellResult<()> {
    let hwnd = Window::from_handle(window).hwnd();

    call_user32(s!("SetShellWindow"), hwnd)?;
    if let Err(e) = call_user32(s!("SetTaskmanWindow"), hwnd) {
        warn!(error = %e, "task manager window registration failed");
    }
    // SAFETY: RegisterShellHookWindow only records the handle.
    if !unsafe { RegisterShellHookWindow(hwnd) }.as_bool() {
        warn!(hwnd = %window, "shell hook registration failed");
    }
    info!(hwnd = %window, "registered as shell window");
    Ok(())
}

/// Stops shell hook delivery to `window`.
///
/// The shell-window role itself is released when the window is destroyed.
pub fn deregister_shell(window: WindowHandle) -> ShellResult<()> {
    let hwnd = Window::from_handle(window).hwnd();
    // SAFETY: DeregisterShellHookWindow accepts any handle.
    if unsafe { DeregisterShellHookWindow(hwnd) }.as_bool() {
        Ok(())
    } else {
        Err(ShellError::ShellRegistration(format!(
            "DeregisterShellHookWindow failed for {window}"
        )))
    }
}

fn call_user32(name: PCSTR, hwnd: HWND) -> ShellResult<()> {
    // SAFETY: user32 is always loaded in a GUI process; the looked-up
    // symbol has the `SetWindowFn` signature.
    unsafe {
        let user32 = GetModuleHandleW(w!("user32.dll"))
            .map_err(|e| ShellError::ShellRegistration(e.message()))?;
        let proc = GetProcAddress(user32, name).ok_or_else(|| {
            ShellError::ShellRegistration(format!("{} not exported", name.display()))
        })?;
        let func: SetWindowFn = std::mem::transmute(proc);
        if func(hwnd).as_bool() {
            Ok(())
        } else {
            Err(ShellError::ShellRegistration(format!(
                "{} refused (another shell is running)",
                name.display()
            )))
        }
    }
}

/// Finds the window that draws the desktop wallpaper and icons.
///
/// Follows the known chain: the `Progman` root, the top-level window
/// hosting `SHELLDLL_DefView`, then the `WorkerW` sibling behind it.
/// Falls back to `Progman` when explorer has not spawned a `WorkerW`.
pub fn find_desktop_container() -> ShellResult<WindowHandle> {
    // SAFETY: FindWindowW/FindWindowExW only look handles up.
    unsafe {
        let progman = FindWindowW(w!("Progman"), None).map_err(|_| ShellError::DesktopNotFound)?;

        for handle in enumerate::top_level_windows().unwrap_or_default() {
            let host = Window::from_handle(handle).hwnd();
            if FindWindowExW(Some(host), None, w!("SHELLDLL_DefView"), None).is_err() {
                continue;
            }
            if let Ok(worker) = FindWindowExW(None, Some(host), w!("WorkerW"), None) {
                debug!(host = %handle, "desktop container is WorkerW");
                return Ok(Window::new(worker).handle());
            }
        }
        Ok(Window::new(progman).handle())
    }
}

/// Moves `window` to just above the desktop container, below every
/// application window, without activating it.
pub fn place_above_desktop_below_apps(window: WindowHandle) -> ShellResult<()> {
    let container = Window::from_handle(find_desktop_container()?).hwnd();
    // The window directly above the container; inserting after it puts
    // `window` between it and the desktop.
    // SAFETY: GetWindow only walks the z-order list.
    let insert_after = match unsafe { GetWindow(container, GW_HWNDPREV) } {
        Ok(above) if above != Window::from_handle(window).hwnd() => above,
        _ => HWND_BOTTOM,
    };
    set_z_order(window, insert_after, SWP_NOACTIVATE)?;
    debug!(hwnd = %window, "placed above desktop");
    Ok(())
}

/// Makes `window` topmost, activates it and gives it input focus.
///
/// Meant for short-lived overlays; never combine with
/// [`place_above_desktop_below_apps`] on the same window.
pub fn force_always_on_top(window: WindowHandle) -> MutationResult<()> {
    set_z_order(window, HWND_TOPMOST, SWP_SHOWWINDOW)?;
    let hwnd = Window::from_handle(window).hwnd();
    // SAFETY: focus changes on a window we just validated.
    unsafe {
        let _ = SetForegroundWindow(hwnd);
        let _ = SetFocus(Some(hwnd));
    }
    Ok(())
}

fn set_z_order(
    window: WindowHandle,
    insert_after: HWND,
    extra: SET_WINDOW_POS_FLAGS,
) -> MutationResult<()> {
    let target = Window::from_handle(window);
    if !target.is_valid() {
        return Err(MutationError::InvalidHandle(window));
    }
    // SAFETY: SetWindowPos with a validated handle; position and size
    // are left alone.
    unsafe {
        SetWindowPos(
            target.hwnd(),
            Some(insert_after),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | extra,
        )
    }
    .map_err(|e| os_error(window, "set_z_order", e))
}
