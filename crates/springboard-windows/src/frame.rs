use std::mem;

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};
use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

/// Widths of the invisible resize borders around a window.
///
/// Windows 10/11 draw drop-shadow borders (about 7px left, right and
/// bottom) that `GetWindowRect` counts but the user cannot see.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderOffset {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Returns the visible bounds of a window (DWM extended frame bounds),
/// falling back to `GetWindowRect` when DWM has no answer.
pub fn visible_rect(hwnd: HWND) -> windows::core::Result<RECT> {
    let mut frame = RECT::default();
    // SAFETY: the out-pointer and size describe `frame`.
    let result = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut _,
            mem::size_of::<RECT>() as u32,
        )
    };
    if result.is_err() {
        // SAFETY: GetWindowRect writes into `frame`.
        unsafe { GetWindowRect(hwnd, &mut frame)? };
    }
    Ok(frame)
}

/// Difference between the outer window rect and the visible frame.
pub fn border_offset(hwnd: HWND) -> windows::core::Result<BorderOffset> {
    let mut outer = RECT::default();
    // SAFETY: GetWindowRect writes into `outer`.
    unsafe { GetWindowRect(hwnd, &mut outer)? };
    let visible = visible_rect(hwnd)?;
    Ok(offset_between(&outer, &visible))
}

fn offset_between(outer: &RECT, visible: &RECT) -> BorderOffset {
    BorderOffset {
        left: visible.left - outer.left,
        top: visible.top - outer.top,
        right: outer.right - visible.right,
        bottom: outer.bottom - visible.bottom,
    }
}
