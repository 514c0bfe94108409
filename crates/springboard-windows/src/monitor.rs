use std::mem;

use springboard_core::{MutationError, MutationResult, Rect};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITOR_DEFAULTTOPRIMARY, MONITORINFO,
    MonitorFromWindow,
};

/// Geometry of one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorGeometry {
    /// Full monitor rectangle.
    pub bounds: Rect,
    /// Bounds minus the taskbar and docked app bars.
    pub work_area: Rect,
}

/// Geometry of the primary monitor.
pub fn primary() -> MutationResult<MonitorGeometry> {
    // A null HWND with MONITOR_DEFAULTTOPRIMARY yields the primary monitor.
    // SAFETY: MonitorFromWindow never fails with a default flag.
    let monitor = unsafe { MonitorFromWindow(HWND::default(), MONITOR_DEFAULTTOPRIMARY) };
    geometry(monitor)
}

/// Geometry of the monitor showing most of `hwnd`.
pub fn for_window(hwnd: HWND) -> MutationResult<MonitorGeometry> {
    // SAFETY: as above; an invalid HWND falls back to the nearest monitor.
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    geometry(monitor)
}

fn geometry(monitor: HMONITOR) -> MutationResult<MonitorGeometry> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    // SAFETY: cbSize is set as the API requires.
    if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        return Err(MutationError::Display("GetMonitorInfoW failed".into()));
    }
    let (m, w) = (info.rcMonitor, info.rcWork);
    Ok(MonitorGeometry {
        bounds: Rect::from_edges(m.left, m.top, m.right, m.bottom),
        work_area: Rect::from_edges(w.left, w.top, w.right, w.bottom),
    })
}
