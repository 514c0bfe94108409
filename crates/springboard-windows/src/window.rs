use springboard_core::{
    MutationError, MutationResult, Rect, WindowAttributes, WindowHandle, WindowStyle,
};
use tracing::trace;
use windows::Win32::Foundation::{
    E_ACCESSDENIED, ERROR_INVALID_WINDOW_HANDLE, GetLastError, HWND, RECT, SetLastError,
    WIN32_ERROR,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GW_HWNDPREV, GWL_EXSTYLE, GWL_STYLE, GetWindow, GetWindowLongPtrW, GetWindowPlacement,
    GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsIconic, IsWindow,
    IsWindowVisible, IsZoomed, RealGetWindowClassW, SHOW_WINDOW_CMD, SW_HIDE, SW_MAXIMIZE,
    SW_RESTORE, SW_SHOWMINNOACTIVE, SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOOWNERZORDER,
    SWP_NOZORDER, SetForegroundWindow, SetWindowLongPtrW, SetWindowPlacement, SetWindowPos,
    ShowWindow, WINDOW_LONG_PTR_INDEX, WINDOWPLACEMENT, WINDOWPLACEMENT_FLAGS, WS_EX_TOOLWINDOW,
    WS_MAXIMIZE, WS_MINIMIZE, WS_VISIBLE,
};

use crate::{frame, monitor};

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// Every query goes to the OS; nothing is cached, since the owning
/// process can change or destroy the window at any moment.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a `Window` from a platform-neutral handle.
    pub fn from_handle(handle: WindowHandle) -> Self {
        Self {
            hwnd: HWND(handle.raw() as *mut _),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle::from_raw(self.hwnd.0 as usize)
    }

    /// Returns `false` once the window has been destroyed.
    pub fn is_valid(&self) -> bool {
        // SAFETY: IsWindow accepts any value and only reports validity.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read the
        // window text into our buffer.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length == 0 {
                return String::new();
            }
            // +1 for the null terminator
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied as usize])
        }
    }

    pub fn class_name(&self) -> String {
        // SAFETY: 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..length as usize])
        }
    }

    pub fn process_id(&self) -> u32 {
        let mut pid = 0u32;
        // SAFETY: GetWindowThreadProcessId writes the owning PID into `pid`.
        unsafe { GetWindowThreadProcessId(self.hwnd, Some(&mut pid)) };
        pid
    }

    /// Visible bounds, excluding the invisible resize borders.
    pub fn rect(&self) -> MutationResult<Rect> {
        let frame = frame::visible_rect(self.hwnd).map_err(|e| self.error("rect", e))?;
        Ok(Rect::from_edges(
            frame.left,
            frame.top,
            frame.right,
            frame.bottom,
        ))
    }

    pub fn style(&self) -> WindowStyle {
        let mut style = WindowStyle::empty();
        // SAFETY: plain state queries on the handle.
        unsafe {
            style.set(WindowStyle::VISIBLE, IsWindowVisible(self.hwnd).as_bool());
            style.set(WindowStyle::MAXIMIZED, IsZoomed(self.hwnd).as_bool());
            style.set(WindowStyle::MINIMIZED, IsIconic(self.hwnd).as_bool());
            let ex_style = GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) as u32;
            style.set(
                WindowStyle::TOOL_WINDOW,
                ex_style & WS_EX_TOOLWINDOW.0 != 0,
            );
        }
        style
    }

    /// Number of top-level windows above this one.
    pub fn z_order(&self) -> usize {
        let mut count = 0;
        let mut current = self.hwnd;
        // SAFETY: GetWindow walks the sibling list; it fails at the top.
        while let Ok(above) = unsafe { GetWindow(current, GW_HWNDPREV) } {
            if above.is_invalid() {
                break;
            }
            count += 1;
            current = above;
        }
        count
    }

    /// Collects a full attribute snapshot.
    pub fn attributes(&self, z_order: usize) -> MutationResult<WindowAttributes> {
        self.ensure_valid()?;
        Ok(WindowAttributes {
            handle: self.handle(),
            title: self.title(),
            class_name: self.class_name(),
            process_id: self.process_id(),
            rect: self.rect()?,
            style: self.style(),
            z_order,
        })
    }

    /// Moves the visible frame to `rect`, compensating for the invisible
    /// DWM borders.
    pub fn set_rect(&self, rect: &Rect) -> MutationResult<()> {
        self.ensure_valid()?;
        let border = frame::border_offset(self.hwnd).map_err(|e| self.error("set_rect", e))?;

        let x = rect.x - border.left;
        let y = rect.y - border.top;
        let cx = rect.width + border.left + border.right;
        let cy = rect.height + border.top + border.bottom;
        trace!(hwnd = %self.handle(), %rect, "set_rect");

        // SAFETY: SetWindowPos with a handle we just validated.
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                x,
                y,
                cx,
                cy,
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOOWNERZORDER,
            )
        }
        .map_err(|e| self.error("set_rect", e))
    }

    pub fn set_visibility(&self, shown: bool) -> MutationResult<()> {
        self.show(if shown { SW_SHOWNOACTIVATE } else { SW_HIDE })
    }

    pub fn set_maximized(&self, maximized: bool) -> MutationResult<()> {
        self.show(if maximized {
            SW_MAXIMIZE
        } else {
            SW_SHOWNOACTIVATE
        })
    }

    pub fn set_minimized(&self, minimized: bool) -> MutationResult<()> {
        self.show(if minimized {
            SW_SHOWMINNOACTIVE
        } else {
            SW_RESTORE
        })
    }

    /// The restore rectangle from `GetWindowPlacement`, in screen
    /// coordinates of the outer frame.
    pub fn normal_rect(&self) -> MutationResult<Rect> {
        let placement = self.placement()?;
        let (dx, dy) = self.workspace_offset()?;
        let r = placement.rcNormalPosition;
        Ok(Rect::from_edges(
            r.left + dx,
            r.top + dy,
            r.right + dx,
            r.bottom + dy,
        ))
    }

    /// Writes the restore rectangle and the show state through
    /// `SetWindowPlacement`. The inverse of [`normal_rect`](Self::normal_rect).
    pub fn set_placement(&self, normal: &Rect, maximized: bool) -> MutationResult<()> {
        let mut placement = self.placement()?;
        let (dx, dy) = self.workspace_offset()?;
        placement.flags = WINDOWPLACEMENT_FLAGS(0);
        placement.showCmd = if maximized {
            SW_MAXIMIZE.0 as u32
        } else {
            SW_SHOWNOACTIVATE.0 as u32
        };
        placement.rcNormalPosition = RECT {
            left: normal.x - dx,
            top: normal.y - dy,
            right: normal.right() - dx,
            bottom: normal.bottom() - dy,
        };
        trace!(hwnd = %self.handle(), %normal, maximized, "set_placement");
        // SAFETY: the placement struct is fully initialized and sized.
        unsafe { SetWindowPlacement(self.hwnd, &placement) }
            .map_err(|e| self.error("set_placement", e))
    }

    fn placement(&self) -> MutationResult<WINDOWPLACEMENT> {
        self.ensure_valid()?;
        let mut placement = WINDOWPLACEMENT {
            length: size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        // SAFETY: `length` is set as GetWindowPlacement requires.
        unsafe { GetWindowPlacement(self.hwnd, &mut placement) }
            .map_err(|e| self.error("get_placement", e))?;
        Ok(placement)
    }

    /// Offset from workspace to screen coordinates. Placement rectangles
    /// of tool windows are already in screen coordinates.
    fn workspace_offset(&self) -> MutationResult<(i32, i32)> {
        if self.style().contains(WindowStyle::TOOL_WINDOW) {
            return Ok((0, 0));
        }
        let geometry = monitor::for_window(self.hwnd)?;
        Ok((
            geometry.work_area.x - geometry.bounds.x,
            geometry.work_area.y - geometry.bounds.y,
        ))
    }

    /// Sets or clears the raw style bits behind `style`.
    pub fn set_style(&self, style: WindowStyle, enabled: bool) -> MutationResult<()> {
        self.ensure_valid()?;
        let mut plain = 0u32;
        if style.contains(WindowStyle::VISIBLE) {
            plain |= WS_VISIBLE.0;
        }
        if style.contains(WindowStyle::MAXIMIZED) {
            plain |= WS_MAXIMIZE.0;
        }
        if style.contains(WindowStyle::MINIMIZED) {
            plain |= WS_MINIMIZE.0;
        }
        if plain != 0 {
            self.update_long(GWL_STYLE, plain, enabled)?;
        }
        if style.contains(WindowStyle::TOOL_WINDOW) {
            self.update_long(GWL_EXSTYLE, WS_EX_TOOLWINDOW.0, enabled)?;
        }
        Ok(())
    }

    pub fn bring_to_foreground(&self) -> MutationResult<()> {
        self.ensure_valid()?;
        // SAFETY: SetForegroundWindow with a validated handle.
        let ok = unsafe { SetForegroundWindow(self.hwnd) }.as_bool();
        if ok {
            Ok(())
        } else {
            Err(MutationError::Os {
                handle: self.handle(),
                operation: "bring_to_foreground",
                message: "foreground change refused".into(),
            })
        }
    }

    fn show(&self, cmd: SHOW_WINDOW_CMD) -> MutationResult<()> {
        self.ensure_valid()?;
        // SAFETY: ShowWindow with a validated handle. Its return value is
        // the previous visibility, not an error indicator.
        unsafe {
            let _ = ShowWindow(self.hwnd, cmd);
        }
        Ok(())
    }

    fn update_long(
        &self,
        index: WINDOW_LONG_PTR_INDEX,
        bits: u32,
        enabled: bool,
    ) -> MutationResult<()> {
        // SAFETY: read-modify-write of the window's style longs. A zero
        // return only signals failure when the last error is set.
        unsafe {
            let current = GetWindowLongPtrW(self.hwnd, index);
            let updated = if enabled {
                current | bits as isize
            } else {
                current & !(bits as isize)
            };
            if updated == current {
                return Ok(());
            }
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongPtrW(self.hwnd, index, updated);
            let last = GetLastError();
            if previous == 0 && last != WIN32_ERROR(0) {
                return Err(self.error("set_style", last.to_hresult().into()));
            }
        }
        Ok(())
    }

    fn ensure_valid(&self) -> MutationResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MutationError::InvalidHandle(self.handle()))
        }
    }

    fn error(&self, operation: &'static str, error: windows::core::Error) -> MutationError {
        os_error(self.handle(), operation, error)
    }
}

/// Maps a Win32 error onto the transient-failure taxonomy.
pub(crate) fn os_error(
    handle: WindowHandle,
    operation: &'static str,
    error: windows::core::Error,
) -> MutationError {
    let code = error.code();
    if code == E_ACCESSDENIED {
        MutationError::AccessDenied(handle)
    } else if code == ERROR_INVALID_WINDOW_HANDLE.to_hresult() {
        MutationError::InvalidHandle(handle)
    } else {
        MutationError::Os {
            handle,
            operation,
            message: error.message(),
        }
    }
}
