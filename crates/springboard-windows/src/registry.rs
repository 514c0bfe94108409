use springboard_core::{
    MutationError, MutationResult, Rect, WindowAttributes, WindowHandle, WindowRegistry,
    WindowStyle,
};
use tracing::debug;

use crate::window::Window;
use crate::{enumerate, monitor};

/// The live Win32 desktop.
///
/// Stateless: every call goes straight to the OS, so a value can be
/// created wherever one is needed (including on background threads for
/// read-only enumeration).
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Registry;

impl Win32Registry {
    pub fn new() -> Self {
        Self
    }
}

impl WindowRegistry for Win32Registry {
    fn enumerate(&self) -> MutationResult<Vec<WindowHandle>> {
        enumerate::top_level_windows()
    }

    fn attributes(&self, handle: WindowHandle) -> MutationResult<WindowAttributes> {
        let window = Window::from_handle(handle);
        window.attributes(window.z_order())
    }

    fn attributes_at(
        &self,
        handle: WindowHandle,
        z_order: usize,
    ) -> MutationResult<WindowAttributes> {
        Window::from_handle(handle).attributes(z_order)
    }

    fn is_valid(&self, handle: WindowHandle) -> bool {
        Window::from_handle(handle).is_valid()
    }

    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> MutationResult<()> {
        Window::from_handle(handle).set_rect(rect)
    }

    fn set_visibility(&self, handle: WindowHandle, shown: bool) -> MutationResult<()> {
        Window::from_handle(handle).set_visibility(shown)
    }

    fn set_maximized(&self, handle: WindowHandle, maximized: bool) -> MutationResult<()> {
        Window::from_handle(handle).set_maximized(maximized)
    }

    fn normal_rect(&self, handle: WindowHandle) -> MutationResult<Rect> {
        Window::from_handle(handle).normal_rect()
    }

    fn set_placement(
        &self,
        handle: WindowHandle,
        normal: &Rect,
        maximized: bool,
    ) -> MutationResult<()> {
        Window::from_handle(handle).set_placement(normal, maximized)
    }

    fn set_minimized(&self, handle: WindowHandle, minimized: bool) -> MutationResult<()> {
        Window::from_handle(handle).set_minimized(minimized)
    }

    fn set_style(
        &self,
        handle: WindowHandle,
        style: WindowStyle,
        enabled: bool,
    ) -> MutationResult<()> {
        Window::from_handle(handle).set_style(style, enabled)
    }

    fn bring_to_foreground(&self, handle: WindowHandle) -> MutationResult<()> {
        let window = Window::from_handle(handle);
        if window.style().contains(WindowStyle::MINIMIZED) {
            window.set_minimized(false)?;
        }
        window.bring_to_foreground()
    }

    fn find_window(&self, class_name: &str, title: Option<&str>) -> Option<WindowHandle> {
        let found = enumerate::find_window(class_name, title);
        debug!(class_name, ?title, ?found, "find_window");
        found
    }

    fn find_all(&self, class_name: &str) -> Vec<WindowHandle> {
        enumerate::find_all(class_name)
    }

    fn work_area_for(&self, handle: WindowHandle) -> MutationResult<Rect> {
        let window = Window::from_handle(handle);
        if !window.is_valid() {
            return Err(MutationError::InvalidHandle(handle));
        }
        Ok(monitor::for_window(window.hwnd())?.work_area)
    }

    fn primary_work_area(&self) -> MutationResult<Rect> {
        Ok(monitor::primary()?.work_area)
    }

    fn primary_bounds(&self) -> MutationResult<Rect> {
        Ok(monitor::primary()?.bounds)
    }

    fn rect(&self, handle: WindowHandle) -> MutationResult<Rect> {
        Window::from_handle(handle).rect()
    }

    fn title(&self, handle: WindowHandle) -> MutationResult<String> {
        let window = Window::from_handle(handle);
        if !window.is_valid() {
            return Err(MutationError::InvalidHandle(handle));
        }
        Ok(window.title())
    }

    fn is_maximized(&self, handle: WindowHandle) -> MutationResult<bool> {
        let window = Window::from_handle(handle);
        if !window.is_valid() {
            return Err(MutationError::InvalidHandle(handle));
        }
        Ok(window.style().contains(WindowStyle::MAXIMIZED))
    }
}
