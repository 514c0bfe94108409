//! In-memory desktop used by the unit tests.
//!
//! Simulates a single 1920x1080 monitor with a 40 px taskbar at the
//! bottom, so the work area is 1920x1040.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::{
    MutationError, MutationResult, Rect, WindowAttributes, WindowHandle, WindowRegistry,
    WindowStyle,
};

pub(crate) const BOUNDS: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

pub(crate) const WORK_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1040,
};

struct FakeWindow {
    handle: WindowHandle,
    title: String,
    class_name: String,
    rect: Rect,
    /// Where the window goes when un-maximized / un-minimized.
    normal_rect: Rect,
    style: WindowStyle,
    valid: bool,
}

/// A scriptable [`WindowRegistry`].
pub(crate) struct FakeDesktop {
    windows: RefCell<Vec<FakeWindow>>,
    failing: RefCell<HashSet<WindowHandle>>,
    failing_queries: RefCell<HashSet<(WindowHandle, &'static str)>>,
    mutations: RefCell<Vec<(WindowHandle, &'static str)>>,
    next_handle: Cell<usize>,
}

impl FakeDesktop {
    pub(crate) fn new() -> Self {
        Self {
            windows: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            failing_queries: RefCell::new(HashSet::new()),
            mutations: RefCell::new(Vec::new()),
            next_handle: Cell::new(0x100),
        }
    }

    fn push(&self, title: &str, class_name: &str, rect: Rect, style: WindowStyle) -> WindowHandle {
        let handle = WindowHandle::from_raw(self.next_handle.get());
        self.next_handle.set(self.next_handle.get() + 0x10);
        self.windows.borrow_mut().push(FakeWindow {
            handle,
            title: title.into(),
            class_name: class_name.into(),
            rect,
            normal_rect: rect,
            style,
            valid: true,
        });
        handle
    }

    /// Adds a normal, visible application window.
    pub(crate) fn add_window(&self, title: &str, rect: Rect) -> WindowHandle {
        self.push(title, "AppWindow", rect, WindowStyle::VISIBLE)
    }

    pub(crate) fn add_window_with_class(
        &self,
        title: &str,
        class_name: &str,
        rect: Rect,
    ) -> WindowHandle {
        self.push(title, class_name, rect, WindowStyle::VISIBLE)
    }

    pub(crate) fn add_tool_window(&self, title: &str, rect: Rect) -> WindowHandle {
        self.push(
            title,
            "ToolWindow",
            rect,
            WindowStyle::VISIBLE | WindowStyle::TOOL_WINDOW,
        )
    }

    /// Adds a window maximized over the work area; `normal` is its
    /// restore rectangle.
    pub(crate) fn add_maximized(&self, title: &str, normal: Rect) -> WindowHandle {
        let handle = self.push(
            title,
            "AppWindow",
            WORK_AREA,
            WindowStyle::VISIBLE | WindowStyle::MAXIMIZED,
        );
        self.with_window(handle, |w| w.normal_rect = normal);
        handle
    }

    pub(crate) fn add_minimized(&self, title: &str, normal: Rect) -> WindowHandle {
        let handle = self.push(
            title,
            "AppWindow",
            Rect::new(-32000, -32000, 160, 28),
            WindowStyle::VISIBLE | WindowStyle::MINIMIZED,
        );
        self.with_window(handle, |w| w.normal_rect = normal);
        handle
    }

    /// Simulates the owning process destroying the window.
    pub(crate) fn close(&self, handle: WindowHandle) {
        self.with_window(handle, |w| w.valid = false);
    }

    /// Makes every later mutation of `handle` fail with access denied.
    pub(crate) fn deny_mutations(&self, handle: WindowHandle) {
        self.failing.borrow_mut().insert(handle);
    }

    /// Makes the named query (`"attributes"` or `"normal_rect"`) fail for
    /// `handle` while the window stays alive and listed.
    pub(crate) fn deny_query(&self, handle: WindowHandle, query: &'static str) {
        self.failing_queries.borrow_mut().insert((handle, query));
    }

    fn check_query(&self, handle: WindowHandle, query: &'static str) -> MutationResult<()> {
        if self.failing_queries.borrow().contains(&(handle, query)) {
            return Err(MutationError::AccessDenied(handle));
        }
        Ok(())
    }

    pub(crate) fn set_title(&self, handle: WindowHandle, title: &str) {
        self.with_window(handle, |w| w.title = title.into());
    }

    /// Flips style bits directly, as the owning process would.
    pub(crate) fn force_style(&self, handle: WindowHandle, style: WindowStyle, enabled: bool) {
        self.with_window(handle, |w| w.style.set(style, enabled));
    }

    pub(crate) fn rect_of(&self, handle: WindowHandle) -> Rect {
        self.with_window(handle, |w| w.rect)
    }

    pub(crate) fn style_of(&self, handle: WindowHandle) -> WindowStyle {
        self.with_window(handle, |w| w.style)
    }

    /// Number of successful mutations applied to `handle`.
    pub(crate) fn mutation_count(&self, handle: WindowHandle) -> usize {
        self.mutations
            .borrow()
            .iter()
            .filter(|(h, _)| *h == handle)
            .count()
    }

    /// Names of the successful mutations applied to `handle`, in order.
    pub(crate) fn mutations_of(&self, handle: WindowHandle) -> Vec<&'static str> {
        self.mutations
            .borrow()
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, op)| *op)
            .collect()
    }

    fn with_window<T>(&self, handle: WindowHandle, f: impl FnOnce(&mut FakeWindow) -> T) -> T {
        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.handle == handle)
            .expect("unknown fake window");
        f(window)
    }

    fn mutate(
        &self,
        handle: WindowHandle,
        operation: &'static str,
        f: impl FnOnce(&mut FakeWindow),
    ) -> MutationResult<()> {
        if !self.is_valid(handle) {
            return Err(MutationError::InvalidHandle(handle));
        }
        if self.failing.borrow().contains(&handle) {
            return Err(MutationError::AccessDenied(handle));
        }
        self.with_window(handle, f);
        self.mutations.borrow_mut().push((handle, operation));
        Ok(())
    }
}

impl WindowRegistry for FakeDesktop {
    fn enumerate(&self) -> MutationResult<Vec<WindowHandle>> {
        Ok(self
            .windows
            .borrow()
            .iter()
            .filter(|w| w.valid)
            .map(|w| w.handle)
            .collect())
    }

    fn attributes(&self, handle: WindowHandle) -> MutationResult<WindowAttributes> {
        self.check_query(handle, "attributes")?;
        let windows = self.windows.borrow();
        windows
            .iter()
            .filter(|w| w.valid)
            .enumerate()
            .find(|(_, w)| w.handle == handle)
            .map(|(z_order, w)| WindowAttributes {
                handle,
                title: w.title.clone(),
                class_name: w.class_name.clone(),
                process_id: 1000,
                rect: w.rect,
                style: w.style,
                z_order,
            })
            .ok_or(MutationError::InvalidHandle(handle))
    }

    fn is_valid(&self, handle: WindowHandle) -> bool {
        self.windows
            .borrow()
            .iter()
            .any(|w| w.handle == handle && w.valid)
    }

    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> MutationResult<()> {
        let rect = *rect;
        self.mutate(handle, "set_rect", |w| {
            w.rect = rect;
            if !w.style.intersects(WindowStyle::MAXIMIZED | WindowStyle::MINIMIZED) {
                w.normal_rect = rect;
            }
        })
    }

    fn set_visibility(&self, handle: WindowHandle, shown: bool) -> MutationResult<()> {
        self.mutate(handle, "set_visibility", |w| {
            w.style.set(WindowStyle::VISIBLE, shown)
        })
    }

    fn set_maximized(&self, handle: WindowHandle, maximized: bool) -> MutationResult<()> {
        self.mutate(handle, "set_maximized", |w| {
            if maximized && !w.style.contains(WindowStyle::MAXIMIZED) {
                w.normal_rect = w.rect;
                w.rect = WORK_AREA;
                w.style.insert(WindowStyle::MAXIMIZED);
            } else if !maximized && w.style.contains(WindowStyle::MAXIMIZED) {
                w.rect = w.normal_rect;
                w.style.remove(WindowStyle::MAXIMIZED);
            }
        })
    }

    fn normal_rect(&self, handle: WindowHandle) -> MutationResult<Rect> {
        if !self.is_valid(handle) {
            return Err(MutationError::InvalidHandle(handle));
        }
        self.check_query(handle, "normal_rect")?;
        Ok(self.with_window(handle, |w| w.normal_rect))
    }

    fn set_placement(
        &self,
        handle: WindowHandle,
        normal: &Rect,
        maximized: bool,
    ) -> MutationResult<()> {
        let normal = *normal;
        self.mutate(handle, "set_placement", |w| {
            w.normal_rect = normal;
            w.style.remove(WindowStyle::MINIMIZED);
            w.style.set(WindowStyle::MAXIMIZED, maximized);
            w.rect = if maximized { WORK_AREA } else { normal };
        })
    }

    fn set_minimized(&self, handle: WindowHandle, minimized: bool) -> MutationResult<()> {
        self.mutate(handle, "set_minimized", |w| {
            if minimized && !w.style.contains(WindowStyle::MINIMIZED) {
                if !w.style.contains(WindowStyle::MAXIMIZED) {
                    w.normal_rect = w.rect;
                }
                w.rect = Rect::new(-32000, -32000, 160, 28);
                w.style.insert(WindowStyle::MINIMIZED);
            } else if !minimized && w.style.contains(WindowStyle::MINIMIZED) {
                w.rect = w.normal_rect;
                w.style.remove(WindowStyle::MINIMIZED);
            }
        })
    }

    fn set_style(
        &self,
        handle: WindowHandle,
        style: WindowStyle,
        enabled: bool,
    ) -> MutationResult<()> {
        self.mutate(handle, "set_style", |w| w.style.set(style, enabled))
    }

    fn bring_to_foreground(&self, handle: WindowHandle) -> MutationResult<()> {
        self.mutate(handle, "bring_to_foreground", |_| {})
    }

    fn find_window(&self, class_name: &str, title: Option<&str>) -> Option<WindowHandle> {
        self.windows
            .borrow()
            .iter()
            .filter(|w| w.valid && w.class_name == class_name)
            .find(|w| title.is_none_or(|t| w.title == t))
            .map(|w| w.handle)
    }

    fn find_all(&self, class_name: &str) -> Vec<WindowHandle> {
        self.windows
            .borrow()
            .iter()
            .filter(|w| w.valid && w.class_name == class_name)
            .map(|w| w.handle)
            .collect()
    }

    fn work_area_for(&self, handle: WindowHandle) -> MutationResult<Rect> {
        if !self.is_valid(handle) {
            return Err(MutationError::InvalidHandle(handle));
        }
        Ok(WORK_AREA)
    }

    fn primary_work_area(&self) -> MutationResult<Rect> {
        Ok(WORK_AREA)
    }

    fn primary_bounds(&self) -> MutationResult<Rect> {
        Ok(BOUNDS)
    }
}
