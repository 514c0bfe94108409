use crate::{MutationResult, Rect, WindowAttributes, WindowHandle, WindowStyle};

/// Access to the OS window list and to the primitives the shell uses
/// to mutate foreign windows.
///
/// Each platform crate (e.g. `springboard-windows`) provides its own
/// implementation. Every method is best-effort: failures come back as
/// [`MutationError`](crate::MutationError) values and are never fatal.
pub trait WindowRegistry {
    /// Returns every top-level window in z-order, topmost first.
    ///
    /// The result is a snapshot, not a live view.
    fn enumerate(&self) -> MutationResult<Vec<WindowHandle>>;

    /// Queries the current attributes of a window.
    fn attributes(&self, handle: WindowHandle) -> MutationResult<WindowAttributes>;

    /// Returns `false` once the window has been destroyed.
    fn is_valid(&self, handle: WindowHandle) -> bool;

    /// Moves and resizes a window without changing its z-order or focus.
    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> MutationResult<()>;

    /// Shows or hides a window without activating it.
    fn set_visibility(&self, handle: WindowHandle, shown: bool) -> MutationResult<()>;

    /// Maximizes a window, or restores a maximized one to its normal state.
    fn set_maximized(&self, handle: WindowHandle, maximized: bool) -> MutationResult<()>;

    /// Rectangle the window returns to when it leaves the maximized or
    /// minimized state. Equals the current rectangle for a normal window.
    fn normal_rect(&self, handle: WindowHandle) -> MutationResult<Rect>;

    /// Sets the restore rectangle and the maximized state in one step.
    ///
    /// A maximized window keeps `normal` as the size it returns to when
    /// the user un-maximizes it later.
    fn set_placement(
        &self,
        handle: WindowHandle,
        normal: &Rect,
        maximized: bool,
    ) -> MutationResult<()>;

    /// Minimizes a window, or restores a minimized one.
    fn set_minimized(&self, handle: WindowHandle, minimized: bool) -> MutationResult<()>;

    /// Sets or clears raw style bits.
    fn set_style(
        &self,
        handle: WindowHandle,
        style: WindowStyle,
        enabled: bool,
    ) -> MutationResult<()>;

    /// Brings a window to the foreground and gives it input focus.
    fn bring_to_foreground(&self, handle: WindowHandle) -> MutationResult<()>;

    /// Finds the first top-level window with the given class (and title).
    fn find_window(&self, class_name: &str, title: Option<&str>) -> Option<WindowHandle>;

    /// Finds every top-level window with the given class.
    fn find_all(&self, class_name: &str) -> Vec<WindowHandle>;

    /// Work area (screen minus docked bars) of the monitor holding the window.
    fn work_area_for(&self, handle: WindowHandle) -> MutationResult<Rect>;

    /// Work area of the primary monitor.
    fn primary_work_area(&self) -> MutationResult<Rect>;

    /// Full bounds of the primary monitor.
    fn primary_bounds(&self) -> MutationResult<Rect>;

    /// Like [`attributes`](Self::attributes), for a caller that already
    /// knows the window's z-order from an enumeration.
    fn attributes_at(
        &self,
        handle: WindowHandle,
        z_order: usize,
    ) -> MutationResult<WindowAttributes> {
        Ok(WindowAttributes {
            z_order,
            ..self.attributes(handle)?
        })
    }

    /// Returns the window title.
    fn title(&self, handle: WindowHandle) -> MutationResult<String> {
        Ok(self.attributes(handle)?.title)
    }

    /// Returns the window class name.
    fn class_name(&self, handle: WindowHandle) -> MutationResult<String> {
        Ok(self.attributes(handle)?.class_name)
    }

    /// Returns the window rectangle.
    fn rect(&self, handle: WindowHandle) -> MutationResult<Rect> {
        Ok(self.attributes(handle)?.rect)
    }

    /// Returns whether the window is maximized.
    fn is_maximized(&self, handle: WindowHandle) -> MutationResult<bool> {
        Ok(self.attributes(handle)?.is_maximized())
    }
}
