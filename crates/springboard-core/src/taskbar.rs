//! Hides and shows the native taskbar while the shell is running.
//!
//! Taskbar handles are looked up again on every call: explorer can
//! restart at any time and hand out new ones.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    MutationResult, Rect, ShellError, ShellResult, WindowHandle, WindowRegistry, WindowStyle,
};

/// Class of the primary taskbar window.
pub const PRIMARY_TASKBAR_CLASS: &str = "Shell_TrayWnd";

/// Class of the per-monitor taskbars on secondary displays.
pub const SECONDARY_TASKBAR_CLASS: &str = "Shell_SecondaryTrayWnd";

/// Class and title of the stand-alone start button some Windows versions create.
pub const START_BUTTON_CLASS: &str = "Button";
pub const START_BUTTON_TITLE: &str = "Start";

/// Height used to dock a bar we never saw on screen.
pub const DEFAULT_TASKBAR_HEIGHT: i32 = 48;

/// Where hidden bars are parked, in case the compositor ignores visibility.
const OFF_SCREEN: i32 = -32000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Shown,
    Hidden,
}

/// Outcome of a hide or show pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskbarReport {
    /// Bars (primary and secondary) that were updated.
    pub bars: usize,
    /// Bars or start buttons where at least one step failed.
    pub failed: usize,
}

/// Tracks whether this process has hidden the taskbar.
///
/// The controller is the only mutator of taskbar visibility within the
/// process, so the state flag is trusted over re-querying the OS.
pub struct TaskbarController {
    state: Visibility,
    /// On-screen rectangles recorded when the bars were hidden.
    saved_rects: HashMap<WindowHandle, Rect>,
    primary_height: i32,
}

impl Default for TaskbarController {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskbarController {
    pub fn new() -> Self {
        Self {
            state: Visibility::Shown,
            saved_rects: HashMap::new(),
            primary_height: DEFAULT_TASKBAR_HEIGHT,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.state == Visibility::Hidden
    }

    /// Hides the primary taskbar, the start button, and every secondary bar.
    ///
    /// Fails with [`ShellError::TaskbarNotFound`] (leaving the state
    /// untouched) if there is no primary taskbar.
    pub fn hide<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> ShellResult<TaskbarReport> {
        if self.is_hidden() {
            return Ok(TaskbarReport::default());
        }
        let primary = registry
            .find_window(PRIMARY_TASKBAR_CLASS, None)
            .ok_or(ShellError::TaskbarNotFound)?;

        let mut report = TaskbarReport::default();
        self.saved_rects.clear();

        if let Ok(rect) = registry.rect(primary)
            && rect.y != OFF_SCREEN
            && rect.height > 0
        {
            self.primary_height = rect.height;
        }
        self.hide_bar(registry, primary, &mut report);

        if let Some(start) = registry.find_window(START_BUTTON_CLASS, Some(START_BUTTON_TITLE))
            && let Err(e) = registry.set_visibility(start, false)
        {
            warn!(hwnd = %start, error = %e, "failed to hide start button");
            report.failed += 1;
        }

        for bar in registry.find_all(SECONDARY_TASKBAR_CLASS) {
            self.hide_bar(registry, bar, &mut report);
        }

        self.state = Visibility::Hidden;
        info!(bars = report.bars, failed = report.failed, "taskbar hidden");
        Ok(report)
    }

    /// Shows every taskbar again, docked where it was before hiding.
    ///
    /// Fails with [`ShellError::TaskbarNotFound`] (leaving the state
    /// untouched) if there is no primary taskbar.
    pub fn show<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> ShellResult<TaskbarReport> {
        if !self.is_hidden() {
            return Ok(TaskbarReport::default());
        }
        let primary = registry
            .find_window(PRIMARY_TASKBAR_CLASS, None)
            .ok_or(ShellError::TaskbarNotFound)?;

        let mut report = TaskbarReport::default();
        let primary_target = match self.saved_rects.get(&primary) {
            Some(rect) => Some(*rect),
            None => registry
                .primary_bounds()
                .ok()
                .map(|display| self.docked_rect(display)),
        };
        self.show_bar(registry, primary, primary_target, &mut report);

        if let Some(start) = registry.find_window(START_BUTTON_CLASS, Some(START_BUTTON_TITLE))
            && let Err(e) = registry.set_visibility(start, true)
        {
            warn!(hwnd = %start, error = %e, "failed to show start button");
            report.failed += 1;
        }

        for bar in registry.find_all(SECONDARY_TASKBAR_CLASS) {
            let target = self.saved_rects.get(&bar).copied();
            self.show_bar(registry, bar, target, &mut report);
        }

        self.saved_rects.clear();
        self.state = Visibility::Shown;
        info!(bars = report.bars, failed = report.failed, "taskbar shown");
        Ok(report)
    }

    /// Re-hides the taskbar if it came back while we think it is hidden,
    /// which happens when explorer restarts.
    ///
    /// Returns the report of the re-hide pass, or `None` if nothing was
    /// needed.
    pub fn enforce<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> Option<TaskbarReport> {
        if !self.is_hidden() {
            return None;
        }
        let primary = registry.find_window(PRIMARY_TASKBAR_CLASS, None)?;
        let visible = registry
            .attributes(primary)
            .map(|a| a.is_visible())
            .unwrap_or(false);
        if !visible {
            return None;
        }

        info!(hwnd = %primary, "taskbar reappeared, hiding again");
        self.state = Visibility::Shown;
        match self.hide(registry) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "failed to re-hide taskbar");
                self.state = Visibility::Hidden;
                None
            }
        }
    }

    /// A bar of the remembered height along the bottom edge of `display`.
    fn docked_rect(&self, display: Rect) -> Rect {
        Rect::new(
            display.x,
            display.bottom() - self.primary_height,
            display.width,
            self.primary_height,
        )
    }

    fn hide_bar<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
        bar: WindowHandle,
        report: &mut TaskbarReport,
    ) {
        let current = registry.rect(bar).ok();
        if let Some(rect) = current
            && rect.y != OFF_SCREEN
        {
            self.saved_rects.insert(bar, rect);
        }
        let parked = current
            .map(|r| Rect::new(OFF_SCREEN, OFF_SCREEN, r.width, r.height))
            .unwrap_or(Rect::new(OFF_SCREEN, OFF_SCREEN, 0, 0));

        // Each step is attempted on its own; any one of them is enough
        // to get the bar out of sight.
        let results = [
            registry.set_visibility(bar, false),
            registry.set_rect(bar, &parked),
            registry.set_style(bar, WindowStyle::VISIBLE, false),
        ];
        record(bar, "hide", &results, report);
    }

    fn show_bar<R: WindowRegistry + ?Sized>(
        &self,
        registry: &R,
        bar: WindowHandle,
        target: Option<Rect>,
        report: &mut TaskbarReport,
    ) {
        let moved = match target {
            Some(rect) => registry.set_rect(bar, &rect),
            None => {
                debug!(hwnd = %bar, "no recorded position for taskbar");
                Ok(())
            }
        };
        let results = [
            registry.set_style(bar, WindowStyle::VISIBLE, true),
            moved,
            registry.set_visibility(bar, true),
        ];
        record(bar, "show", &results, report);
    }
}

fn record(
    bar: WindowHandle,
    action: &str,
    results: &[MutationResult<()>],
    report: &mut TaskbarReport,
) {
    report.bars += 1;
    let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    if let Some(first) = errors.first() {
        warn!(hwnd = %bar, action, failures = errors.len(), error = %first, "taskbar step failed");
        report.failed += 1;
    }
}
