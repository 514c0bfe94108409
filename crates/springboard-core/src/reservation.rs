//! Status-bar reservation: keeps foreign windows out of the strip at the
//! top of the primary display that the status bar occupies.
//!
//! [`OverlapResizer::activate`] pushes every overlapping window below the
//! strip and remembers where it was; [`OverlapResizer::deactivate`] puts
//! every remembered window back. Nothing is mutated without first saving
//! enough state to undo it.

use tracing::{debug, info, warn};

use crate::classifier::{self, ClassifierRules};
use crate::{MutationResult, Rect, WindowAttributes, WindowHandle, WindowRegistry};

/// Windows that would end up shorter than this are left alone.
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 100;

/// The screen strip the status bar occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRegion {
    rect: Rect,
}

impl ReservedRegion {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// A strip of `height` pixels along the top edge of `display`.
    pub fn top_of(display: Rect, height: i32) -> Self {
        Self::new(Rect::new(display.x, display.y, display.width, height.max(0)))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn top(&self) -> i32 {
        self.rect.y
    }

    pub fn bottom(&self) -> i32 {
        self.rect.bottom()
    }

    /// Returns whether a window rectangle shares rows with the region.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        rect.overlaps_vertically(&self.rect)
    }
}

/// What a window looked like before the resizer touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedWindowState {
    pub original_rect: Rect,
    pub original_maximized: bool,
    /// Restore rectangle at save time. Differs from `original_rect` only
    /// for maximized windows.
    pub normal_rect: Rect,
}

/// Outcome of [`OverlapResizer::activate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationReport {
    /// Windows moved out of the region.
    pub affected: usize,
    /// Manageable windows left untouched (no overlap, minimized, or too small).
    pub skipped: usize,
    /// Windows whose mutation failed.
    pub failed: usize,
}

/// Outcome of [`OverlapResizer::deactivate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    /// Tracked windows that were closed before they could be restored.
    pub vanished: usize,
    pub failed: usize,
}

enum Outcome {
    Affected,
    Skipped,
    Failed,
}

/// Moves windows out of the reserved region and back again.
///
/// Single-writer: only the thread that owns the resizer touches the
/// saved-state list, so save-then-mutate for one window is never
/// interleaved with anything else.
pub struct OverlapResizer {
    rules: ClassifierRules,
    min_window_height: i32,
    region: Option<ReservedRegion>,
    /// Saved state in the order the windows were mutated (z-order).
    tracked: Vec<(WindowHandle, SavedWindowState)>,
    /// Windows whose move failed this session; `enforce` leaves them be.
    refused: Vec<WindowHandle>,
}

impl OverlapResizer {
    pub fn new(rules: ClassifierRules, min_window_height: i32) -> Self {
        Self {
            rules,
            min_window_height,
            region: None,
            tracked: Vec::new(),
            refused: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    /// The region of the current session, if active.
    pub fn region(&self) -> Option<ReservedRegion> {
        self.region
    }

    pub fn min_window_height(&self) -> i32 {
        self.min_window_height
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn tracked_handles(&self) -> impl Iterator<Item = WindowHandle> + '_ {
        self.tracked.iter().map(|(h, _)| *h)
    }

    pub fn saved_state(&self, handle: WindowHandle) -> Option<&SavedWindowState> {
        self.tracked
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, s)| s)
    }

    /// Pushes every manageable window that overlaps `region` below it.
    ///
    /// A no-op when already active; to move to a new region the caller
    /// must [`deactivate`](Self::deactivate) first. Per-window failures
    /// are logged and counted, never propagated.
    pub fn activate<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
        region: ReservedRegion,
    ) -> ReservationReport {
        if self.is_active() {
            debug!("reservation already active");
            return ReservationReport::default();
        }
        if !self.tracked.is_empty() {
            // Left over from an interrupted session: put those back first
            // so no window is ever saved twice.
            warn!(count = self.tracked.len(), "restoring stale reservation state");
            self.restore_tracked(registry);
        }

        let report = self.reserve_all(registry, region, |_| true);
        self.region = Some(region);
        info!(
            region = %region.rect(),
            affected = report.affected,
            skipped = report.skipped,
            failed = report.failed,
            "reservation activated"
        );
        report
    }

    /// Pushes windows that entered the region since activation below it.
    ///
    /// Covers windows opened, moved or maximized into the strip during
    /// the session. A window already tracked keeps the state saved the
    /// first time it was moved. Tracked windows that have been closed
    /// are forgotten, and a window whose move already failed this session
    /// is not retried. Returns `None` while inactive.
    pub fn enforce<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
    ) -> Option<ReservationReport> {
        let region = self.region?;
        self.tracked.retain(|(handle, _)| registry.is_valid(*handle));
        self.refused.retain(|handle| registry.is_valid(*handle));

        let refused = self.refused.clone();
        let report = self.reserve_all(registry, region, |attrs| {
            !refused.contains(&attrs.handle)
                && !attrs.is_minimized()
                && region.overlaps(&attrs.rect)
        });

        if report.affected > 0 || report.failed > 0 {
            info!(
                affected = report.affected,
                failed = report.failed,
                "reservation enforced"
            );
        }
        Some(report)
    }

    /// Restores every tracked window and clears the saved state.
    ///
    /// Safe to call at any time, including after an interrupted
    /// [`activate`](Self::activate); a no-op when nothing is tracked.
    pub fn deactivate<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> RestoreReport {
        if !self.is_active() && self.tracked.is_empty() {
            return RestoreReport::default();
        }
        let report = self.restore_tracked(registry);
        self.region = None;
        self.refused.clear();
        info!(
            restored = report.restored,
            vanished = report.vanished,
            failed = report.failed,
            "reservation deactivated"
        );
        report
    }

    /// Runs [`reserve_window`](Self::reserve_window) over every manageable
    /// window that `wanted` accepts. Enumeration failure yields an empty
    /// report.
    fn reserve_all<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
        region: ReservedRegion,
        wanted: impl Fn(&WindowAttributes) -> bool,
    ) -> ReservationReport {
        let mut report = ReservationReport::default();
        let windows = match classifier::manageable_windows(registry, &self.rules) {
            Ok(windows) => windows,
            Err(e) => {
                warn!(error = %e, "window enumeration failed");
                return report;
            }
        };

        for attrs in windows.iter().filter(|attrs| wanted(attrs)) {
            match self.reserve_window(registry, attrs, region) {
                Outcome::Affected => report.affected += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed => {
                    self.refused.push(attrs.handle);
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn reserve_window<R: WindowRegistry + ?Sized>(
        &mut self,
        registry: &R,
        attrs: &WindowAttributes,
        region: ReservedRegion,
    ) -> Outcome {
        let handle = attrs.handle;
        if attrs.is_minimized() || !region.overlaps(&attrs.rect) {
            return Outcome::Skipped;
        }

        let maximized = attrs.is_maximized();
        let target = if maximized {
            // The OS maximizes over the whole work area regardless of our
            // strip, so re-maximize by hand into the shrunk work area.
            match registry.work_area_for(handle) {
                Ok(work_area) => work_area.clip_top(region.bottom()),
                Err(e) => {
                    warn!(hwnd = %handle, error = %e, "no work area for maximized window");
                    return Outcome::Failed;
                }
            }
        } else {
            attrs.rect.clip_top(region.bottom())
        };

        if target.height < self.min_window_height {
            debug!(hwnd = %handle, target = %target, "window too small to shrink, leaving it");
            return Outcome::Skipped;
        }

        if self.saved_state(handle).is_none() {
            // Un-maximizing then resizing overwrites the restore rectangle,
            // so it has to be read first.
            let normal_rect = if maximized {
                match registry.normal_rect(handle) {
                    Ok(rect) => rect,
                    Err(e) => {
                        warn!(hwnd = %handle, error = %e, "no restore rectangle for maximized window");
                        return Outcome::Failed;
                    }
                }
            } else {
                attrs.rect
            };
            self.tracked.push((
                handle,
                SavedWindowState {
                    original_rect: attrs.rect,
                    original_maximized: maximized,
                    normal_rect,
                },
            ));
        }

        let result = if maximized {
            registry
                .set_maximized(handle, false)
                .and_then(|()| registry.set_rect(handle, &target))
        } else {
            registry.set_rect(handle, &target)
        };

        match result {
            Ok(()) => {
                debug!(hwnd = %handle, title = %attrs.title, from = %attrs.rect, to = %target, "window moved below reserved region");
                Outcome::Affected
            }
            Err(e) => {
                warn!(hwnd = %handle, title = %attrs.title, error = %e, "failed to move window");
                Outcome::Failed
            }
        }
    }

    fn restore_tracked<R: WindowRegistry + ?Sized>(&mut self, registry: &R) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (handle, saved) in std::mem::take(&mut self.tracked) {
            if !registry.is_valid(handle) {
                debug!(hwnd = %handle, "tracked window is gone");
                report.vanished += 1;
                continue;
            }
            match restore_window(registry, handle, &saved) {
                Ok(()) => report.restored += 1,
                Err(e) if e.is_invalid_handle() => report.vanished += 1,
                Err(e) => {
                    warn!(hwnd = %handle, error = %e, "failed to restore window");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

/// Puts one window back. A maximized window gets its restore rectangle
/// back together with the maximized state.
fn restore_window<R: WindowRegistry + ?Sized>(
    registry: &R,
    handle: WindowHandle,
    saved: &SavedWindowState,
) -> MutationResult<()> {
    if saved.original_maximized {
        registry.set_placement(handle, &saved.normal_rect, true)
    } else {
        registry.set_rect(handle, &saved.original_rect)
    }
}
