use springboard_core::{InventoryEntry, MetaKeyPress, ReservedRegion, WindowRegistry};
use tracing::{debug, info, warn};

use super::daemon_types::Shell;

/// A Windows-key press goes home: every listed window is minimized.
///
/// `press` is dropped on return, which re-arms the keyboard filter.
pub(super) fn handle_meta_key(press: MetaKeyPress, shell: &mut Shell) {
    let minimized = shell.inventory.minimize_all(&shell.registry);
    info!(vk = press.vk(), minimized, "Windows key pressed");
}

pub(super) fn handle_inventory(observed: Vec<InventoryEntry>, shell: &mut Shell) {
    let changes = shell.inventory.diff(&observed);
    if !changes.is_empty() {
        shell.inventory.apply(changes);
    }
}

/// Recomputes the reserved region after a display change.
pub(super) fn handle_display_changed(shell: &mut Shell) {
    let mut resizer = shell.resizer.borrow_mut();
    if !resizer.is_active() {
        return;
    }
    debug!("display changed, re-applying reservation");
    resizer.deactivate(&shell.registry);
    match reserved_region(shell) {
        Some(region) => {
            resizer.activate(&shell.registry, region);
        }
        None => warn!("reservation dropped after display change"),
    }
}

pub(super) fn handle_taskbar_tick(shell: &mut Shell) {
    if let Some(report) = shell.taskbar.borrow_mut().enforce(&shell.registry) {
        info!(bars = report.bars, failed = report.failed, "taskbar re-hidden");
    }
}

/// Pushes windows opened or maximized since the last check out of the
/// strip. Does nothing once the reservation has been dropped.
pub(super) fn handle_reservation_tick(shell: &mut Shell) {
    shell.resizer.borrow_mut().enforce(&shell.registry);
}

/// The status bar strip along the top of the primary display, or `None`
/// when reservation is disabled or the display cannot be queried.
pub(super) fn reserved_region(shell: &Shell) -> Option<ReservedRegion> {
    let height = shell.config.status_bar.height;
    if height <= 0 {
        return None;
    }
    match shell.registry.primary_bounds() {
        Ok(display) => Some(ReservedRegion::top_of(display, height)),
        Err(e) => {
            warn!(error = %e, "primary display query failed");
            None
        }
    }
}
