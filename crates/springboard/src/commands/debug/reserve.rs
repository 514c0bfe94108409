use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use clap::Args;
use springboard_core::config::StatusBarConfig;

/// Arguments for the `debug reserve` subcommand.
#[derive(Args)]
pub struct ReserveArgs {
    /// Strip height in pixels (defaults to `status_bar.height` from the config)
    #[arg(long)]
    height: Option<i32>,
    /// How long to keep the reservation before restoring windows
    #[arg(long, default_value_t = 5)]
    seconds: u64,
}

#[cfg(windows)]
pub fn execute(args: &ReserveArgs) {
    use springboard_core::{
        ClassifierRules, OverlapResizer, ReservedRegion, WindowRegistry, config, log,
    };
    use springboard_windows::{Win32Registry, ctrl_c, process};

    process::enable_dpi_awareness();
    let config = config::load();
    let _guard = log::init(&log::LogConfig::default());

    let Some(height) = strip_height(args.height, config.status_bar.height) else {
        eprintln!("Error: a strip height of 0 reserves nothing");
        std::process::exit(1);
    };

    let registry = Win32Registry::new();
    let display = match registry.primary_bounds() {
        Ok(display) => display,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let region = ReservedRegion::top_of(display, height);

    let rules = ClassifierRules::from_config(&config.shell).with_process(std::process::id());
    let mut resizer = OverlapResizer::new(rules, config.status_bar.min_window_height);

    let interrupt = Interrupt::new();
    if let Err(e) = ctrl_c::set_handler(interrupt.trigger()) {
        eprintln!("Warning: {e}");
    }

    let report = resizer.activate(&registry, region);
    println!(
        "Reserved {}: {} moved, {} skipped, {} failed",
        region.rect(),
        report.affected,
        report.skipped,
        report.failed
    );

    // Either the timeout or Ctrl+C ends the wait; both restore.
    interrupt.wait(Duration::from_secs(args.seconds));

    let report = resizer.deactivate(&registry);
    println!(
        "Restored: {} restored, {} closed meanwhile, {} failed",
        report.restored, report.vanished, report.failed
    );
}

#[cfg(not(windows))]
pub fn execute(_args: &ReserveArgs) {
    super::super::unsupported("debug reserve")
}

/// The strip height to reserve, clamped like the config value.
/// `None` when nothing would be reserved.
#[cfg_attr(not(windows), allow(dead_code))]
fn strip_height(requested: Option<i32>, configured: i32) -> Option<i32> {
    let height = StatusBarConfig::clamp_height(requested.unwrap_or(configured));
    (height > 0).then_some(height)
}

/// Ctrl+C as a channel. Holds its own sender, so the wait lasts the full
/// timeout even when no handler could be installed.
#[cfg_attr(not(windows), allow(dead_code))]
struct Interrupt {
    tx: Sender<()>,
    rx: Receiver<()>,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl Interrupt {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A callback that ends the wait.
    fn trigger(&self) -> impl Fn() + Send + Sync + 'static {
        let tx = self.tx.clone();
        move || {
            let _ = tx.send(());
        }
    }

    /// Blocks for `timeout` or until triggered. Returns whether it was
    /// triggered.
    fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn height_falls_back_to_config_and_is_clamped() {
        assert_eq!(strip_height(None, 32), Some(32));
        assert_eq!(strip_height(Some(48), 32), Some(48));
        assert_eq!(strip_height(Some(5000), 32), Some(200));
    }

    #[test]
    fn zero_or_negative_height_reserves_nothing() {
        assert_eq!(strip_height(Some(0), 32), None);
        assert_eq!(strip_height(Some(-40), 32), None);
        assert_eq!(strip_height(None, 0), None);
    }

    #[test]
    fn wait_lasts_full_timeout_when_handler_is_gone() {
        // Arrange
        let interrupt = Interrupt::new();
        drop(interrupt.trigger());
        let started = Instant::now();

        // Act
        let triggered = interrupt.wait(Duration::from_millis(50));

        // Assert
        assert!(!triggered);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn trigger_ends_wait_early() {
        // Arrange
        let interrupt = Interrupt::new();
        let trigger = interrupt.trigger();
        let started = Instant::now();

        // Act
        trigger();
        let triggered = interrupt.wait(Duration::from_secs(10));

        // Assert
        assert!(triggered);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
