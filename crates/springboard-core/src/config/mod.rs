mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

pub use crate::log::LogConfig;
pub use loader::{config_dir, config_path, load, try_load};

/// Top-level configuration for Springboard.
///
/// Loaded from `~/.config/springboard/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub status_bar: StatusBarConfig,
    pub taskbar: TaskbarConfig,
    pub inventory: InventoryConfig,
    pub keyboard: KeyboardConfig,
    pub shell: ShellConfig,
    pub logging: LogConfig,
}

/// Reserved screen region for the status bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusBarConfig {
    /// Height of the reserved strip in pixels. `0` disables reservation.
    pub height: i32,
    /// Windows that would end up shorter than this are left alone.
    pub min_window_height: i32,
    /// How often windows that entered the strip are pushed back out.
    pub check_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskbarConfig {
    /// Hide the native taskbar while the daemon runs.
    pub hide: bool,
    /// How often to check that the taskbar is still hidden.
    pub check_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Install the low-level hook that swallows the Windows key.
    pub intercept_meta: bool,
}

/// Shell integration and self-exclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Declare the daemon's window as the shell and task-manager window.
    pub register_as_shell: bool,
    /// Window titles never managed (exact, case-insensitive).
    pub exclude_titles: Vec<String>,
    /// Window classes never managed (exact, case-insensitive).
    pub exclude_classes: Vec<String>,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            height: 32,
            min_window_height: crate::reservation::DEFAULT_MIN_WINDOW_HEIGHT,
            check_interval_ms: 1000,
        }
    }
}

impl Default for TaskbarConfig {
    fn default() -> Self {
        Self {
            hide: true,
            check_interval_ms: 2000,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            intercept_meta: true,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            register_as_shell: false,
            exclude_titles: vec!["Springboard".into()],
            exclude_classes: [
                "SpringboardEventSink",
                "Shell_TrayWnd",
                "Shell_SecondaryTrayWnd",
                "Progman",
                "WorkerW",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl StatusBarConfig {
    pub const MAX_HEIGHT: i32 = 200;

    /// Clamps a strip height to `0..=MAX_HEIGHT`.
    pub fn clamp_height(height: i32) -> i32 {
        height.clamp(0, Self::MAX_HEIGHT)
    }
}

impl Config {
    /// Clamps values to safe ranges.
    ///
    /// Keeps polling intervals from spinning the CPU and stops a typo
    /// from reserving most of the screen.
    pub fn validate(&mut self) {
        self.status_bar.height = StatusBarConfig::clamp_height(self.status_bar.height);
        self.status_bar.min_window_height = self.status_bar.min_window_height.clamp(20, 1000);
        self.status_bar.check_interval_ms = self.status_bar.check_interval_ms.clamp(250, 60_000);
        self.taskbar.check_interval_ms = self.taskbar.check_interval_ms.clamp(250, 60_000);
        self.inventory.poll_interval_ms = self.inventory.poll_interval_ms.clamp(100, 60_000);
        self.logging.max_files = self.logging.max_files.clamp(1, 100);
    }
}
