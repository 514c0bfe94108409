//! Win32 backend for Springboard.
#![cfg(windows)]

/// Ctrl+C handling for a foreground daemon.
pub mod ctrl_c;

/// Daemon main loop and lifecycle control.
pub mod daemon;

/// Shell registration and z-order placement.
pub mod desktop;

/// Top-level window enumeration and lookup.
pub mod enumerate;

/// Message-pump thread and event sink window.
pub mod event_loop;

/// DWM invisible-border compensation.
pub mod frame;

/// Executable-path icon resolution.
pub mod icon;

/// Low-level Windows-key hook.
pub mod keyboard;

/// Monitor geometry.
pub mod monitor;

/// Process utilities (alive check, image path, DPI awareness).
pub mod process;

/// `WindowRegistry` implementation over Win32.
pub mod registry;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use daemon::{DaemonInfo, find_running, request_stop};
pub use icon::ExecutableIcons;
pub use registry::Win32Registry;
pub use window::Window;
