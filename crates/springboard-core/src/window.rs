use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Opaque identifier for a top-level window.
///
/// The window is owned by some other process and may be destroyed at any
/// moment, so a handle is only ever a hint: every query or mutation made
/// with it can fail with [`MutationError::InvalidHandle`](crate::MutationError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(usize);

impl WindowHandle {
    /// Wraps a raw pointer-sized handle value.
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

bitflags! {
    /// The subset of window style bits the shell cares about.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WindowStyle: u32 {
        const VISIBLE = 1 << 0;
        const TOOL_WINDOW = 1 << 1;
        const MAXIMIZED = 1 << 2;
        const MINIMIZED = 1 << 3;
    }
}

/// A snapshot of a window's attributes.
///
/// Recomputed on demand and never cached beyond a single enumeration
/// pass, because the owning process can change any of it at will.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub handle: WindowHandle,
    pub title: String,
    pub class_name: String,
    pub process_id: u32,
    pub rect: Rect,
    pub style: WindowStyle,
    /// Position in the enumeration order (0 = topmost).
    pub z_order: usize,
}

impl WindowAttributes {
    pub fn is_visible(&self) -> bool {
        self.style.contains(WindowStyle::VISIBLE)
    }

    pub fn is_tool_window(&self) -> bool {
        self.style.contains(WindowStyle::TOOL_WINDOW)
    }

    pub fn is_maximized(&self) -> bool {
        self.style.contains(WindowStyle::MAXIMIZED)
    }

    pub fn is_minimized(&self) -> bool {
        self.style.contains(WindowStyle::MINIMIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_displays_as_hex() {
        assert_eq!(WindowHandle::from_raw(0x1A2B).to_string(), "0x1A2B");
    }

    #[test]
    fn handle_serializes_as_plain_integer() {
        // Arrange
        #[derive(Serialize)]
        struct Wrapper {
            handle: WindowHandle,
        }

        // Act
        let text = toml::to_string(&Wrapper {
            handle: WindowHandle::from_raw(42),
        })
        .unwrap();

        // Assert
        assert_eq!(text.trim(), "handle = 42");
    }

    #[test]
    fn style_queries_reflect_flags() {
        // Arrange
        let attrs = WindowAttributes {
            handle: WindowHandle::from_raw(1),
            title: "Editor".into(),
            class_name: "Notepad".into(),
            process_id: 7,
            rect: Rect::new(0, 0, 10, 10),
            style: WindowStyle::VISIBLE | WindowStyle::MAXIMIZED,
            z_order: 0,
        };

        // Assert
        assert!(attrs.is_visible());
        assert!(attrs.is_maximized());
        assert!(!attrs.is_minimized());
        assert!(!attrs.is_tool_window());
    }
}
