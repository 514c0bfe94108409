use tracing::debug;

use crate::config::ShellConfig;
use crate::{MutationResult, WindowAttributes, WindowRegistry};

/// Self-exclusion rules: windows the shell must never manage because
/// they are its own chrome or part of the native desktop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierRules {
    /// Exact titles to reject (case-insensitive).
    pub exclude_titles: Vec<String>,
    /// Exact class names to reject (case-insensitive).
    pub exclude_classes: Vec<String>,
    /// Reject every window owned by this process.
    pub exclude_process: Option<u32>,
}

impl ClassifierRules {
    /// Builds the rules from the `[shell]` configuration section.
    pub fn from_config(shell: &ShellConfig) -> Self {
        Self {
            exclude_titles: shell.exclude_titles.clone(),
            exclude_classes: shell.exclude_classes.clone(),
            exclude_process: None,
        }
    }

    /// Additionally rejects all windows of the given process.
    pub fn with_process(mut self, pid: u32) -> Self {
        self.exclude_process = Some(pid);
        self
    }

    fn excludes(&self, attrs: &WindowAttributes) -> bool {
        if self.exclude_process == Some(attrs.process_id) {
            return true;
        }
        let title_hit = self
            .exclude_titles
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&attrs.title));
        let class_hit = self
            .exclude_classes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&attrs.class_name));
        title_hit || class_hit
    }
}

/// Returns whether a window is a real application window the shell may
/// manage.
///
/// Visible, titled, not a tool window, and not excluded by `rules`.
/// Deterministic and free of I/O.
pub fn is_manageable(attrs: &WindowAttributes, rules: &ClassifierRules) -> bool {
    attrs.is_visible()
        && !attrs.title.is_empty()
        && !attrs.is_tool_window()
        && !rules.excludes(attrs)
}

/// Enumerates the registry and returns the attributes of every
/// manageable window, in z-order.
///
/// Windows that disappear between enumeration and the attribute query
/// are skipped.
pub fn manageable_windows<R: WindowRegistry + ?Sized>(
    registry: &R,
    rules: &ClassifierRules,
) -> MutationResult<Vec<WindowAttributes>> {
    let mut windows = Vec::new();
    for (z_order, handle) in registry.enumerate()?.into_iter().enumerate() {
        match registry.attributes_at(handle, z_order) {
            Ok(attrs) if is_manageable(&attrs, rules) => windows.push(attrs),
            Ok(_) => {}
            Err(e) => debug!(hwnd = %handle, error = %e, "skipping window"),
        }
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDesktop;
    use crate::{Rect, WindowHandle, WindowStyle};

    fn attrs(title: &str, class: &str, style: WindowStyle) -> WindowAttributes {
        WindowAttributes {
            handle: WindowHandle::from_raw(0x100),
            title: title.into(),
            class_name: class.into(),
            process_id: 42,
            rect: Rect::new(0, 0, 800, 600),
            style,
            z_order: 0,
        }
    }

    fn rules() -> ClassifierRules {
        ClassifierRules {
            exclude_titles: vec!["Springboard".into()],
            exclude_classes: vec!["Shell_TrayWnd".into()],
            exclude_process: None,
        }
    }

    #[test]
    fn visible_titled_window_is_manageable() {
        let window = attrs("Untitled - Notepad", "Notepad", WindowStyle::VISIBLE);
        assert!(is_manageable(&window, &rules()));
    }

    #[test]
    fn tool_window_is_always_rejected() {
        // Arrange
        let window = attrs(
            "Palette",
            "Tool",
            WindowStyle::VISIBLE | WindowStyle::TOOL_WINDOW,
        );

        // Assert
        assert!(!is_manageable(&window, &rules()));
        assert!(!is_manageable(&window, &ClassifierRules::default()));
    }

    #[test]
    fn empty_title_is_always_rejected() {
        let window = attrs("", "Notepad", WindowStyle::VISIBLE);
        assert!(!is_manageable(&window, &ClassifierRules::default()));
    }

    #[test]
    fn hidden_window_is_rejected() {
        let window = attrs("Editor", "Notepad", WindowStyle::empty());
        assert!(!is_manageable(&window, &rules()));
    }

    #[test]
    fn minimized_window_is_still_manageable() {
        let window = attrs("Editor", "Notepad", WindowStyle::VISIBLE | WindowStyle::MINIMIZED);
        assert!(is_manageable(&window, &rules()));
    }

    #[test]
    fn own_title_and_class_are_excluded_case_insensitively() {
        // Arrange
        let own_title = attrs("springboard", "Whatever", WindowStyle::VISIBLE);
        let taskbar = attrs("Taskbar", "shell_traywnd", WindowStyle::VISIBLE);

        // Assert
        assert!(!is_manageable(&own_title, &rules()));
        assert!(!is_manageable(&taskbar, &rules()));
    }

    #[test]
    fn title_denylist_is_exact_match() {
        let window = attrs("Springboard notes.txt", "Notepad", WindowStyle::VISIBLE);
        assert!(is_manageable(&window, &rules()));
    }

    #[test]
    fn own_process_is_excluded() {
        // Arrange
        let window = attrs("Launchpad", "Overlay", WindowStyle::VISIBLE);

        // Act
        let rules = rules().with_process(42);

        // Assert
        assert!(!is_manageable(&window, &rules));
    }

    #[test]
    fn classification_is_deterministic() {
        let window = attrs("Editor", "Notepad", WindowStyle::VISIBLE);
        let first = is_manageable(&window, &rules());
        for _ in 0..10 {
            assert_eq!(is_manageable(&window, &rules()), first);
        }
    }

    #[test]
    fn manageable_windows_filters_and_keeps_z_order() {
        // Arrange
        let desktop = FakeDesktop::new();
        let a = desktop.add_window("A", Rect::new(0, 0, 100, 100));
        let _tool = desktop.add_tool_window("Tool", Rect::new(0, 0, 100, 100));
        let b = desktop.add_window("B", Rect::new(0, 0, 100, 100));

        // Act
        let windows = manageable_windows(&desktop, &ClassifierRules::default()).unwrap();

        // Assert
        let handles: Vec<_> = windows.iter().map(|w| w.handle).collect();
        assert_eq!(handles, vec![a, b]);
    }
}
