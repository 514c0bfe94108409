use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::{MutationError, Rect};
use crate::testing::FakeDesktop;

/// Pretends every window belongs to `C:\apps\<title>.exe`, except
/// windows titled "No Icon".
struct TitleIcons;

impl IconSource for TitleIcons {
    fn icon_for(&self, attrs: &WindowAttributes) -> Option<IconRef> {
        if attrs.title == "No Icon" {
            return None;
        }
        Some(IconRef::Executable(PathBuf::from(format!(
            "C:\\apps\\{}.exe",
            attrs.title
        ))))
    }
}

fn rules() -> ClassifierRules {
    ClassifierRules {
        exclude_titles: vec!["Springboard".into()],
        ..Default::default()
    }
}

fn refreshed(desktop: &FakeDesktop) -> WindowInventory {
    let mut inventory = WindowInventory::new();
    inventory.refresh(desktop, &rules(), &TitleIcons).unwrap();
    inventory
}

#[test]
fn observe_lists_manageable_windows_with_icons() {
    // Arrange
    let desktop = FakeDesktop::new();
    let editor = desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    desktop.add_window("Springboard", Rect::new(0, 0, 1920, 32));
    desktop.add_tool_window("Palette", Rect::new(0, 0, 200, 200));
    let minimized = desktop.add_minimized("Mail", Rect::new(0, 0, 800, 600));

    // Act
    let observed = observe(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0].handle, editor);
    assert_eq!(
        observed[0].icon,
        Some(IconRef::Executable(PathBuf::from("C:\\apps\\Editor.exe")))
    );
    assert!(!observed[0].minimized);
    assert_eq!(observed[1].handle, minimized);
    assert!(observed[1].minimized);
}

#[test]
fn missing_icon_keeps_the_entry() {
    // Arrange
    let desktop = FakeDesktop::new();
    desktop.add_window("No Icon", Rect::new(0, 0, 800, 600));

    // Act
    let observed = observe(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].icon, None);
}

#[test]
fn unreadable_window_does_not_abort_the_batch() {
    // Arrange
    let desktop = FakeDesktop::new();
    let editor = desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    let elevated = desktop.add_window("Task Manager", Rect::new(0, 0, 800, 600));
    let mail = desktop.add_window("Mail", Rect::new(0, 0, 800, 600));
    desktop.deny_query(elevated, "attributes");

    // Act
    let observed = observe(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    let handles: Vec<_> = observed.iter().map(|e| e.handle).collect();
    assert_eq!(handles, vec![editor, mail]);
}

#[test]
fn diff_reports_added_updated_and_removed() {
    // Arrange
    let desktop = FakeDesktop::new();
    let kept = desktop.add_window("Kept", Rect::new(0, 0, 800, 600));
    let renamed = desktop.add_window("Before", Rect::new(0, 0, 800, 600));
    let closed = desktop.add_window("Closed", Rect::new(0, 0, 800, 600));
    let inventory = refreshed(&desktop);

    desktop.close(closed);
    desktop.set_title(renamed, "After");
    let added = desktop.add_window("New", Rect::new(0, 0, 800, 600));

    // Act
    let observed = observe(&desktop, &rules(), &TitleIcons).unwrap();
    let changes = inventory.diff(&observed);

    // Assert
    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0], InventoryChange::Removed(closed));
    assert!(matches!(&changes[1], InventoryChange::Updated(e) if e.handle == renamed && e.title == "After"));
    assert!(matches!(&changes[2], InventoryChange::Added(e) if e.handle == added));
    assert!(!changes.iter().any(|c| matches!(c, InventoryChange::Updated(e) if e.handle == kept)));
}

#[test]
fn unchanged_desktop_produces_no_changes() {
    // Arrange
    let desktop = FakeDesktop::new();
    desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    let mut inventory = refreshed(&desktop);

    // Act
    let count = inventory.refresh(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    assert_eq!(count, 0);
    assert_eq!(inventory.len(), 1);
}

#[test]
fn apply_keeps_first_seen_order() {
    // Arrange
    let desktop = FakeDesktop::new();
    let first = desktop.add_window("First", Rect::new(0, 0, 800, 600));
    let second = desktop.add_window("Second", Rect::new(0, 0, 800, 600));
    let mut inventory = refreshed(&desktop);

    // Act
    desktop.set_title(first, "First (edited)");
    let third = desktop.add_window("Third", Rect::new(0, 0, 800, 600));
    inventory.refresh(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    let handles: Vec<_> = inventory.snapshot().iter().map(|e| e.handle).collect();
    assert_eq!(handles, vec![first, second, third]);
    assert_eq!(inventory.get(first).unwrap().title, "First (edited)");
}

#[test]
fn listeners_see_each_non_empty_batch() {
    // Arrange
    let desktop = FakeDesktop::new();
    desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    let batches = Rc::new(RefCell::new(Vec::new()));
    let mut inventory = WindowInventory::new();
    let seen = batches.clone();
    inventory.on_changed(move |changes| seen.borrow_mut().push(changes.len()));

    // Act
    inventory.refresh(&desktop, &rules(), &TitleIcons).unwrap();
    inventory.refresh(&desktop, &rules(), &TitleIcons).unwrap();

    // Assert
    assert_eq!(*batches.borrow(), vec![1]);
}

#[test]
fn restore_unminimizes_and_focuses() {
    // Arrange
    let desktop = FakeDesktop::new();
    let mail = desktop.add_minimized("Mail", Rect::new(10, 20, 800, 600));
    let mut inventory = refreshed(&desktop);

    // Act
    inventory.restore(&desktop, mail).unwrap();

    // Assert
    assert_eq!(desktop.rect_of(mail), Rect::new(10, 20, 800, 600));
    assert_eq!(
        desktop.mutations_of(mail),
        vec!["set_minimized", "bring_to_foreground"]
    );
    assert!(!inventory.get(mail).unwrap().minimized);
}

#[test]
fn restore_of_visible_window_only_focuses() {
    // Arrange
    let desktop = FakeDesktop::new();
    let editor = desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    let mut inventory = refreshed(&desktop);

    // Act
    inventory.restore(&desktop, editor).unwrap();

    // Assert
    assert_eq!(desktop.mutations_of(editor), vec!["bring_to_foreground"]);
}

#[test]
fn restore_of_closed_window_fails() {
    // Arrange
    let desktop = FakeDesktop::new();
    let editor = desktop.add_window("Editor", Rect::new(0, 0, 800, 600));
    let mut inventory = refreshed(&desktop);
    desktop.close(editor);

    // Act
    let result = inventory.restore(&desktop, editor);

    // Assert
    assert_eq!(result, Err(MutationError::InvalidHandle(editor)));
}

#[test]
fn minimize_all_skips_failures_and_already_minimized() {
    // Arrange
    let desktop = FakeDesktop::new();
    let a = desktop.add_window("A", Rect::new(0, 0, 800, 600));
    let locked = desktop.add_window("Locked", Rect::new(0, 0, 800, 600));
    let already = desktop.add_minimized("Already", Rect::new(0, 0, 800, 600));
    desktop.deny_mutations(locked);
    let mut inventory = refreshed(&desktop);

    // Act
    let count = inventory.minimize_all(&desktop);

    // Assert
    assert_eq!(count, 1);
    assert!(inventory.get(a).unwrap().minimized);
    assert!(!inventory.get(locked).unwrap().minimized);
    assert_eq!(desktop.mutation_count(already), 0);
}
