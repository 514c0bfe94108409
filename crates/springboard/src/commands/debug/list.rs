use clap::Args;
use serde::Serialize;

use springboard_core::{
    ClassifierRules, IconRef, Rect, WindowAttributes, WindowHandle, is_manageable,
};

/// Arguments for the `debug list` subcommand.
#[derive(Args)]
pub struct ListArgs {
    /// Include every top-level window, not just manageable ones
    #[arg(long)]
    all: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// One window as printed by `debug list`.
#[derive(Debug, Serialize)]
#[cfg_attr(not(windows), allow(dead_code))]
struct Row {
    handle: WindowHandle,
    title: String,
    class_name: String,
    process_id: u32,
    rect: Rect,
    flags: String,
    manageable: bool,
    icon: Option<IconRef>,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl Row {
    fn new(attrs: WindowAttributes, rules: &ClassifierRules, icon: Option<IconRef>) -> Self {
        let manageable = is_manageable(&attrs, rules);
        Self {
            flags: flags(&attrs),
            handle: attrs.handle,
            title: attrs.title,
            class_name: attrs.class_name,
            process_id: attrs.process_id,
            rect: attrs.rect,
            manageable,
            icon,
        }
    }
}

/// Compact style summary: V(isible), T(ool), M(aximized), m(inimized).
#[cfg_attr(not(windows), allow(dead_code))]
fn flags(attrs: &WindowAttributes) -> String {
    [
        (attrs.is_visible(), 'V'),
        (attrs.is_tool_window(), 'T'),
        (attrs.is_maximized(), 'M'),
        (attrs.is_minimized(), 'm'),
    ]
    .into_iter()
    .filter_map(|(set, c)| set.then_some(c))
    .collect()
}

#[cfg(windows)]
pub fn execute(args: &ListArgs) {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
    use springboard_core::{IconSource, WindowRegistry, config};
    use springboard_windows::{ExecutableIcons, Win32Registry, process};

    process::enable_dpi_awareness();
    let registry = Win32Registry::new();
    let icons = ExecutableIcons::new();
    let rules = ClassifierRules::from_config(&config::load().shell);

    let handles = match registry.enumerate() {
        Ok(handles) => handles,
        Err(e) => {
            eprintln!("Error: failed to enumerate windows: {e}");
            std::process::exit(1);
        }
    };

    let rows: Vec<Row> = handles
        .into_iter()
        .enumerate()
        .filter_map(|(z_order, handle)| registry.attributes_at(handle, z_order).ok())
        .map(|attrs| {
            let icon = icons.icon_for(&attrs);
            Row::new(attrs, &rules, icon)
        })
        .filter(|row| args.all || row.manageable)
        .collect();

    if args.json {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Class"),
            Cell::new("PID").set_alignment(CellAlignment::Right),
            Cell::new("Rect"),
            Cell::new("Flags"),
            Cell::new("Managed"),
            Cell::new("Executable"),
        ]);

    for row in &rows {
        let exe = row
            .icon
            .as_ref()
            .and_then(|icon| icon.path().file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(row.handle),
            Cell::new(&row.title),
            Cell::new(&row.class_name),
            Cell::new(row.process_id).set_alignment(CellAlignment::Right),
            Cell::new(row.rect),
            Cell::new(&row.flags),
            Cell::new(if row.manageable { "yes" } else { "no" }),
            Cell::new(exe),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found", rows.len());
}

#[cfg(not(windows))]
pub fn execute(_args: &ListArgs) {
    super::super::unsupported("debug list")
}
