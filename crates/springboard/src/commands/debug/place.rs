use clap::Args;

/// Arguments for the `debug place` subcommand.
#[derive(Args)]
pub struct PlaceArgs {
    /// Window handle (decimal or hex with 0x prefix)
    #[arg(long)]
    hwnd: String,
    /// Make the window topmost and focus it instead
    #[arg(long)]
    topmost: bool,
}

#[cfg(windows)]
pub fn execute(args: &PlaceArgs) {
    use springboard_core::WindowHandle;
    use springboard_windows::desktop;

    let handle = match super::parse_hwnd(&args.hwnd) {
        Ok(raw) => WindowHandle::from_raw(raw),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = if args.topmost {
        desktop::force_always_on_top(handle).map_err(Into::into)
    } else {
        match desktop::find_desktop_container() {
            Ok(container) => println!("Desktop container: {container}"),
            Err(e) => eprintln!("Warning: {e}"),
        }
        desktop::place_above_desktop_below_apps(handle)
    };

    match result {
        Ok(()) => println!("Placed window {handle}."),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(windows))]
pub fn execute(_args: &PlaceArgs) {
    super::super::unsupported("debug place")
}
