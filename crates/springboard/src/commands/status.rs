#[cfg(windows)]
pub fn execute() {
    match springboard_windows::find_running() {
        Some(daemon) => println!(
            "Springboard is running (PID: {}, sink window {}).",
            daemon.pid, daemon.sink
        ),
        None => println!("Springboard is not running."),
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported("status")
}
