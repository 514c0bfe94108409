#[cfg(windows)]
pub fn execute() {
    if let Err(e) = springboard_windows::daemon::run() {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported("daemon")
}
