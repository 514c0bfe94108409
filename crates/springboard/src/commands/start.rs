#[cfg(windows)]
pub fn execute() {
    use std::os::windows::process::CommandExt;
    use std::process::{Command, Stdio};

    /// `CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP`: no console, and
    /// Ctrl+C in this terminal does not reach the daemon.
    const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

    if let Some(daemon) = springboard_windows::find_running() {
        println!("Springboard is already running (PID: {}).", daemon.pid);
        return;
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error: could not locate the springboard executable: {e}");
            std::process::exit(1);
        }
    };

    let spawned = Command::new(exe)
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();

    match spawned {
        Ok(mut child) => {
            let pid = child.id();
            let _ = child.try_wait();
            println!("Springboard started (PID: {pid}).");
            if let Some(path) = springboard_core::config::config_path() {
                println!("Config: {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: failed to start daemon: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported("start")
}
