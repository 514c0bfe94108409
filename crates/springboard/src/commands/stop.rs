#[cfg(windows)]
pub fn execute() {
    use std::time::{Duration, Instant};

    use springboard_windows::process;

    /// How long to wait for the daemon to restore the desktop and exit.
    const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

    let Some(daemon) = springboard_windows::find_running() else {
        println!("Springboard is not running.");
        return;
    };

    match springboard_windows::request_stop() {
        Ok(true) => {}
        Ok(false) => {
            println!("Springboard is not running.");
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let deadline = Instant::now() + EXIT_TIMEOUT;
    while process::is_process_alive(daemon.pid) {
        if Instant::now() >= deadline {
            eprintln!(
                "Springboard (PID {}) did not exit within {}s.",
                daemon.pid,
                EXIT_TIMEOUT.as_secs()
            );
            std::process::exit(1);
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    println!("Springboard stopped.");
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported("stop")
}
