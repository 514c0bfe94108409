pub mod daemon;
pub mod debug;
pub mod init;
pub mod start;
pub mod status;
pub mod stop;

/// Exits with an error for commands that need the Win32 backend.
#[cfg(not(windows))]
pub fn unsupported(command: &str) -> ! {
    eprintln!("Error: `springboard {command}` requires Windows.");
    std::process::exit(1);
}
