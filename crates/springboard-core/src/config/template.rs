/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `springboard init` to create a starter config file.
pub fn generate_config() -> String {
    r##"# Springboard configuration
# Location: ~/.config/springboard/config.toml

[status_bar]
# Height in pixels of the strip reserved at the top of the primary
# monitor. Windows overlapping it are pushed below. 0 disables it.
height = 32
# Windows that would become shorter than this are left untouched.
min_window_height = 100
# How often (ms) windows that moved into the strip are pushed back out.
check_interval_ms = 1000

[taskbar]
# Hide the Windows taskbar while Springboard runs.
hide = true
# How often (ms) to re-hide the taskbar if explorer brings it back.
check_interval_ms = 2000

[inventory]
# How often (ms) the window list is refreshed.
poll_interval_ms = 1000

[keyboard]
# Swallow the Windows key so it opens Springboard instead of Start.
intercept_meta = true

[shell]
# Register as the system shell window. Only useful when explorer is
# not running.
register_as_shell = false
# Windows that are never moved or listed (exact, case-insensitive).
exclude_titles = ["Springboard"]
exclude_classes = [
    "SpringboardEventSink",
    "Shell_TrayWnd",
    "Shell_SecondaryTrayWnd",
    "Progman",
    "WorkerW",
]

[logging]
# Enable file logging to ~/.config/springboard/logs/.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
# The SPRINGBOARD_LOG environment variable overrides this.
level = "info"
# Number of daily log files to keep.
max_files = 5
"##
    .to_string()
}
