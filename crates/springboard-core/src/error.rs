use thiserror::Error;

use crate::WindowHandle;

/// Failure of a single query or mutation on a foreign window.
///
/// These are expected: the target belongs to another process and can
/// vanish or refuse access at any time. Batch operations count and log
/// them; they never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("window {0} is no longer valid")]
    InvalidHandle(WindowHandle),

    #[error("access denied for window {0}")]
    AccessDenied(WindowHandle),

    #[error("{operation} failed for window {handle}: {message}")]
    Os {
        handle: WindowHandle,
        operation: &'static str,
        message: String,
    },

    #[error("display query failed: {0}")]
    Display(String),
}

impl MutationError {
    /// Returns `true` when the window is simply gone.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::InvalidHandle(_))
    }
}

pub type MutationResult<T> = Result<T, MutationError>;

/// Failure to acquire a process-wide resource.
///
/// Reported to the caller, which keeps running in a degraded mode
/// (e.g. without Windows-key interception).
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to install keyboard hook: {0}")]
    HookInstall(String),

    #[error("a keyboard hook is already installed on this thread")]
    HookAlreadyInstalled,

    #[error("shell registration failed: {0}")]
    ShellRegistration(String),

    #[error("taskbar window not found")]
    TaskbarNotFound,

    #[error("desktop container window not found")]
    DesktopNotFound,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("event loop failed: {0}")]
    EventLoop(String),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
