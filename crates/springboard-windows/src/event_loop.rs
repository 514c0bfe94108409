use std::cell::RefCell;
use std::sync::mpsc::{self, Sender};
use std::thread;

use springboard_core::{MetaKeyFilter, ShellError, ShellResult, WindowHandle};
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, MSG,
    PostThreadMessageW, RegisterClassW, TranslateMessage, WM_CLOSE, WM_DISPLAYCHANGE, WM_QUIT,
    WNDCLASSW, WS_EX_TOOLWINDOW,
};
use windows::core::w;

use crate::daemon::DaemonMsg;
use crate::keyboard;
use crate::window::Window;

/// Class of the hidden event sink window. Also how other processes find
/// a running daemon.
pub const SINK_CLASS: &str = "SpringboardEventSink";

/// Title of the event sink window.
pub const SINK_TITLE: &str = "SpringboardEventSink";

thread_local! {
    static SENDER: RefCell<Option<Sender<DaemonMsg>>> = const { RefCell::new(None) };
}

/// What the pump thread reports once it is running.
struct Ready {
    thread_id: u32,
    sink: WindowHandle,
    meta_hook: bool,
}

/// Starts the message-pump thread.
///
/// The thread owns the event sink window and, when `intercept_meta` is
/// set, the keyboard hook session. A failed hook install is logged and
/// the loop runs without it.
pub fn start(tx: Sender<DaemonMsg>, intercept_meta: bool) -> ShellResult<EventLoopHandle> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<Ready, String>>();

    let handle = thread::spawn(move || {
        let filter_tx = tx.clone();
        SENDER.with(|cell| *cell.borrow_mut() = Some(tx));

        // SAFETY: GetCurrentThreadId has no preconditions.
        let thread_id = unsafe { GetCurrentThreadId() };

        let Some(sink) = create_event_sink() else {
            let _ = ready_tx.send(Err(format!("failed to create {SINK_CLASS} window")));
            return;
        };

        let session = if intercept_meta {
            let filter = MetaKeyFilter::new(move |press| {
                let _ = filter_tx.send(DaemonMsg::MetaKey(press));
            });
            keyboard::install_meta_key_hook(filter)
                .inspect_err(|e| warn!(error = %e, "running without Windows-key interception"))
                .ok()
        } else {
            None
        };

        let _ = ready_tx.send(Ok(Ready {
            thread_id,
            sink: Window::new(sink).handle(),
            meta_hook: session.is_some(),
        }));

        run_message_pump();

        // The hook must come off on the thread that installed it.
        drop(session);
        // SAFETY: the sink was created on this thread.
        unsafe {
            let _ = DestroyWindow(sink);
        }
        SENDER.with(|cell| *cell.borrow_mut() = None);
        debug!("message pump stopped");
    });

    let ready = ready_rx
        .recv()
        .map_err(|_| ShellError::EventLoop("message pump thread exited unexpectedly".into()))?
        .map_err(ShellError::EventLoop)?;

    info!(sink = %ready.sink, meta_hook = ready.meta_hook, "message pump running");
    Ok(EventLoopHandle {
        thread_id: ready.thread_id,
        sink: ready.sink,
        meta_hook: ready.meta_hook,
        handle,
    })
}

/// Handle for controlling the message-pump thread from the daemon.
pub struct EventLoopHandle {
    thread_id: u32,
    sink: WindowHandle,
    meta_hook: bool,
    handle: thread::JoinHandle<()>,
}

impl EventLoopHandle {
    /// The hidden event sink window.
    pub fn sink(&self) -> WindowHandle {
        self.sink
    }

    /// Whether Windows-key interception is active.
    pub fn has_meta_hook(&self) -> bool {
        self.meta_hook
    }

    /// Signals the pump to quit and waits for the thread to finish.
    pub fn stop(self) {
        // SAFETY: posting WM_QUIT to a thread with a message queue.
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = self.handle.join();
    }
}

/// Blocks until WM_QUIT arrives.
fn run_message_pump() {
    let mut msg = MSG::default();
    // SAFETY: standard GetMessage / Dispatch loop on this thread's queue.
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Creates the hidden event sink window.
///
/// Not a message-only window: those miss broadcasts such as
/// `WM_DISPLAYCHANGE`. `WS_EX_TOOLWINDOW` keeps it off the taskbar.
fn create_event_sink() -> Option<HWND> {
    // SAFETY: class registration and window creation on this thread.
    unsafe {
        let class_name = w!("SpringboardEventSink");
        let wc = WNDCLASSW {
            lpfnWndProc: Some(event_sink_proc),
            lpszClassName: class_name,
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            warn!("failed to register {SINK_CLASS} class");
            return None;
        }

        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW,
            class_name,
            w!("SpringboardEventSink"),
            Default::default(),
            0,
            0,
            0,
            0,
            None,
            None,
            None,
            None,
        );

        match hwnd {
            Ok(h) if !h.is_invalid() => Some(h),
            _ => None,
        }
    }
}

fn forward(msg: DaemonMsg) {
    SENDER.with(|cell| {
        if let Some(sender) = cell.borrow().as_ref() {
            let _ = sender.send(msg);
        }
    });
}

/// WNDPROC of the event sink.
///
/// `WM_CLOSE` (sent by `springboard stop`) becomes a shutdown request;
/// the window itself is destroyed by the pump thread on exit.
unsafe extern "system" fn event_sink_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_DISPLAYCHANGE => forward(DaemonMsg::DisplayChanged),
        WM_CLOSE => {
            forward(DaemonMsg::Shutdown);
            return LRESULT(0);
        }
        _ => {}
    }
    // SAFETY: default processing for everything else.
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}
