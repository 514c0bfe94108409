//! Low-level keyboard hook that feeds [`MetaKeyFilter`].
//!
//! The hook procedure runs on the thread that installed it, inside that
//! thread's message pump, and must return quickly or Windows silently
//! removes it. It therefore only consults the filter and never touches UI.

use std::cell::RefCell;
use std::marker::PhantomData;

use springboard_core::{FilterDecision, KeyTransition, MetaKeyFilter, ShellError, ShellResult};
use tracing::{debug, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, SetWindowsHookExW, UnhookWindowsHookEx,
    WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

thread_local! {
    static FILTER: RefCell<Option<MetaKeyFilter>> = const { RefCell::new(None) };
}

/// An installed keyboard hook. Dropping it is the only way to remove it.
///
/// Bound to the installing thread, which must pump messages for the hook
/// to be called.
pub struct KeyboardHookSession {
    hook: HHOOK,
    _not_send: PhantomData<*const ()>,
}

impl KeyboardHookSession {
    /// Installs the hook with `filter` deciding every keystroke.
    /// See also [`install_meta_key_hook`].
    ///
    /// At most one hook per thread; a second install fails with
    /// [`ShellError::HookAlreadyInstalled`].
    pub fn install(filter: MetaKeyFilter) -> ShellResult<Self> {
        let occupied = FILTER.with(|cell| cell.borrow().is_some());
        if occupied {
            return Err(ShellError::HookAlreadyInstalled);
        }
        FILTER.with(|cell| *cell.borrow_mut() = Some(filter));

        // SAFETY: low-level hooks need no module handle when the
        // procedure lives in this process.
        match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(hook_proc), None, 0) } {
            Ok(hook) => {
                debug!("keyboard hook installed");
                Ok(Self {
                    hook,
                    _not_send: PhantomData,
                })
            }
            Err(e) => {
                FILTER.with(|cell| *cell.borrow_mut() = None);
                Err(ShellError::HookInstall(e.message()))
            }
        }
    }
}

impl Drop for KeyboardHookSession {
    fn drop(&mut self) {
        // SAFETY: `hook` came from SetWindowsHookExW on this thread, and
        // the session cannot leave it.
        if let Err(e) = unsafe { UnhookWindowsHookEx(self.hook) } {
            warn!(error = %e.message(), "keyboard hook removal failed");
        }
        FILTER.with(|cell| *cell.borrow_mut() = None);
        debug!("keyboard hook removed");
    }
}

/// Installs the Windows-key filter on the calling thread.
pub fn install_meta_key_hook(filter: MetaKeyFilter) -> ShellResult<KeyboardHookSession> {
    KeyboardHookSession::install(filter)
}

fn transition(message: u32) -> Option<KeyTransition> {
    match message {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
        WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
        _ => None,
    }
}

unsafe extern "system" fn hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32
        && let Some(transition) = transition(wparam.0 as u32)
    {
        // SAFETY: for HC_ACTION, lparam points to a KBDLLHOOKSTRUCT.
        let vk = unsafe { (*(lparam.0 as *const KBDLLHOOKSTRUCT)).vkCode };
        let decision = FILTER.with(|cell| {
            cell.borrow()
                .as_ref()
                .map_or(FilterDecision::PassThrough, |f| f.on_key(vk, transition))
        });
        if decision == FilterDecision::Suppress {
            return LRESULT(1);
        }
    }
    // SAFETY: forwarding to the next hook in the chain.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}
