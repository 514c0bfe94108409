//! Decision logic for the system-wide Windows-key filter.
//!
//! The platform hook calls [`MetaKeyFilter::on_key`] for every keystroke
//! and suppresses the event when told to. The filter never runs UI code
//! itself: it hands a [`MetaKeyPress`] to a dispatch function that is
//! expected to post it to the UI thread and return immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Virtual-key code of the left Windows key.
pub const VK_LWIN: u32 = 0x5B;

/// Virtual-key code of the right Windows key.
pub const VK_RWIN: u32 = 0x5C;

/// Returns whether `vk` is one of the Windows keys.
pub fn is_meta_key(vk: u32) -> bool {
    vk == VK_LWIN || vk == VK_RWIN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// What the hook should do with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Let the OS and other hooks see the event.
    PassThrough,
    /// Swallow the event.
    Suppress,
}

/// A Windows-key press on its way to the UI.
///
/// While this token is alive the press counts as in flight and further
/// presses are swallowed without being dispatched. Drop it once the UI
/// has finished handling the press.
#[derive(Debug)]
pub struct MetaKeyPress {
    vk: u32,
    in_flight: Arc<AtomicBool>,
}

impl MetaKeyPress {
    /// Which Windows key was pressed.
    pub fn vk(&self) -> u32 {
        self.vk
    }
}

impl Drop for MetaKeyPress {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

type Dispatch = Box<dyn Fn(MetaKeyPress) + Send + Sync>;

/// Swallows Windows-key events and forwards at most one press at a time.
pub struct MetaKeyFilter {
    in_flight: Arc<AtomicBool>,
    dispatch: Dispatch,
}

impl MetaKeyFilter {
    pub fn new(dispatch: impl Fn(MetaKeyPress) + Send + Sync + 'static) -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
            dispatch: Box::new(dispatch),
        }
    }

    /// Returns whether a dispatched press has not been handled yet.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Decides the fate of one keystroke.
    ///
    /// Both transitions of a Windows key are suppressed so the OS never
    /// sees an unpaired release (which would open the Start menu). Only
    /// key-down dispatches, and only when no press is in flight.
    pub fn on_key(&self, vk: u32, transition: KeyTransition) -> FilterDecision {
        if !is_meta_key(vk) {
            return FilterDecision::PassThrough;
        }
        if transition == KeyTransition::Down
            && self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            (self.dispatch)(MetaKeyPress {
                vk,
                in_flight: self.in_flight.clone(),
            });
        }
        FilterDecision::Suppress
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn channel_filter() -> (MetaKeyFilter, mpsc::Receiver<MetaKeyPress>) {
        let (tx, rx) = mpsc::channel();
        let filter = MetaKeyFilter::new(move |press| {
            let _ = tx.send(press);
        });
        (filter, rx)
    }

    #[test]
    fn ordinary_keys_pass_through() {
        // Arrange
        let (filter, rx) = channel_filter();

        // Act
        let decision = filter.on_key(0x41, KeyTransition::Down);

        // Assert
        assert_eq!(decision, FilterDecision::PassThrough);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn left_meta_is_suppressed_and_dispatched_once() {
        // Arrange
        let (filter, rx) = channel_filter();

        // Act
        let decision = filter.on_key(VK_LWIN, KeyTransition::Down);

        // Assert
        assert_eq!(decision, FilterDecision::Suppress);
        let press = rx.try_recv().unwrap();
        assert_eq!(press.vk(), VK_LWIN);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn second_press_while_in_flight_is_suppressed_without_dispatch() {
        // Arrange
        let (filter, rx) = channel_filter();
        filter.on_key(VK_LWIN, KeyTransition::Down);
        let first = rx.try_recv().unwrap();

        // Act
        let decision = filter.on_key(VK_RWIN, KeyTransition::Down);

        // Assert
        assert_eq!(decision, FilterDecision::Suppress);
        assert!(rx.try_recv().is_err());
        assert!(filter.is_in_flight());
        drop(first);
    }

    #[test]
    fn handling_the_press_allows_the_next_dispatch() {
        // Arrange
        let (filter, rx) = channel_filter();
        filter.on_key(VK_LWIN, KeyTransition::Down);
        drop(rx.try_recv().unwrap());

        // Act
        filter.on_key(VK_RWIN, KeyTransition::Down);

        // Assert
        assert_eq!(rx.try_recv().unwrap().vk(), VK_RWIN);
    }

    #[test]
    fn meta_key_up_is_suppressed_without_dispatch() {
        // Arrange
        let (filter, rx) = channel_filter();

        // Act
        let decision = filter.on_key(VK_RWIN, KeyTransition::Up);

        // Assert
        assert_eq!(decision, FilterDecision::Suppress);
        assert!(rx.try_recv().is_err());
        assert!(!filter.is_in_flight());
    }

    #[test]
    fn dropped_dispatch_clears_in_flight() {
        // Arrange: the receiver is gone, so the press is dropped at once
        let (filter, rx) = channel_filter();
        drop(rx);

        // Act
        filter.on_key(VK_LWIN, KeyTransition::Down);

        // Assert
        assert!(!filter.is_in_flight());
    }
}
