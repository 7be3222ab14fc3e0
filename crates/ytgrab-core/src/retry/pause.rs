//! The pause between attempts, injectable so tests need not sleep.

use std::time::Duration;

/// Blocks the caller for the backoff delay.
pub trait Pause {
    fn pause(&self, delay: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

impl<P: Pause + ?Sized> Pause for &P {
    fn pause(&self, delay: Duration) {
        (**self).pause(delay)
    }
}
