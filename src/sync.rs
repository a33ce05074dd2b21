//! Cross-context primitives.
//!
//! The byte receiver runs in interrupt (or driver callback) context and the
//! worker is an ordinary task. They meet in two places:
//!
//! - [`SharedState`]: short exclusive access to the [`Session`](crate::console::Session)
//! - [`Notify`]: one-shot wake-ups (line ready, transmit complete)
//!
//! Platforms provide implementations. With the `std` feature, [`StdState`]
//! and [`StdNotify`] are available; they also run on ESP-IDF.

/// Platform-agnostic synchronized state access.
pub trait SharedState<T> {
    /// Access state mutably.
    ///
    /// The closure must not block: the receiver may be waiting on the same
    /// state in interrupt context.
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

/// Binary wake-up signal.
///
/// A `notify` that arrives before `wait` is latched, so the wake-up is
/// never lost. Several notifies before one wait collapse into one.
pub trait Notify {
    /// Signal the waiter. Must not block; callable from interrupt context.
    fn notify(&self);

    /// Block the calling task until signalled, then clear the signal.
    fn wait(&self);
}

impl<N: Notify + ?Sized> Notify for &N {
    fn notify(&self) {
        (**self).notify()
    }

    fn wait(&self) {
        (**self).wait()
    }
}

#[cfg(feature = "std")]
pub use self::std_impl::{StdNotify, StdState};

#[cfg(feature = "std")]
mod std_impl {
    use std::sync::{Condvar, Mutex, PoisonError};

    use super::{Notify, SharedState};

    /// `SharedState` over a std mutex.
    #[derive(Debug, Default)]
    pub struct StdState<T> {
        inner: Mutex<T>,
    }

    impl<T> StdState<T> {
        pub const fn new(value: T) -> Self {
            Self {
                inner: Mutex::new(value),
            }
        }
    }

    impl<T> SharedState<T> for StdState<T> {
        fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R,
        {
            // Poisoning ignored: every mutation leaves the session consistent.
            let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        }
    }

    /// `Notify` over a mutex-guarded flag and a condition variable.
    #[derive(Debug, Default)]
    pub struct StdNotify {
        flag: Mutex<bool>,
        cond: Condvar,
    }

    impl StdNotify {
        pub const fn new() -> Self {
            Self {
                flag: Mutex::new(false),
                cond: Condvar::new(),
            }
        }
    }

    impl Notify for StdNotify {
        fn notify(&self) {
            let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
            *flag = true;
            self.cond.notify_one();
        }

        fn wait(&self) {
            let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
            while !*flag {
                flag = self.cond.wait(flag).unwrap_or_else(PoisonError::into_inner);
            }
            *flag = false;
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_notify_before_wait_is_latched() {
        let n = StdNotify::new();
        n.notify();
        n.wait(); // must not block
    }

    #[test]
    fn test_notify_wakes_other_thread() {
        let n = Arc::new(StdNotify::new());
        let waiter = {
            let n = Arc::clone(&n);
            thread::spawn(move || n.wait())
        };
        n.notify();
        waiter.join().unwrap();
    }

    #[test]
    fn test_state_with_mut() {
        let state = StdState::new(1u32);
        state.with_mut(|v| *v += 1);
        assert_eq!(state.with_mut(|v| *v), 2);
    }
}
