//! Progress reporting for long-running algorithms.
//!
//! The advancing-front driver reports the number of conquered source faces
//! after every applied move. Callers hook in with a closure:
//!
//! ```
//! use afmap::algo::progress::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(3, 10, "advancing front");
//! ```

/// A progress callback receiving `(current, total, message)`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_callback_receives_updates() {
        let last = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&last);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            sink.store(current, Ordering::SeqCst);
        });

        progress.report(4, 9, "step");
        assert_eq!(last.load(Ordering::SeqCst), 4);

        // The default reporter accepts anything.
        Progress::default().report(1, 0, "ignored");
    }
}
