//! # Autocomplete Testing
//!
//! Testing utilities and helpers for reducer-driven query orchestration.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given/When/Then harness for transition tables
//! - [`assertions`]: effect assertions, including timer and cancellation lookups
//! - [`PendingCalls`]: records callback-style service calls and lets a test
//!   answer them in any order
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use autocomplete_testing::PendingCalls;
//!
//! let calls = PendingCalls::new();
//! // hand `calls.clone()` to a mock service, drive the store...
//! calls.respond(1, Some(vec!["Seattle, WA"]), "OK");
//! calls.respond(0, Some(vec!["Seaside, OR"]), "OK"); // arrives late
//! ```

use autocomplete_core::environment::Clock;
use chrono::{DateTime, Utc};

/// Ergonomic testing utilities for reducers
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use autocomplete_core::environment::Callback;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use autocomplete_testing::mocks::FixedClock;
    /// use autocomplete_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    struct Call<Req, T, S> {
        request: Req,
        callback: Option<Callback<T, S>>,
    }

    /// Calls made to a callback-style service, answered by the test
    ///
    /// Clones share the same call log. Calls are numbered in the order they
    /// were issued; answering them out of order reproduces the races a real
    /// network produces.
    pub struct PendingCalls<Req, T, S> {
        calls: Arc<Mutex<Vec<Call<Req, T, S>>>>,
    }

    impl<Req, T, S> Clone for PendingCalls<Req, T, S> {
        fn clone(&self) -> Self {
            Self {
                calls: Arc::clone(&self.calls),
            }
        }
    }

    impl<Req, T, S> Default for PendingCalls<Req, T, S> {
        fn default() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl<Req, T, S> std::fmt::Debug for PendingCalls<Req, T, S> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("PendingCalls")
                .field("issued", &self.len())
                .field("outstanding", &self.outstanding())
                .finish()
        }
    }

    impl<Req, T, S> PendingCalls<Req, T, S> {
        /// Create an empty call log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn lock(&self) -> MutexGuard<'_, Vec<Call<Req, T, S>>> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Record a call; used from inside the mock service
        pub fn record(&self, request: Req, callback: Callback<T, S>) {
            self.lock().push(Call {
                request,
                callback: Some(callback),
            });
        }

        /// Number of calls issued so far
        #[must_use]
        pub fn len(&self) -> usize {
            self.lock().len()
        }

        /// Whether no call was issued
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.lock().is_empty()
        }

        /// Number of calls that were neither answered nor dropped
        #[must_use]
        pub fn outstanding(&self) -> usize {
            self.lock()
                .iter()
                .filter(|call| call.callback.is_some())
                .count()
        }

        /// Invoke the callback of call `index`
        ///
        /// Returns `false` when there is no such call or it was already
        /// answered. The callback runs after the log lock is released.
        pub fn respond(&self, index: usize, result: Option<T>, status: S) -> bool {
            let callback = self
                .lock()
                .get_mut(index)
                .and_then(|call| call.callback.take());

            match callback {
                Some(callback) => {
                    callback(result, status);
                    true
                },
                None => false,
            }
        }

        /// Answer the most recently issued call
        pub fn respond_latest(&self, result: Option<T>, status: S) -> bool {
            match self.len().checked_sub(1) {
                Some(index) => self.respond(index, result, status),
                None => false,
            }
        }

        /// Drop the callback of call `index` without invoking it
        pub fn abandon(&self, index: usize) -> bool {
            self.lock()
                .get_mut(index)
                .and_then(|call| call.callback.take())
                .is_some()
        }
    }

    impl<Req: Clone, T, S> PendingCalls<Req, T, S> {
        /// Requests in issue order
        #[must_use]
        pub fn requests(&self) -> Vec<Req> {
            self.lock().iter().map(|call| call.request.clone()).collect()
        }

        /// The request of call `index`
        #[must_use]
        pub fn request(&self, index: usize) -> Option<Req> {
            self.lock().get(index).map(|call| call.request.clone())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, PendingCalls, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn pending_calls_answer_out_of_order() {
        let calls: PendingCalls<&'static str, u32, &'static str> = PendingCalls::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for request in ["first", "second"] {
            let seen = Arc::clone(&seen);
            calls.record(
                request,
                Box::new(move |result, status| {
                    if let Ok(mut seen) = seen.lock() {
                        seen.push((request, result, status));
                    }
                }),
            );
        }

        assert_eq!(calls.len(), 2);
        assert!(calls.respond_latest(Some(2), "OK"));
        assert!(calls.respond(0, None, "ZERO_RESULTS"));
        assert!(!calls.respond(0, Some(9), "OK"));
        assert!(!calls.respond(5, Some(9), "OK"));
        assert_eq!(calls.outstanding(), 0);
        assert_eq!(calls.requests(), vec!["first", "second"]);

        let seen = seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(
            seen,
            vec![("second", Some(2), "OK"), ("first", None, "ZERO_RESULTS")]
        );
    }

    #[test]
    fn abandoned_call_cannot_be_answered() {
        let calls: PendingCalls<(), (), ()> = PendingCalls::new();
        calls.record((), Box::new(|_, ()| {}));
        assert!(calls.abandon(0));
        assert!(!calls.respond(0, None, ()));
        assert_eq!(calls.outstanding(), 0);
    }
}
