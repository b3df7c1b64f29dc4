//! Debounced values.
//!
//! [`Debounce`] keeps two values: the *stable* one that consumers read and the
//! *pending* one that is waiting for its quiet period to pass. Every change
//! produces a timer effect registered under the debouncer's [`EffectId`], so
//! the runtime aborts the previous timer before starting the next one. Each
//! timer carries the generation it was scheduled for; [`Debounce::settle`]
//! ignores any generation that is no longer current, which keeps a timer that
//! fired just before its replacement from applying an older value.
//!
//! A zero delay still goes through a timer. The new value is applied on the
//! next runtime tick, never synchronously inside [`Debounce::update`].
//!
//! # Example
//!
//! ```
//! use autocomplete_core::{Debounce, Effect, EffectId};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum Action {
//!     Settled { generation: u64 },
//! }
//!
//! let mut input = Debounce::new(
//!     EffectId::from_static("input"),
//!     String::new(),
//!     Duration::from_millis(300),
//! );
//!
//! let timer = input.update("Sea".to_string(), |generation| Action::Settled { generation });
//! assert!(matches!(timer, Some(Effect::Cancellable { .. })));
//! assert_eq!(input.value(), "");
//!
//! // ...300ms later the runtime feeds the timer action back:
//! assert_eq!(input.settle(input.generation()).map(String::as_str), Some("Sea"));
//! assert_eq!(input.value(), "Sea");
//! ```

use crate::effect::{Effect, EffectId};
use std::time::Duration;

/// A value that only changes once its input has been stable for `delay`
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    id: EffectId,
    delay: Duration,
    stable: T,
    pending: Option<T>,
    generation: u64,
}

impl<T> Debounce<T>
where
    T: Clone + PartialEq,
{
    /// Create a debouncer whose timers are registered under `id`
    #[must_use]
    pub const fn new(id: EffectId, initial: T, delay: Duration) -> Self {
        Self {
            id,
            delay,
            stable: initial,
            pending: None,
            generation: 0,
        }
    }

    /// The stable (debounced) value
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.stable
    }

    /// The most recent input, pending or not
    #[must_use]
    pub fn latest(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.stable)
    }

    /// Whether a value is waiting for its quiet period
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the most recently scheduled timer
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The quiet period
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the quiet period; applies to timers scheduled afterwards
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Id the timers are registered under
    #[must_use]
    pub const fn id(&self) -> &EffectId {
        &self.id
    }

    /// Record a new input value
    ///
    /// Returns `None` when `value` equals the latest known input, since the
    /// running timer (if any) already covers it. Otherwise returns a
    /// cancellable timer that replaces the previous one and, once the delay has
    /// elapsed, yields `on_elapsed(generation)`.
    pub fn update<A, F>(&mut self, value: T, on_elapsed: F) -> Option<Effect<A>>
    where
        F: FnOnce(u64) -> A,
    {
        if *self.latest() == value {
            return None;
        }

        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(value);

        Some(
            Effect::Delay {
                duration: self.delay,
                action: Box::new(on_elapsed(self.generation)),
            }
            .cancellable(self.id.clone()),
        )
    }

    /// Apply the pending value if `generation` is still current
    ///
    /// Returns the new stable value when it actually changed; `None` for stale
    /// generations, when nothing is pending, or when the input came back to the
    /// value that was already stable.
    pub fn settle(&mut self, generation: u64) -> Option<&T> {
        if generation != self.generation {
            return None;
        }

        let value = self.pending.take()?;
        if value == self.stable {
            return None;
        }

        self.stable = value;
        Some(&self.stable)
    }

    /// Drop any pending input and force the stable value
    ///
    /// Returns the effect that aborts the running timer.
    pub fn reset<A>(&mut self, value: T) -> Effect<A> {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.stable = value;
        Effect::Cancel(self.id.clone())
    }
}
