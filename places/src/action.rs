//! Actions driving a query.

use crate::kind::QueryKind;
use crate::state::{Epoch, QueryRequest};

/// Inputs to [`QueryReducer`](crate::QueryReducer)
///
/// `Mount`, `InputChanged` and `Unmount` come from the caller.
/// `DebounceElapsed` and `Responded` are produced by effects.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction<K: QueryKind> {
    /// Acquire the service handle
    Mount,

    /// The caller's input or options changed
    InputChanged {
        /// New input
        input: K::Input,
        /// Options to send with it
        options: K::Options,
    },

    /// The debounce timer of `generation` fired
    DebounceElapsed {
        /// Which input change the timer belongs to
        generation: u64,
    },

    /// Dispatch a request right away, bypassing the debounce
    Dispatch(QueryRequest<K>),

    /// A service call answered
    Responded {
        /// Epoch the call was issued under
        epoch: Epoch,
        /// The call's data, already converted
        data: K::Data,
        /// The call's status
        status: K::Status,
    },

    /// Release the service handle and reset
    Unmount,
}
