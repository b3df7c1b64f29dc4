//! State of one debounced query.

use crate::kind::QueryKind;
use autocomplete_core::{DateTime, Debounce, EffectId, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Id the debounce timer of a query is registered under
pub const DEBOUNCE_TIMER: EffectId = EffectId::from_static("query.debounce");

/// Token identifying the latest dispatch
///
/// Every dispatch and every teardown moves the epoch forward. A response
/// tagged with an older epoch is stale and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    /// Create an epoch from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The epoch after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a query is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPhase {
    /// Nothing requested, or torn down
    #[default]
    Idle,
    /// A dispatch is waiting for its response
    Loading,
    /// The latest dispatch answered
    Resolved,
    /// The latest dispatch could not be issued
    Errored,
}

/// The value that is debounced: input together with its options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryTerm<K: QueryKind> {
    /// What the user typed
    pub input: K::Input,
    /// Forwarded to the service
    pub options: K::Options,
}

/// Everything one dispatch needs
///
/// `raw_input` is the input at the moment of dispatch, `debounced_input` the
/// value actually sent to the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRequest<K: QueryKind> {
    /// Current, undebounced input
    pub raw_input: K::Input,
    /// Stable input sent to the service
    pub debounced_input: K::Input,
    /// Forwarded to the service
    pub options: K::Options,
}

/// What callers read from a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySnapshot<D, S> {
    /// Latest accepted result, or the empty result
    pub data: D,
    /// Whether a dispatch is waiting for its response
    pub is_loading: bool,
    /// Status of the latest accepted response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<S>,
    /// Why the latest dispatch could not be issued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the latest accepted response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl<D: Default, S> Default for QuerySnapshot<D, S> {
    fn default() -> Self {
        Self {
            data: D::default(),
            is_loading: false,
            status: None,
            error: None,
            resolved_at: None,
        }
    }
}

/// State of one query
#[derive(Clone)]
pub struct QueryState<K: QueryKind> {
    pub(crate) raw_input: K::Input,
    pub(crate) debounce: Debounce<QueryTerm<K>>,
    pub(crate) service: Option<Arc<K::Service>>,
    pub(crate) epoch: Epoch,
    pub(crate) phase: QueryPhase,
    pub(crate) data: K::Data,
    pub(crate) status: Option<K::Status>,
    pub(crate) error: Option<String>,
    pub(crate) resolved_at: Option<DateTime<Utc>>,
}

impl<K: QueryKind> QueryState<K> {
    /// Fresh state debouncing with `delay`
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            raw_input: K::Input::default(),
            debounce: Debounce::new(DEBOUNCE_TIMER, QueryTerm::default(), delay),
            service: None,
            epoch: Epoch::default(),
            phase: QueryPhase::Idle,
            data: K::Data::default(),
            status: None,
            error: None,
            resolved_at: None,
        }
    }

    /// Input as last reported by the caller
    #[must_use]
    pub const fn raw_input(&self) -> &K::Input {
        &self.raw_input
    }

    /// Input that has been stable for the debounce delay
    #[must_use]
    pub const fn debounced_input(&self) -> &K::Input {
        &self.debounce.value().input
    }

    /// Options of the latest input
    #[must_use]
    pub fn options(&self) -> &K::Options {
        &self.debounce.latest().options
    }

    /// Whether an input change is waiting for its quiet period
    #[must_use]
    pub const fn is_debouncing(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Debounce delay in effect
    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        self.debounce.delay()
    }

    /// Epoch of the latest dispatch or teardown
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> QueryPhase {
        self.phase
    }

    /// Whether a dispatch is waiting for its response
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, QueryPhase::Loading)
    }

    /// Whether an input change or a dispatch is still outstanding
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.is_debouncing() || self.is_loading()
    }

    /// Whether a service handle was acquired
    #[must_use]
    pub const fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Latest accepted result
    #[must_use]
    pub const fn data(&self) -> &K::Data {
        &self.data
    }

    /// Status of the latest accepted response
    #[must_use]
    pub const fn status(&self) -> Option<&K::Status> {
        self.status.as_ref()
    }

    /// Why the latest dispatch could not be issued
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The request a dispatch would issue right now
    #[must_use]
    pub fn request(&self) -> QueryRequest<K> {
        let term = self.debounce.value();
        QueryRequest {
            raw_input: self.raw_input.clone(),
            debounced_input: term.input.clone(),
            options: term.options.clone(),
        }
    }

    /// Copy out what callers read
    #[must_use]
    pub fn snapshot(&self) -> QuerySnapshot<K::Data, K::Status> {
        QuerySnapshot {
            data: self.data.clone(),
            is_loading: self.is_loading(),
            status: self.status.clone(),
            error: self.error.clone(),
            resolved_at: self.resolved_at,
        }
    }
}

impl<K: QueryKind> Default for QueryState<K> {
    fn default() -> Self {
        Self::new(K::DEFAULT_DEBOUNCE)
    }
}

impl<K: QueryKind> fmt::Debug for QueryState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("query", &K::NAME)
            .field("raw_input", &self.raw_input)
            .field("debounce", &self.debounce)
            .field("has_service", &self.service.is_some())
            .field("epoch", &self.epoch)
            .field("phase", &self.phase)
            .field("data", &self.data)
            .field("status", &self.status)
            .field("error", &self.error)
            .field("resolved_at", &self.resolved_at)
            .finish()
    }
}
