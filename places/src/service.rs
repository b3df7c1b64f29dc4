//! Seams to the callback-style vendor services.
//!
//! A service is asked once per dispatch and answers through a
//! [`Callback`] at most once, possibly out of order and possibly never.
//! There is no way to cancel a call.

use crate::request::{AutocompletionRequest, DirectionsRequest, QueryAutocompletionRequest};
use crate::status::{DirectionsStatus, PlacesServiceStatus};
use crate::types::{AutocompletePrediction, DirectionsResult, QueryAutocompletePrediction};
use autocomplete_core::environment::Callback;
use std::sync::Arc;

/// Place and query predictions
pub trait AutocompleteService: Send + Sync {
    /// Predict places for `request`
    fn get_place_predictions(
        &self,
        request: AutocompletionRequest,
        callback: Callback<Vec<AutocompletePrediction>, PlacesServiceStatus>,
    );

    /// Predict search queries for `request`
    fn get_query_predictions(
        &self,
        request: QueryAutocompletionRequest,
        callback: Callback<Vec<QueryAutocompletePrediction>, PlacesServiceStatus>,
    );
}

/// Routes between two locations
pub trait DirectionsService: Send + Sync {
    /// Compute routes for `request`
    fn route(
        &self,
        request: DirectionsRequest,
        callback: Callback<DirectionsResult, DirectionsStatus>,
    );
}

/// Creates service handles
///
/// `create` returns `None` while the vendor is not loaded. Closures of type
/// `Fn() -> Option<Arc<S>>` implement it.
pub trait ServiceFactory<S: ?Sized>: Send + Sync {
    /// A fresh handle, or `None` when the vendor is unavailable
    fn create(&self) -> Option<Arc<S>>;
}

impl<S, F> ServiceFactory<S> for F
where
    S: ?Sized,
    F: Fn() -> Option<Arc<S>> + Send + Sync,
{
    fn create(&self) -> Option<Arc<S>> {
        self()
    }
}

/// Factory for a vendor that never loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl<S: ?Sized> ServiceFactory<S> for Unavailable {
    fn create(&self) -> Option<Arc<S>> {
        None
    }
}

/// Factory building a new service object for every mount
///
/// Each query owns the handle it gets; two mounts never see the same object.
///
/// ```ignore
/// let factory = Fresh::new(|| -> Arc<dyn AutocompleteService> { Arc::new(Vendor::new()) });
/// ```
#[derive(Clone, Copy)]
pub struct Fresh<F>(F);

impl<F> Fresh<F> {
    /// Build services with `make`
    #[must_use]
    pub const fn new(make: F) -> Self {
        Self(make)
    }
}

impl<S, F> ServiceFactory<S> for Fresh<F>
where
    S: ?Sized,
    F: Fn() -> Arc<S> + Send + Sync,
{
    fn create(&self) -> Option<Arc<S>> {
        Some((self.0)())
    }
}

impl<F> std::fmt::Debug for Fresh<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Fresh")
    }
}
