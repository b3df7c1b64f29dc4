//! # Places Autocomplete
//!
//! Debounced, last-input-wins queries against callback-style place and
//! directions services.
//!
//! A query takes rapidly changing input (typically keystrokes), waits until the
//! input has been stable for a quiet period, then calls the vendor service and
//! exposes the result together with a loading flag. Responses can come back in
//! any order; only the one belonging to the latest dispatch is ever shown.
//!
//! ## Query kinds
//!
//! - [`PlacePredictions`]: places for free text, 300 ms debounce
//! - [`QueryPredictions`]: search queries for free text, 300 ms debounce
//! - [`Directions`]: routes between two endpoints, dispatched on the next tick
//!
//! ## Example
//!
//! ```ignore
//! use places_autocomplete::{
//!     AutocompleteService, Fresh, PlaceOptions, PlacePredictions, QueryBinding, QueryEnvironment,
//! };
//!
//! let factory = Fresh::new(|| -> Arc<dyn AutocompleteService> { Arc::new(Vendor::connect()) });
//! let environment = QueryEnvironment::<PlacePredictions>::new(factory);
//! let query = QueryBinding::mount(environment).await?;
//!
//! query.update("Sea".into(), PlaceOptions::default()).await?;
//! query.update("Seattle".into(), PlaceOptions::default()).await?;
//!
//! // One call for "Seattle"; "Sea" was superseded during the quiet period
//! let snapshot = query.settled(Duration::from_secs(5)).await?;
//! println!("{} predictions", snapshot.data.len());
//! ```

pub mod action;
pub mod binding;
pub mod config;
pub mod environment;
pub mod error;
pub mod kind;
pub mod metrics;
pub mod reducer;
pub mod request;
pub mod service;
pub mod state;
pub mod status;
pub mod types;

pub use action::QueryAction;
pub use binding::{QueryBinding, QueryStore};
pub use config::QueryConfig;
pub use environment::QueryEnvironment;
pub use error::{ConfigError, QueryError};
pub use kind::{Directions, PlacePredictions, QueryKind, QueryPredictions};
pub use reducer::QueryReducer;
pub use request::{
    AutocompletionRequest, DirectionsOptions, DirectionsRequest, LatLng, LatLngBounds, Location,
    LocationBias, PlaceOptions, QueryAutocompletionRequest, QueryOptions, RouteQuery,
    SessionToken, TravelMode,
};
pub use service::{
    AutocompleteService, DirectionsService, Fresh, ServiceFactory, Unavailable,
};
pub use state::{Epoch, QueryPhase, QueryRequest, QuerySnapshot, QueryState};
pub use status::{DirectionsStatus, PlacesServiceStatus};
pub use types::{
    AutocompletePrediction, DirectionsLeg, DirectionsResult, DirectionsRoute,
    QueryAutocompletePrediction,
};

/// Mounted place predictions
pub type PlacePredictionsBinding = QueryBinding<PlacePredictions>;

/// Mounted query predictions
pub type QueryPredictionsBinding = QueryBinding<QueryPredictions>;

/// Mounted directions
pub type DirectionsBinding = QueryBinding<Directions>;
