//! Query kinds: what varies between prediction and directions queries.
//!
//! The orchestrator is generic over a [`QueryKind`]. A kind names the service
//! it calls, the shape of its input and options, how an empty input looks, and
//! how the service's raw output becomes the data callers read.

use crate::request::{
    AutocompletionRequest, DirectionsOptions, DirectionsRequest, PlaceOptions, QueryOptions,
    QueryAutocompletionRequest, RouteQuery,
};
use crate::service::{AutocompleteService, DirectionsService};
use crate::status::{DirectionsStatus, PlacesServiceStatus};
use crate::types::{AutocompletePrediction, DirectionsResult, QueryAutocompletePrediction};
use autocomplete_core::environment::Callback;
use std::fmt::{Debug, Display};
use std::time::Duration;

/// One family of debounced queries
pub trait QueryKind: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// The vendor service called on dispatch
    type Service: ?Sized + Send + Sync + 'static;
    /// What the user edits
    type Input: Clone + Debug + Default + PartialEq + Send + Sync + 'static;
    /// Forwarded to the service verbatim
    type Options: Clone + Debug + Default + PartialEq + Send + Sync + 'static;
    /// What the service hands to its callback
    type Output: Send + 'static;
    /// What callers read; `Default` is the empty result
    type Data: Clone + Debug + Default + PartialEq + Send + Sync + 'static;
    /// The service's status code
    type Status: Clone + Debug + Display + PartialEq + Send + Sync + 'static;

    /// Label used in logs, metrics and errors
    const NAME: &'static str;

    /// Quiet period used when the caller configures none
    const DEFAULT_DEBOUNCE: Duration;

    /// Whether `input` is too empty to query
    fn is_empty(input: &Self::Input) -> bool;

    /// Issue one call
    fn request(
        service: &Self::Service,
        input: Self::Input,
        options: Self::Options,
        callback: Callback<Self::Output, Self::Status>,
    );

    /// Turn a possibly absent output into data
    fn into_data(output: Option<Self::Output>) -> Self::Data;
}

/// Place predictions for free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacePredictions;

impl QueryKind for PlacePredictions {
    type Service = dyn AutocompleteService;
    type Input = String;
    type Options = PlaceOptions;
    type Output = Vec<AutocompletePrediction>;
    type Data = Vec<AutocompletePrediction>;
    type Status = PlacesServiceStatus;

    const NAME: &'static str = "place_predictions";
    const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    fn is_empty(input: &Self::Input) -> bool {
        input.is_empty()
    }

    fn request(
        service: &Self::Service,
        input: Self::Input,
        options: Self::Options,
        callback: Callback<Self::Output, Self::Status>,
    ) {
        service.get_place_predictions(AutocompletionRequest { input, options }, callback);
    }

    fn into_data(output: Option<Self::Output>) -> Self::Data {
        output.unwrap_or_default()
    }
}

/// Search query predictions for free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryPredictions;

impl QueryKind for QueryPredictions {
    type Service = dyn AutocompleteService;
    type Input = String;
    type Options = QueryOptions;
    type Output = Vec<QueryAutocompletePrediction>;
    type Data = Vec<QueryAutocompletePrediction>;
    type Status = PlacesServiceStatus;

    const NAME: &'static str = "query_predictions";
    const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    fn is_empty(input: &Self::Input) -> bool {
        input.is_empty()
    }

    fn request(
        service: &Self::Service,
        input: Self::Input,
        options: Self::Options,
        callback: Callback<Self::Output, Self::Status>,
    ) {
        service.get_query_predictions(QueryAutocompletionRequest { input, options }, callback);
    }

    fn into_data(output: Option<Self::Output>) -> Self::Data {
        output.unwrap_or_default()
    }
}

/// Routes between an origin and a destination
///
/// The input counts as empty only while neither endpoint is set. A half
/// route is still sent; the vendor's status reports what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directions;

impl QueryKind for Directions {
    type Service = dyn DirectionsService;
    type Input = RouteQuery;
    type Options = DirectionsOptions;
    type Output = DirectionsResult;
    type Data = Option<DirectionsResult>;
    type Status = DirectionsStatus;

    const NAME: &'static str = "directions";
    const DEFAULT_DEBOUNCE: Duration = Duration::ZERO;

    fn is_empty(input: &Self::Input) -> bool {
        input.is_blank()
    }

    fn request(
        service: &Self::Service,
        input: Self::Input,
        options: Self::Options,
        callback: Callback<Self::Output, Self::Status>,
    ) {
        service.route(
            DirectionsRequest {
                origin: input.origin,
                destination: input.destination,
                options,
            },
            callback,
        );
    }

    fn into_data(output: Option<Self::Output>) -> Self::Data {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Location;

    #[test]
    fn empty_inputs() {
        assert!(PlacePredictions::is_empty(&String::new()));
        assert!(!PlacePredictions::is_empty(&"S".to_string()));
        assert!(QueryPredictions::is_empty(&String::new()));

        assert!(Directions::is_empty(&RouteQuery::default()));
        assert!(!Directions::is_empty(&RouteQuery {
            origin: Some(Location::Address("Seattle".into())),
            destination: None,
        }));
        assert!(!Directions::is_empty(&RouteQuery {
            origin: None,
            destination: Some(Location::Address("Portland".into())),
        }));
        assert!(!Directions::is_empty(&RouteQuery::new(
            Location::Address("Seattle".into()),
            Location::Address("Portland".into()),
        )));
    }

    #[test]
    fn absent_prediction_output_is_empty_list() {
        assert!(PlacePredictions::into_data(None).is_empty());
        assert!(QueryPredictions::into_data(None).is_empty());
        assert_eq!(Directions::into_data(None), None);
    }

    #[test]
    fn default_debounce_per_kind() {
        assert_eq!(PlacePredictions::DEFAULT_DEBOUNCE, Duration::from_millis(300));
        assert_eq!(QueryPredictions::DEFAULT_DEBOUNCE, Duration::from_millis(300));
        assert_eq!(Directions::DEFAULT_DEBOUNCE, Duration::ZERO);
    }
}
