//! # Autocomplete Demo
//!
//! An in-memory vendor standing in for a real places backend.
//!
//! [`Catalog`] answers prediction and directions calls after a random delay,
//! so answers routinely come back in a different order than they were asked.
//! That is exactly the situation the query orchestrator exists for.

use autocomplete_core::environment::Callback;
use places_autocomplete::request::Location;
use places_autocomplete::types::{DirectionsLeg, PredictionSubstring, TextValue};
use places_autocomplete::{
    AutocompletePrediction, AutocompleteService, AutocompletionRequest, DirectionsRequest,
    DirectionsResult, DirectionsRoute, DirectionsService, DirectionsStatus, PlacesServiceStatus,
    QueryAutocompletePrediction, QueryAutocompletionRequest,
};
use rand::Rng;
use std::ops::Range;
use std::time::Duration;

/// Places the demo knows about
pub const PLACES: &[&str] = &[
    "Seattle, WA, USA",
    "Seaside, OR, USA",
    "Sea-Tac Airport, WA, USA",
    "Portland, OR, USA",
    "Port Angeles, WA, USA",
    "Spokane, WA, USA",
    "San Francisco, CA, USA",
    "Santa Cruz, CA, USA",
];

/// In-memory vendor with random latency
#[derive(Debug, Clone)]
pub struct Catalog {
    places: Vec<String>,
    latency: Range<u64>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(PLACES.iter().map(ToString::to_string), 50..400)
    }
}

impl Catalog {
    /// Catalog over `places`, answering after `latency` milliseconds
    #[must_use]
    pub fn new(places: impl IntoIterator<Item = String>, latency: Range<u64>) -> Self {
        Self {
            places: places.into_iter().collect(),
            latency,
        }
    }

    /// Places whose name starts with `input`, ignoring case
    #[must_use]
    pub fn matches(&self, input: &str) -> Vec<AutocompletePrediction> {
        let needle = input.to_lowercase();
        self.places
            .iter()
            .enumerate()
            .filter(|(_, place)| place.to_lowercase().starts_with(&needle))
            .map(|(i, place)| AutocompletePrediction {
                matched_substrings: vec![PredictionSubstring {
                    length: input.chars().count(),
                    offset: 0,
                }],
                ..AutocompletePrediction::new(format!("demo-place-{i}"), place.clone())
            })
            .collect()
    }

    fn delay(&self) -> Duration {
        if self.latency.is_empty() {
            return Duration::from_millis(self.latency.start);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.latency.clone()))
    }

    /// Answer on a background task after a random delay
    fn answer_later<T, S>(&self, label: String, result: Option<T>, status: S, callback: Callback<T, S>)
    where
        T: Send + 'static,
        S: Send + std::fmt::Display + 'static,
    {
        let delay = self.delay();
        tracing::debug!(%label, ?delay, "Vendor call received");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%label, %status, "Vendor answering");
            callback(result, status);
        });
    }
}

fn describe(location: &Location) -> String {
    match location {
        Location::Address(address) => address.clone(),
        Location::LatLng(point) => format!("{:.4},{:.4}", point.lat, point.lng),
        Location::PlaceId(id) => id.clone(),
    }
}

impl AutocompleteService for Catalog {
    fn get_place_predictions(
        &self,
        request: AutocompletionRequest,
        callback: Callback<Vec<AutocompletePrediction>, PlacesServiceStatus>,
    ) {
        let found = self.matches(&request.input);
        let status = if found.is_empty() {
            PlacesServiceStatus::ZeroResults
        } else {
            PlacesServiceStatus::Ok
        };
        let result = (!found.is_empty()).then_some(found);
        self.answer_later(format!("places:{}", request.input), result, status, callback);
    }

    fn get_query_predictions(
        &self,
        request: QueryAutocompletionRequest,
        callback: Callback<Vec<QueryAutocompletePrediction>, PlacesServiceStatus>,
    ) {
        let found: Vec<_> = self
            .matches(&request.input)
            .into_iter()
            .map(|p| QueryAutocompletePrediction {
                place_id: Some(p.place_id),
                ..QueryAutocompletePrediction::new(p.description)
            })
            .collect();
        let status = if found.is_empty() {
            PlacesServiceStatus::ZeroResults
        } else {
            PlacesServiceStatus::Ok
        };
        self.answer_later(format!("queries:{}", request.input), Some(found), status, callback);
    }
}

impl DirectionsService for Catalog {
    fn route(
        &self,
        request: DirectionsRequest,
        callback: Callback<DirectionsResult, DirectionsStatus>,
    ) {
        let (Some(origin), Some(destination)) = (&request.origin, &request.destination) else {
            let label = format!("route:{:?}->{:?}", request.origin, request.destination);
            self.answer_later(label, None, DirectionsStatus::InvalidRequest, callback);
            return;
        };
        let from = describe(origin);
        let to = describe(destination);

        let result = DirectionsResult {
            routes: vec![DirectionsRoute {
                summary: format!("{from} to {to}"),
                legs: vec![DirectionsLeg {
                    start_address: from.clone(),
                    end_address: to.clone(),
                    distance: TextValue {
                        text: "280 km".into(),
                        value: 280_000,
                    },
                    duration: TextValue {
                        text: "2 hours 50 mins".into(),
                        value: 10_200,
                    },
                    steps: Vec::new(),
                }],
                ..DirectionsRoute::default()
            }],
            available_travel_modes: vec![request.options.travel_mode],
        };

        self.answer_later(
            format!("route:{from}->{to}"),
            Some(result),
            DirectionsStatus::Ok,
            callback,
        );
    }
}
