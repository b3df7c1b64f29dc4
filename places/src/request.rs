//! Request options forwarded to the vendor services.
//!
//! The orchestrator never looks inside these types. They exist so callers can
//! build requests with real types, and they serialize to the vendor's field
//! names. Place types, languages and region codes stay plain strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on the globe
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl LatLng {
    /// Create a point
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A rectangle given by its edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// Southern latitude
    pub south: f64,
    /// Western longitude
    pub west: f64,
    /// Northern latitude
    pub north: f64,
    /// Eastern longitude
    pub east: f64,
}

/// A circle given by its center and radius in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center of the circle
    pub center: LatLng,
    /// Radius in meters
    pub radius: f64,
}

/// Soft hint for where to look for places
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationBias {
    /// Bias by the caller's IP address
    IpBias,
    /// Bias towards a point
    Point(LatLng),
    /// Bias towards a rectangle
    Bounds(LatLngBounds),
    /// Bias towards a circle
    Circle(Circle),
}

/// Restrict predictions to components such as countries
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentRestrictions {
    /// Country codes
    pub country: Vec<String>,
}

/// Opaque value bundling requests into one billing session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token issued by the caller
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Options of a place autocomplete request, everything except the input
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOptions {
    /// Billing session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<SessionToken>,
    /// Soft boundary for the search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_bias: Option<LocationBias>,
    /// Hard boundary for the search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_restriction: Option<LatLngBounds>,
    /// Preferred result language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Region code used for formatting and filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Place types to return
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Component restrictions such as countries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_restrictions: Option<ComponentRestrictions>,
    /// Cursor position in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Point distances are measured from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<LatLng>,
    /// Deprecated bias point; use `location_bias`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    /// Deprecated bias radius in meters; use `location_bias`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Deprecated bias rectangle; use `location_bias`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
}

/// A place autocomplete request as sent to the vendor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AutocompletionRequest {
    /// The text typed by the user
    pub input: String,
    /// Everything else, forwarded verbatim
    #[serde(flatten)]
    pub options: PlaceOptions,
}

/// Options of a query autocomplete request
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Bias rectangle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
    /// Bias point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    /// Cursor position in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Bias radius in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// A query autocomplete request as sent to the vendor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryAutocompletionRequest {
    /// The text typed by the user
    pub input: String,
    /// Everything else, forwarded verbatim
    #[serde(flatten)]
    pub options: QueryOptions,
}

/// Where a route starts, ends or passes through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Free-form address
    Address(String),
    /// Coordinates
    LatLng(LatLng),
    /// Vendor place identifier
    PlaceId(String),
}

/// The two endpoints a directions query is triggered by
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteQuery {
    /// Start of the route
    pub origin: Option<Location>,
    /// End of the route
    pub destination: Option<Location>,
}

impl RouteQuery {
    /// A query with both endpoints set
    #[must_use]
    pub const fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
        }
    }

    /// Whether both endpoints are set
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.origin.is_some() && self.destination.is_some()
    }

    /// Whether neither endpoint is set
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.origin.is_none() && self.destination.is_none()
    }
}

/// How to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    /// By car
    #[default]
    Driving,
    /// On foot
    Walking,
    /// By bicycle
    Bicycling,
    /// By public transport
    Transit,
    /// By motorcycle or scooter
    TwoWheeler,
}

/// Units distances are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    /// Kilometers
    Metric,
    /// Miles
    Imperial,
}

/// Assumptions used when predicting traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrafficModel {
    /// Historical and live traffic
    BestGuess,
    /// Shorter than usual
    Optimistic,
    /// Longer than usual
    Pessimistic,
}

/// Driving-only options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingOptions {
    /// Desired departure time
    pub departure_time: DateTime<Utc>,
    /// Traffic assumptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_model: Option<TrafficModel>,
}

/// Transit-only options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitOptions {
    /// Desired arrival time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<DateTime<Utc>>,
    /// Desired departure time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    /// Preferred transit modes (bus, rail, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<String>,
    /// Routing preference (fewer transfers, less walking)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_preference: Option<String>,
}

/// An intermediate stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsWaypoint {
    /// Where to stop
    pub location: Location,
    /// Whether it is a real stop or just a pass-through
    pub stopover: bool,
}

/// Options of a directions request, everything except origin and destination
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsOptions {
    /// How to travel
    pub travel_mode: TravelMode,
    /// Preferred result language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Region code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Avoid ferries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_ferries: Option<bool>,
    /// Avoid highways
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_highways: Option<bool>,
    /// Avoid toll roads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_tolls: Option<bool>,
    /// Driving-only options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_options: Option<DrivingOptions>,
    /// Transit-only options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_options: Option<TransitOptions>,
    /// Let the vendor reorder waypoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_waypoints: Option<bool>,
    /// Ask for more than one route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provide_route_alternatives: Option<bool>,
    /// Display units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_system: Option<UnitSystem>,
    /// Intermediate stops
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<DirectionsWaypoint>,
}

/// A directions request as sent to the vendor
///
/// A missing endpoint is forwarded as absent; the vendor answers with its own
/// status for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    /// Start of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Location>,
    /// End of the route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    /// Everything else, forwarded verbatim
    #[serde(flatten)]
    pub options: DirectionsOptions,
}
