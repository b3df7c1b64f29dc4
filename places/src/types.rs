//! Results delivered by the vendor services.
//!
//! The orchestrator stores these without interpreting them.

use crate::request::{LatLng, TravelMode};
use serde::{Deserialize, Serialize};

/// A matched span inside a prediction's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PredictionSubstring {
    /// Length of the match
    pub length: usize,
    /// Start of the match
    pub offset: usize,
}

/// One term of a prediction's description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PredictionTerm {
    /// Start of the term in the description
    pub offset: usize,
    /// The term
    pub value: String,
}

/// Description split into main and secondary text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredFormatting {
    /// Usually the place name
    pub main_text: String,
    /// Matches inside `main_text`
    #[serde(default)]
    pub main_text_matched_substrings: Vec<PredictionSubstring>,
    /// Usually the locality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

/// A predicted place
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutocompletePrediction {
    /// Human readable name
    pub description: String,
    /// Vendor place identifier
    pub place_id: String,
    /// Place types
    #[serde(default)]
    pub types: Vec<String>,
    /// Matches inside `description`
    #[serde(default)]
    pub matched_substrings: Vec<PredictionSubstring>,
    /// Split description
    #[serde(default)]
    pub structured_formatting: StructuredFormatting,
    /// Terms of `description`
    #[serde(default)]
    pub terms: Vec<PredictionTerm>,
    /// Distance from the request origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u32>,
}

impl AutocompletePrediction {
    /// A prediction with only id and description set
    #[must_use]
    pub fn new(place_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// A predicted search query or place
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryAutocompletePrediction {
    /// Human readable text
    pub description: String,
    /// Set when the prediction is a place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Matches inside `description`
    #[serde(default)]
    pub matched_substrings: Vec<PredictionSubstring>,
    /// Terms of `description`
    #[serde(default)]
    pub terms: Vec<PredictionTerm>,
}

impl QueryAutocompletePrediction {
    /// A query prediction with only the description set
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Distance or duration with its display text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextValue {
    /// Display text
    pub text: String,
    /// Meters or seconds
    pub value: u64,
}

/// One step of a leg
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsStep {
    /// Instruction text
    pub instructions: String,
    /// Step distance
    pub distance: TextValue,
    /// Step duration
    pub duration: TextValue,
    /// Where the step starts
    pub start_location: LatLng,
    /// Where the step ends
    pub end_location: LatLng,
    /// How this step is traveled
    pub travel_mode: TravelMode,
}

/// The part of a route between two stops
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsLeg {
    /// Address of the start
    pub start_address: String,
    /// Address of the end
    pub end_address: String,
    /// Leg distance
    pub distance: TextValue,
    /// Leg duration
    pub duration: TextValue,
    /// Steps of the leg
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

/// One possible route
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsRoute {
    /// Short description, usually the main roads
    pub summary: String,
    /// One leg per pair of consecutive stops
    pub legs: Vec<DirectionsLeg>,
    /// Warnings to show with the route
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Copyright text to show with the route
    #[serde(default)]
    pub copyrights: String,
    /// Order of waypoints when they were optimized
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

/// A directions response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsResult {
    /// Routes, best first
    pub routes: Vec<DirectionsRoute>,
    /// Travel modes the vendor could have used
    #[serde(default)]
    pub available_travel_modes: Vec<TravelMode>,
}
