//! Status codes reported by the vendor services.
//!
//! Known codes get their own variant; anything else the vendor sends is kept
//! verbatim in `Other`. No code is treated as an error by the query.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! vendor_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$doc:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$doc])* $variant,)+
            /// A code this crate does not know, kept as sent
            Other(String),
        }

        impl $name {
            /// The vendor's wire name
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(code) => code,
                }
            }

            /// Whether the call succeeded
            #[must_use]
            pub const fn is_ok(&self) -> bool {
                matches!(self, Self::Ok)
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                match code.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(code),
                }
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Other(code) => code,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vendor_status! {
    /// Status of a place or query autocomplete call
    PlacesServiceStatus {
        /// The call succeeded
        Ok => "OK",
        /// The call succeeded but matched nothing
        ZeroResults => "ZERO_RESULTS",
        /// The request was malformed
        InvalidRequest => "INVALID_REQUEST",
        /// Quota exhausted
        OverQueryLimit => "OVER_QUERY_LIMIT",
        /// The caller may not use the service
        RequestDenied => "REQUEST_DENIED",
        /// Server-side failure; a retry may succeed
        UnknownError => "UNKNOWN_ERROR",
        /// A referenced place was not found
        NotFound => "NOT_FOUND",
    }
}

vendor_status! {
    /// Status of a directions call
    DirectionsStatus {
        /// The call succeeded
        Ok => "OK",
        /// An endpoint could not be geocoded
        NotFound => "NOT_FOUND",
        /// No route between the endpoints
        ZeroResults => "ZERO_RESULTS",
        /// Too many waypoints
        MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
        /// The route is too long to compute
        MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
        /// The request was malformed
        InvalidRequest => "INVALID_REQUEST",
        /// Quota exhausted
        OverQueryLimit => "OVER_QUERY_LIMIT",
        /// The caller may not use the service
        RequestDenied => "REQUEST_DENIED",
        /// Server-side failure; a retry may succeed
        UnknownError => "UNKNOWN_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for status in [
            PlacesServiceStatus::Ok,
            PlacesServiceStatus::ZeroResults,
            PlacesServiceStatus::OverQueryLimit,
            PlacesServiceStatus::NotFound,
        ] {
            let json = serde_json::to_string(&status).unwrap_or_default();
            assert_eq!(json, format!("\"{status}\""));
        }

        let json = serde_json::to_string(&DirectionsStatus::MaxRouteLengthExceeded)
            .unwrap_or_default();
        assert_eq!(json, "\"MAX_ROUTE_LENGTH_EXCEEDED\"");
    }

    #[test]
    fn only_ok_is_ok() {
        assert!(PlacesServiceStatus::Ok.is_ok());
        assert!(!PlacesServiceStatus::ZeroResults.is_ok());
        assert!(DirectionsStatus::Ok.is_ok());
        assert!(!DirectionsStatus::NotFound.is_ok());
    }

    #[test]
    fn unknown_codes_survive_round_trip() {
        let status: PlacesServiceStatus =
            serde_json::from_str("\"PLACE_PENDING_REVIEW\"").unwrap_or(PlacesServiceStatus::Ok);
        assert_eq!(
            status,
            PlacesServiceStatus::Other("PLACE_PENDING_REVIEW".into())
        );
        assert!(!status.is_ok());
        assert_eq!(status.to_string(), "PLACE_PENDING_REVIEW");

        let json = serde_json::to_string(&status).unwrap_or_default();
        assert_eq!(json, "\"PLACE_PENDING_REVIEW\"");

        let directions = DirectionsStatus::from("NO_TRANSIT".to_string());
        assert_eq!(directions, DirectionsStatus::Other("NO_TRANSIT".into()));
    }

    #[test]
    fn parses_wire_names() {
        let status: PlacesServiceStatus =
            serde_json::from_str("\"REQUEST_DENIED\"").unwrap_or(PlacesServiceStatus::Ok);
        assert_eq!(status, PlacesServiceStatus::RequestDenied);
    }
}
