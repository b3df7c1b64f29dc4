//! Error types for query orchestration.

use thiserror::Error;

/// Failures surfaced through a query's `error` field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A dispatch happened while no service handle exists
    ///
    /// The vendor was not loaded when the query mounted.
    #[error("{query} service not initialized")]
    ServiceNotReady {
        /// The query kind's label
        query: &'static str,
    },
}

/// Invalid configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable did not hold a number
    #[error("invalid value {value:?} for {name}: {source}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
        /// Parse failure
        #[source]
        source: std::num::ParseIntError,
    },
}
