//! Query outcome counters.
//!
//! Every counter carries a `query` label with the kind's name. Without an
//! installed recorder the calls are no-ops.

use metrics::{counter, describe_counter};

/// Register descriptions of the query counters.
///
/// Call once after installing a recorder, e.g. after
/// `MetricsServer::start`.
pub fn register_query_metrics() {
    describe_counter!(
        "query_dispatches_total",
        "Calls issued to an external prediction or directions service"
    );
    describe_counter!(
        "query_resolved_total",
        "Accepted service responses, by status"
    );
    describe_counter!(
        "query_stale_responses_total",
        "Service responses discarded because a newer request superseded them"
    );
    describe_counter!(
        "query_not_ready_total",
        "Dispatches attempted before the service handle existed"
    );
}

/// Query metrics recorder.
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record a call issued to the external service.
    pub fn record_dispatch(query: &'static str) {
        counter!("query_dispatches_total", "query" => query).increment(1);
    }

    /// Record an accepted response.
    pub fn record_resolved(query: &'static str, status: String) {
        counter!("query_resolved_total", "query" => query, "status" => status).increment(1);
    }

    /// Record a response dropped by the epoch guard.
    pub fn record_stale(query: &'static str) {
        counter!("query_stale_responses_total", "query" => query).increment(1);
    }

    /// Record a dispatch without a service handle.
    pub fn record_not_ready(query: &'static str) {
        counter!("query_not_ready_total", "query" => query).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomplete_runtime::metrics::MetricsServer;

    #[test]
    fn test_query_metrics_render() {
        let addr = "127.0.0.1:0".parse().unwrap_or_else(|_| unreachable!());
        let mut server = MetricsServer::new(addr);
        assert!(server.start().is_ok());
        register_query_metrics();

        QueryMetrics::record_dispatch("place_predictions");
        QueryMetrics::record_stale("place_predictions");
        QueryMetrics::record_resolved("place_predictions", "OK".to_string());

        // Another test may have installed the recorder first
        if let Some(rendered) = server.render() {
            assert!(rendered.contains("query_dispatches_total"));
            assert!(rendered.contains("query_stale_responses_total"));
            assert!(rendered.contains(r#"status="OK""#));
        }
    }
}
