//! Metrics collection and exposition.
//!
//! # Metrics
//! - `search_requests_total` (counter): requests by outcome
//! - `search_rejections_total` (counter): admission rejections by reason
//! - `search_duration_seconds` (histogram): handler latency by outcome
//! - `search_in_flight` (gauge): requests past the bulkhead
//! - `search_circuit_open` (gauge): 1=open, 0=closed
//! - `search_circuit_failures` (gauge): consecutive failures seen by the breaker
//! - `search_injected_faults_total` (counter): simulated failures

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::resilience::{CircuitSnapshot, CircuitState};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_search(outcome: &'static str, start: Instant) {
    metrics::counter!("search_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("search_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rejection(reason: &'static str) {
    metrics::counter!("search_rejections_total", "reason" => reason).increment(1);
}

/// Publish the breaker state after a request.
pub fn record_breaker(snapshot: &CircuitSnapshot) {
    record_circuit_open(snapshot.state == CircuitState::Open);
    metrics::gauge!("search_circuit_failures").set(snapshot.failure_count as f64);
}

pub fn record_in_flight(count: usize) {
    metrics::gauge!("search_in_flight").set(count as f64);
}

pub fn record_circuit_open(open: bool) {
    metrics::gauge!("search_circuit_open").set(if open { 1.0 } else { 0.0 });
}

pub fn record_injected_fault() {
    metrics::counter!("search_injected_faults_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
        text.lines().find(|l| l.starts_with(prefix))
    }

    #[test]
    fn test_rejections_and_breaker_state_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_rejection("bulkhead_full");
            record_rejection("bulkhead_full");
            record_rejection("circuit_open");
            record_breaker(&CircuitSnapshot {
                state: CircuitState::Open,
                failure_count: 3,
            });
        });
        let text = handle.render();

        let full = line(&text, "search_rejections_total{reason=\"bulkhead_full\"}");
        assert!(full.is_some_and(|l| l.ends_with(" 2")), "{text}");
        let open = line(&text, "search_rejections_total{reason=\"circuit_open\"}");
        assert!(open.is_some_and(|l| l.ends_with(" 1")), "{text}");
        assert!(line(&text, "search_circuit_open ").is_some_and(|l| l.ends_with(" 1")));
        assert!(line(&text, "search_circuit_failures ").is_some_and(|l| l.ends_with(" 3")));
    }
}
