//! Prometheus metrics for the extraction service.
//!
//! Metrics are recorded through the `metrics` facade; the binary installs
//! the Prometheus recorder and `/metrics` renders it. Without a recorder
//! (tests) every call is a no-op.

use metrics::{counter, gauge};

/// Count a finished request by endpoint and HTTP status.
pub fn record_request(endpoint: &'static str, status: u16) {
    counter!("climate_requests_total", "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
}

/// Count zones left out of a subregion archive.
pub fn record_zones_skipped(count: usize) {
    if count > 0 {
        counter!("climate_zones_skipped_total").increment(count as u64);
    }
}

/// Count a file removed by a scheduled deletion.
pub fn record_file_cleaned() {
    counter!("climate_files_cleaned_total").increment(1);
}

/// Current number of files waiting for scheduled deletion.
pub fn set_pending_cleanup(count: usize) {
    gauge!("climate_pending_cleanup").set(count as f64);
}
