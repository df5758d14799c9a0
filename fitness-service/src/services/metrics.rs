//! Prometheus metrics for fitness-service.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "fitness_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Generation calls by content type and outcome (completed, failed, unavailable)
pub static GENERATION_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub static GENERATION_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

pub static GENERATION_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    HTTP_REQUESTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("fitness_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"]
        )
        .expect("Failed to register HTTP_REQUESTS_TOTAL")
    });

    HTTP_REQUEST_DURATION_SECONDS.get_or_init(|| {
        register_histogram_vec!(
            histogram_opts!(
                "fitness_http_request_duration_seconds",
                "HTTP request duration"
            ),
            &["method", "path", "status"]
        )
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS")
    });

    GENERATION_REQUESTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "fitness_generation_requests_total",
                "Content generation calls by type and outcome"
            ),
            &["content_type", "outcome"]
        )
        .expect("Failed to register GENERATION_REQUESTS_TOTAL")
    });

    // Model calls are slow; buckets reach into minutes
    GENERATION_DURATION_SECONDS.get_or_init(|| {
        register_histogram_vec!(
            histogram_opts!(
                "fitness_generation_duration_seconds",
                "Content generation latency",
                vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
            ),
            &["content_type"]
        )
        .expect("Failed to register GENERATION_DURATION_SECONDS")
    });

    GENERATION_TOKENS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "fitness_generation_tokens_total",
                "Tokens consumed by content generation"
            ),
            &["content_type"]
        )
        .expect("Failed to register GENERATION_TOKENS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("fitness_errors_total", "Total errors by type for alerting"),
            &["error_type", "operation"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record the outcome of one generation call.
pub fn record_generation(content_type: &str, outcome: &str, duration_secs: f64, tokens: i64) {
    if let Some(counter) = GENERATION_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[content_type, outcome]).inc();
    }
    if let Some(histogram) = GENERATION_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[content_type])
            .observe(duration_secs);
    }
    if tokens > 0 {
        if let Some(counter) = GENERATION_TOKENS_TOTAL.get() {
            counter
                .with_label_values(&[content_type])
                .inc_by(tokens as u64);
        }
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, operation: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, operation]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_exposition_contains_generation_series() {
        init_metrics();
        record_generation("workout", "completed", 1.5, 120);
        record_error("generation_failed", "generate_workout");

        let text = get_metrics();
        assert!(text.contains("fitness_generation_requests_total"));
        assert!(text.contains("fitness_generation_tokens_total"));
        assert!(text.contains("fitness_errors_total"));
    }
}
