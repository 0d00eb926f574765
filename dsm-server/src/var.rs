use lazy_static::lazy_static;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec,
    HistogramVec, IntCounterVec,
};

lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec =
        register_int_counter_vec!(
            opts!("http_requests_total", "Total number of HTTP requests"),
            &["method", "path"]
        )
        .unwrap();
    pub static ref HTTP_REQUESTS_DURATION_SECONDS: HistogramVec =
        register_histogram_vec!(
            histogram_opts!(
                "http_requests_duration_seconds",
                "HTTP request latencies in seconds"
            ),
            &["method", "path"]
        )
        .unwrap();
}
