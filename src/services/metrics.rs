use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static CHECKOUT_SESSIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static REVIEWS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static TESTIMONIALS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let checkout_counter = IntCounterVec::new(
        Opts::new(
            "evently_checkout_sessions_total",
            "Checkout sessions by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create evently_checkout_sessions_total metric");

    let review_counter = IntCounterVec::new(
        Opts::new("evently_reviews_total", "Review lifecycle operations"),
        &["operation"],
    )
    .expect("Failed to create evently_reviews_total metric");

    let testimonial_counter = IntCounterVec::new(
        Opts::new(
            "evently_testimonials_total",
            "Testimonial submissions and moderations by resulting status",
        ),
        &["status"],
    )
    .expect("Failed to create evently_testimonials_total metric");

    registry
        .register(Box::new(checkout_counter.clone()))
        .expect("Failed to register evently_checkout_sessions_total");
    registry
        .register(Box::new(review_counter.clone()))
        .expect("Failed to register evently_reviews_total");
    registry
        .register(Box::new(testimonial_counter.clone()))
        .expect("Failed to register evently_testimonials_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    CHECKOUT_SESSIONS_TOTAL
        .set(checkout_counter)
        .expect("Failed to set evently_checkout_sessions_total");
    REVIEWS_TOTAL
        .set(review_counter)
        .expect("Failed to set evently_reviews_total");
    TESTIMONIALS_TOTAL
        .set(testimonial_counter)
        .expect("Failed to set evently_testimonials_total");
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_checkout_session(outcome: &str) {
    if let Some(counter) = CHECKOUT_SESSIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_review(operation: &str) {
    if let Some(counter) = REVIEWS_TOTAL.get() {
        counter.with_label_values(&[operation]).inc();
    }
}

pub fn record_testimonial(status: &str) {
    if let Some(counter) = TESTIMONIALS_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
}
