use std::sync::Arc;
use std::time::Instant;

use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result, web::Data};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGaugeVec, Registry, TextEncoder, histogram_opts,
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_vec_with_registry,
};

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0,
];

/// HTTP request metrics on a private registry.
pub struct HttpMetrics {
    registry: Registry,
    in_flight: IntGaugeVec,
    total: IntCounterVec,
    duration: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let in_flight = register_int_gauge_vec_with_registry!(
            "http_request_number",
            "Number of HTTP requests currently being served",
            &["method", "path"],
            registry
        )?;
        let total = register_int_counter_vec_with_registry!(
            "http_request_total",
            "Total number of HTTP requests handled",
            &["method", "path", "code"],
            registry
        )?;
        let duration = register_histogram_vec_with_registry!(
            histogram_opts!(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
                DURATION_BUCKETS.to_vec()
            ),
            &["method", "path", "code"],
            registry
        )?;

        Ok(Self {
            registry,
            in_flight,
            total,
            duration,
        })
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Prometheus text exposition endpoint.
#[poem::handler]
pub fn exporter(metrics: Data<&Arc<HttpMetrics>>) -> Response {
    Response::builder()
        .content_type("text/plain; version=0.0.4")
        .body(metrics.render())
}

/// Middleware recording in-flight, total and latency metrics per request.
pub struct RequestMetrics {
    metrics: Arc<HttpMetrics>,
}

impl RequestMetrics {
    pub fn new(metrics: Arc<HttpMetrics>) -> Self {
        Self { metrics }
    }
}

impl<E: Endpoint> Middleware<E> for RequestMetrics {
    type Output = RequestMetricsEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestMetricsEndpoint {
            ep,
            metrics: self.metrics.clone(),
        }
    }
}

pub struct RequestMetricsEndpoint<E> {
    ep: E,
    metrics: Arc<HttpMetrics>,
}

impl<E: Endpoint> Endpoint for RequestMetricsEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.metrics
            .in_flight
            .with_label_values(&[&method, &path])
            .inc();
        let started = Instant::now();

        let result = self.ep.call(req).await;

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics
            .in_flight
            .with_label_values(&[&method, &path])
            .dec();

        // Errors are resolved to responses here so that their status codes
        // are counted like any other.
        let response = match result {
            Ok(output) => output.into_response(),
            Err(err) => err.into_response(),
        };

        let code = response.status().as_u16().to_string();
        self.metrics
            .total
            .with_label_values(&[&method, &path, &code])
            .inc();
        self.metrics
            .duration
            .with_label_values(&[&method, &path, &code])
            .observe(elapsed);

        Ok(response)
    }
}
