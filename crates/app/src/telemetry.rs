use std::{
    sync::{Mutex, OnceLock},
    time::Instant,
};

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self as tracing_fmt, time::UtcTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use course_catalog_util::{AppConfig, Environment};

const VERSION: &str = env!("CARGO_PKG_VERSION");

static TRACING_READY: OnceLock<()> = OnceLock::new();
static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();
static RECORDER_INSTALL: Mutex<()> = Mutex::new(());
static STARTED_AT: OnceLock<Instant> = OnceLock::new();

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] TryInitError),
    #[error("failed to install prometheus recorder: {0}")]
    Metrics(#[from] BuildError),
}

/// Installs the global subscriber: human-readable output outside production, JSON lines in it.
///
/// `RUST_LOG` overrides the default `info` filter. Later calls are no-ops.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    if TRACING_READY.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339());
    let registry = tracing_subscriber::registry().with(filter);

    match config.environment {
        Environment::Production => registry.with(layer.json()).try_init()?,
        Environment::Development | Environment::Test => registry.with(layer.pretty()).try_init()?,
    }

    TRACING_READY.set(()).ok();
    tracing::info!(
        stage = "telemetry",
        env = %config.environment.as_str(),
        version = VERSION,
        "tracing initialized"
    );
    Ok(())
}

/// Installs the Prometheus recorder once per process and returns its handle.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    if let Some(handle) = RECORDER.get() {
        return Ok(handle.clone());
    }

    let _guard = RECORDER_INSTALL
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = RECORDER.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    RECORDER.set(handle.clone()).ok();
    STARTED_AT.get_or_init(Instant::now);

    describe_gauge!("app_build_info", "Version of the running catalog binary");
    describe_gauge!("app_uptime_seconds", "Seconds since metrics were installed");
    describe_counter!(
        "catalog_courses_written_total",
        "Course writes, labelled by operation"
    );
    describe_counter!(
        "catalog_lessons_written_total",
        "Lesson writes, labelled by operation"
    );
    describe_counter!(
        "http_errors_total",
        "Error responses rendered by the API, labelled by status code"
    );

    Ok(handle)
}

/// Renders the recorder contents followed by the build and uptime gauges.
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    let mut body = handle.render();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let uptime = STARTED_AT
        .get()
        .map(|started| started.elapsed().as_secs_f64())
        .unwrap_or_default();
    body.push_str(&format!(
        "# TYPE app_build_info gauge\napp_build_info{{version=\"{VERSION}\"}} 1\n\
         # TYPE app_uptime_seconds gauge\napp_uptime_seconds {uptime}\n"
    ));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_metrics_returns_the_installed_handle() {
        init_metrics().expect("first install");
        let handle = init_metrics().expect("second install");
        metrics::counter!("catalog_courses_written_total", "op" => "create").increment(1);
        assert!(handle.render().contains("catalog_courses_written_total"));
    }

    #[test]
    fn rendered_metrics_carry_build_info() {
        let handle = init_metrics().expect("install");
        let body = render_metrics(&handle);
        assert!(body.contains(&format!("app_build_info{{version=\"{VERSION}\"}} 1")));
        assert!(body.contains("app_uptime_seconds "));
    }
}
