pub mod meter;

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;

use opentelemetry::KeyValue;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use std::error::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    pub service_name: String,
    #[serde(default)]
    pub logs: EnvFilterConfig,
    #[serde(default)]
    pub traces: EnvFilterConfig,
    pub otlp: Option<OtlpConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct EnvFilterConfig {
    pub default_level: String,
    #[serde(default)]
    pub filters: Vec<String>,
}

impl Default for EnvFilterConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_owned(),
            filters: vec![],
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OtlpConfig {
    pub url: Option<String>,
    #[serde(default = "default_metrics_interval_secs")]
    pub metrics_interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    60
}

impl TryInto<EnvFilter> for EnvFilterConfig {
    type Error = tracing_subscriber::filter::ParseError;

    fn try_into(self) -> Result<EnvFilter, Self::Error> {
        EnvFilter::builder()
            .with_default_directive(self.default_level.parse()?)
            .parse(self.filters.join(","))
    }
}

impl MonitoringConfig {
    pub fn init(&self) -> Result<(), Box<dyn Error>> {
        let resource = Resource::builder()
            .with_attribute(KeyValue::new("service.name", self.service_name.clone()))
            .build();

        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::default());

        let Some(otlp_config) = &self.otlp else {
            let fmt_filter: EnvFilter = self.logs.clone().try_into()?;
            let fmt_layer = tracing_subscriber::fmt::layer().with_filter(fmt_filter);
            tracing_subscriber::registry().with(fmt_layer).init();
            return Ok(());
        };

        let fmt_filter: EnvFilter = self.logs.clone().try_into()?;
        let fmt_layer = tracing_subscriber::fmt::layer().with_filter(fmt_filter);

        let logger_provider = init_logs(resource.clone(), otlp_config.url.clone())?;
        let logging_filter: EnvFilter = self.logs.clone().try_into()?;
        let logging_layer = OpenTelemetryTracingBridge::new(&logger_provider).with_filter(logging_filter);

        let tracer_provider = init_traces(resource.clone(), otlp_config.url.clone())?;
        let tracer = tracer_provider.tracer(self.service_name.to_owned());
        let tracing_filter: EnvFilter = self.traces.clone().try_into()?;
        let tracing_layer = OpenTelemetryLayer::new(tracer).with_filter(tracing_filter);

        let metrics = init_metrics(resource, otlp_config)?;
        opentelemetry::global::set_meter_provider(metrics);

        tracing_subscriber::registry()
            .with(tracing_layer)
            .with(logging_layer)
            .with(fmt_layer)
            .init();

        Ok(())
    }
}

fn init_traces(resource: Resource, url: Option<String>) -> Result<SdkTracerProvider, ExporterBuildError> {
    match url {
        Some(url) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(url)
                .build()?;
            Ok(SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build())
        }
        None => Ok(SdkTracerProvider::builder()
            .with_resource(resource)
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build()),
    }
}

fn init_metrics(resource: Resource, config: &OtlpConfig) -> Result<SdkMeterProvider, ExporterBuildError> {
    let interval = std::time::Duration::from_secs(config.metrics_interval_secs);

    match &config.url {
        Some(url) => {
            let exporter = opentelemetry_otlp::MetricExporter::builder()
                .with_tonic()
                .with_endpoint(url.clone())
                .build()?;
            let reader = PeriodicReader::builder(exporter).with_interval(interval).build();

            Ok(SdkMeterProvider::builder()
                .with_reader(reader)
                .with_resource(resource)
                .build())
        }
        None => {
            let reader = PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default())
                .with_interval(interval)
                .build();

            Ok(SdkMeterProvider::builder()
                .with_reader(reader)
                .with_resource(resource)
                .build())
        }
    }
}

fn init_logs(resource: Resource, url: Option<String>) -> Result<SdkLoggerProvider, ExporterBuildError> {
    match url {
        Some(url) => {
            let exporter = opentelemetry_otlp::LogExporter::builder()
                .with_tonic()
                .with_endpoint(url)
                .build()?;

            Ok(SdkLoggerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build())
        }
        None => Ok(SdkLoggerProvider::builder()
            .with_resource(resource)
            .with_simple_exporter(opentelemetry_stdout::LogExporter::default())
            .build()),
    }
}
