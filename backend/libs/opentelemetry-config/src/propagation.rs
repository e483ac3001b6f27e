//! W3C trace-context and baggage propagation across service boundaries
//!
//! Inbound: the server middleware extracts `traceparent`/`tracestate`/`baggage` from
//! request headers and parents its request span on the result.
//! Outbound: clients inject the context of their current span into request headers,
//! so the remote service's span becomes a child of ours.

use http::header::{HeaderName, HeaderValue};
use opentelemetry::propagation::{
    Extractor, Injector, TextMapCompositePropagator, TextMapPropagator,
};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C trace context followed by W3C baggage
fn propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

/// Extract a remote parent context, and any baggage, from a header carrier.
///
/// The span context is empty when no valid `traceparent` is present.
pub fn extract_context(carrier: &dyn Extractor) -> Context {
    propagator().extract(carrier)
}

/// Inject the OpenTelemetry context of `span` into a header carrier.
///
/// Nothing is written when the span has no valid OpenTelemetry context, which is the
/// case when no OpenTelemetry layer is installed.
pub fn inject_context(span: &tracing::Span, carrier: &mut dyn Injector) {
    propagator().inject_context(&span.context(), carrier);
}

/// Header injector for outbound `http`/`reqwest` requests
pub struct HeaderInjector<'a>(pub &'a mut http::HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let name = HeaderName::from_bytes(key.as_bytes());
        let value = HeaderValue::from_str(&value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.0.insert(name, value);
        }
    }
}
