//! Prometheus registry for the CLI `stats` command.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for collector in moviedeck_core::metrics::all_metrics() {
        if let Err(e) = registry.register(collector) {
            warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviedeck_core::metrics::INTENTS_HANDLED;

    #[test]
    fn test_encode_includes_core_metrics() {
        INTENTS_HANDLED.with_label_values(&["search"]).inc();
        let text = encode_metrics();
        assert!(text.contains("moviedeck_intents_total"));
    }
}
