//! Gauge registry for the scrape endpoint
//!
//! One `GaugeVec` labeled by zone, backed by an owned registry rather
//! than the process-global default one so tests can build isolated
//! instances. Each monitor holds its own labeled gauge handle and is
//! the only writer; the scrape path only gathers.

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

pub const NAMESPACE: &str = "odroid";
pub const TEMPERATURE_METRIC: &str = "temperature_celsius";

pub struct TemperatureMetrics {
    registry: Registry,
    temperature: GaugeVec,
}

impl TemperatureMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let temperature = GaugeVec::new(
            Opts::new(TEMPERATURE_METRIC, "Temperature").namespace(NAMESPACE),
            &["zone"],
        )?;

        let registry = Registry::new();
        registry.register(Box::new(temperature.clone()))?;

        Ok(Self {
            registry,
            temperature,
        })
    }

    /// Gauge handle for one zone label, e.g. `zone0`
    pub fn zone(&self, label: &str) -> Gauge {
        self.temperature.with_label_values(&[label])
    }

    /// Render all registered metrics in the text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
