use std::fmt;
use time::OffsetDateTime;

use crate::bluetooth::decoder::Reading;
use crate::utils::{celsius_to_fahrenheit, unix_millis};

/// Measurement name written to the database
pub const MEASUREMENT_NAME: &str = "waveplus";
/// Token written in place of a radon value the sensor could not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// A radon average as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadonLevel {
    /// Concentration in Bq/m3
    Valid(u32),
    /// Sensor warm-up or invalid sample
    Unavailable,
}

impl fmt::Display for RadonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadonLevel::Valid(v) => write!(f, "{}", v),
            RadonLevel::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// The four values surfaced from a Wave Plus reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Humidity,
    RadonShortTermAvg,
    RadonLongTermAvg,
    Temperature,
}

impl Sensor {
    pub const ALL: [Sensor; 4] = [
        Sensor::Humidity,
        Sensor::RadonShortTermAvg,
        Sensor::RadonLongTermAvg,
        Sensor::Temperature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sensor::Humidity => "Humidity",
            Sensor::RadonShortTermAvg => "Radon short-term average",
            Sensor::RadonLongTermAvg => "Radon long-term average",
            Sensor::Temperature => "Temperature",
        }
    }

    /// Unit of the value as decoded from the device
    pub fn unit(&self) -> &'static str {
        match self {
            Sensor::Humidity => "%rH",
            Sensor::RadonShortTermAvg | Sensor::RadonLongTermAvg => "Bq/m3",
            Sensor::Temperature => "degC",
        }
    }

    /// Human-readable value of this sensor in `reading`
    pub fn display_value(&self, reading: &Reading) -> String {
        match self {
            Sensor::Humidity => format!("{:.1}", reading.humidity_percent()),
            Sensor::RadonShortTermAvg => reading.radon_short_term_avg().to_string(),
            Sensor::RadonLongTermAvg => reading.radon_long_term_avg().to_string(),
            Sensor::Temperature => format!("{:.2}", reading.temperature_celsius()),
        }
    }
}

/// One time-series point, ready for the database.
///
/// Temperature is stored in Fahrenheit, as the dashboards reading this
/// measurement expect.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub location: String,
    pub humidity: f64,
    pub radon_st_avg: RadonLevel,
    pub radon_lt_avg: RadonLevel,
    pub temperature: f64,
    pub timestamp_ms: i64,
}

impl MeasurementRecord {
    pub fn new(reading: &Reading, location: &str, captured_at: OffsetDateTime) -> Self {
        MeasurementRecord {
            location: location.to_string(),
            humidity: reading.humidity_percent(),
            radon_st_avg: reading.radon_short_term_avg(),
            radon_lt_avg: reading.radon_long_term_avg(),
            temperature: celsius_to_fahrenheit(reading.temperature_celsius()),
            timestamp_ms: unix_millis(&captured_at),
        }
    }
}
