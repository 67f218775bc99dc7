/// InfluxDB line protocol rendering for measurement records
use crate::models::{MeasurementRecord, MEASUREMENT_NAME};

/// Escape a tag value: commas, equals signs and spaces get a backslash
pub fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Shortest decimal text that reads back as the same float; whole numbers keep a `.0`
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Render one record as a single line-protocol point
///
/// `waveplus,location=<loc> humidity=<h>,radon_st_avg=<r1>,radon_lt_avg=<r2>,temperature=<t>`
/// with ` <timestamp_ms>` appended when `with_timestamp` is set.
pub fn to_line(record: &MeasurementRecord, with_timestamp: bool) -> String {
    let mut line = format!(
        "{},location={} humidity={},radon_st_avg={},radon_lt_avg={},temperature={}",
        MEASUREMENT_NAME,
        escape_tag_value(&record.location),
        format_float(record.humidity),
        record.radon_st_avg,
        record.radon_lt_avg,
        format_float(record.temperature),
    );
    if with_timestamp {
        line.push_str(&format!(" {}", record.timestamp_ms));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RadonLevel;

    fn record(location: &str) -> MeasurementRecord {
        MeasurementRecord {
            location: location.to_string(),
            humidity: 50.0,
            radon_st_avg: RadonLevel::Valid(500),
            radon_lt_avg: RadonLevel::Unavailable,
            temperature: 70.7,
            timestamp_ms: 1_705_320_000_000,
        }
    }

    #[test]
    fn test_reference_line() {
        assert_eq!(
            to_line(&record("basement"), false),
            "waveplus,location=basement humidity=50.0,radon_st_avg=500,radon_lt_avg=N/A,temperature=70.7"
        );
    }

    #[test]
    fn test_line_with_timestamp() {
        assert_eq!(
            to_line(&record("basement"), true),
            "waveplus,location=basement humidity=50.0,radon_st_avg=500,radon_lt_avg=N/A,temperature=70.7 1705320000000"
        );
    }

    #[test]
    fn test_location_is_escaped() {
        let line = to_line(&record("living room,a=b"), false);
        assert!(line.starts_with("waveplus,location=living\\ room\\,a\\=b humidity="));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(50.0), "50.0");
        assert_eq!(format_float(21.5), "21.5");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-4.25), "-4.25");
    }
}
