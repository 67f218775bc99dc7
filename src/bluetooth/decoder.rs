/// Airthings Wave Plus current-values frame decoding
use crate::error::DecodeError;
use crate::models::RadonLevel;

/// Length of the current-values characteristic payload
pub const FRAME_LEN: usize = 20;
/// Only frame layout this decoder understands
pub const SUPPORTED_FORMAT_VERSION: u8 = 1;
/// Largest raw radon value that is a real measurement; anything above is "not available"
pub const RADON_MAX_VALID: u16 = 16383;

/// One raw read of the current-values characteristic.
///
/// Owned exclusively by the cycle that read it and consumed by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame(Vec<u8>);

impl RawFrame {
    pub fn new(bytes: Vec<u8>) -> Self {
        RawFrame(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Decoded sensor values.
///
/// Only [`decode`] can build one, so a `Reading` always comes from a
/// frame with a recognized format version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    format_version: u8,
    humidity_percent: f64,
    radon_short_term_avg: RadonLevel,
    radon_long_term_avg: RadonLevel,
    temperature_celsius: f64,
}

impl Reading {
    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    pub fn humidity_percent(&self) -> f64 {
        self.humidity_percent
    }

    pub fn radon_short_term_avg(&self) -> RadonLevel {
        self.radon_short_term_avg
    }

    pub fn radon_long_term_avg(&self) -> RadonLevel {
        self.radon_long_term_avg
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }
}

impl TryFrom<RawFrame> for Reading {
    type Error = DecodeError;

    fn try_from(frame: RawFrame) -> Result<Self, Self::Error> {
        decode(frame)
    }
}

/// Map a raw radon value to a concentration, or `Unavailable` during
/// warm-up and for invalid samples.
pub fn radon_decode(raw: u16) -> RadonLevel {
    if raw <= RADON_MAX_VALID {
        RadonLevel::Valid(u32::from(raw))
    } else {
        RadonLevel::Unavailable
    }
}

/// Decode a Wave Plus current-values frame
///
/// The 20-byte payload is four u8 fields followed by eight little-endian u16 fields:
/// - Byte 0: Format version (1)
/// - Byte 1: Humidity (0.5 %rH resolution)
/// - Bytes 2-3: Reserved
/// - Bytes 4-5: Radon short-term average (Bq/m3)
/// - Bytes 6-7: Radon long-term average (Bq/m3)
/// - Bytes 8-9: Temperature (0.01 degC resolution)
/// - Bytes 10-19: Reserved (pressure, CO2, VOC on newer firmware; not surfaced here)
pub fn decode(frame: RawFrame) -> Result<Reading, DecodeError> {
    let data = frame.as_bytes();
    if data.len() != FRAME_LEN {
        return Err(DecodeError::MalformedFrame {
            expected: FRAME_LEN,
            actual: data.len(),
        });
    }

    let format_version = data[0];
    if format_version != SUPPORTED_FORMAT_VERSION {
        return Err(DecodeError::UnsupportedFormatVersion(format_version));
    }

    let word = |index: usize| {
        let offset = 4 + index * 2;
        u16::from_le_bytes([data[offset], data[offset + 1]])
    };

    Ok(Reading {
        format_version,
        humidity_percent: f64::from(data[1]) / 2.0,
        radon_short_term_avg: radon_decode(word(0)),
        radon_long_term_avg: radon_decode(word(1)),
        temperature_celsius: f64::from(word(2)) / 100.0,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Pack the (u8 x4, u16 x8) tuple layout into frame bytes
    pub(crate) fn frame_from_fields(head: [u8; 4], words: [u16; 8]) -> RawFrame {
        let mut bytes = head.to_vec();
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        RawFrame::new(bytes)
    }

    #[test]
    fn test_decode_reference_frame() {
        let frame = frame_from_fields([1, 100, 0, 0], [500, 20000, 2150, 0, 0, 0, 0, 0]);
        let reading = decode(frame).unwrap();

        assert_eq!(reading.format_version(), 1);
        assert_eq!(reading.humidity_percent(), 50.0);
        assert_eq!(reading.radon_short_term_avg(), RadonLevel::Valid(500));
        assert_eq!(reading.radon_long_term_avg(), RadonLevel::Unavailable);
        assert!((reading.temperature_celsius() - 21.5).abs() < 1e-9);
    }

    #[test]
    fn test_reserved_fields_are_ignored() {
        let plain = frame_from_fields([1, 80, 0, 0], [10, 20, 1999, 0, 0, 0, 0, 0]);
        let noisy = frame_from_fields([1, 80, 0xAA, 0x55], [10, 20, 1999, 1, 2, 3, 4, 5]);
        assert_eq!(decode(plain).unwrap(), decode(noisy).unwrap());
    }

    #[test]
    fn test_radon_threshold_boundary() {
        assert_eq!(radon_decode(0), RadonLevel::Valid(0));
        assert_eq!(radon_decode(16383), RadonLevel::Valid(16383));
        assert_eq!(radon_decode(16384), RadonLevel::Unavailable);
        assert_eq!(radon_decode(u16::MAX), RadonLevel::Unavailable);
    }

    #[test]
    fn test_empty_frame_is_malformed() {
        assert_eq!(
            decode(RawFrame::new(Vec::new())),
            Err(DecodeError::MalformedFrame {
                expected: 20,
                actual: 0
            })
        );
    }

    #[test]
    fn test_try_from_matches_decode() {
        let frame = frame_from_fields([1, 90, 0, 0], [42, 43, 2000, 0, 0, 0, 0, 0]);
        assert_eq!(Reading::try_from(frame.clone()), decode(frame));
    }

    proptest! {
        #[test]
        fn prop_radon_valid_range_is_identity(v in 0u16..=RADON_MAX_VALID) {
            prop_assert_eq!(radon_decode(v), RadonLevel::Valid(u32::from(v)));
        }

        #[test]
        fn prop_radon_above_threshold_unavailable(v in (RADON_MAX_VALID + 1)..=u16::MAX) {
            prop_assert_eq!(radon_decode(v), RadonLevel::Unavailable);
        }

        #[test]
        fn prop_wrong_length_is_malformed(
            bytes in prop::collection::vec(any::<u8>(), 0..64)
                .prop_filter("not frame length", |b| b.len() != FRAME_LEN)
        ) {
            let actual = bytes.len();
            prop_assert_eq!(
                decode(RawFrame::new(bytes)),
                Err(DecodeError::MalformedFrame { expected: FRAME_LEN, actual })
            );
        }

        #[test]
        fn prop_unknown_version_rejected(
            version in any::<u8>().prop_filter("not v1", |v| *v != SUPPORTED_FORMAT_VERSION),
            rest in prop::collection::vec(any::<u8>(), FRAME_LEN - 1)
        ) {
            let mut bytes = vec![version];
            bytes.extend(rest);
            prop_assert_eq!(
                decode(RawFrame::new(bytes)),
                Err(DecodeError::UnsupportedFormatVersion(version))
            );
        }

        #[test]
        fn prop_v1_fields_follow_scaling(
            humidity in any::<u8>(),
            st in any::<u16>(),
            lt in any::<u16>(),
            temp in any::<u16>()
        ) {
            let frame = frame_from_fields([1, humidity, 0, 0], [st, lt, temp, 0, 0, 0, 0, 0]);
            let reading = decode(frame).unwrap();
            prop_assert_eq!(reading.humidity_percent(), f64::from(humidity) / 2.0);
            prop_assert_eq!(reading.radon_short_term_avg(), radon_decode(st));
            prop_assert_eq!(reading.radon_long_term_avg(), radon_decode(lt));
            prop_assert_eq!(reading.temperature_celsius(), f64::from(temp) / 100.0);
        }
    }
}
