use crate::types::{DpId, DpSnapshot, DpValue, Precision};

/// Min temperature reported when no min DP is configured or known.
pub const DEFAULT_MIN_TEMP: f64 = 5.0;
/// Max temperature reported when no max DP is configured or known.
pub const DEFAULT_MAX_TEMP: f64 = 35.0;

/// Converts between raw DP integers and physical temperature.
///
/// The scale factor is unit-agnostic: the device is assumed to already
/// report in the configured unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureCodec {
    precision: Precision,
}

impl TemperatureCodec {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> f64 {
        self.precision.as_f64()
    }

    pub fn decode(&self, raw: i64) -> f64 {
        raw as f64 * self.precision()
    }

    pub fn encode(&self, physical: f64) -> i64 {
        (physical / self.precision()).round() as i64
    }
}

/// Bound temperatures are read as whole units, without precision scaling.
pub fn bound_temp(snapshot: &DpSnapshot, dp: Option<DpId>, default: f64) -> f64 {
    dp.and_then(|dp| snapshot.get(dp))
        .and_then(DpValue::as_i64)
        .map(|raw| raw as f64)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_scales_by_precision() {
        let codec = TemperatureCodec::new(Precision::Halves);
        assert_eq!(codec.decode(44), 22.0);
        assert_eq!(codec.decode(43), 21.5);
    }

    #[test]
    fn encode_rounds() {
        let codec = TemperatureCodec::new(Precision::Halves);
        assert_eq!(codec.encode(22.0), 44);
        assert_eq!(codec.encode(22.3), 45);
        assert_eq!(codec.encode(22.2), 44);

        let codec = TemperatureCodec::new(Precision::Tenths);
        assert_eq!(codec.encode(21.5), 215);
    }

    #[test]
    fn encode_then_decode_lands_on_grid() {
        let codec = TemperatureCodec::new(Precision::Halves);
        let raw = codec.encode(21.7);
        assert_eq!(codec.decode(raw), 21.5);

        let codec = TemperatureCodec::new(Precision::Whole);
        let raw = codec.encode(21.7);
        assert_eq!(codec.decode(raw), 22.0);
    }

    #[test]
    fn bounds_read_whole_units() {
        let mut snapshot = DpSnapshot::new();
        snapshot.insert(10, 7i64);
        snapshot.insert(11, 30i64);
        assert_eq!(bound_temp(&snapshot, Some(10), DEFAULT_MIN_TEMP), 7.0);
        assert_eq!(bound_temp(&snapshot, Some(11), DEFAULT_MAX_TEMP), 30.0);
        assert_eq!(bound_temp(&snapshot, None, DEFAULT_MIN_TEMP), 5.0);
        assert_eq!(bound_temp(&snapshot, Some(99), DEFAULT_MAX_TEMP), 35.0);
    }
}
