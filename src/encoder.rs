use crate::catalog::ModeCatalog;
use crate::codec::TemperatureCodec;
use crate::config::ClimateConfig;
use crate::types::DpWrite;
use crate::{Error, Result};

/// Writes that put the device into hvac mode `name`.
pub fn encode_hvac_mode(catalog: &ModeCatalog, name: &str) -> Result<Vec<DpWrite>> {
    catalog
        .hvac_modes
        .get(name)
        .map(|pattern| pattern.writes())
        .ok_or_else(|| Error::InvalidMode(name.to_string()))
}

/// Writes that put the device into preset `name`.
pub fn encode_preset(catalog: &ModeCatalog, name: &str) -> Result<Vec<DpWrite>> {
    catalog
        .presets
        .get(name)
        .map(|pattern| pattern.writes())
        .ok_or_else(|| Error::InvalidPreset(name.to_string()))
}

/// `Ok(None)` when no target temperature DP is configured: the request is a
/// no-op, not an error. NaN and infinities are rejected.
pub fn encode_target_temperature(config: &ClimateConfig, value: f64) -> Result<Option<DpWrite>> {
    if !value.is_finite() {
        return Err(Error::InvalidTemperature(value));
    }
    let Some(dp) = config.target_temperature_dp else {
        return Ok(None);
    };
    let raw = TemperatureCodec::new(config.precision).encode(value);
    Ok(Some(DpWrite::new(dp, raw)))
}

pub fn encode_fan_mode(_mode: &str) -> Result<Vec<DpWrite>> {
    Err(Error::Unsupported("fan mode"))
}
