use serde::Deserialize;

use crate::catalog::ModeCatalog;
use crate::types::{Capabilities, Capability, DpId, Precision, TemperatureUnit};
use crate::{Error, Result};

const EMPTY_CATALOG: &str = "{}";

/// Per-device climate settings, immutable once the device is built.
///
/// Deserializes from JSON keyed like a config entry, e.g.
/// `{"target_temperature_dp": 2, "precision": 0.5, "hvac_modes": "{...}"}`.
/// The three catalogs are kept as text and parsed by [`ClimateConfig::catalog`];
/// they must be JSON objects, so dict literals such as `{'heat': {'1': True}}`
/// have to be rewritten as `{"heat": {"1": true}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub target_temperature_dp: Option<DpId>,
    pub current_temperature_dp: Option<DpId>,
    pub min_temperature_dp: Option<DpId>,
    pub max_temperature_dp: Option<DpId>,
    pub fan_mode_dp: Option<DpId>,
    pub precision: Precision,
    pub temperature_step: Precision,
    pub temperature_unit: TemperatureUnit,
    pub hvac_modes: String,
    pub presets: String,
    pub hvac_actions: String,
    pub heuristic_action: bool,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            target_temperature_dp: None,
            current_temperature_dp: None,
            min_temperature_dp: None,
            max_temperature_dp: None,
            fan_mode_dp: None,
            precision: Precision::Tenths,
            temperature_step: Precision::Halves,
            temperature_unit: TemperatureUnit::Celsius,
            hvac_modes: EMPTY_CATALOG.to_string(),
            presets: EMPTY_CATALOG.to_string(),
            hvac_actions: EMPTY_CATALOG.to_string(),
            heuristic_action: false,
        }
    }
}

impl ClimateConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn target_temperature_dp(mut self, dp: DpId) -> Self {
        self.target_temperature_dp = Some(dp);
        self
    }

    pub fn current_temperature_dp(mut self, dp: DpId) -> Self {
        self.current_temperature_dp = Some(dp);
        self
    }

    pub fn min_temperature_dp(mut self, dp: DpId) -> Self {
        self.min_temperature_dp = Some(dp);
        self
    }

    pub fn max_temperature_dp(mut self, dp: DpId) -> Self {
        self.max_temperature_dp = Some(dp);
        self
    }

    pub fn fan_mode_dp(mut self, dp: DpId) -> Self {
        self.fan_mode_dp = Some(dp);
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn temperature_step(mut self, step: Precision) -> Self {
        self.temperature_step = step;
        self
    }

    pub fn temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    pub fn hvac_modes(mut self, text: impl Into<String>) -> Self {
        self.hvac_modes = text.into();
        self
    }

    pub fn presets(mut self, text: impl Into<String>) -> Self {
        self.presets = text.into();
        self
    }

    pub fn hvac_actions(mut self, text: impl Into<String>) -> Self {
        self.hvac_actions = text.into();
        self
    }

    pub fn heuristic_action(mut self, enabled: bool) -> Self {
        self.heuristic_action = enabled;
        self
    }

    pub fn catalog(&self) -> Result<ModeCatalog> {
        ModeCatalog::parse(&self.hvac_modes, &self.presets, &self.hvac_actions)
    }

    /// Capabilities follow configuration presence, never device state.
    pub fn capabilities(&self, catalog: &ModeCatalog) -> Capabilities {
        let mut caps = Capabilities::default();
        if self.target_temperature_dp.is_some() {
            caps.insert(Capability::TargetTemperature);
        }
        if self.max_temperature_dp.is_some() {
            caps.insert(Capability::TemperatureRange);
        }
        if self.fan_mode_dp.is_some() {
            caps.insert(Capability::FanMode);
        }
        if !catalog.presets.is_empty() {
            caps.insert(Capability::PresetMode);
        }
        caps
    }
}
