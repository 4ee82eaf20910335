use tracing::{trace, warn};

use crate::catalog::ModeCatalog;
use crate::codec::TemperatureCodec;
use crate::config::ClimateConfig;
use crate::types::{DpId, DpSnapshot, ResolvedState};

pub const HVAC_MODE_HEAT: &str = "heat";
pub const ACTION_HEATING: &str = "heating";
pub const ACTION_IDLE: &str = "idle";

/// Derive semantic state from `snapshot`.
///
/// Each catalog resolves to its last matching entry; a catalog with no match
/// keeps the value from `prior`. Temperatures keep their prior value when the
/// configured DP is absent.
pub fn resolve(
    snapshot: &DpSnapshot,
    catalog: &ModeCatalog,
    config: &ClimateConfig,
    prior: &ResolvedState,
) -> ResolvedState {
    let codec = TemperatureCodec::new(config.precision);

    let mut state = ResolvedState {
        target_temperature: temperature(snapshot, &codec, config.target_temperature_dp)
            .or(prior.target_temperature),
        current_temperature: temperature(snapshot, &codec, config.current_temperature_dp)
            .or(prior.current_temperature),
        hvac_mode: catalog
            .hvac_modes
            .last_match(snapshot)
            .map(str::to_string)
            .or_else(|| prior.hvac_mode.clone()),
        preset: catalog
            .presets
            .last_match(snapshot)
            .map(str::to_string)
            .or_else(|| prior.preset.clone()),
        action: catalog
            .actions
            .last_match(snapshot)
            .map(str::to_string)
            .or_else(|| prior.action.clone()),
    };

    if config.heuristic_action
        && state.hvac_mode.as_deref() == Some(HVAC_MODE_HEAT)
        && let (Some(current), Some(target)) = (state.current_temperature, state.target_temperature)
    {
        let action = estimate_action(current, target, codec.precision(), state.action.take());
        trace!(current, target, action = ?action, "estimated hvac action");
        state.action = action;
    }

    state
}

fn temperature(snapshot: &DpSnapshot, codec: &TemperatureCodec, dp: Option<DpId>) -> Option<f64> {
    let dp = dp?;
    let value = snapshot.get(dp)?;
    match value.as_i64() {
        Some(raw) => Some(codec.decode(raw)),
        None => {
            warn!(dp, %value, "temperature DP is not an integer");
            None
        }
    }
}

/// Hysteresis estimate of the running action, `band` wide below `target`.
///
/// The checks run in order and later ones overwrite earlier ones. Exactly at
/// the lower band edge no check fires, so `prior` is returned unchanged.
pub fn estimate_action(current: f64, target: f64, band: f64, prior: Option<String>) -> Option<String> {
    let mut action = prior;
    if current < target - band {
        action = Some(ACTION_HEATING.to_string());
    }
    if current + band > target {
        action = Some(ACTION_IDLE.to_string());
    }
    action
}
