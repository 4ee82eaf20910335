use std::future::Future;

use tracing::{debug, trace, warn};

use crate::catalog::ModeCatalog;
use crate::codec::{bound_temp, DEFAULT_MAX_TEMP, DEFAULT_MIN_TEMP};
use crate::config::ClimateConfig;
use crate::diff::{diff_snapshots, state_events};
use crate::encoder::{encode_fan_mode, encode_hvac_mode, encode_preset, encode_target_temperature};
use crate::logger::{MessageLogMode, MessageLogger};
use crate::resolver::resolve;
use crate::types::*;
use crate::{Error, Result};

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;
type StateCallback = Box<dyn Fn(&ResolvedState) + Send + Sync>;

/// Transport that reads and writes raw data points for one device.
///
/// Implementations own the session, merge partial updates into a full
/// snapshot and handle their own timeouts. Failures should be reported as
/// [`Error::Device`].
pub trait DeviceClient {
    fn current_snapshot(&self) -> impl Future<Output = Result<DpSnapshot>> + Send;

    fn write_data_points(&self, writes: &[DpWrite]) -> impl Future<Output = Result<()>> + Send;
}

pub struct ClimateDeviceBuilder<C> {
    client: C,
    config: ClimateConfig,
    event_callbacks: Vec<EventCallback>,
    state_callbacks: Vec<StateCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl<C: DeviceClient> ClimateDeviceBuilder<C> {
    pub fn new(client: C, config: ClimateConfig) -> Self {
        Self {
            client,
            config,
            event_callbacks: Vec::new(),
            state_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn on_state(mut self, f: impl Fn(&ResolvedState) + Send + Sync + 'static) -> Self {
        self.state_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    /// Parses the mode catalogs. A catalog that fails to parse, or a log file
    /// that can't be opened, fails the build.
    pub fn build(self) -> Result<ClimateDevice<C>> {
        let catalog = self.config.catalog()?;
        let capabilities = self.config.capabilities(&catalog);

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        debug!(
            hvac_modes = catalog.hvac_modes.len(),
            presets = catalog.presets.len(),
            actions = catalog.actions.len(),
            "climate device configured"
        );

        Ok(ClimateDevice {
            client: self.client,
            config: self.config,
            catalog,
            capabilities,
            snapshot: DpSnapshot::new(),
            state: ResolvedState::default(),
            event_callbacks: self.event_callbacks,
            state_callbacks: self.state_callbacks,
            logger,
        })
    }
}

/// A climate entity backed by a data-point device.
///
/// Local state only changes when a snapshot arrives; commands are sent to the
/// device and their effect shows up on the next update.
pub struct ClimateDevice<C> {
    client: C,
    config: ClimateConfig,
    catalog: ModeCatalog,
    capabilities: Capabilities,
    snapshot: DpSnapshot,
    state: ResolvedState,
    event_callbacks: Vec<EventCallback>,
    state_callbacks: Vec<StateCallback>,
    logger: Option<MessageLogger>,
}

impl<C: DeviceClient> ClimateDevice<C> {
    pub fn builder(client: C, config: ClimateConfig) -> ClimateDeviceBuilder<C> {
        ClimateDeviceBuilder::new(client, config)
    }

    /// Pull the current snapshot from the device and resolve it.
    pub async fn refresh(&mut self) -> Result<()> {
        let snapshot = self.client.current_snapshot().await?;
        self.status_updated(snapshot);
        Ok(())
    }

    /// Replace the snapshot wholesale and recompute state.
    pub fn status_updated(&mut self, snapshot: DpSnapshot) {
        if let Some(ref mut logger) = self.logger {
            logger.log_snapshot(&snapshot);
        }

        let mut events: Vec<Event> = diff_snapshots(&self.snapshot, &snapshot)
            .into_iter()
            .map(|(dp, _old, value)| Event::DataPointChanged { dp, value })
            .collect();

        let state = resolve(&snapshot, &self.catalog, &self.config, &self.state);
        events.extend(state_events(&self.state, &state));

        trace!(dps = snapshot.len(), state = ?state, "status updated");

        self.snapshot = snapshot;
        self.state = state;

        for event in &events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        for cb in &self.state_callbacks {
            cb(&self.state);
        }

        if !events.is_empty() {
            debug!(count = events.len(), "processed events from status update");
        }
    }

    /// Overlay a partial update on the current snapshot and recompute state.
    pub fn partial_update(&mut self, partial: &DpSnapshot) {
        let mut snapshot = self.snapshot.clone();
        snapshot.merge(partial);
        self.status_updated(snapshot);
    }

    // -- Command methods --

    pub async fn set_hvac_mode(&mut self, mode: &str) -> Result<()> {
        let writes = encode_hvac_mode(&self.catalog, mode)?;
        self.write_logged("set_hvac_mode", writes).await
    }

    pub async fn set_preset_mode(&mut self, preset: &str) -> Result<()> {
        let writes = encode_preset(&self.catalog, preset)?;
        self.write_logged("set_preset_mode", writes).await
    }

    /// Set the target temperature. Ignored when no target DP is configured;
    /// NaN and infinities are rejected.
    pub async fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        match encode_target_temperature(&self.config, temperature)? {
            Some(write) => self.write_logged("set_temperature", vec![write]).await,
            None => {
                warn!(temperature, "no target temperature DP configured, ignoring");
                Ok(())
            }
        }
    }

    pub async fn set_fan_mode(&mut self, mode: &str) -> Result<()> {
        let writes = encode_fan_mode(mode)?;
        self.write_logged("set_fan_mode", writes).await
    }

    // -- State --

    pub fn resolved_state(&self) -> &ResolvedState {
        &self.state
    }

    pub fn snapshot(&self) -> &DpSnapshot {
        &self.snapshot
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn hvac_mode(&self) -> Option<&str> {
        self.state.hvac_mode.as_deref()
    }

    pub fn preset_mode(&self) -> Option<&str> {
        self.state.preset.as_deref()
    }

    pub fn hvac_action(&self) -> Option<&str> {
        self.state.action.as_deref()
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.state.current_temperature
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.state.target_temperature
    }

    /// Modes in catalog definition order.
    pub fn hvac_modes(&self) -> Vec<String> {
        self.catalog.hvac_modes.names()
    }

    pub fn preset_modes(&self) -> Vec<String> {
        self.catalog.presets.names()
    }

    pub fn fan_mode(&self) -> Result<String> {
        Err(Error::Unsupported("fan mode"))
    }

    pub fn fan_modes(&self) -> Result<Vec<String>> {
        Err(Error::Unsupported("fan mode"))
    }

    pub fn precision(&self) -> f64 {
        self.config.precision.as_f64()
    }

    pub fn target_temperature_step(&self) -> f64 {
        self.config.temperature_step.as_f64()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.config.temperature_unit
    }

    pub fn min_temp(&self) -> f64 {
        bound_temp(&self.snapshot, self.config.min_temperature_dp, DEFAULT_MIN_TEMP)
    }

    pub fn max_temp(&self) -> f64 {
        bound_temp(&self.snapshot, self.config.max_temperature_dp, DEFAULT_MAX_TEMP)
    }

    // -- Helpers --

    async fn write_logged(&mut self, action: &str, writes: Vec<DpWrite>) -> Result<()> {
        if let Some(ref mut logger) = self.logger {
            logger.log_command(action, &writes);
        }
        debug!(action, count = writes.len(), "writing data points");
        self.client.write_data_points(&writes).await
    }
}
