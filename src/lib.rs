mod catalog;
mod client;
mod codec;
mod config;
mod diff;
mod encoder;
mod error;
mod logger;
mod protocol;
mod resolver;
mod types;

pub use catalog::{ModeCatalog, NamedPatterns, Pattern};
pub use client::{ClimateDevice, ClimateDeviceBuilder, DeviceClient};
pub use codec::{TemperatureCodec, DEFAULT_MAX_TEMP, DEFAULT_MIN_TEMP};
pub use config::ClimateConfig;
pub use encoder::{encode_fan_mode, encode_hvac_mode, encode_preset, encode_target_temperature};
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use protocol::dps_payload;
pub use resolver::{estimate_action, resolve, ACTION_HEATING, ACTION_IDLE, HVAC_MODE_HEAT};
pub use types::*;
