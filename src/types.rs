use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric data point id as exposed by the device.
pub type DpId = u32;

/// A single data point value. Tuya devices only report booleans, integers
/// and short strings/enums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DpValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl DpValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DpValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Equality as devices and hand-written catalogs use it: `true`/`false`
    /// match `1`/`0`. Strings only match strings.
    pub fn matches(&self, other: &DpValue) -> bool {
        match (self, other) {
            (DpValue::Bool(b), DpValue::Integer(i)) | (DpValue::Integer(i), DpValue::Bool(b)) => {
                *i == *b as i64
            }
            _ => self == other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DpValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DpValue::Bool(b) => Value::Bool(*b),
            DpValue::Integer(i) => Value::from(*i),
            DpValue::String(s) => Value::String(s.clone()),
        }
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(DpValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(DpValue::Integer),
            Value::String(s) => Some(DpValue::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for DpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpValue::Bool(b) => write!(f, "{b}"),
            DpValue::Integer(i) => write!(f, "{i}"),
            DpValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for DpValue {
    fn from(b: bool) -> Self {
        DpValue::Bool(b)
    }
}

impl From<i64> for DpValue {
    fn from(i: i64) -> Self {
        DpValue::Integer(i)
    }
}

impl From<&str> for DpValue {
    fn from(s: &str) -> Self {
        DpValue::String(s.to_string())
    }
}

/// All data points currently known for a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DpSnapshot(BTreeMap<DpId, DpValue>);

impl DpSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dp: DpId) -> Option<&DpValue> {
        self.0.get(&dp)
    }

    pub fn insert(&mut self, dp: DpId, value: impl Into<DpValue>) -> Option<DpValue> {
        self.0.insert(dp, value.into())
    }

    /// True when `dp` holds a value that [`DpValue::matches`] `value`.
    pub fn contains(&self, dp: DpId, value: &DpValue) -> bool {
        self.0.get(&dp).is_some_and(|v| v.matches(value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DpId, &DpValue)> {
        self.0.iter().map(|(dp, v)| (*dp, v))
    }

    /// Overlay a partial update: ids present in `partial` replace ours, the
    /// rest are kept.
    pub fn merge(&mut self, partial: &DpSnapshot) {
        for (dp, value) in &partial.0 {
            self.0.insert(*dp, value.clone());
        }
    }

    /// Build from the `{"1": true, "2": 215}` object devices report under
    /// `dps`. Keys that aren't DP ids and values that aren't DP scalars are
    /// skipped.
    pub fn from_dps_json(dps: &Value) -> Self {
        let mut snapshot = Self::new();
        if let Value::Object(map) = dps {
            for (key, value) in map {
                let Ok(dp) = key.parse::<DpId>() else {
                    continue;
                };
                if let Some(v) = DpValue::from_json(value) {
                    snapshot.0.insert(dp, v);
                }
            }
        }
        snapshot
    }

    pub fn to_dps_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(dp, v)| (dp.to_string(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(DpId, DpValue)> for DpSnapshot {
    fn from_iter<I: IntoIterator<Item = (DpId, DpValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One data point write issued to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpWrite {
    pub dp: DpId,
    pub value: DpValue,
}

impl DpWrite {
    pub fn new(dp: DpId, value: impl Into<DpValue>) -> Self {
        Self {
            dp,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "\u{00b0}C",
            TemperatureUnit::Fahrenheit => "\u{00b0}F",
        }
    }
}

/// Granularity used both for the raw-to-physical scale factor (precision)
/// and for set-point adjustment (step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Precision {
    Whole,
    Halves,
    Tenths,
}

impl Precision {
    pub fn as_f64(&self) -> f64 {
        match self {
            Precision::Whole => 1.0,
            Precision::Halves => 0.5,
            Precision::Tenths => 0.1,
        }
    }
}

impl TryFrom<f64> for Precision {
    type Error = String;

    fn try_from(v: f64) -> std::result::Result<Self, Self::Error> {
        if v == 1.0 {
            Ok(Precision::Whole)
        } else if v == 0.5 {
            Ok(Precision::Halves)
        } else if v == 0.1 {
            Ok(Precision::Tenths)
        } else {
            Err(format!("unsupported precision {v} (expected 1.0, 0.5 or 0.1)"))
        }
    }
}

impl From<Precision> for f64 {
    fn from(p: Precision) -> Self {
        p.as_f64()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    TargetTemperature,
    TemperatureRange,
    FanMode,
    PresetMode,
}

/// Independent feature flags a device exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Semantic climate state derived from the latest snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedState {
    pub hvac_mode: Option<String>,
    pub preset: Option<String>,
    pub action: Option<String>,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
}

/// Events emitted by the diff engine when resolved state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    HvacModeChanged { mode: String },
    PresetChanged { preset: String },
    ActionChanged { action: String },
    CurrentTemperatureChanged { temp: f64 },
    TargetTemperatureChanged { temp: f64 },
    DataPointChanged { dp: DpId, value: DpValue },
}
