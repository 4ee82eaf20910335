use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::types::{DpId, DpSnapshot, DpValue, DpWrite};
use crate::{Error, Result};

/// DP state that indicates a named mode is active, and the writes needed to
/// enter it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern(BTreeMap<DpId, DpValue>);

impl Pattern {
    /// True when every required pair is present with a matching value
    /// (see [`DpValue::matches`]).
    /// An empty pattern matches anything.
    pub fn matches(&self, snapshot: &DpSnapshot) -> bool {
        self.0.iter().all(|(dp, value)| snapshot.contains(*dp, value))
    }

    pub fn writes(&self) -> Vec<DpWrite> {
        self.0
            .iter()
            .map(|(dp, value)| DpWrite::new(*dp, value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DpId, DpValue)> for Pattern {
    fn from_iter<I: IntoIterator<Item = (DpId, DpValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered collection of named patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedPatterns(Vec<(String, Pattern)>);

impl NamedPatterns {
    /// Parse one catalog text. `kind` names the catalog in error messages.
    ///
    /// The text is JSON mapping a name to an object of `"<dp id>": <value>`
    /// pairs, e.g. `{"heat": {"1": true, "4": "manual"}, "off": {"1": false}}`.
    /// Definition order is kept: names are listed and matched in that order.
    pub fn parse(kind: &str, text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("{kind}: not valid JSON: {e}")))?;
        let Value::Object(entries) = root else {
            return Err(Error::Config(format!("{kind}: expected an object of named patterns")));
        };

        let mut patterns = Vec::with_capacity(entries.len());
        for (name, body) in entries {
            let Value::Object(pairs) = body else {
                return Err(Error::Config(format!("{kind}.{name}: expected an object of DP values")));
            };
            let pattern = parse_pattern(kind, &name, pairs)?;
            patterns.push((name, pattern));
        }
        Ok(Self(patterns))
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.0.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the last entry whose pattern matches `snapshot`, in
    /// definition order. Overlapping patterns resolve to the later one.
    pub fn last_match(&self, snapshot: &DpSnapshot) -> Option<&str> {
        self.iter().fold(None, |found, (name, pattern)| {
            if pattern.matches(snapshot) {
                Some(name)
            } else {
                found
            }
        })
    }
}

impl FromIterator<(String, Pattern)> for NamedPatterns {
    fn from_iter<I: IntoIterator<Item = (String, Pattern)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_pattern(kind: &str, name: &str, pairs: Map<String, Value>) -> Result<Pattern> {
    let mut pattern = BTreeMap::new();
    for (key, value) in pairs {
        let dp: DpId = key
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{kind}.{name}: DP id {key:?} is not a number")))?;
        let value = serde_json::from_value::<DpValue>(value.clone()).map_err(|_| {
            Error::Config(format!(
                "{kind}.{name}: DP {dp} value {value} is not a bool, integer or string"
            ))
        })?;
        pattern.insert(dp, value);
    }
    Ok(Pattern(pattern))
}

/// The three pattern collections, built once at setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeCatalog {
    pub hvac_modes: NamedPatterns,
    pub presets: NamedPatterns,
    pub actions: NamedPatterns,
}

impl ModeCatalog {
    pub fn parse(hvac_modes: &str, presets: &str, actions: &str) -> Result<Self> {
        Ok(Self {
            hvac_modes: NamedPatterns::parse("hvac_modes", hvac_modes)?,
            presets: NamedPatterns::parse("presets", presets)?,
            actions: NamedPatterns::parse("hvac_actions", actions)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(DpId, DpValue)]) -> DpSnapshot {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn parse_keeps_definition_order() {
        let modes = NamedPatterns::parse(
            "hvac_modes",
            r#"{"off": {"1": false}, "heat": {"1": true, "4": "manual"}, "auto": {"1": true, "4": "auto"}}"#,
        )
        .unwrap();
        assert_eq!(modes.names(), vec!["off", "heat", "auto"]);
        assert_eq!(modes.get("heat").unwrap().len(), 2);
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for text in [
            "not json",
            "[]",
            r#"{"heat": 1}"#,
            r#"{"heat": {"one": true}}"#,
            r#"{"heat": {"1": 1.5}}"#,
            r#"{"heat": {"1": null}}"#,
            r#"{"heat": {"1": [1]}}"#,
        ] {
            let err = NamedPatterns::parse("hvac_modes", text).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{text}: got {err:?}");
        }
    }

    #[test]
    fn empty_object_is_empty_catalog() {
        let presets = NamedPatterns::parse("presets", "{}").unwrap();
        assert!(presets.is_empty());
    }

    #[test]
    fn subset_match() {
        let pattern: Pattern = [(1, DpValue::Bool(true)), (4, DpValue::from("manual"))]
            .into_iter()
            .collect();
        let s = snapshot(&[
            (1, DpValue::Bool(true)),
            (2, DpValue::Integer(210)),
            (4, DpValue::from("manual")),
        ]);
        assert!(pattern.matches(&s));

        let s = snapshot(&[(1, DpValue::Bool(true)), (4, DpValue::from("auto"))]);
        assert!(!pattern.matches(&s));

        let s = snapshot(&[(1, DpValue::Bool(true))]);
        assert!(!pattern.matches(&s));
    }

    #[test]
    fn subset_match_bool_against_integer() {
        let catalog = ModeCatalog::parse(r#"{"heat": {"1": 1}, "off": {"1": 0}}"#, "{}", "{}").unwrap();
        let s = snapshot(&[(1, DpValue::Bool(true))]);
        assert_eq!(catalog.hvac_modes.last_match(&s), Some("heat"));

        let s = snapshot(&[(1, DpValue::Bool(false))]);
        assert_eq!(catalog.hvac_modes.last_match(&s), Some("off"));

        let catalog = ModeCatalog::parse(r#"{"heat": {"1": true}}"#, "{}", "{}").unwrap();
        let s = snapshot(&[(1, DpValue::Integer(1))]);
        assert_eq!(catalog.hvac_modes.last_match(&s), Some("heat"));

        let s = snapshot(&[(1, DpValue::from("1"))]);
        assert_eq!(catalog.hvac_modes.last_match(&s), None);
    }

    #[test]
    fn empty_pattern_matches_everything() {
        assert!(Pattern::default().matches(&DpSnapshot::new()));
    }

    #[test]
    fn last_match_wins() {
        let modes = NamedPatterns::parse(
            "hvac_modes",
            r#"{"heat": {"1": true}, "eco": {"1": true, "4": "eco"}, "other": {"1": true}}"#,
        )
        .unwrap();
        let s = snapshot(&[(1, DpValue::Bool(true)), (4, DpValue::from("eco"))]);
        assert_eq!(modes.last_match(&s), Some("other"));

        let s = snapshot(&[(1, DpValue::Bool(false))]);
        assert_eq!(modes.last_match(&s), None);
    }

    #[test]
    fn writes_in_dp_order() {
        let modes = NamedPatterns::parse("hvac_modes", r#"{"heat": {"103": 1, "102": true}}"#).unwrap();
        let writes = modes.get("heat").unwrap().writes();
        assert_eq!(
            writes,
            vec![DpWrite::new(102, true), DpWrite::new(103, 1i64)]
        );
    }
}
