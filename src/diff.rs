use crate::types::*;

/// DP ids whose value differs between `previous` and `current`, with the
/// old value (`None` if the id is new) and the new one. Ids missing from
/// `current` are not reported: snapshots only ever grow.
pub(crate) fn diff_snapshots(
    previous: &DpSnapshot,
    current: &DpSnapshot,
) -> Vec<(DpId, Option<DpValue>, DpValue)> {
    current
        .iter()
        .filter_map(|(dp, value)| match previous.get(dp) {
            Some(prev) if prev == value => None,
            prev => Some((dp, prev.cloned(), value.clone())),
        })
        .collect()
}

/// Typed events for every resolved field that changed.
pub(crate) fn state_events(previous: &ResolvedState, current: &ResolvedState) -> Vec<Event> {
    let mut events = Vec::new();

    if let Some(mode) = changed(&previous.hvac_mode, &current.hvac_mode) {
        events.push(Event::HvacModeChanged { mode: mode.clone() });
    }
    if let Some(preset) = changed(&previous.preset, &current.preset) {
        events.push(Event::PresetChanged { preset: preset.clone() });
    }
    if let Some(action) = changed(&previous.action, &current.action) {
        events.push(Event::ActionChanged { action: action.clone() });
    }
    if let Some(temp) = changed(&previous.current_temperature, &current.current_temperature) {
        events.push(Event::CurrentTemperatureChanged { temp: *temp });
    }
    if let Some(temp) = changed(&previous.target_temperature, &current.target_temperature) {
        events.push(Event::TargetTemperatureChanged { temp: *temp });
    }

    events
}

fn changed<'a, T: PartialEq>(previous: &Option<T>, current: &'a Option<T>) -> Option<&'a T> {
    match current {
        Some(value) if previous.as_ref() != Some(value) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_diff_reports_new_and_changed() {
        let prev: DpSnapshot = [(1, DpValue::Bool(true)), (2, DpValue::Integer(200))]
            .into_iter()
            .collect();
        let curr: DpSnapshot = [
            (1, DpValue::Bool(true)),
            (2, DpValue::Integer(215)),
            (3, DpValue::from("eco")),
        ]
        .into_iter()
        .collect();

        let changes = diff_snapshots(&prev, &curr);
        assert_eq!(
            changes,
            vec![
                (2, Some(DpValue::Integer(200)), DpValue::Integer(215)),
                (3, None, DpValue::from("eco")),
            ]
        );
    }

    #[test]
    fn snapshot_diff_empty_when_equal() {
        let s: DpSnapshot = [(1, DpValue::Bool(true))].into_iter().collect();
        assert!(diff_snapshots(&s, &s).is_empty());
    }

    #[test]
    fn events_only_for_changes() {
        let prev = ResolvedState {
            hvac_mode: Some("heat".into()),
            target_temperature: Some(21.0),
            ..Default::default()
        };
        let curr = ResolvedState {
            hvac_mode: Some("heat".into()),
            preset: Some("eco".into()),
            target_temperature: Some(21.5),
            ..Default::default()
        };

        let events = state_events(&prev, &curr);
        assert_eq!(
            events,
            vec![
                Event::PresetChanged { preset: "eco".into() },
                Event::TargetTemperatureChanged { temp: 21.5 },
            ]
        );
        assert!(state_events(&curr, &curr).is_empty());
    }
}
