use serde_json::Value;

use crate::types::DpWrite;

/// `{"<dp>": <value>, ...}` object for a batch of writes. Later writes to
/// the same DP win.
pub fn dps_payload(writes: &[DpWrite]) -> Value {
    Value::Object(
        writes
            .iter()
            .map(|w| (w.dp.to_string(), w.value.to_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_uses_string_keys() {
        let writes = vec![DpWrite::new(102, true), DpWrite::new(103, 1i64)];
        assert_eq!(dps_payload(&writes), json!({"102": true, "103": 1}));
    }

    #[test]
    fn payload_last_write_wins() {
        let writes = vec![DpWrite::new(2, 200i64), DpWrite::new(2, 215i64)];
        assert_eq!(dps_payload(&writes), json!({"2": 215}));
    }
}
