use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::diff::diff_snapshots;
use crate::protocol::dps_payload;
use crate::types::{DpSnapshot, DpWrite};

pub enum MessageLogMode {
    Full,
    Diffed,
}

/// Appends one JSON object per line for every snapshot received and every
/// write issued.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous: Option<DpSnapshot>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            mode,
            file,
            previous: None,
        })
    }

    pub fn log_command(&mut self, action: &str, writes: &[DpWrite]) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "action": action,
            "dps": dps_payload(writes),
        });
        self.write_line(&entry);
    }

    pub fn log_snapshot(&mut self, snapshot: &DpSnapshot) {
        let entry = match (&self.mode, &self.previous) {
            (MessageLogMode::Diffed, Some(prev)) => {
                let changes: Vec<Value> = diff_snapshots(prev, snapshot)
                    .into_iter()
                    .map(|(dp, old, new)| {
                        json!({ "dp": dp, "old": old.map(|v| v.to_json()), "new": new.to_json() })
                    })
                    .collect();
                json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "status",
                    "changes": changes,
                })
            }
            (MessageLogMode::Diffed, None) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "status",
                "full": true,
                "dps": snapshot.to_dps_json(),
            }),
            (MessageLogMode::Full, _) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "status",
                "dps": snapshot.to_dps_json(),
            }),
        };
        self.write_line(&entry);
        self.previous = Some(snapshot.clone());
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
