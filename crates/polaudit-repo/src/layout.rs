//! On-disk layout: a JSON object keyed by id, each value
//! `{"type": <policy type>, <attribute>: <literal>, ...}`.

use polaudit_types::{PolicyRecord, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(rename = "type")]
    policy_type: String,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

/// Parse store text into records keyed by id. Never panics on any input.
pub fn parse_store(text: &str) -> Result<BTreeMap<String, PolicyRecord>, serde_json::Error> {
    let stored: BTreeMap<String, StoredRecord> = serde_json::from_str(text)?;
    Ok(stored
        .into_iter()
        .map(|(id, s)| {
            let record = PolicyRecord {
                id: id.clone(),
                policy_type: s.policy_type,
                attributes: s.attributes,
            };
            (id, record)
        })
        .collect())
}

pub fn render_store(
    records: &BTreeMap<String, PolicyRecord>,
) -> Result<String, serde_json::Error> {
    let stored: BTreeMap<&str, StoredRecord> = records
        .iter()
        .map(|(id, r)| {
            (
                id.as_str(),
                StoredRecord {
                    policy_type: r.policy_type.clone(),
                    attributes: r.attributes.clone(),
                },
            )
        })
        .collect();
    let mut text = serde_json::to_string_pretty(&stored)?;
    text.push('\n');
    Ok(text)
}
