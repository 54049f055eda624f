use crate::Decision;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for the evaluation report.
pub const SCHEMA_REPORT_V1: &str = "polaudit.report.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Error attached to a report entry instead of a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntryError {
    pub code: String,
    pub message: String,
}

/// One evaluated record. Exactly one of `decision` / `error` is set, except for
/// binding contradictions, which carry both (the fail-closed decision and the defect code).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationEntry {
    pub id: String,
    pub policy_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EntryError>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionCounts {
    pub allowed: u32,
    pub denied: u32,
    pub errored: u32,
}

impl DecisionCounts {
    pub fn from_entries(entries: &[EvaluationEntry]) -> Self {
        let mut counts = DecisionCounts::default();
        for e in entries {
            if e.error.is_some() {
                counts.errored += 1;
                continue;
            }
            match e.decision {
                Some(Decision::Allowed) => counts.allowed += 1,
                Some(Decision::Denied) => counts.denied += 1,
                None => counts.errored += 1,
            }
        }
        counts
    }
}

/// Report envelope written by `polaudit evaluate --all --report-out`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    /// Evaluation strategy in effect (`solver` or `direct`).
    pub strategy: String,
    pub results: Vec<EvaluationEntry>,
    pub counts: DecisionCounts,
}

pub type PolauditReportV1 = ReportEnvelope;
