//! The `evaluate` use case: decide one record or the whole store.

use anyhow::Context;
use polaudit_domain::{Engine, PolicyRepository};
use polaudit_types::{
    Decision, DecisionCounts, EntryError, EvaluationEntry, PolicyRecord, ReportEnvelope,
    SCHEMA_REPORT_V1, ToolMeta,
};
use time::OffsetDateTime;

/// Evaluate one record into a report entry.
///
/// Errors are captured in the entry, never propagated: one bad record does not stop a batch.
/// A contradiction keeps its fail-closed DENIED next to the error.
pub fn entry_for(engine: &Engine<'_>, record: &PolicyRecord) -> EvaluationEntry {
    let (decision, error) = match engine.evaluate(record) {
        Ok(decision) => (Some(decision), None),
        Err(err) => {
            tracing::warn!(record = %record.id, code = err.code(), "evaluation failed: {err}");
            (
                err.fail_closed(),
                Some(EntryError {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }),
            )
        }
    };
    EvaluationEntry {
        id: record.id.clone(),
        policy_type: record.policy_type.clone(),
        decision,
        error,
    }
}

/// Look up `id` and evaluate it. An id that is not in the store is an error.
pub fn evaluate_one<R: PolicyRepository>(
    engine: &Engine<'_>,
    repo: &R,
    id: &str,
) -> anyhow::Result<EvaluationEntry> {
    let record = repo
        .get(id)
        .context("read policy store")?
        .with_context(|| format!("no policy with id '{id}'"))?;
    Ok(entry_for(engine, &record))
}

/// Evaluate every stored record, in id order.
pub fn evaluate_all<R: PolicyRepository>(
    engine: &Engine<'_>,
    repo: &R,
) -> anyhow::Result<ReportEnvelope> {
    let started_at = OffsetDateTime::now_utc();

    let records = repo.list().context("read policy store")?;
    let results: Vec<EvaluationEntry> = records.iter().map(|r| entry_for(engine, r)).collect();
    let counts = DecisionCounts::from_entries(&results);

    tracing::info!(
        allowed = counts.allowed,
        denied = counts.denied,
        errored = counts.errored,
        "store evaluated"
    );

    Ok(ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "polaudit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        strategy: engine.strategy().as_str().to_string(),
        results,
        counts,
    })
}

/// One terminal line per entry, e.g. `Policy p1 → ALLOWED`.
pub fn format_entry(entry: &EvaluationEntry) -> String {
    match (&entry.decision, &entry.error) {
        (Some(decision), None) => format!("Policy {} → {}", entry.id, decision),
        (Some(decision), Some(err)) => {
            format!("Policy {} → {} ({}: {})", entry.id, decision, err.code, err.message)
        }
        (None, Some(err)) => format!("Policy {} → ERROR ({}: {})", entry.id, err.code, err.message),
        (None, None) => format!("Policy {} → ERROR", entry.id),
    }
}

/// 0 when allowed, 2 when denied (including fail-closed), 1 when there is no decision.
pub fn decision_exit_code(entry: &EvaluationEntry) -> i32 {
    match entry.decision {
        Some(Decision::Allowed) => 0,
        Some(Decision::Denied) => 2,
        None => 1,
    }
}

/// 0 unless some record errored.
pub fn report_exit_code(report: &ReportEnvelope) -> i32 {
    if report.counts.errored > 0 { 1 } else { 0 }
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}
