//! Stable DTOs and IDs used across the polaudit workspace.
//!
//! This crate is intentionally boring:
//! - primitive kinds and the closed literal union bound to decision variables
//! - policy records and decisions
//! - the JSON evaluation report envelope
//! - stable string IDs and error codes
//! - explain registry for the built-in policy types

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod record;
pub mod report;
pub mod value;

pub use explain::{lookup_explanation, ExampleFacts, Explanation};
pub use record::{Decision, PolicyRecord};
pub use report::{
    DecisionCounts, EntryError, EvaluationEntry, PolauditReportV1, ReportEnvelope, ToolMeta,
    SCHEMA_REPORT_V1,
};
pub use value::{Kind, Value};
