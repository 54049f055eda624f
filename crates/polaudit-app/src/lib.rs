//! Use case orchestration for polaudit.
//!
//! This crate provides the application layer: use cases that coordinate settings, the domain
//! engine, and a record repository. It is intentionally thin and delegates heavy lifting to
//! the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod evaluate;
mod explain;
mod records;
mod schemas;
mod setup;

pub use evaluate::{
    decision_exit_code, entry_for, evaluate_all, evaluate_one, format_entry, report_exit_code,
    serialize_report,
};
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use records::{
    add_record, build_record, delete_record, format_record, list_records, parse_literal,
};
pub use schemas::format_schemas;
pub use setup::{load_config, load_registry};
