//! Fuzz target for evaluation of arbitrary records against the built-in rules.
//!
//! Goal: the engine should **never panic**, and every well-formed record gets a
//! decision from both strategies.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use polaudit_domain::{Engine, RuleCatalog, SchemaRegistry, Strategy};
use polaudit_types::{PolicyRecord, Value};

#[derive(Arbitrary, Debug)]
enum FuzzValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

#[derive(Arbitrary, Debug)]
struct RecordInput {
    /// Index into the built-in policy types; out of range means an unknown type.
    policy_type: u8,
    attributes: Vec<(String, FuzzValue)>,
}

const TYPES: [&str; 4] = ["SIS", "Exam", "Lab", "Privacy"];

fuzz_target!(|input: RecordInput| {
    if input.attributes.len() > 16 {
        return;
    }
    let policy_type = TYPES
        .get(input.policy_type as usize)
        .copied()
        .unwrap_or("Unknown");

    let mut record = PolicyRecord::new("fuzz", policy_type);
    for (name, value) in input.attributes {
        let value = match value {
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Int(i) => Value::Int(i),
            FuzzValue::Text(s) => Value::Text(s),
        };
        record = record.with(name, value);
    }

    let registry = SchemaRegistry::builtin();
    let catalog = RuleCatalog::builtin();
    let solver = Engine::new(&registry, &catalog, Strategy::default()).expect("builtin catalog");
    let direct = Engine::new(&registry, &catalog, Strategy::Direct).expect("builtin catalog");

    assert_eq!(solver.evaluate(&record), direct.evaluate(&record));
});
