//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - totality: well-typed records always decide
//! - agreement between the solver and direct strategies
//! - the rule formulas against plain boolean oracles
//! - fail-loud binding for missing or mistyped facts

use crate::engine::{Engine, Strategy as EvalStrategy};
use crate::error::EvalError;
use crate::rules::RuleCatalog;
use crate::schema::SchemaRegistry;
use crate::test_support::{exam, lab, privacy, sis};
use polaudit_types::{Decision, Kind, PolicyRecord, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Mostly the vocabulary the rules test for, sometimes arbitrary text.
fn arb_word(known: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(known).prop_map(str::to_string),
        1 => "[a-z_]{0,12}",
    ]
}

fn arb_role() -> impl Strategy<Value = String> {
    arb_word(&["student", "faculty", "admin", "registrar"])
}

fn arb_action() -> impl Strategy<Value = String> {
    arb_word(&["view", "edit", "delete"])
}

fn arb_hour() -> impl Strategy<Value = i64> {
    prop_oneof![4 => 0i64..24, 1 => any::<i64>()]
}

fn arb_record() -> impl Strategy<Value = PolicyRecord> {
    prop_oneof![
        (arb_role(), arb_action(), any::<bool>())
            .prop_map(|(role, action, owner)| sis("s", &role, &action, owner)),
        (any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(c, g, i)| exam("e", c, g, i)),
        (arb_word(&["lab_pc", "server"]), any::<bool>(), arb_hour())
            .prop_map(|(system, on_campus, hour)| lab("l", &system, on_campus, hour)),
        (
            any::<bool>(),
            arb_word(&["enrolled", "graduated"]),
            arb_role(),
            arb_action()
        )
            .prop_map(|(req, status, role, action)| privacy("p", req, &status, &role, &action)),
    ]
}

// ============================================================================
// Reference oracles
// ============================================================================

fn text<'a>(r: &'a PolicyRecord, name: &str) -> &'a str {
    r.attribute(name).and_then(Value::as_text).unwrap()
}

fn flag(r: &PolicyRecord, name: &str) -> bool {
    r.attribute(name).and_then(Value::as_bool).unwrap()
}

fn oracle(r: &PolicyRecord) -> bool {
    match r.policy_type.as_str() {
        "SIS" => {
            let role = text(r, "role");
            role == "admin"
                || (matches!(role, "faculty" | "student")
                    && matches!(text(r, "action"), "view" | "edit")
                    && flag(r, "owner"))
        }
        "Exam" => !(flag(r, "create") && flag(r, "grade") && flag(r, "invigilate")),
        "Lab" => {
            let hour = r.attribute("hour").and_then(Value::as_int).unwrap();
            (8..=20).contains(&hour) && (text(r, "system") != "server" || flag(r, "on_campus"))
        }
        "Privacy" => {
            let role = text(r, "role");
            !flag(r, "access_requested")
                || text(r, "status") != "graduated"
                || matches!(role, "admin" | "registrar")
                || (role == "faculty" && text(r, "action") == "view")
        }
        other => panic!("no oracle for {other}"),
    }
}

fn evaluate(record: &PolicyRecord, strategy: EvalStrategy) -> Result<Decision, EvalError> {
    let registry = SchemaRegistry::builtin();
    let catalog = RuleCatalog::builtin();
    Engine::new(&registry, &catalog, strategy)?.evaluate(record)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn well_typed_records_always_decide(record in arb_record()) {
        let solved = evaluate(&record, EvalStrategy::default());
        prop_assert!(solved.is_ok(), "{:?}", solved);
        prop_assert_eq!(solved.clone(), evaluate(&record, EvalStrategy::Direct));
        prop_assert_eq!(solved.unwrap(), Decision::from_bool(oracle(&record)));
    }

    #[test]
    fn dropping_any_fact_is_missing_attribute(record in arb_record(), pick in any::<prop::sample::Index>()) {
        let names: Vec<String> = record.attributes.keys().cloned().collect();
        let victim = pick.get(&names).clone();
        let mut broken = record.clone();
        broken.attributes.remove(&victim);

        for strategy in [EvalStrategy::default(), EvalStrategy::Direct] {
            prop_assert_eq!(
                evaluate(&broken, strategy),
                Err(EvalError::MissingAttribute(victim.clone()))
            );
        }
    }

    #[test]
    fn mistyped_fact_is_type_mismatch(record in arb_record(), pick in any::<prop::sample::Index>()) {
        let schema = SchemaRegistry::builtin()
            .schema_for(&record.policy_type)
            .unwrap()
            .clone();
        let names: Vec<(String, Kind)> = schema.iter().map(|(n, k)| (n.to_string(), k)).collect();
        let (victim, kind) = pick.get(&names).clone();
        let wrong = match kind {
            Kind::Bool => Value::from("true"),
            Kind::Int => Value::from("10"),
            Kind::Text => Value::Bool(true),
        };
        let broken = record.clone().with(victim.clone(), wrong.clone());

        prop_assert_eq!(
            evaluate(&broken, EvalStrategy::default()),
            Err(EvalError::TypeMismatch { name: victim, expected: kind, actual: wrong })
        );
    }
}
