//! Explain registry for policy types and error codes.
//!
//! Maps policy type names and codes to human-readable explanations.

use crate::ids;

/// Explanation entry for a policy type or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the policy type/code.
    pub title: &'static str,
    /// What the rule governs.
    pub description: &'static str,
    /// Decision logic in words, or how to resolve an error code.
    pub logic: &'static str,
    /// Example facts, by outcome or as a fix.
    pub examples: ExampleFacts,
}

/// Example facts, as JSON objects.
#[derive(Debug, Clone)]
pub enum ExampleFacts {
    /// One fact set per outcome of a policy type.
    Decisions {
        allowed: &'static str,
        denied: &'static str,
    },
    /// A record that raises the code, and the corrected record.
    Fix {
        before: &'static str,
        after: &'static str,
    },
    /// Engine conditions no record can be written to reproduce.
    NotApplicable,
}

/// Look up an explanation by policy type name or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Policy types
        ids::POLICY_SIS => Some(explain_sis()),
        ids::POLICY_EXAM => Some(explain_exam()),
        ids::POLICY_LAB => Some(explain_lab()),
        ids::POLICY_PRIVACY => Some(explain_privacy()),

        // Codes
        ids::CODE_UNKNOWN_POLICY_TYPE => Some(explain_unknown_policy_type()),
        ids::CODE_MISSING_ATTRIBUTE => Some(explain_missing_attribute()),
        ids::CODE_TYPE_MISMATCH => Some(explain_type_mismatch()),
        ids::CODE_BINDING_CONTRADICTION => Some(explain_binding_contradiction()),
        ids::CODE_INCONCLUSIVE => Some(explain_inconclusive()),
        ids::CODE_MALFORMED_RULE => Some(explain_malformed_rule()),
        ids::CODE_CATALOG_MISMATCH => Some(explain_catalog_mismatch()),

        _ => None,
    }
}

/// List all built-in policy types.
pub fn all_policy_types() -> &'static [&'static str] {
    &[
        ids::POLICY_EXAM,
        ids::POLICY_LAB,
        ids::POLICY_PRIVACY,
        ids::POLICY_SIS,
    ]
}

/// List all explainable codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_UNKNOWN_POLICY_TYPE,
        ids::CODE_MISSING_ATTRIBUTE,
        ids::CODE_TYPE_MISMATCH,
        ids::CODE_BINDING_CONTRADICTION,
        ids::CODE_INCONCLUSIVE,
        ids::CODE_MALFORMED_RULE,
        ids::CODE_CATALOG_MISMATCH,
    ]
}

// --- Policy type explanations ---

fn explain_sis() -> Explanation {
    Explanation {
        title: "Student Information System access",
        description: "\
Governs who may read or change records in the student information system.",
        logic: "\
Allowed when the role is `admin`. Otherwise allowed only when the role is
`faculty` or `student`, the action is `view` or `edit`, and the actor owns
the record. Everything else is denied.",
        examples: ExampleFacts::Decisions {
            allowed: r#"{"role": "admin", "action": "view", "owner": false}"#,
            denied: r#"{"role": "student", "action": "delete", "owner": true}"#,
        },
    }
}

fn explain_exam() -> Explanation {
    Explanation {
        title: "Exam separation of duties",
        description: "\
Prevents one person from controlling an exam end to end.",
        logic: "\
Denied when the same actor can create, grade and invigilate the exam.
Holding any two of the three duties is allowed.",
        examples: ExampleFacts::Decisions {
            allowed: r#"{"create": true, "grade": true, "invigilate": false}"#,
            denied: r#"{"create": true, "grade": true, "invigilate": true}"#,
        },
    }
}

fn explain_lab() -> Explanation {
    Explanation {
        title: "Computer lab access",
        description: "\
Restricts lab system use to opening hours, with servers reachable on campus only.",
        logic: "\
Allowed when the hour is between 8 and 20 inclusive and either the system is
not `server` or the request comes from on campus. Out-of-hours requests are
denied regardless of the system.",
        examples: ExampleFacts::Decisions {
            allowed: r#"{"system": "lab_pc", "on_campus": false, "hour": 10}"#,
            denied: r#"{"system": "server", "on_campus": false, "hour": 10}"#,
        },
    }
}

fn explain_privacy() -> Explanation {
    Explanation {
        title: "Alumni record privacy",
        description: "\
Protects the records of graduated students.",
        logic: "\
Allowed when no access is requested, when the subject has not graduated, when
the role is `admin` or `registrar`, or when a `faculty` member only views.
Any other access to a graduate's record is denied.",
        examples: ExampleFacts::Decisions {
            allowed: r#"{"access_requested": false, "status": "graduated", "role": "student", "action": "view"}"#,
            denied: r#"{"access_requested": true, "status": "graduated", "role": "student", "action": "view"}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_unknown_policy_type() -> Explanation {
    Explanation {
        title: "Unknown Policy Type",
        description: "\
The record declares a policy type that has no schema or no rule.",
        logic: "\
Use one of the types listed by `polaudit schemas`, or add the type to the
schema document together with a rule.",
        examples: ExampleFacts::Fix {
            before: r#"{"type": "Unknown"}"#,
            after: r#"{"type": "Lab", "system": "lab_pc", "on_campus": true, "hour": 9}"#,
        },
    }
}

fn explain_missing_attribute() -> Explanation {
    Explanation {
        title: "Missing Attribute",
        description: "\
A fact required by the policy type's schema is absent from the record.
Missing facts are never defaulted.",
        logic: "\
Supply every attribute listed for the type by `polaudit schemas`.",
        examples: ExampleFacts::Fix {
            before: r#"{"type": "Exam", "create": true, "grade": true}"#,
            after: r#"{"type": "Exam", "create": true, "grade": true, "invigilate": false}"#,
        },
    }
}

fn explain_type_mismatch() -> Explanation {
    Explanation {
        title: "Type Mismatch",
        description: "\
A fact's literal does not match the kind declared by the schema. Values are
never coerced: the text \"10\" is not the integer 10.",
        logic: "\
Store booleans as JSON booleans, integers as JSON integers and text as JSON strings.",
        examples: ExampleFacts::Fix {
            before: r#"{"type": "Lab", "system": "lab_pc", "on_campus": true, "hour": "10"}"#,
            after: r#"{"type": "Lab", "system": "lab_pc", "on_campus": true, "hour": 10}"#,
        },
    }
}

fn explain_binding_contradiction() -> Explanation {
    Explanation {
        title: "Binding Contradiction",
        description: "\
The solver found the fact bindings and the rule unsatisfiable. Built-in rules
are total, so this indicates a defect in a rule or in the binder.",
        logic: "\
The record is treated as DENIED. Report the record and policy type.",
        examples: ExampleFacts::NotApplicable,
    }
}

fn explain_inconclusive() -> Explanation {
    Explanation {
        title: "Inconclusive",
        description: "\
The solver could not decide within its assignment budget, or the context
contains an unbound variable it cannot enumerate.",
        logic: "\
Raise `solver_budget` in polaudit.toml, or bind every variable the rule uses.",
        examples: ExampleFacts::NotApplicable,
    }
}

fn explain_malformed_rule() -> Explanation {
    Explanation {
        title: "Malformed Rule",
        description: "\
A rule compared values of different kinds or used a non-boolean where a
condition was expected.",
        logic: "\
Fix the rule so every comparison is between values of the same kind.",
        examples: ExampleFacts::NotApplicable,
    }
}

fn explain_catalog_mismatch() -> Explanation {
    Explanation {
        title: "Catalog Mismatch",
        description: "\
The schema document declares a policy type that has no rule, or a rule exists
for a type the schema document does not declare.",
        logic: "\
Keep the schema document in step with the rule catalog: one entry per type in
both. `polaudit schemas` lists the loaded types.",
        examples: ExampleFacts::Fix {
            before: r#"{"Parking": {"vars": {"zone": "String"}}}"#,
            after: r#"{"Lab": {"vars": {"system": "String", "on_campus": "Bool", "hour": "Int"}}}"#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_identifier_is_explained() {
        for id in all_policy_types().iter().chain(all_codes()) {
            assert!(lookup_explanation(id).is_some(), "missing explanation for {id}");
        }
    }

    #[test]
    fn policy_types_show_both_outcomes() {
        for ty in all_policy_types() {
            let exp = lookup_explanation(ty).unwrap();
            assert!(matches!(exp.examples, ExampleFacts::Decisions { .. }), "{ty}");
        }
    }

    #[test]
    fn unknown_identifier_is_none() {
        assert!(lookup_explanation("Unknown").is_none());
    }
}
