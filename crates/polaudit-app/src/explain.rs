//! The `explain` use case: decision logic for a policy type, or guidance for an error code.

use polaudit_types::explain::{self, ExampleFacts, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes the known policy types and codes.
    NotFound {
        identifier: String,
        available_policy_types: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_policy_types: explain::all_policy_types(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    let heading = match exp.examples {
        ExampleFacts::Decisions { .. } => "Decision logic",
        _ => "Resolution",
    };
    out.push_str(heading);
    out.push('\n');
    out.push_str(&"-".repeat(heading.len()));
    out.push('\n');
    out.push_str(exp.logic);
    out.push('\n');
    match &exp.examples {
        ExampleFacts::Decisions { allowed, denied } => {
            push_examples(&mut out, ("Allowed", *allowed), ("Denied", *denied));
        }
        ExampleFacts::Fix { before, after } => {
            push_examples(&mut out, ("Before", *before), ("After (fixed)", *after));
        }
        ExampleFacts::NotApplicable => {}
    }

    out
}

fn push_examples(out: &mut String, first: (&str, &str), second: (&str, &str)) {
    out.push_str("\nExamples\n");
    out.push_str("--------\n\n");
    for (i, (label, facts)) in [first, second].into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{label}:\n  {facts}\n"));
    }
}

pub fn format_not_found(
    identifier: &str,
    policy_types: &[&'static str],
    codes: &[&'static str],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown policy type or code: {identifier}\n\n"));
    out.push_str("Available policy types:\n");
    for ty in policy_types {
        out.push_str(&format!("  - {ty}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_known_policy_type() {
        let output = run_explain("Lab");
        let ExplainOutput::Found(exp) = output else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.contains("Decision logic"));
        assert!(formatted.contains("Allowed:"));
        assert!(formatted.contains("Denied:"));
    }

    #[test]
    fn explain_known_code() {
        let ExplainOutput::Found(exp) = run_explain("type_mismatch") else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.contains("Before:\n  {"));
        assert!(formatted.contains("After (fixed):"));
        assert!(formatted.contains("Resolution\n----------\n"));

        let ExplainOutput::Found(exp) = run_explain("binding_contradiction") else {
            panic!("expected Found");
        };
        assert!(!format_explanation(&exp).contains("Examples"));
    }

    #[test]
    fn explain_unknown_lists_known_identifiers() {
        let ExplainOutput::NotFound {
            identifier,
            available_policy_types,
            available_codes,
        } = run_explain("Parking")
        else {
            panic!("expected NotFound");
        };
        assert_eq!(identifier, "Parking");
        let formatted = format_not_found(&identifier, available_policy_types, available_codes);
        assert!(formatted.contains("Unknown policy type or code: Parking"));
        for ty in ["Exam", "Lab", "Privacy", "SIS"] {
            assert!(formatted.contains(&format!("  - {ty}\n")));
        }
        assert!(formatted.contains("missing_attribute"));
    }
}
