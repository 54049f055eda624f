//! Record management use cases: add, delete, list.

use anyhow::Context;
use polaudit_domain::{PolicyRepository, SchemaRegistry};
use polaudit_types::{Kind, PolicyRecord, Value};
use std::collections::BTreeMap;

/// Parse a command-line literal according to the attribute kind.
///
/// Booleans are `true`/`false` in any case, integers are decimal `i64`; text is taken as is.
pub fn parse_literal(kind: Kind, raw: &str) -> anyhow::Result<Value> {
    match kind {
        Kind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => anyhow::bail!("expected true or false, got '{raw}'"),
        },
        Kind::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .with_context(|| format!("expected an integer, got '{raw}'")),
        Kind::Text => Ok(Value::Text(raw.to_string())),
    }
}

/// Build a complete, well-typed record from `name=value` assignments.
///
/// Rejects empty ids, unknown types, attributes outside the schema, repeated or
/// malformed assignments, and schema attributes left unset.
pub fn build_record(
    registry: &SchemaRegistry,
    id: &str,
    policy_type: &str,
    assignments: &[String],
) -> anyhow::Result<PolicyRecord> {
    if id.trim().is_empty() {
        anyhow::bail!("policy id must not be empty");
    }
    let schema = registry.schema_for(policy_type)?;

    let mut attributes = BTreeMap::new();
    for assignment in assignments {
        let (name, raw) = assignment
            .split_once('=')
            .with_context(|| format!("expected name=value, got '{assignment}'"))?;
        let name = name.trim();
        let kind = schema.kind_of(name).with_context(|| {
            format!("attribute '{name}' is not part of the {policy_type} schema")
        })?;
        let value =
            parse_literal(kind, raw).with_context(|| format!("invalid value for '{name}'"))?;
        if attributes.insert(name.to_string(), value).is_some() {
            anyhow::bail!("attribute '{name}' assigned more than once");
        }
    }

    let missing: Vec<&str> = schema
        .iter()
        .map(|(name, _)| name)
        .filter(|name| !attributes.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("missing attributes for {policy_type}: {}", missing.join(", "));
    }

    Ok(PolicyRecord {
        id: id.to_string(),
        policy_type: policy_type.to_string(),
        attributes,
    })
}

/// Validate and store a new record.
pub fn add_record<R: PolicyRepository>(
    repo: &mut R,
    registry: &SchemaRegistry,
    id: &str,
    policy_type: &str,
    assignments: &[String],
) -> anyhow::Result<PolicyRecord> {
    let record = build_record(registry, id, policy_type, assignments)?;
    repo.insert(record.clone())
        .with_context(|| format!("add policy '{id}'"))?;
    tracing::info!(record = %record.id, policy_type = %record.policy_type, "policy added");
    Ok(record)
}

/// Remove a record. An id that is not in the store is an error.
pub fn delete_record<R: PolicyRepository>(repo: &mut R, id: &str) -> anyhow::Result<PolicyRecord> {
    let removed = repo
        .remove(id)
        .with_context(|| format!("delete policy '{id}'"))?
        .with_context(|| format!("no policy with id '{id}'"))?;
    tracing::info!(record = %removed.id, "policy deleted");
    Ok(removed)
}

pub fn list_records<R: PolicyRepository>(repo: &R) -> anyhow::Result<Vec<PolicyRecord>> {
    repo.list().context("read policy store")
}

/// `<id>  <type>  name=value, ...` with attributes in name order.
pub fn format_record(record: &PolicyRecord) -> String {
    let facts: Vec<String> = record
        .attributes
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("{}\t{}\t{}", record.id, record.policy_type, facts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaudit_domain::InMemoryRepository;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn literals_follow_the_schema_kind() {
        assert_eq!(parse_literal(Kind::Bool, "True").unwrap(), Value::Bool(true));
        assert_eq!(parse_literal(Kind::Int, " 14 ").unwrap(), Value::Int(14));
        assert_eq!(parse_literal(Kind::Text, "10").unwrap(), Value::from("10"));
        assert!(parse_literal(Kind::Bool, "yes").is_err());
        assert!(parse_literal(Kind::Int, "ten").is_err());
    }

    #[test]
    fn builds_typed_record() {
        let registry = SchemaRegistry::builtin();
        let record = build_record(
            &registry,
            "p9",
            "Lab",
            &args(&["system=lab_pc", "on_campus=false", "hour=9"]),
        )
        .unwrap();
        assert_eq!(record.attribute("hour"), Some(&Value::Int(9)));
        assert_eq!(record.attribute("on_campus"), Some(&Value::Bool(false)));
        assert_eq!(
            format_record(&record),
            "p9\tLab\thour=9, on_campus=false, system=\"lab_pc\""
        );
    }

    #[test]
    fn rejects_bad_input() {
        let registry = SchemaRegistry::builtin();
        let reject = |id: &str, ty: &str, items: &[&str]| {
            format!("{:#}", build_record(&registry, id, ty, &args(items)).unwrap_err())
        };

        assert!(reject("", "Exam", &[]).contains("must not be empty"));
        assert!(reject("e", "Parking", &[]).contains("unknown policy type: Parking"));
        assert!(reject("e", "Exam", &["create"]).contains("expected name=value"));
        assert!(reject("e", "Exam", &["colour=red"]).contains("not part of the Exam schema"));
        assert!(reject("e", "Exam", &["create=maybe"]).contains("invalid value for 'create'"));
        assert!(
            reject("e", "Exam", &["create=true", "create=false"]).contains("more than once")
        );
        assert!(
            reject("e", "Exam", &["create=true"]).contains("missing attributes for Exam: grade, invigilate")
        );
    }

    #[test]
    fn add_list_delete() {
        let registry = SchemaRegistry::builtin();
        let mut repo = InMemoryRepository::new();
        let exam = args(&["create=true", "grade=false", "invigilate=false"]);

        add_record(&mut repo, &registry, "e1", "Exam", &exam).unwrap();
        let dup = add_record(&mut repo, &registry, "e1", "Exam", &exam).unwrap_err();
        assert!(format!("{dup:#}").contains("policy id already exists: e1"));

        assert_eq!(list_records(&repo).unwrap().len(), 1);
        assert_eq!(delete_record(&mut repo, "e1").unwrap().id, "e1");
        assert!(delete_record(&mut repo, "e1").is_err());
        assert!(list_records(&repo).unwrap().is_empty());
    }
}
