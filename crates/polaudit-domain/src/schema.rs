//! Policy schemas and the registry that maps policy types to them.

use crate::error::EvalError;
use polaudit_types::{ids, Kind};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Ordered mapping from attribute name to kind.
///
/// Declaration order is kept: it drives binding order and how schemas are listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicySchema {
    attributes: Vec<(String, Kind)>,
}

impl PolicySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute; redeclaring a name replaces its kind in place.
    pub fn with(mut self, name: impl Into<String>, kind: Kind) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = kind,
            None => self.attributes.push((name, kind)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Kind)> {
        self.attributes.iter().map(|(n, k)| (n.as_str(), *k))
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Serialize for PolicySchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (name, kind) in &self.attributes {
            map.serialize_entry(name, kind)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PolicySchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = PolicySchema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute name to kind")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PolicySchema, A::Error> {
                let mut attributes: Vec<(String, Kind)> = Vec::new();
                while let Some((name, kind)) = access.next_entry::<String, Kind>()? {
                    if attributes.iter().any(|(n, _)| *n == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate attribute '{name}'"
                        )));
                    }
                    attributes.push((name, kind));
                }
                Ok(PolicySchema { attributes })
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

/// Policy type name to schema. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, PolicySchema>,
}

impl SchemaRegistry {
    pub fn new(schemas: BTreeMap<String, PolicySchema>) -> Self {
        Self { schemas }
    }

    /// Schemas for the four built-in policy types.
    pub fn builtin() -> Self {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            ids::POLICY_SIS.to_string(),
            PolicySchema::new()
                .with("role", Kind::Text)
                .with("action", Kind::Text)
                .with("owner", Kind::Bool),
        );
        schemas.insert(
            ids::POLICY_EXAM.to_string(),
            PolicySchema::new()
                .with("create", Kind::Bool)
                .with("grade", Kind::Bool)
                .with("invigilate", Kind::Bool),
        );
        schemas.insert(
            ids::POLICY_LAB.to_string(),
            PolicySchema::new()
                .with("system", Kind::Text)
                .with("on_campus", Kind::Bool)
                .with("hour", Kind::Int),
        );
        schemas.insert(
            ids::POLICY_PRIVACY.to_string(),
            PolicySchema::new()
                .with("access_requested", Kind::Bool)
                .with("status", Kind::Text)
                .with("role", Kind::Text)
                .with("action", Kind::Text),
        );
        Self { schemas }
    }

    pub fn schema_for(&self, policy_type: &str) -> Result<&PolicySchema, EvalError> {
        self.schemas
            .get(policy_type)
            .ok_or_else(|| EvalError::UnknownPolicyType(policy_type.to_string()))
    }

    /// Registered policy type names, sorted.
    pub fn policy_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolicySchema)> {
        self.schemas.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

static GLOBAL_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Install the process-wide registry. Init-once: a second call hands the
/// rejected registry back and leaves the installed one untouched.
pub fn install_global(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, SchemaRegistry> {
    let mut pending = Some(registry);
    let installed = GLOBAL_REGISTRY.get_or_init(|| pending.take().unwrap_or_default());
    match pending {
        Some(rejected) => Err(rejected),
        None => Ok(installed),
    }
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL_REGISTRY.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_keeps_document_order() {
        let schema: PolicySchema =
            serde_json::from_str(r#"{"system": "String", "on_campus": "Bool", "hour": "Int"}"#)
                .unwrap();
        let names: Vec<&str> = schema.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["system", "on_campus", "hour"]);
        assert_eq!(schema.kind_of("hour"), Some(Kind::Int));
        assert_eq!(schema.kind_of("system"), Some(Kind::Text));
    }

    #[test]
    fn schema_rejects_duplicates_and_unknown_kinds() {
        let dup = serde_json::from_str::<PolicySchema>(r#"{"a": "Bool", "a": "Int"}"#);
        assert!(dup.unwrap_err().to_string().contains("duplicate attribute 'a'"));

        assert!(serde_json::from_str::<PolicySchema>(r#"{"a": "Float"}"#).is_err());
    }

    #[test]
    fn schema_serializes_in_order() {
        let schema = PolicySchema::new()
            .with("z", Kind::Bool)
            .with("a", Kind::Int);
        assert_eq!(
            serde_json::to_string(&schema).unwrap(),
            r#"{"z":"Bool","a":"Int"}"#
        );
    }

    #[test]
    fn redeclaring_keeps_position() {
        let schema = PolicySchema::new()
            .with("a", Kind::Bool)
            .with("b", Kind::Bool)
            .with("a", Kind::Text);
        let entries: Vec<(&str, Kind)> = schema.iter().collect();
        assert_eq!(entries, vec![("a", Kind::Text), ("b", Kind::Bool)]);
    }

    #[test]
    fn unknown_type_is_reported() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(
            registry.schema_for("Unknown"),
            Err(EvalError::UnknownPolicyType("Unknown".to_string()))
        );
        let types: Vec<&str> = registry.policy_types().collect();
        assert_eq!(types, vec!["Exam", "Lab", "Privacy", "SIS"]);
    }

    #[test]
    fn global_registry_is_init_once() {
        let first = install_global(SchemaRegistry::builtin());
        let second = install_global(SchemaRegistry::default());
        assert!(second.is_err());
        if let Ok(installed) = first {
            assert_eq!(installed.len(), 4);
        }
        assert!(global().is_some());
    }
}
