use polaudit_domain::{PolicySchema, SchemaRegistry};
use polaudit_types::Kind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `polaudit.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolauditConfigV1 {
    /// Optional schema string for tooling (`polaudit.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `default` or `direct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Path of the schema document. Built-in schemas apply when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<String>,

    /// Path of the JSON record store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,

    /// Evaluation strategy: `solver` or `direct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Maximum number of assignments the solver may try per evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_budget: Option<u64>,
}

/// One policy type in the schema document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaEntry {
    /// Attribute name to kind, in declaration order.
    #[schemars(with = "BTreeMap<String, Kind>")]
    pub vars: PolicySchema,
}

/// `policy_schemas.json`: policy type name to its variables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SchemaDocumentV1 {
    pub types: BTreeMap<String, SchemaEntry>,
}

impl SchemaDocumentV1 {
    pub fn into_registry(self) -> SchemaRegistry {
        SchemaRegistry::new(
            self.types
                .into_iter()
                .map(|(name, entry)| (name, entry.vars))
                .collect(),
        )
    }
}

impl From<&SchemaRegistry> for SchemaDocumentV1 {
    fn from(registry: &SchemaRegistry) -> Self {
        Self {
            types: registry
                .iter()
                .map(|(name, schema)| {
                    (
                        name.to_string(),
                        SchemaEntry {
                            vars: schema.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}
