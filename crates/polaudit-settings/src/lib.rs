//! Config parsing and profile resolution, plus the schema document that
//! feeds the schema registry.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{PolauditConfigV1, SchemaDocumentV1, SchemaEntry};
pub use resolve::{Overrides, ResolvedConfig};

use anyhow::Context;
use polaudit_domain::SchemaRegistry;

/// Parse `polaudit.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PolauditConfigV1> {
    let cfg: PolauditConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the application (profile + config file + overrides).
pub fn resolve_config(
    cfg: PolauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Parse a schema document (`policy_schemas.json` layout) into a typed model.
pub fn parse_schema_document(input: &str) -> anyhow::Result<SchemaDocumentV1> {
    let doc: SchemaDocumentV1 = serde_json::from_str(input).context("invalid schema document")?;
    Ok(doc)
}

/// Parse a schema document straight into a registry.
pub fn load_registry(input: &str) -> anyhow::Result<SchemaRegistry> {
    Ok(parse_schema_document(input)?.into_registry())
}
