//! Startup: resolve configuration and load the schema registry.

use anyhow::Context;
use polaudit_domain::SchemaRegistry;
use polaudit_settings::{Overrides, PolauditConfigV1, ResolvedConfig};

/// Resolve config file contents (empty string if not found) plus command-line overrides.
pub fn load_config(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    // Empty is allowed, defaults apply.
    let cfg = if config_text.trim().is_empty() {
        PolauditConfigV1::default()
    } else {
        polaudit_settings::parse_config_toml(config_text).context("parse config")?
    };
    polaudit_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Build the registry from a schema document, or the built-in schemas when there is none.
pub fn load_registry(schema_text: Option<&str>) -> anyhow::Result<SchemaRegistry> {
    let registry = match schema_text {
        Some(text) => polaudit_settings::load_registry(text).context("load schema document")?,
        None => SchemaRegistry::builtin(),
    };
    tracing::debug!(types = registry.len(), "schema registry loaded");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaudit_domain::Strategy;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let resolved = load_config("  \n", Overrides::default()).unwrap();
        assert_eq!(resolved.strategy, Strategy::default());
        assert_eq!(resolved.store_path, "policies.json");
    }

    #[test]
    fn invalid_config_carries_context() {
        let err = load_config("profile = [", Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").starts_with("parse config"));
    }

    #[test]
    fn missing_document_means_builtin_schemas() {
        assert_eq!(load_registry(None).unwrap(), SchemaRegistry::builtin());
        assert!(load_registry(Some("[]")).is_err());
    }
}
