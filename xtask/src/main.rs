//! Developer tasks (schema generation, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{bail, Context};
use polaudit_domain::RuleCatalog;
use polaudit_types::explain;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root: the parent of the xtask directory.
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };
    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent directory")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "polaudit.report.v1.json",
            generate: || schema_for!(polaudit_types::PolauditReportV1),
        },
        SchemaSpec {
            filename: "polaudit.config.v1.json",
            generate: || schema_for!(polaudit_settings::PolauditConfigV1),
        },
        SchemaSpec {
            filename: "polaudit.schemas.v1.json",
            generate: || schema_for!(polaudit_settings::SchemaDocumentV1),
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fails unless every schema in `dir` matches what would be generated.
fn validate_schemas(dir: &Path) -> anyhow::Result<()> {
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo run -p xtask -- emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Every catalog policy type and every code needs a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let catalog = RuleCatalog::builtin();
    let mut errors = Vec::new();

    let mut listed: Vec<&str> = explain::all_policy_types().to_vec();
    listed.sort_unstable();
    let mut cataloged: Vec<&str> = catalog.policy_types().collect();
    cataloged.sort_unstable();
    if listed != cataloged {
        errors.push(format!(
            "explained policy types {listed:?} differ from the rule catalog {cataloged:?}"
        ));
    }

    for id in explain::all_policy_types().iter().chain(explain::all_codes()) {
        match explain::lookup_explanation(id) {
            Some(exp) => {
                if exp.title.is_empty() || exp.description.is_empty() || exp.logic.is_empty() {
                    errors.push(format!("'{id}' has an incomplete explanation"));
                }
            }
            None => errors.push(format!("'{id}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("{} policy types have explanations", cataloged.len());
        println!("{} codes have explanations", explain::all_codes().len());
        return Ok(());
    }
    for err in &errors {
        eprintln!("  - {err}");
    }
    bail!("explain coverage failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  explain-coverage  Check that all policy types and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(&schemas_dir()?),
        "validate-schemas" => validate_schemas(&schemas_dir()?),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo run -p xtask -- help` for usage."),
    }
    .context("xtask failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn emitted_schemas_validate() {
        let tmp = TempDir::new().unwrap();
        assert!(validate_schemas(tmp.path()).is_err());
        emit_schemas(tmp.path()).unwrap();
        validate_schemas(tmp.path()).unwrap();
    }

    #[test]
    fn report_schema_names_the_envelope_fields() {
        let json = serialize_schema(&schema_for!(polaudit_types::PolauditReportV1)).unwrap();
        for field in ["started_at", "strategy", "results", "counts"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn explain_coverage_passes() {
        explain_coverage().unwrap();
    }
}
