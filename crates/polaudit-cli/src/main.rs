//! CLI entry point for polaudit.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `polaudit-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgGroup, Parser, Subcommand};
use polaudit_app::{
    add_record, decision_exit_code, delete_record, evaluate_all, evaluate_one, format_entry,
    format_record, format_schemas, list_records, load_config, load_registry, report_exit_code,
    run_explain, serialize_report, ExplainOutput,
};
use polaudit_domain::{schema, Engine, RuleCatalog, SchemaRegistry};
use polaudit_repo::JsonFileRepository;
use polaudit_settings::{Overrides, ResolvedConfig};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "polaudit",
    version,
    about = "Access policy audit for college record systems"
)]
struct Cli {
    /// Path to polaudit config TOML (a missing file means defaults).
    #[arg(long, default_value = "polaudit.toml")]
    config: Utf8PathBuf,

    /// Override the profile (default|direct).
    #[arg(long)]
    profile: Option<String>,

    /// Schema document (JSON). Built-in schemas apply when unset.
    #[arg(long)]
    schemas: Option<String>,

    /// Policy store (JSON).
    #[arg(long)]
    store: Option<String>,

    /// Override the evaluation strategy (solver|direct).
    #[arg(long)]
    strategy: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stored policy records.
    List,

    /// Add a policy record.
    Add {
        #[arg(long)]
        id: String,

        /// Policy type (e.g. SIS, Exam, Lab, Privacy).
        #[arg(long = "type")]
        policy_type: String,

        /// Attribute assignment; repeat for every schema attribute.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Delete a policy record.
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Decide one record (exit 0 allowed, 2 denied, 1 error) or all of them.
    #[command(group(ArgGroup::new("target").required(true).args(["id", "all"])))]
    Evaluate {
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        all: bool,

        /// Where to write the JSON report (with --all).
        #[arg(long, requires = "all")]
        report_out: Option<Utf8PathBuf>,
    },

    /// Explain a policy type or error code.
    Explain {
        /// Policy type (e.g. "Lab") or code (e.g. "missing_attribute").
        identifier: String,
    },

    /// Print every policy type and its attributes.
    Schemas,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("polaudit error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Explain { identifier } => Ok(cmd_explain(identifier)),
        Commands::List => cmd_list(&resolve(cli)?),
        Commands::Add {
            id,
            policy_type,
            set,
        } => {
            let resolved = resolve(cli)?;
            let registry = install_registry(&resolved)?;
            cmd_add(&resolved, registry, id, policy_type, set)
        }
        Commands::Delete { id } => cmd_delete(&resolve(cli)?, id),
        Commands::Evaluate { id, report_out, .. } => {
            let resolved = resolve(cli)?;
            let registry = install_registry(&resolved)?;
            cmd_evaluate(&resolved, registry, id.as_deref(), report_out.as_deref())
        }
        Commands::Schemas => {
            let resolved = resolve(cli)?;
            print!("{}", format_schemas(install_registry(&resolved)?));
            Ok(0)
        }
    }
}

fn resolve(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    let cfg_text = match std::fs::read_to_string(&cli.config) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("read config: {}", cli.config)),
    };
    let overrides = Overrides {
        profile: cli.profile.clone(),
        schemas: cli.schemas.clone(),
        store: cli.store.clone(),
        strategy: cli.strategy.clone(),
    };
    let resolved = load_config(&cfg_text, overrides)?;
    tracing::debug!(
        profile = %resolved.profile,
        store = %resolved.store_path,
        strategy = resolved.strategy.as_str(),
        "config resolved"
    );
    Ok(resolved)
}

fn install_registry(resolved: &ResolvedConfig) -> anyhow::Result<&'static SchemaRegistry> {
    let text = match &resolved.schemas_path {
        Some(path) => Some(
            std::fs::read_to_string(path).with_context(|| format!("read schemas: {path}"))?,
        ),
        None => None,
    };
    let registry = load_registry(text.as_deref())?;
    schema::install_global(registry)
        .map_err(|_| anyhow::anyhow!("schema registry already installed"))
}

fn open_store(resolved: &ResolvedConfig) -> anyhow::Result<JsonFileRepository> {
    JsonFileRepository::open(resolved.store_path.as_str())
        .with_context(|| format!("open policy store: {}", resolved.store_path))
}

fn cmd_list(resolved: &ResolvedConfig) -> anyhow::Result<i32> {
    let repo = open_store(resolved)?;
    let records = list_records(&repo)?;
    if records.is_empty() {
        eprintln!("polaudit: no policies in {}", repo.path());
    }
    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(0)
}

fn cmd_add(
    resolved: &ResolvedConfig,
    registry: &SchemaRegistry,
    id: &str,
    policy_type: &str,
    set: &[String],
) -> anyhow::Result<i32> {
    let mut repo = open_store(resolved)?;
    let record = add_record(&mut repo, registry, id, policy_type, set)?;
    println!("Added policy {} ({})", record.id, record.policy_type);
    Ok(0)
}

fn cmd_delete(resolved: &ResolvedConfig, id: &str) -> anyhow::Result<i32> {
    let mut repo = open_store(resolved)?;
    let record = delete_record(&mut repo, id)?;
    println!("Deleted policy {}", record.id);
    Ok(0)
}

fn cmd_evaluate(
    resolved: &ResolvedConfig,
    registry: &SchemaRegistry,
    id: Option<&str>,
    report_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let repo = open_store(resolved)?;
    let catalog = RuleCatalog::builtin();
    let engine = Engine::new(registry, &catalog, resolved.strategy)?;

    if let Some(id) = id {
        let entry = evaluate_one(&engine, &repo, id)?;
        println!("{}", format_entry(&entry));
        return Ok(decision_exit_code(&entry));
    }

    let report = evaluate_all(&engine, &repo)?;
    for entry in &report.results {
        println!("{}", format_entry(entry));
    }
    if let Some(path) = report_out {
        let data = serialize_report(&report)?;
        write_report_file(path, &data).context("write report json")?;
    }
    Ok(report_exit_code(&report))
}

fn write_report_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", polaudit_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_policy_types,
            available_codes,
        } => {
            eprint!(
                "{}",
                polaudit_app::format_not_found(
                    &identifier,
                    available_policy_types,
                    available_codes
                )
            );
            1
        }
    }
}
