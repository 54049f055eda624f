use crate::model::PolauditConfigV1;
use crate::presets;
use polaudit_domain::solver::FiniteSolver;
use polaudit_domain::Strategy;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub schemas: Option<String>,
    pub store: Option<String>,
    pub strategy: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub profile: String,
    /// `None` means the built-in schemas.
    pub schemas_path: Option<String>,
    pub store_path: String,
    pub strategy: Strategy,
}

pub fn resolve_config(
    cfg: PolauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .or(cfg.profile)
        .unwrap_or_else(|| "default".to_string());

    let preset = presets::preset(&profile);
    let mut strategy = preset.strategy;

    if let Some(name) = overrides.strategy.or(cfg.strategy) {
        strategy = parse_strategy(&name)?;
    }

    if let Some(budget) = cfg.solver_budget {
        if budget == 0 {
            anyhow::bail!("solver_budget must be at least 1");
        }
        if let Strategy::Solver { budget: slot } = &mut strategy {
            *slot = budget;
        }
    }

    Ok(ResolvedConfig {
        profile: preset.profile.to_string(),
        schemas_path: overrides.schemas.or(cfg.schemas),
        store_path: overrides
            .store
            .or(cfg.store)
            .unwrap_or_else(|| presets::DEFAULT_STORE.to_string()),
        strategy,
    })
}

fn parse_strategy(v: &str) -> anyhow::Result<Strategy> {
    match v {
        "solver" => Ok(Strategy::Solver {
            budget: FiniteSolver::DEFAULT_BUDGET,
        }),
        "direct" => Ok(Strategy::Direct),
        other => anyhow::bail!("unknown strategy: {other} (expected 'solver' or 'direct')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_solver_and_builtin_schemas() {
        let resolved = resolve_config(PolauditConfigV1::default(), Overrides::default()).unwrap();
        assert_eq!(resolved.profile, "default");
        assert_eq!(resolved.schemas_path, None);
        assert_eq!(resolved.store_path, "policies.json");
        assert_eq!(resolved.strategy, Strategy::default());
    }

    #[test]
    fn overrides_beat_config_file() {
        let cfg = PolauditConfigV1 {
            store: Some("from-config.json".to_string()),
            strategy: Some("solver".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            store: Some("from-cli.json".to_string()),
            strategy: Some("direct".to_string()),
            ..Default::default()
        };
        let resolved = resolve_config(cfg, overrides).unwrap();
        assert_eq!(resolved.store_path, "from-cli.json");
        assert_eq!(resolved.strategy, Strategy::Direct);
    }

    #[test]
    fn direct_profile_selects_direct_strategy() {
        let cfg = PolauditConfigV1 {
            profile: Some("direct".to_string()),
            ..Default::default()
        };
        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(resolved.profile, "direct");
        assert_eq!(resolved.strategy, Strategy::Direct);
    }

    #[test]
    fn solver_budget_applies_to_solver_only() {
        let cfg = PolauditConfigV1 {
            solver_budget: Some(32),
            ..Default::default()
        };
        let resolved = resolve_config(cfg.clone(), Overrides::default()).unwrap();
        assert_eq!(resolved.strategy, Strategy::Solver { budget: 32 });

        let overrides = Overrides {
            strategy: Some("direct".to_string()),
            ..Default::default()
        };
        let resolved = resolve_config(cfg, overrides).unwrap();
        assert_eq!(resolved.strategy, Strategy::Direct);
    }

    #[test]
    fn rejects_unknown_strategy_and_zero_budget() {
        let overrides = Overrides {
            strategy: Some("z3".to_string()),
            ..Default::default()
        };
        let err = resolve_config(PolauditConfigV1::default(), overrides).unwrap_err();
        assert!(err.to_string().contains("unknown strategy: z3"));

        let cfg = PolauditConfigV1 {
            solver_budget: Some(0),
            ..Default::default()
        };
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }
}
