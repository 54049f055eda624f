use polaudit_domain::solver::FiniteSolver;
use polaudit_domain::Strategy;

pub const DEFAULT_STORE: &str = "policies.json";

/// Profile names `preset` recognises.
pub const PROFILES: &[&str] = &["default", "direct"];

/// Effective settings before config-file and command-line overrides apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub profile: &'static str,
    pub strategy: Strategy,
}

/// Preset profiles. Unknown names fall back to `default` with a warning.
pub fn preset(profile: &str) -> Preset {
    if !PROFILES.contains(&profile) {
        tracing::warn!(
            profile,
            known = ?PROFILES,
            "unknown profile, falling back to 'default'"
        );
    }
    match profile {
        "direct" => Preset {
            profile: "direct",
            strategy: Strategy::Direct,
        },
        _ => Preset {
            profile: "default",
            strategy: Strategy::Solver {
                budget: FiniteSolver::DEFAULT_BUDGET,
            },
        },
    }
}
