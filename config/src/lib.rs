//! Configuration loading and resolution.
//!
//! The TOML file at `~/.moneymaker/config.toml` is optional and every section in
//! it is optional. Raw sections are parsed here and resolved into a validated
//! [`Tuning`] plus [`AppSettings`]; anything missing falls back to the built-in
//! tables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use moneymaker_types::{
    DEFAULT_ALLOCATION_TOLERANCE, Factor, ScoringModel, StabilityRules, Stakeholder,
    StakeholderModel, TierRules, TierThreshold, Tuning, TuningError,
};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = ".moneymaker";
const CONFIG_FILE: &str = "config.toml";
const HISTORY_FILE: &str = "results.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: ResolveError,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

/// Why a syntactically valid config could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("allocation_tolerance must be a non-negative number (got {0})")]
    Tolerance(f64),
}

// ============================================================================
// Raw TOML
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct MoneymakerConfig {
    pub app: Option<AppConfig>,
    pub scoring: Option<ScoringConfig>,
    pub tiers: Option<TiersConfig>,
    pub stability: Option<StabilityConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Where finalized results are kept. `${VAR}` references are expanded.
    pub history_path: Option<String>,
    pub allocation_tolerance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoringConfig {
    pub players: Option<StakeholderConfig>,
    pub owners: Option<StakeholderConfig>,
    pub networks: Option<StakeholderConfig>,
    pub fans: Option<StakeholderConfig>,
}

impl ScoringConfig {
    fn take(&mut self, stakeholder: Stakeholder) -> Option<StakeholderConfig> {
        match stakeholder {
            Stakeholder::Players => self.players.take(),
            Stakeholder::Owners => self.owners.take(),
            Stakeholder::Networks => self.networks.take(),
            Stakeholder::Fans => self.fans.take(),
        }
    }
}

/// Replaces a stakeholder's whole factor list.
#[derive(Debug, Default, Deserialize)]
pub struct StakeholderConfig {
    pub factors: Vec<Factor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TiersConfig {
    pub collapse_below: Option<u8>,
    pub gold: Option<TierThreshold>,
    pub silver: Option<TierThreshold>,
    pub bronze: Option<TierThreshold>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StabilityConfig {
    pub collapsed_below: Option<u8>,
    pub danger_below: Option<u8>,
    pub warning_below: Option<u8>,
    pub concern_below: Option<u8>,
    pub danger_count: Option<usize>,
    pub warning_count: Option<usize>,
}

// ============================================================================
// Resolved
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// `None` when no home directory is available and none was configured.
    pub history_path: Option<PathBuf>,
    pub allocation_tolerance: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            allocation_tolerance: DEFAULT_ALLOCATION_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub app: AppSettings,
    pub tuning: Tuning,
}

impl MoneymakerConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Overlay this config on the built-in defaults and validate the result.
    pub fn resolve(self) -> Result<Settings, ResolveError> {
        let app = resolve_app(self.app.unwrap_or_default())?;

        let mut scoring = ScoringModel::default();
        if let Some(mut raw) = self.scoring {
            for stakeholder in Stakeholder::ALL {
                if let Some(section) = raw.take(stakeholder) {
                    let model = StakeholderModel::new(stakeholder, section.factors)?;
                    tracing::debug!(%stakeholder, "Using configured scoring factors");
                    scoring = scoring.with_model(model);
                }
            }
        }

        let mut tiers = TierRules::default();
        if let Some(raw) = self.tiers {
            tiers.collapse_below = raw.collapse_below.unwrap_or(tiers.collapse_below);
            tiers.gold = raw.gold.unwrap_or(tiers.gold);
            tiers.silver = raw.silver.unwrap_or(tiers.silver);
            tiers.bronze = raw.bronze.unwrap_or(tiers.bronze);
        }

        let mut stability = StabilityRules::default();
        if let Some(raw) = self.stability {
            stability.collapsed_below = raw.collapsed_below.unwrap_or(stability.collapsed_below);
            stability.danger_below = raw.danger_below.unwrap_or(stability.danger_below);
            stability.warning_below = raw.warning_below.unwrap_or(stability.warning_below);
            stability.concern_below = raw.concern_below.unwrap_or(stability.concern_below);
            stability.danger_count = raw.danger_count.unwrap_or(stability.danger_count);
            stability.warning_count = raw.warning_count.unwrap_or(stability.warning_count);
        }

        let defaults = Tuning::default();
        let tuning = Tuning::new(
            scoring,
            tiers,
            stability,
            defaults.tier_copy().clone(),
            defaults.start_times().to_vec(),
            defaults.profiles().clone(),
        )?;

        Ok(Settings { app, tuning })
    }
}

fn resolve_app(raw: AppConfig) -> Result<AppSettings, ResolveError> {
    let allocation_tolerance = raw
        .allocation_tolerance
        .unwrap_or(DEFAULT_ALLOCATION_TOLERANCE);
    if !(allocation_tolerance.is_finite() && allocation_tolerance >= 0.0) {
        return Err(ResolveError::Tolerance(allocation_tolerance));
    }

    let history_path = match raw.history_path {
        Some(path) => Some(PathBuf::from(expand_env_vars(&path))),
        None => default_history_path(),
    };

    Ok(AppSettings {
        history_path,
        allocation_tolerance,
    })
}

/// Load and resolve settings.
///
/// With an explicit `path` the file must exist. Without one, the default config
/// path is used when present and built-in defaults otherwise.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let (config, path) = match path {
        Some(path) => (Some(MoneymakerConfig::load_from(path)?), path.to_path_buf()),
        None => match config_path() {
            Some(path) => (MoneymakerConfig::load()?, path),
            None => (None, PathBuf::new()),
        },
    };

    let Some(config) = config else {
        return Ok(Settings::default());
    };

    config.resolve().map_err(|source| {
        tracing::warn!("Invalid config at {:?}: {}", path, source);
        ConfigError::Invalid { path, source }
    })
}

/// Replace `${VAR}` references with environment values. Unset variables expand
/// to the empty string; an unclosed `${` is kept verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[must_use]
pub fn default_history_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneymaker_types::{FactorInput, Transform};

    #[test]
    fn parse_empty_config() {
        let config: MoneymakerConfig = toml::from_str("").unwrap();
        assert!(config.app.is_none());
        assert!(config.scoring.is_none());

        let settings = config.resolve().unwrap();
        assert_eq!(settings.tuning, Tuning::default());
        assert_eq!(
            settings.app.allocation_tolerance,
            DEFAULT_ALLOCATION_TOLERANCE
        );
    }

    #[test]
    fn parse_app_config() {
        let toml_str = r#"
[app]
history_path = "/tmp/mm/results.json"
allocation_tolerance = 0.25
"#;
        let config: MoneymakerConfig = toml::from_str(toml_str).unwrap();
        let settings = config.resolve().unwrap();
        assert_eq!(
            settings.app.history_path,
            Some(PathBuf::from("/tmp/mm/results.json"))
        );
        assert_eq!(settings.app.allocation_tolerance, 0.25);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let config: MoneymakerConfig =
            toml::from_str("[app]\nallocation_tolerance = -1.0\n").unwrap();
        assert_eq!(config.resolve().unwrap_err(), ResolveError::Tolerance(-1.0));
    }

    #[test]
    fn scoring_section_replaces_one_stakeholder() {
        let toml_str = r#"
[scoring.owners]
factors = [
  { input = "salary_share", weight = 0.5, transform = { kind = "linear", in_min = 70.0, in_max = 40.0, out_min = 0.0, out_max = 100.0 } },
  { input = "revenue_share", weight = 0.5, transform = { kind = "bell", optimal = 30.0, spread = 20.0 } },
]
"#;
        let config: MoneymakerConfig = toml::from_str(toml_str).unwrap();
        let settings = config.resolve().unwrap();
        let scoring = settings.tuning.scoring();

        let owners = scoring.for_stakeholder(Stakeholder::Owners).factors();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].input, FactorInput::SalaryShare);
        assert_eq!(owners[1].transform, Transform::bell(30.0, 20.0));

        let defaults = ScoringModel::default();
        assert_eq!(
            scoring.for_stakeholder(Stakeholder::Players),
            defaults.for_stakeholder(Stakeholder::Players)
        );
    }

    #[test]
    fn weights_not_summing_to_one_are_invalid() {
        let toml_str = r#"
[scoring.fans]
factors = [
  { input = "streaming", weight = 0.7, transform = { kind = "bell", optimal = 30.0, spread = 30.0 } },
]
"#;
        let config: MoneymakerConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.resolve(),
            Err(ResolveError::Tuning(TuningError::WeightSum { .. }))
        ));
    }

    #[test]
    fn tier_overrides_merge_with_defaults() {
        let toml_str = r"
[tiers]
collapse_below = 35
gold = { overall = 92, min = 80 }
";
        let config: MoneymakerConfig = toml::from_str(toml_str).unwrap();
        let tiers = *config.resolve().unwrap().tuning.tiers();
        assert_eq!(tiers.collapse_below, 35);
        assert_eq!(tiers.gold, TierThreshold { overall: 92, min: 80 });
        assert_eq!(tiers.silver, TierRules::default().silver);
    }

    #[test]
    fn stability_overrides_are_validated() {
        let config: MoneymakerConfig =
            toml::from_str("[stability]\ncollapsed_below = 70\n").unwrap();
        assert_eq!(
            config.resolve().unwrap_err(),
            ResolveError::Tuning(TuningError::StabilityOrder)
        );
    }

    #[test]
    fn load_settings_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[app\n").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn load_settings_missing_explicit_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_settings_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tiers]\nbronze = { overall = 99, min = 45 }\n").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                source: ResolveError::Tuning(TuningError::ThresholdOrder),
                ..
            }
        ));
    }

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("/tmp/results.json"), "/tmp/results.json");
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("/tmp/${HOME"), "/tmp/${HOME");
    }

    #[test]
    fn expand_env_vars_empty_name_dropped() {
        assert_eq!(expand_env_vars("a${}b"), "ab");
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        assert_eq!(
            expand_env_vars("x${MONEYMAKER_TEST_SURELY_UNSET_VAR}y"),
            "xy"
        );
    }

    #[test]
    fn config_path_lives_under_app_dir() {
        if let Some(path) = config_path() {
            assert!(path.ends_with(".moneymaker/config.toml"));
        }
    }
}
