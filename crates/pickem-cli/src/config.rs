// Configuration loading and parsing (strategy.toml).

use pickem_core::adjustment::AdjustmentWeights;
use pickem_core::tiebreak::DEFAULT_TOTALS;
use pickem_core::{OptimizerParams, SearchMethod};
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Files seeded from `defaults/` on first run.
pub const CONFIG_FILES: &[&str] = &["strategy.toml"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub optimizer: OptimizerConfig,
    pub adjustments: AdjustmentWeights,
    pub tiebreaker_totals: Vec<u32>,
}

/// Search parameters plus the strategy selection knobs around them.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub params: OptimizerParams,
    pub method: SearchMethod,
    pub auto_exhaustive_limit: usize,
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file. Every
/// section is optional and falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StrategyFile {
    optimizer: OptimizerSection,
    adjustments: AdjustmentWeights,
    tiebreaker: TiebreakerSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct OptimizerSection {
    method: SearchMethod,
    auto_exhaustive_limit: usize,
    seed: Option<u64>,
    num_slates: usize,
    population_size: usize,
    generations: usize,
    mutation_rate: f64,
    underdog_bonus: f64,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        let params = OptimizerParams::default();
        Self {
            method: SearchMethod::Auto,
            auto_exhaustive_limit: 12,
            seed: None,
            num_slates: params.num_slates,
            population_size: params.population_size,
            generations: params.generations,
            mutation_rate: params.mutation_rate,
            underdog_bonus: params.underdog_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct TiebreakerSection {
    totals: Vec<u32>,
}

impl Default for TiebreakerSection {
    fn default() -> Self {
        Self {
            totals: DEFAULT_TOTALS.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/strategy.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let strategy_path = base_dir.join("config").join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let config = parse_strategy(&strategy_text, &strategy_path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_strategy(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: StrategyFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let opt = file.optimizer;
    Ok(Config {
        optimizer: OptimizerConfig {
            params: OptimizerParams {
                num_slates: opt.num_slates,
                population_size: opt.population_size,
                generations: opt.generations,
                mutation_rate: opt.mutation_rate,
                underdog_bonus: opt.underdog_bonus,
            },
            method: opt.method,
            auto_exhaustive_limit: opt.auto_exhaustive_limit,
            seed: opt.seed,
        },
        adjustments: file.adjustments,
        tiebreaker_totals: file.tiebreaker.totals,
    })
}

/// Copy each missing file in [`CONFIG_FILES`] from `defaults/` into
/// `config/`. Existing files are left alone. Returns the files written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }
        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{} is missing and no default exists at {}; \
                     run from the directory holding defaults/",
                    target.display(),
                    source.display()
                ),
            });
        }
        std::fs::create_dir_all(&config_dir).map_err(|e| copy_error("create", &config_dir, e))?;
        if copy_new(&source, &target)? {
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    for path in ensure_config_files(&cwd)? {
        info!("Created {} from defaults", path.display());
    }
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `source` to `target` only if `target` does not exist yet.
fn copy_new(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error("create", target, e)),
    };
    let content = std::fs::read(source).map_err(|e| copy_error("read", source, e))?;
    dest.write_all(&content).map_err(|e| copy_error("write", target, e))?;
    Ok(true)
}

fn copy_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::DefaultsCopyError {
        message: format!("failed to {action} {}: {e}", path.display()),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let p = &config.optimizer.params;

    if p.num_slates == 0 {
        return Err(invalid("optimizer.num_slates", "must be greater than 0"));
    }
    if p.population_size < 2 {
        return Err(invalid(
            "optimizer.population_size",
            format!("must be at least 2, got {}", p.population_size),
        ));
    }
    if p.generations == 0 {
        return Err(invalid("optimizer.generations", "must be greater than 0"));
    }
    if !(0.0..=1.0).contains(&p.mutation_rate) {
        return Err(invalid(
            "optimizer.mutation_rate",
            format!("must be between 0.0 and 1.0 inclusive, got {}", p.mutation_rate),
        ));
    }
    if !p.underdog_bonus.is_finite() || p.underdog_bonus < 0.0 {
        return Err(invalid(
            "optimizer.underdog_bonus",
            format!("must be a finite value >= 0.0, got {}", p.underdog_bonus),
        ));
    }

    let w = &config.adjustments;
    let deltas: &[(&str, f64)] = &[
        ("adjustments.underdog_home", w.underdog_home),
        ("adjustments.prime_time_favorite_home", w.prime_time_favorite_home),
        ("adjustments.prime_time_underdog_home", w.prime_time_underdog_home),
        ("adjustments.rest_favorite", w.rest_favorite),
        ("adjustments.rest_underdog", w.rest_underdog),
        ("adjustments.favorite_streak", w.favorite_streak),
        ("adjustments.underdog_streak", w.underdog_streak),
    ];
    for (name, val) in deltas {
        if !val.is_finite() {
            return Err(invalid(name, format!("must be finite, got {val}")));
        }
    }
    let m = w.division_multiplier;
    if !(m > 0.0 && m <= 1.0) {
        return Err(invalid(
            "adjustments.division_multiplier",
            format!("must be in (0.0, 1.0], got {m}"),
        ));
    }

    if config.tiebreaker_totals.is_empty() {
        return Err(invalid("tiebreaker.totals", "must not be empty"));
    }
    if config.tiebreaker_totals.contains(&0) {
        return Err(invalid("tiebreaker.totals", "every total must be positive"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
