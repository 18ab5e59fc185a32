//! Run configuration management.
//!
//! Handles loading run settings from TOML files with environment variable
//! and command-line overrides. Precedence, lowest first: engine defaults,
//! config file, `THREADED_MC_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use mc_engine::mc::params::DEFAULT_VERBOSITY;
use mc_engine::mc::Parameters;
use mc_engine::rng::SeedSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "THREADED_MC_";

/// Quantity to estimate
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TrialKind {
    /// One uniform draw on [0, 1); expectation 1/2
    #[default]
    Uniform,
    /// Quarter-disc indicator; expectation pi/4
    QuarterCircle,
    /// Squared standard normal; expectation 1
    GaussianSquare,
}

impl TrialKind {
    /// Name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::QuarterCircle => "quarter-circle",
            Self::GaussianSquare => "gaussian-square",
        }
    }
}

/// Result output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Single JSON document
    Json,
}

/// Layered run configuration
///
/// Every field is optional; unset fields fall through to the next layer and
/// finally to the engine defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Relative tolerance
    pub rtol: Option<f64>,
    /// Trial budget
    pub max_trials: Option<u64>,
    /// Trials per batch
    pub batch_size: Option<usize>,
    /// Worker threads
    pub workers: Option<usize>,
    /// Verbosity level
    pub verbosity: Option<u8>,
    /// Master seed for reproducible runs
    pub seed: Option<u64>,
    /// Quantity to estimate
    pub trial: Option<TrialKind>,
    /// Output format
    pub format: Option<OutputFormat>,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Apply `THREADED_MC_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Unparsable values are an error rather than silently ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        if let Some(v) = parse_var(get("RTOL"))? {
            self.rtol = Some(v);
        }
        if let Some(v) = parse_var(get("MAX_TRIALS"))? {
            self.max_trials = Some(v);
        }
        if let Some(v) = parse_var(get("BATCH_SIZE"))? {
            self.batch_size = Some(v);
        }
        if let Some(v) = parse_var(get("WORKERS"))? {
            self.workers = Some(v);
        }
        if let Some(v) = parse_var(get("VERBOSE"))? {
            self.verbosity = Some(v);
        }
        if let Some(v) = parse_var(get("SEED"))? {
            self.seed = Some(v);
        }
        if let Some((name, value)) = get("TRIAL") {
            let trial = <TrialKind as ValueEnum>::from_str(&value, true)
                .map_err(|_| ConfigError::Env { name, value })?;
            self.trial = Some(trial);
        }
        if let Some((name, value)) = get("FORMAT") {
            let format = <OutputFormat as ValueEnum>::from_str(&value, true)
                .map_err(|_| ConfigError::Env { name, value })?;
            self.format = Some(format);
        }

        Ok(self)
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn layer(self, other: RunConfig) -> Self {
        Self {
            rtol: other.rtol.or(self.rtol),
            max_trials: other.max_trials.or(self.max_trials),
            batch_size: other.batch_size.or(self.batch_size),
            workers: other.workers.or(self.workers),
            verbosity: other.verbosity.or(self.verbosity),
            seed: other.seed.or(self.seed),
            trial: other.trial.or(self.trial),
            format: other.format.or(self.format),
        }
    }

    /// Build validated engine parameters
    pub fn parameters(&self) -> Result<Parameters, mc_engine::ConfigError> {
        let mut builder = Parameters::builder();

        if let Some(rtol) = self.rtol {
            builder = builder.rtol(rtol);
        }
        if let Some(max_trials) = self.max_trials {
            builder = builder.max_trials(max_trials);
        }
        if let Some(batch_size) = self.batch_size {
            builder = builder.batch_size(batch_size);
        }
        if let Some(workers) = self.workers {
            builder = builder.workers(workers);
        }
        if let Some(verbosity) = self.verbosity {
            builder = builder.verbosity(verbosity);
        }

        builder.build()
    }

    /// Seed source: fixed when a master seed is configured
    pub fn seed_source(&self) -> SeedSource {
        self.seed.map_or(SeedSource::Entropy, SeedSource::Fixed)
    }

    /// Configured trial, or the uniform reference trial
    pub fn trial(&self) -> TrialKind {
        self.trial.unwrap_or_default()
    }

    /// Configured output format
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Configured verbosity, or the engine default
    pub fn verbosity(&self) -> u8 {
        self.verbosity.unwrap_or(DEFAULT_VERBOSITY)
    }
}

fn parse_var<T: FromStr>(var: Option<(String, String)>) -> Result<Option<T>, ConfigError> {
    match var {
        None => Ok(None),
        Some((name, value)) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::Env { name, value }),
        },
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable with an unusable value
    #[error("Invalid value '{value}' for {name}")]
    Env {
        /// Variable name
        name: String,
        /// Raw value
        value: String,
    },
}
