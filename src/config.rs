//! Run configuration, persisted as TOML.
//!
//! Every field has a serde default, so a config file only needs the values it
//! changes. CLI flags override whatever the file says.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::NaiveBayesClassifier;
use crate::corpus::CorpusMode;
use crate::error::{ClassifierResult, ConfigError, ConfigResult};
use crate::evaluate::DEFAULT_THRESHOLD;

/// Settings for training and evaluating a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Additive smoothing constant `k`.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Spam probability above which a message is called spam.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Share of the corpus used for training; the rest is held out.
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    /// Seed for the train/test shuffle.
    #[serde(default)]
    pub seed: u64,
    /// Which parts of each email become messages.
    #[serde(default)]
    pub corpus_mode: CorpusMode,
    /// How many spammiest/hammiest tokens to report.
    #[serde(default = "default_top_tokens")]
    pub top_tokens: usize,
}

fn default_smoothing() -> f64 {
    NaiveBayesClassifier::DEFAULT_K
}
fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_train_fraction() -> f64 {
    0.75
}
fn default_top_tokens() -> usize {
    10
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
            threshold: default_threshold(),
            train_fraction: default_train_fraction(),
            seed: 0,
            corpus_mode: CorpusMode::default(),
            top_tokens: default_top_tokens(),
        }
    }
}

impl ClassifierConfig {
    /// Load from a TOML file and validate it.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(ConfigError::Invalid {
                field: "smoothing",
                message: format!("{} must be a finite number greater than zero", self.smoothing),
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid {
                field: "threshold",
                message: format!("{} is outside [0, 1]", self.threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(ConfigError::Invalid {
                field: "train_fraction",
                message: format!("{} is outside [0, 1]", self.train_fraction),
            });
        }
        Ok(())
    }

    /// An untrained classifier using this config's smoothing constant.
    pub fn build_classifier(&self) -> ClassifierResult<NaiveBayesClassifier> {
        NaiveBayesClassifier::new(self.smoothing)
    }
}
