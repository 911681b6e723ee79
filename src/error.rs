//! Rich diagnostic error types for bayes-spam.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. `SpamError` aggregates them for callers
//! that drive the whole pipeline (corpus → train → evaluate).

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for bayes-spam.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SpamError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClassifierError {
    #[error("invalid argument {name} = {value}: {reason}")]
    #[diagnostic(
        code(bayes_spam::classifier::invalid_argument),
        help(
            "The smoothing constant k must be a finite number greater than zero, \
             otherwise the probability denominators can vanish. The usual choice is 0.5."
        )
    )]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Corpus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CorpusError {
    #[error("corpus directory not found: {path}")]
    #[diagnostic(
        code(bayes_spam::corpus::not_found),
        help(
            "Point --corpus at a directory laid out as <root>/<folder>/<email-file>. \
             Folders or files whose path contains \"ham\" are labelled ham, the rest spam."
        )
    )]
    NotFound { path: String },

    #[error("failed to read {path}")]
    #[diagnostic(
        code(bayes_spam::corpus::io),
        help("Check that the corpus files exist and are readable by the current user.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(bayes_spam::config::read),
        help("Ensure the config file exists, or create one with `bayes-spam init-config <path>`.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(bayes_spam::config::parse),
        help("Check the TOML syntax and field types in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config for {path}: {message}")]
    #[diagnostic(
        code(bayes_spam::config::serialize),
        help("Every config value must be representable in TOML.")
    )]
    Serialize { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(bayes_spam::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config value for {field}: {message}")]
    #[diagnostic(
        code(bayes_spam::config::invalid),
        help(
            "smoothing must be > 0; threshold and train_fraction must lie within [0, 1]."
        )
    )]
    Invalid { field: &'static str, message: String },
}

/// Convenience alias for pipeline-level results.
pub type SpamResult<T> = std::result::Result<T, SpamError>;

/// Convenience alias for classifier results.
pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// Convenience alias for corpus ingestion results.
pub type CorpusResult<T> = std::result::Result<T, CorpusError>;

/// Convenience alias for configuration results.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
