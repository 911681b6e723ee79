// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # bayes-spam
//!
//! A multivariate Bernoulli naive-Bayes spam classifier with additive
//! smoothing and log-space scoring, plus the corpus and evaluation plumbing
//! to train it on a directory of raw emails.
//!
//! ## Architecture
//!
//! - **Tokenizer** (`tokenize`): lowercase `[a-z0-9']+` word sets
//! - **Classifier** (`classifier`): presence counts per class, smoothed token
//!   probabilities, whole-vocabulary prediction
//! - **Corpus** (`corpus`): `<root>/<folder>/<file>` emails → labelled messages
//! - **Evaluation** (`split`, `evaluate`): seeded train/test split, confusion
//!   matrix, accuracy, spammiest/hammiest tokens
//! - **Config** (`config`): TOML run settings
//!
//! ## Library usage
//!
//! ```
//! use bayes_spam::classifier::NaiveBayesClassifier;
//! use bayes_spam::message::Message;
//!
//! let mut model = NaiveBayesClassifier::new(0.5).unwrap();
//! model.train(&[
//!     Message::spam("spam rules"),
//!     Message::ham("ham rules"),
//!     Message::ham("hello ham"),
//! ]);
//! let p = model.predict("hello spam");
//! assert!((p - 0.835).abs() < 1e-3);
//! ```

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod message;
pub mod split;
pub mod tokenize;
