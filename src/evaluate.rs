//! Held-out evaluation: confusion matrix, accuracy, token rankings.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::classifier::{ClassifierStats, NaiveBayesClassifier};
use crate::config::ClassifierConfig;
use crate::corpus::load_corpus;
use crate::error::SpamResult;
use crate::message::Message;
use crate::split::split_data;

/// Probability above which a message is called spam.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

// ── ConfusionMatrix ────────────────────────────────────────────────────────

/// Counts of `(actual, predicted)` label pairs, spam being the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    /// Spam predicted as spam.
    pub true_positive: u64,
    /// Ham predicted as spam.
    pub false_positive: u64,
    /// Ham predicted as ham.
    pub true_negative: u64,
    /// Spam predicted as ham.
    pub false_negative: u64,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actual_spam: bool, predicted_spam: bool) {
        match (actual_spam, predicted_spam) {
            (true, true) => self.true_positive += 1,
            (false, true) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Correct predictions as a percentage rounded to two decimals.
    ///
    /// `None` when nothing has been recorded.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let correct = (self.true_positive + self.true_negative) as f64;
        Some((correct / total as f64 * 100.0 * 100.0).round() / 100.0)
    }

    /// Fraction of spam predictions that were spam.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Fraction of actual spam that was caught.
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

fn ratio(num: u64, den: u64) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Rows are the actual label, columns the predicted one.
        let width = [
            self.true_positive,
            self.false_positive,
            self.true_negative,
            self.false_negative,
        ]
        .iter()
        .map(|n| n.to_string().len())
        .max()
        .unwrap_or(1)
        .max(4);

        writeln!(f, "{:>6} {:>width$} {:>width$}", "", "Spam", "Ham")?;
        writeln!(
            f,
            "{:>6} {:>width$} {:>width$}",
            "Spam", self.true_positive, self.false_negative
        )?;
        write!(
            f,
            "{:>6} {:>width$} {:>width$}",
            "Ham", self.false_positive, self.true_negative
        )
    }
}

// ── Evaluation ─────────────────────────────────────────────────────────────

/// Result of scoring a held-out set.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub threshold: f64,
    pub scored: usize,
    pub matrix: ConfusionMatrix,
    pub accuracy: Option<f64>,
}

impl Evaluation {
    /// Predict every message and compare against its label.
    ///
    /// A message is called spam when its probability is strictly greater than
    /// `threshold`.
    pub fn run(classifier: &NaiveBayesClassifier, messages: &[Message], threshold: f64) -> Self {
        let mut matrix = ConfusionMatrix::new();
        for message in messages {
            let spam_probability = classifier.predict(&message.text);
            matrix.record(message.is_spam, spam_probability > threshold);
        }

        let evaluation = Self {
            threshold,
            scored: messages.len(),
            matrix,
            accuracy: matrix.accuracy(),
        };
        tracing::info!(
            scored = evaluation.scored,
            accuracy = ?evaluation.accuracy,
            "evaluated classifier"
        );
        evaluation
    }
}

// ── Report ─────────────────────────────────────────────────────────────────

/// Everything the `evaluate` command prints, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub train_messages: usize,
    pub test_messages: usize,
    pub classifier: ClassifierStats,
    pub evaluation: Evaluation,
    pub spammiest: Vec<(String, f64)>,
    pub hammiest: Vec<(String, f64)>,
}

impl Report {
    pub fn new(
        classifier: &NaiveBayesClassifier,
        train_messages: usize,
        evaluation: Evaluation,
        top_tokens: usize,
    ) -> Self {
        Self {
            train_messages,
            test_messages: evaluation.scored,
            classifier: classifier.stats(),
            evaluation,
            spammiest: classifier.spammiest(top_tokens),
            hammiest: classifier.hammiest(top_tokens),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Trained on {} messages, tested on {}.",
            self.train_messages, self.test_messages
        )?;
        writeln!(f, "{}", self.classifier)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows: actual, columns: predicted):")?;
        writeln!(f, "{}", self.evaluation.matrix)?;
        writeln!(f)?;
        match self.evaluation.accuracy {
            Some(acc) => writeln!(f, "Accuracy: {acc:.2}%")?,
            None => writeln!(f, "Accuracy: n/a (no test messages)")?,
        }

        let words = |tokens: &[(String, f64)]| {
            tokens
                .iter()
                .map(|(t, _)| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "Spammiest words: {}", words(&self.spammiest))?;
        write!(f, "Hammiest words:  {}", words(&self.hammiest))
    }
}

// ── Pipeline ───────────────────────────────────────────────────────────────

/// Load a corpus, split it, train on one part and evaluate on the other.
///
/// The split is seeded from `config.seed`, so repeated runs agree.
pub fn evaluate_corpus(root: &Path, config: &ClassifierConfig) -> SpamResult<Report> {
    config.validate()?;
    let data = load_corpus(root, config.corpus_mode)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train_messages, test_messages) = split_data(&data, config.train_fraction, &mut rng);

    let mut model = config.build_classifier()?;
    model.train(&train_messages);

    let evaluation = Evaluation::run(&model, &test_messages, config.threshold);
    Ok(Report::new(
        &model,
        train_messages.len(),
        evaluation,
        config.top_tokens,
    ))
}
