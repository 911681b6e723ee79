//! Multivariate Bernoulli naive-Bayes spam classifier.
//!
//! The classifier keeps, per class, the number of training messages that
//! *contain* each token (a presence count, never a term frequency) and the
//! number of training messages seen. From those it estimates
//!
//! ```text
//! P(token | spam) = (spam_count(token) + k) / (spam_messages + 2k)
//! P(token | ham)  = (ham_count(token)  + k) / (ham_messages  + 2k)
//! ```
//!
//! and scores a text over the **whole vocabulary**: present tokens contribute
//! `ln P(token | class)`, absent ones `ln (1 - P(token | class))`. Scores are
//! accumulated in log space and normalised once at the end.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, ClassifierResult};
use crate::message::Message;
use crate::tokenize::tokenize;

// ── TokenCounts ────────────────────────────────────────────────────────────

/// Token → number of training messages (of one class) containing the token.
///
/// Reads of unknown tokens return 0 without inserting anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCounts {
    counts: HashMap<String, u64>,
}

impl TokenCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `token`, 0 when it was never recorded.
    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    fn increment(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_string(), 1);
            }
        }
    }

    /// Number of distinct tokens with a non-zero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, &count)| (token.as_str(), count))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TokenCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(t, c)| (t.into(), c)).collect(),
        }
    }
}

// ── ClassifierStats ────────────────────────────────────────────────────────

/// Snapshot of the classifier's size, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierStats {
    pub k: f64,
    pub vocabulary_size: usize,
    pub spam_messages: u64,
    pub ham_messages: u64,
}

impl std::fmt::Display for ClassifierStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Classifier:")?;
        writeln!(f, "  smoothing k:   {}", self.k)?;
        writeln!(f, "  vocabulary:    {} tokens", self.vocabulary_size)?;
        writeln!(f, "  spam messages: {}", self.spam_messages)?;
        write!(f, "  ham messages:  {}", self.ham_messages)
    }
}

// ── NaiveBayesClassifier ───────────────────────────────────────────────────

/// Naive-Bayes spam classifier with additive smoothing.
///
/// Starts untrained; every [`train`](Self::train) call accumulates on top of
/// the previous ones. [`predict`](Self::predict) and
/// [`probabilities`](Self::probabilities) only read state.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    k: f64,
    vocabulary: HashSet<String>,
    spam_token_counts: TokenCounts,
    ham_token_counts: TokenCounts,
    spam_message_count: u64,
    ham_message_count: u64,
}

impl NaiveBayesClassifier {
    /// Smoothing constant used by [`Default`].
    pub const DEFAULT_K: f64 = 0.5;

    /// Create an untrained classifier with smoothing constant `k`.
    ///
    /// `k` must be finite and strictly positive.
    pub fn new(k: f64) -> ClassifierResult<Self> {
        if !k.is_finite() {
            return Err(ClassifierError::InvalidArgument {
                name: "k",
                value: k,
                reason: "must be a finite number",
            });
        }
        if k <= 0.0 {
            return Err(ClassifierError::InvalidArgument {
                name: "k",
                value: k,
                reason: "must be greater than zero",
            });
        }

        Ok(Self {
            k,
            vocabulary: HashSet::new(),
            spam_token_counts: TokenCounts::new(),
            ham_token_counts: TokenCounts::new(),
            spam_message_count: 0,
            ham_message_count: 0,
        })
    }

    /// Fold a batch of labelled messages into the counts.
    ///
    /// Each distinct token of a message increments its class count once,
    /// however often it occurs in the text.
    pub fn train<'a, I>(&mut self, messages: I)
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut spam_seen = 0u64;
        let mut ham_seen = 0u64;

        for message in messages {
            if message.is_spam {
                self.spam_message_count += 1;
                spam_seen += 1;
            } else {
                self.ham_message_count += 1;
                ham_seen += 1;
            }

            for token in tokenize(&message.text) {
                if message.is_spam {
                    self.spam_token_counts.increment(&token);
                } else {
                    self.ham_token_counts.increment(&token);
                }
                self.vocabulary.insert(token);
            }
        }

        tracing::debug!(
            spam = spam_seen,
            ham = ham_seen,
            vocabulary = self.vocabulary.len(),
            "trained naive-bayes batch"
        );
    }

    /// `(P(token | spam), P(token | ham))` with additive smoothing.
    ///
    /// Unknown tokens are valid and read as a zero count. Both values lie
    /// strictly inside (0, 1).
    pub fn probabilities(&self, token: &str) -> (f64, f64) {
        let spam = self.spam_token_counts.get(token) as f64;
        let ham = self.ham_token_counts.get(token) as f64;

        let p_token_spam = (spam + self.k) / (self.spam_message_count as f64 + 2.0 * self.k);
        let p_token_ham = (ham + self.k) / (self.ham_message_count as f64 + 2.0 * self.k);

        (p_token_spam, p_token_ham)
    }

    /// `(P(token absent | spam), P(token absent | ham))`.
    ///
    /// Computed from the counts rather than as `1 - p`, so a tiny `k` cannot
    /// round the result down to zero.
    fn absence_probabilities(&self, token: &str) -> (f64, f64) {
        let spam_absent = (self.spam_message_count - self.spam_token_counts.get(token)) as f64;
        let ham_absent = (self.ham_message_count - self.ham_token_counts.get(token)) as f64;

        let p_absent_spam =
            (spam_absent + self.k) / (self.spam_message_count as f64 + 2.0 * self.k);
        let p_absent_ham = (ham_absent + self.k) / (self.ham_message_count as f64 + 2.0 * self.k);

        (p_absent_spam, p_absent_ham)
    }

    /// Estimated `P(spam | text)`.
    ///
    /// Every vocabulary token is evidence: present tokens through
    /// `P(token | class)`, absent ones through `1 - P(token | class)`. Tokens
    /// of `text` outside the vocabulary carry no signal and are ignored. An
    /// empty vocabulary yields exactly 0.5, and the result always lies
    /// strictly inside (0, 1).
    pub fn predict(&self, text: &str) -> f64 {
        let text_tokens = tokenize(text);
        let mut log_prob_if_spam = 0.0_f64;
        let mut log_prob_if_ham = 0.0_f64;

        for token in &self.vocabulary {
            let (prob_if_spam, prob_if_ham) = if text_tokens.contains(token) {
                self.probabilities(token)
            } else {
                self.absence_probabilities(token)
            };
            log_prob_if_spam += prob_if_spam.ln();
            log_prob_if_ham += prob_if_ham.ln();
        }

        // Shift by the larger log-score so at least one exponent is exp(0).
        let shift = log_prob_if_spam.max(log_prob_if_ham);
        if !shift.is_finite() {
            // Both classes underflowed: no evidence either way.
            return 0.5;
        }
        let likelihood_spam = (log_prob_if_spam - shift).exp();
        let likelihood_ham = (log_prob_if_ham - shift).exp();
        let p = likelihood_spam / (likelihood_spam + likelihood_ham);
        p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
    }

    /// `P(spam | token)` for a single token with equal class priors.
    pub fn spam_probability_given_token(&self, token: &str) -> f64 {
        let (prob_if_spam, prob_if_ham) = self.probabilities(token);
        prob_if_spam / (prob_if_spam + prob_if_ham)
    }

    /// Vocabulary ranked from hammiest to spammiest.
    ///
    /// Ties are ordered by token text so the ranking is deterministic.
    pub fn ranked_tokens(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .vocabulary
            .iter()
            .map(|t| (t.clone(), self.spam_probability_given_token(t)))
            .collect();
        ranked.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    /// The `n` tokens most indicative of spam, spammiest first.
    pub fn spammiest(&self, n: usize) -> Vec<(String, f64)> {
        self.ranked_tokens().into_iter().rev().take(n).collect()
    }

    /// The `n` tokens most indicative of ham, hammiest first.
    pub fn hammiest(&self, n: usize) -> Vec<(String, f64)> {
        self.ranked_tokens().into_iter().take(n).collect()
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    pub fn spam_token_counts(&self) -> &TokenCounts {
        &self.spam_token_counts
    }

    pub fn ham_token_counts(&self) -> &TokenCounts {
        &self.ham_token_counts
    }

    pub fn spam_message_count(&self) -> u64 {
        self.spam_message_count
    }

    pub fn ham_message_count(&self) -> u64 {
        self.ham_message_count
    }

    /// Whether at least one message has been trained on.
    pub fn is_trained(&self) -> bool {
        self.training_count() > 0
    }

    /// Total number of training messages seen.
    pub fn training_count(&self) -> u64 {
        self.spam_message_count + self.ham_message_count
    }

    pub fn stats(&self) -> ClassifierStats {
        ClassifierStats {
            k: self.k,
            vocabulary_size: self.vocabulary.len(),
            spam_messages: self.spam_message_count,
            ham_messages: self.ham_message_count,
        }
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self {
            k: Self::DEFAULT_K,
            vocabulary: HashSet::new(),
            spam_token_counts: TokenCounts::new(),
            ham_token_counts: TokenCounts::new(),
            spam_message_count: 0,
            ham_message_count: 0,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_messages() -> Vec<Message> {
        vec![
            Message::spam("spam rules"),
            Message::ham("ham rules"),
            Message::ham("hello ham"),
        ]
    }

    fn trained_toy() -> NaiveBayesClassifier {
        let mut model = NaiveBayesClassifier::new(0.5).unwrap();
        model.train(&toy_messages());
        model
    }

    fn corpus() -> Vec<Message> {
        vec![
            Message::spam("WIN a FREE cruise, click now"),
            Message::spam("free money, act now!!!"),
            Message::spam("cheap meds online, free shipping"),
            Message::ham("meeting moved to thursday"),
            Message::ham("quarterly report attached, see notes"),
            Message::ham("lunch on thursday?"),
            Message::ham("it's the report you asked for"),
        ]
    }

    #[test]
    fn rejects_non_positive_k() {
        for k in [0.0, -0.5, -1e-12] {
            let err = NaiveBayesClassifier::new(k).unwrap_err();
            assert!(matches!(err, ClassifierError::InvalidArgument { name: "k", .. }));
        }
    }

    #[test]
    fn rejects_non_finite_k() {
        for k in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(NaiveBayesClassifier::new(k).is_err());
        }
    }

    #[test]
    fn default_uses_half_smoothing() {
        let model = NaiveBayesClassifier::default();
        assert_eq!(model.k(), 0.5);
        assert!(!model.is_trained());
    }

    #[test]
    fn untrained_classifier_state() {
        let model = NaiveBayesClassifier::new(1.0).unwrap();
        assert!(model.vocabulary().is_empty());
        assert!(model.spam_token_counts().is_empty());
        assert!(model.ham_token_counts().is_empty());
        assert_eq!(model.spam_message_count(), 0);
        assert_eq!(model.ham_message_count(), 0);
        assert_eq!(model.training_count(), 0);
    }

    #[test]
    fn untrained_predict_is_exactly_half() {
        let model = NaiveBayesClassifier::default();
        assert_eq!(model.predict("anything at all"), 0.5);
        assert_eq!(model.predict(""), 0.5);
    }

    #[test]
    fn untrained_probabilities_are_half() {
        let model = NaiveBayesClassifier::new(2.0).unwrap();
        assert_eq!(model.probabilities("whatever"), (0.5, 0.5));
    }

    #[test]
    fn toy_scenario_counts() {
        let model = trained_toy();

        let expected_vocab: HashSet<String> = ["spam", "ham", "rules", "hello"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(model.vocabulary(), &expected_vocab);
        assert_eq!(model.spam_message_count(), 1);
        assert_eq!(model.ham_message_count(), 2);
        assert_eq!(
            model.spam_token_counts(),
            &TokenCounts::from_iter([("spam", 1), ("rules", 1)])
        );
        assert_eq!(
            model.ham_token_counts(),
            &TokenCounts::from_iter([("ham", 2), ("rules", 1), ("hello", 1)])
        );
    }

    #[test]
    fn toy_scenario_prediction() {
        let model = trained_toy();

        let probs_if_spam = [
            (1.0 + 0.5) / (1.0 + 2.0 * 0.5),       // "spam"  (present)
            1.0 - (0.0 + 0.5) / (1.0 + 2.0 * 0.5), // "ham"   (not present)
            1.0 - (1.0 + 0.5) / (1.0 + 2.0 * 0.5), // "rules" (not present)
            (0.0 + 0.5) / (1.0 + 2.0 * 0.5),       // "hello" (present)
        ];
        let probs_if_ham = [
            (0.0 + 0.5) / (2.0 + 2.0 * 0.5),
            1.0 - (2.0 + 0.5) / (2.0 + 2.0 * 0.5),
            1.0 - (1.0 + 0.5) / (2.0 + 2.0 * 0.5),
            (1.0 + 0.5) / (2.0 + 2.0 * 0.5),
        ];
        let p_if_spam: f64 = probs_if_spam.iter().map(|p: &f64| p.ln()).sum::<f64>().exp();
        let p_if_ham: f64 = probs_if_ham.iter().map(|p: &f64| p.ln()).sum::<f64>().exp();
        let expected = p_if_spam / (p_if_spam + p_if_ham);

        let got = model.predict("hello spam");
        assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
        assert!((got - 0.8350).abs() < 1e-3);
    }

    #[test]
    fn reads_never_insert() {
        let model = trained_toy();
        let _ = model.probabilities("unseen");
        let _ = model.predict("unseen words only");
        assert_eq!(model.spam_token_counts().get("unseen"), 0);
        assert!(!model.spam_token_counts().contains("unseen"));
        assert!(!model.vocabulary().contains("unseen"));
        assert_eq!(model.vocabulary().len(), 4);
    }

    #[test]
    fn presence_not_frequency() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&[Message::spam("free free free FREE")]);
        assert_eq!(model.spam_token_counts().get("free"), 1);
    }

    #[test]
    fn counts_never_exceed_message_counts() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&corpus());
        for (_, count) in model.spam_token_counts().iter() {
            assert!(count <= model.spam_message_count());
        }
        for (_, count) in model.ham_token_counts().iter() {
            assert!(count <= model.ham_message_count());
        }
    }

    #[test]
    fn count_keys_are_in_vocabulary() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&corpus());
        for (token, _) in model
            .spam_token_counts()
            .iter()
            .chain(model.ham_token_counts().iter())
        {
            assert!(model.vocabulary().contains(token), "{token} missing");
        }
    }

    #[test]
    fn probabilities_stay_strictly_inside_unit_interval() {
        let mut model = NaiveBayesClassifier::new(0.01).unwrap();
        model.train(&corpus());
        for token in model.vocabulary().iter().map(String::as_str).chain(["zzz"]) {
            let (ps, ph) = model.probabilities(token);
            assert!(ps > 0.0 && ps < 1.0, "{token}: p_spam={ps}");
            assert!(ph > 0.0 && ph < 1.0, "{token}: p_ham={ph}");
        }
    }

    #[test]
    fn empty_training_batch_is_noop() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&Vec::<Message>::new());
        assert!(!model.is_trained());
        assert_eq!(model.predict("hello"), 0.5);
    }

    #[test]
    fn training_accumulates_across_calls() {
        let messages = corpus();
        let (first, second) = messages.split_at(3);

        let mut incremental = NaiveBayesClassifier::default();
        incremental.train(first);
        incremental.train(second);

        let mut batch = NaiveBayesClassifier::default();
        batch.train(&messages);

        assert_eq!(incremental.vocabulary(), batch.vocabulary());
        assert_eq!(incremental.spam_token_counts(), batch.spam_token_counts());
        assert_eq!(incremental.ham_token_counts(), batch.ham_token_counts());
        assert_eq!(incremental.training_count(), 7);
        let a = incremental.predict("free report");
        let b = batch.predict("free report");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn predict_is_idempotent() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&corpus());
        let first = model.predict("free cruise thursday");
        let second = model.predict("free cruise thursday");
        assert_eq!(first, second);
    }

    #[test]
    fn relabeling_mirrors_predictions() {
        let messages = corpus();
        let swapped: Vec<Message> = messages.iter().map(Message::relabeled).collect();

        let mut model = NaiveBayesClassifier::default();
        model.train(&messages);
        let mut mirror = NaiveBayesClassifier::default();
        mirror.train(&swapped);

        for text in ["free money now", "report for thursday", "", "unknown words"] {
            let p = model.predict(text);
            let q = mirror.predict(text);
            assert!((p - (1.0 - q)).abs() < 1e-9, "{text}: {p} vs {q}");
        }
    }

    #[test]
    fn trained_classifier_differentiates() {
        let mut model = NaiveBayesClassifier::default();
        model.train(&corpus());
        let spammy = model.predict("free money click now");
        let hammy = model.predict("thursday meeting report");
        assert!(spammy > 0.5, "spammy = {spammy}");
        assert!(hammy < 0.5, "hammy = {hammy}");
    }

    #[test]
    fn large_vocabulary_does_not_underflow() {
        let mut model = NaiveBayesClassifier::default();
        let spam: Vec<Message> = (0..2000)
            .map(|i| Message::spam(format!("offer{i} prize{i} winner")))
            .collect();
        let ham: Vec<Message> = (0..2000)
            .map(|i| Message::ham(format!("note{i} agenda{i} minutes")))
            .collect();
        model.train(&spam);
        model.train(&ham);

        let p = model.predict("winner prize");
        assert!(p.is_finite());
        assert!(p > 0.5);
    }

    #[test]
    fn tiny_k_prediction_is_finite() {
        let mut balanced = NaiveBayesClassifier::new(1e-20).unwrap();
        balanced.train(&[Message::spam("a"), Message::ham("a")]);
        let p = balanced.predict("b");
        assert!(p.is_finite());
        assert!((p - 0.5).abs() < 1e-12);

        let mut one_sided = NaiveBayesClassifier::new(1e-20).unwrap();
        one_sided.train(&[Message::spam("a")]);
        for text in ["a", "b", ""] {
            let p = one_sided.predict(text);
            assert!(p > 0.0 && p < 1.0, "predict({text:?}) = {p}");
        }

        let mut smallest = NaiveBayesClassifier::new(f64::MIN_POSITIVE).unwrap();
        smallest.train(&corpus());
        for text in ["free money", "meeting notes", ""] {
            let p = smallest.predict(text);
            assert!(p > 0.0 && p < 1.0, "predict({text:?}) = {p}");
        }
    }

    #[test]
    fn ranking_orders_tokens() {
        let model = trained_toy();
        let ranked = model.ranked_tokens();
        assert_eq!(ranked.len(), 4);
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));

        let spammiest = model.spammiest(1);
        assert_eq!(spammiest[0].0, "spam");
        let hammiest = model.hammiest(1);
        assert_eq!(hammiest[0].0, "ham");
    }

    #[test]
    fn spam_probability_given_unknown_token_is_prior_ratio() {
        let model = trained_toy();
        let (ps, ph) = model.probabilities("nope");
        let p = model.spam_probability_given_token("nope");
        assert!((p - ps / (ps + ph)).abs() < 1e-15);
    }

    #[test]
    fn stats_reflect_state() {
        let model = trained_toy();
        let stats = model.stats();
        assert_eq!(stats.vocabulary_size, 4);
        assert_eq!(stats.spam_messages, 1);
        assert_eq!(stats.ham_messages, 2);
        assert!(stats.to_string().contains("vocabulary:    4 tokens"));
    }
}
