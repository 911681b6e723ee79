//! Labelled training/evaluation record.

use serde::{Deserialize, Serialize};

/// A piece of text together with its spam/ham label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub is_spam: bool,
}

impl Message {
    pub fn new(text: impl Into<String>, is_spam: bool) -> Self {
        Self {
            text: text.into(),
            is_spam,
        }
    }

    /// Shorthand for a message labelled spam.
    pub fn spam(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Shorthand for a message labelled ham.
    pub fn ham(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// The same text with the opposite label.
    pub fn relabeled(&self) -> Self {
        Self::new(self.text.clone(), !self.is_spam)
    }
}
