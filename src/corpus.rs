//! Email corpus ingestion.
//!
//! Reads a directory laid out as `<root>/<folder>/<email-file>` (the layout of
//! the SpamAssassin public corpus: `easy_ham/`, `hard_ham/`, `spam/`, ...) and
//! turns each raw RFC 5322 file into labelled [`Message`] records.
//!
//! A file is ham when its path below the root contains `"ham"`, spam otherwise.
//! Raw bytes go through `mail-parser`, so encoded subjects and bodies are
//! decoded and invalid UTF-8 never aborts ingestion.

use std::path::{Path, PathBuf};

use mail_parser::MessageParser;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, CorpusResult};
use crate::message::Message;

/// Substring of the relative path that marks a file as ham.
const HAM_MARKER: &str = "ham";

// ── CorpusMode ─────────────────────────────────────────────────────────────

/// Which parts of each email become training messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorpusMode {
    /// One message per email: the `Subject:` header.
    Subject,
    /// The subject, plus a second message holding the plain-text body.
    #[default]
    SubjectAndBody,
}

impl std::fmt::Display for CorpusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::SubjectAndBody => write!(f, "subject-and-body"),
        }
    }
}

impl std::str::FromStr for CorpusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subject" => Ok(Self::Subject),
            "subject-and-body" => Ok(Self::SubjectAndBody),
            other => Err(format!(
                "unknown corpus mode \"{other}\" (expected \"subject\" or \"subject-and-body\")"
            )),
        }
    }
}

// ── Ingestion ──────────────────────────────────────────────────────────────

/// Load every email file found two levels below `root`.
///
/// Files are visited in sorted path order so the resulting sequence is
/// deterministic. Hidden entries (leading `.`) are skipped. Files that
/// `mail-parser` cannot make sense of are skipped with a warning.
pub fn load_corpus(root: &Path, mode: CorpusMode) -> CorpusResult<Vec<Message>> {
    if !root.is_dir() {
        return Err(CorpusError::NotFound {
            path: root.display().to_string(),
        });
    }

    let mut data = Vec::new();
    let mut files = 0usize;
    let mut skipped = 0usize;

    for folder in sorted_entries(root)? {
        if !folder.is_dir() {
            continue;
        }
        for file in sorted_entries(&folder)? {
            if !file.is_file() {
                continue;
            }
            files += 1;

            let raw = std::fs::read(&file).map_err(|e| CorpusError::Io {
                path: file.display().to_string(),
                source: e,
            })?;
            let is_spam = !is_ham_path(root, &file);

            match extract_messages(&raw, is_spam, mode) {
                Some(messages) => data.extend(messages),
                None => {
                    skipped += 1;
                    tracing::warn!(path = %file.display(), "skipping unparseable email");
                }
            }
        }
    }

    let spam = data.iter().filter(|m| m.is_spam).count();
    tracing::info!(
        root = %root.display(),
        %mode,
        files,
        skipped,
        messages = data.len(),
        spam,
        ham = data.len() - spam,
        "loaded email corpus"
    );

    Ok(data)
}

/// Turn one raw email into labelled messages according to `mode`.
///
/// Returns `None` when the bytes are not a parseable message. A missing or
/// blank subject and a blank body simply produce no record for that part.
pub fn extract_messages(raw: &[u8], is_spam: bool, mode: CorpusMode) -> Option<Vec<Message>> {
    let parsed = MessageParser::default().parse(raw)?;
    let mut messages = Vec::with_capacity(2);

    if let Some(subject) = parsed.subject() {
        let subject = subject.trim();
        if !subject.is_empty() {
            messages.push(Message::new(subject, is_spam));
        }
    }

    if mode == CorpusMode::SubjectAndBody {
        if let Some(body) = parsed.body_text(0) {
            let body = body.trim();
            if !body.is_empty() {
                messages.push(Message::new(body, is_spam));
            }
        }
    }

    Some(messages)
}

/// Whether the path of `file` relative to `root` marks it as ham.
fn is_ham_path(root: &Path, file: &Path) -> bool {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative.to_string_lossy().contains(HAM_MARKER)
}

/// Non-hidden entries of `dir`, sorted by path.
fn sorted_entries(dir: &Path) -> CorpusResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CorpusError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CorpusError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}
