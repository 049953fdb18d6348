//! Topic naming with an optional assistant and frequency fallback.
//!
//! The naming assistant is an injected collaborator (typically backed by a
//! language model). Its reply is only trusted after validation; any failure
//! or rejected reply falls back to a deterministic word-frequency name.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::NamingConfig;
use crate::text::capitalize;

/// Name used when no usable words remain.
pub const FALLBACK_TOPIC_NAME: &str = "General Topics";

/// Words ignored by the frequency namer.
const NAMING_STOP_WORDS: &[&str] = &["the", "and", "of", "in", "to", "for", "on", "with", "by", "at"];

/// Characters that mark a reply as markup rather than a plain name.
const MARKUP_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '*', '#', '`', '|', '\\'];

/// Errors from the naming assistant.
#[derive(Debug, Error)]
pub enum NamingError {
    /// Assistant not configured or unreachable
    #[error("Naming assistant unavailable: {0}")]
    Unavailable(String),

    /// Assistant did not answer in time
    #[error("Naming assistant timed out after {0}ms")]
    Timeout(u64),

    /// Reply failed validation
    #[error("Naming reply rejected: {0}")]
    Rejected(String),
}

/// Suggests a short human-readable name for a cluster of subtopics.
///
/// Implementations should be deterministic for identical input within a
/// session. They must be thread-safe (Send + Sync).
pub trait NamingAssistant: Send + Sync {
    /// Suggest a name for `members`; `hint` is the cluster representative.
    fn suggest_name(&self, members: &[String], hint: &str) -> Result<String, NamingError>;
}

/// Assistant that is never available, forcing the frequency namer.
pub struct NoOpNamingAssistant;

impl NamingAssistant for NoOpNamingAssistant {
    fn suggest_name(&self, _members: &[String], _hint: &str) -> Result<String, NamingError> {
        Err(NamingError::Unavailable(
            "No naming assistant configured".to_string(),
        ))
    }
}

/// Names clusters, preferring a validated assistant reply.
pub struct TopicNamer {
    assistant: Option<Arc<dyn NamingAssistant>>,
    config: NamingConfig,
}

impl TopicNamer {
    /// Create a namer with an optional assistant.
    pub fn new(assistant: Option<Arc<dyn NamingAssistant>>, config: NamingConfig) -> Self {
        Self { assistant, config }
    }

    /// Create a namer that only uses word frequency.
    pub fn without_assistant(config: NamingConfig) -> Self {
        Self::new(None, config)
    }

    /// Name a cluster. The assistant is asked at most once.
    pub fn name_cluster(&self, members: &[String], representative: &str) -> String {
        if self.config.use_assistant {
            if let Some(assistant) = &self.assistant {
                match assistant
                    .suggest_name(members, representative)
                    .and_then(|reply| self.validate(&reply))
                {
                    Ok(name) => return name,
                    Err(e) => {
                        debug!(
                            representative = %representative,
                            error = %e,
                            "Assistant name not used, falling back to word frequency"
                        );
                    }
                }
            }
        }

        frequency_name(members, self.config.fallback_words)
    }

    /// Validate and clean an assistant reply.
    ///
    /// Accepts a single line of at most `max_words` words with no markup,
    /// after removing every quote character.
    pub fn validate(&self, reply: &str) -> Result<String, NamingError> {
        let unquoted = reply.replace(['"', '\''], "");
        let cleaned = unquoted.trim();

        if cleaned.is_empty() {
            return Err(NamingError::Rejected("empty reply".to_string()));
        }
        if cleaned.contains(['\n', '\r']) {
            return Err(NamingError::Rejected("multi-line reply".to_string()));
        }
        if cleaned.contains(MARKUP_CHARS) {
            return Err(NamingError::Rejected("reply contains markup".to_string()));
        }
        let words = cleaned.split_whitespace().count();
        if words > self.config.max_words {
            return Err(NamingError::Rejected(format!(
                "{} words exceeds limit of {}",
                words, self.config.max_words
            )));
        }

        Ok(cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Name a group of labels after its most frequent words.
///
/// Words are lowercased, split on whitespace, and kept when longer than two
/// characters and not a stop word. The `top_n` most frequent (ties broken by
/// first occurrence) are capitalized and joined with spaces.
pub fn frequency_name(members: &[String], top_n: usize) -> String {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut position = 0usize;

    for member in members {
        for word in member.to_lowercase().split_whitespace() {
            if word.chars().count() <= 2 || NAMING_STOP_WORDS.contains(&word) {
                continue;
            }
            let entry = counts.entry(word.to_string()).or_insert((0, position));
            entry.0 += 1;
            position += 1;
        }
    }

    if counts.is_empty() {
        return FALLBACK_TOPIC_NAME.to_string();
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .iter()
        .take(top_n.max(1))
        .map(|(word, _, _)| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}
