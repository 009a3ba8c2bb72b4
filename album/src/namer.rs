//! Naming collaborator: short human-readable labels for clusters.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::AlbumError;

/// Label used whenever naming is impossible or fails.
pub const FALLBACK_NAME: &str = "Unnamed Cluster";

/// Default number of member descriptions offered to a namer.
pub const DEFAULT_NAMING_SAMPLES: usize = 5;

/// ClusterNamer turns a few member descriptions into a 2-4 word name.
///
/// Implementations must be safe for concurrent use (Send + Sync); the album
/// names clusters of one batch concurrently and in no particular order.
#[async_trait::async_trait]
pub trait ClusterNamer: Send + Sync {
    async fn name(&self, descriptions: &[String]) -> Result<String, AlbumError>;
}

/// Names a cluster from at most `samples` descriptions.
///
/// Empty input, a naming error, or a blank answer all yield `fallback`.
/// Surrounding whitespace and quotes are stripped from the answer.
pub async fn name_or_fallback(
    namer: &dyn ClusterNamer,
    descriptions: &[String],
    samples: usize,
    fallback: &str,
) -> String {
    if descriptions.is_empty() {
        return fallback.to_string();
    }
    let samples = &descriptions[..descriptions.len().min(samples.max(1))];
    info!(samples = samples.len(), "namer: generating cluster name");
    match namer.name(samples).await {
        Ok(name) => {
            let name = name.trim().trim_matches('"').trim();
            if name.is_empty() {
                warn!("namer: blank name, using fallback");
                fallback.to_string()
            } else {
                name.to_string()
            }
        }
        Err(err) => {
            warn!(error = %err, "namer: failed to generate cluster name");
            fallback.to_string()
        }
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "at", "by", "for", "from", "has", "have", "image", "in", "into", "is",
    "its", "jpeg", "jpg", "of", "on", "or", "photo", "picture", "png", "shows", "showing", "some",
    "that", "the", "their", "there", "this", "with",
];

/// Local, deterministic namer: the most frequent content words, title-cased.
///
/// Stands in for a hosted language model where none is configured.
#[derive(Debug, Clone)]
pub struct KeywordNamer {
    max_words: usize,
}

impl KeywordNamer {
    pub fn new() -> Self {
        Self { max_words: 3 }
    }

    /// Caps the name length, clamped to 1..=4 words.
    pub fn with_max_words(mut self, n: usize) -> Self {
        self.max_words = n.clamp(1, 4);
        self
    }

    fn keywords(&self, descriptions: &[String]) -> Vec<String> {
        // word -> (count, first position)
        let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
        let mut pos = 0;
        for d in descriptions {
            for raw in d.split(|c: char| !c.is_alphanumeric()) {
                let word = raw.to_lowercase();
                if word.chars().count() < 3
                    || word.chars().all(|c| c.is_ascii_digit())
                    || STOPWORDS.contains(&word.as_str())
                {
                    continue;
                }
                freq.entry(word).or_insert((0, pos)).0 += 1;
                pos += 1;
            }
        }
        let mut words: Vec<(String, (usize, usize))> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
        words
            .into_iter()
            .take(self.max_words)
            .map(|(w, _)| title_case(&w))
            .collect()
    }
}

impl Default for KeywordNamer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait::async_trait]
impl ClusterNamer for KeywordNamer {
    async fn name(&self, descriptions: &[String]) -> Result<String, AlbumError> {
        let words = self.keywords(descriptions);
        if words.is_empty() {
            return Err(AlbumError::Naming("no keywords in descriptions".into()));
        }
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait::async_trait]
    impl ClusterNamer for Failing {
        async fn name(&self, _: &[String]) -> Result<String, AlbumError> {
            Err(AlbumError::Naming("service unavailable".into()))
        }
    }

    struct Quoted;

    #[async_trait::async_trait]
    impl ClusterNamer for Quoted {
        async fn name(&self, descriptions: &[String]) -> Result<String, AlbumError> {
            Ok(format!("  \"{} samples\"\n", descriptions.len()))
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn keyword_namer_picks_frequent_words() {
        let d = strings(&[
            "A dog running on the beach",
            "Two dogs on a sandy beach at sunset",
            "Beach umbrella and a dog",
        ]);
        let name = KeywordNamer::new().name(&d).await.unwrap();
        assert_eq!(name, "Beach Dog Running");
    }

    #[tokio::test]
    async fn keyword_namer_without_words_fails() {
        let err = KeywordNamer::new().name(&strings(&["a of 12"])).await.unwrap_err();
        assert!(matches!(err, AlbumError::Naming(_)));
    }

    #[tokio::test]
    async fn fallback_on_empty_and_error() {
        assert_eq!(
            name_or_fallback(&KeywordNamer::new(), &[], 5, FALLBACK_NAME).await,
            FALLBACK_NAME
        );
        assert_eq!(
            name_or_fallback(&Failing, &strings(&["cat"]), 5, FALLBACK_NAME).await,
            FALLBACK_NAME
        );
    }

    #[tokio::test]
    async fn samples_are_capped_and_answer_trimmed() {
        let d = strings(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(name_or_fallback(&Quoted, &d, 5, FALLBACK_NAME).await, "5 samples");
        assert_eq!(name_or_fallback(&Quoted, &d, 2, FALLBACK_NAME).await, "2 samples");
    }
}
