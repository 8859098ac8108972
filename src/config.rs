// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-index tokenizer and retrieval settings.
//!
//! An `IndexConfig` is immutable once built. The only way to get one is
//! through `IndexConfigBuilder::build()` (or deserializing, which goes through
//! the same builder), so every config in circulation has passed validation.
//!
//! # Defaults
//!
//! | Setting                              | Default                                  |
//! |--------------------------------------|------------------------------------------|
//! | `alphabet`                           | `abcdefghijklmnopqrstuvwxyz0123456789 `  |
//! | `word_separators`                    | `-_ \n\t`                                |
//! | `ngram_width`                        | 3                                        |
//! | `max_ngrams_to_search`               | 6                                        |
//! | `max_candidate_set_size`             | 1000                                     |
//! | `apply_prefix_scoring_to_all_words`  | true                                     |
//! | `index_full_words`                   | true                                     |
//! | `index_short_prefixes`               | false                                    |
//! | `remove_accents`                     | true                                     |
//! | `stop_words`                         | [`DEFAULT_STOP_WORDS`]                   |

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789 ";
pub const DEFAULT_WORD_SEPARATORS: &str = "-_ \n\t";
pub const DEFAULT_NGRAM_WIDTH: usize = 3;
pub const DEFAULT_MAX_NGRAMS_TO_SEARCH: usize = 6;
pub const DEFAULT_MAX_CANDIDATE_SET_SIZE: usize = 1000;

/// English stop words excluded from full-word and short-prefix credit.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "i", "a", "s", "t", "me", "my", "we", "he", "it", "am", "is", "be", "do", "an", "if", "or",
    "as", "of", "at", "by", "to", "up", "in", "on", "no", "so", "our", "you", "him", "his", "she",
    "her", "its", "who", "are", "was", "has", "had", "did", "the", "and", "but", "for", "out",
    "off", "why", "how", "all", "any", "few", "nor", "not", "own", "too", "can", "don", "now",
    "ours", "your", "hers", "they", "them", "what", "whom", "this", "that", "were", "been",
    "have", "does", "with", "into", "from", "down", "over", "then", "once", "here", "when",
    "both", "each", "more", "most", "some", "such", "only", "same", "than", "very", "will",
    "just", "yours", "their", "which", "these", "those", "being", "doing", "until", "while",
    "about", "after", "above", "below", "under", "again", "there", "where", "other", "myself",
    "itself", "theirs", "having", "during", "before", "should", "himself", "herself", "because",
    "against", "between", "through", "further", "yourself", "ourselves", "yourselves",
    "themselves",
];

// =============================================================================
// CHARACTER SETS
// =============================================================================

/// A set of characters, written as a plain string in config files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharSet(BTreeSet<char>);

impl CharSet {
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl From<&str> for CharSet {
    fn from(chars: &str) -> Self {
        CharSet(chars.chars().collect())
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Serialize for CharSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CharSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CharSetVisitor;

        impl Visitor<'_> for CharSetVisitor {
            type Value = CharSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of characters")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CharSet, E> {
                Ok(CharSet::from(v))
            }
        }

        deserializer.deserialize_str(CharSetVisitor)
    }
}

// =============================================================================
// INDEX CONFIG
// =============================================================================

/// Validated, immutable settings for one n-gram index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexConfigBuilder", into = "IndexConfigBuilder")]
pub struct IndexConfig {
    alphabet: CharSet,
    word_separators: CharSet,
    ngram_width: usize,
    max_ngrams_to_search: usize,
    max_candidate_set_size: usize,
    apply_prefix_scoring_to_all_words: bool,
    index_full_words: bool,
    index_short_prefixes: bool,
    remove_accents: bool,
    stop_words: BTreeSet<String>,
}

impl IndexConfig {
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn alphabet(&self) -> &CharSet {
        &self.alphabet
    }

    pub fn word_separators(&self) -> &CharSet {
        &self.word_separators
    }

    pub fn ngram_width(&self) -> usize {
        self.ngram_width
    }

    pub fn max_ngrams_to_search(&self) -> usize {
        self.max_ngrams_to_search
    }

    pub fn max_candidate_set_size(&self) -> usize {
        self.max_candidate_set_size
    }

    pub fn apply_prefix_scoring_to_all_words(&self) -> bool {
        self.apply_prefix_scoring_to_all_words
    }

    pub fn index_full_words(&self) -> bool {
        self.index_full_words
    }

    pub fn index_short_prefixes(&self) -> bool {
        self.index_short_prefixes
    }

    pub fn remove_accents(&self) -> bool {
        self.remove_accents
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// True if `c` survives normalization.
    #[inline]
    pub fn retains(&self, c: char) -> bool {
        self.alphabet.contains(c) || self.word_separators.contains(c)
    }

    #[inline]
    pub fn is_separator(&self, c: char) -> bool {
        self.word_separators.contains(c)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfigBuilder::default()
            .build()
            .unwrap_or_else(|_| unreachable!("default configuration is valid"))
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder (and on-disk shape) for [`IndexConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfigBuilder {
    alphabet: CharSet,
    word_separators: CharSet,
    ngram_width: usize,
    max_ngrams_to_search: usize,
    max_candidate_set_size: usize,
    apply_prefix_scoring_to_all_words: bool,
    index_full_words: bool,
    index_short_prefixes: bool,
    remove_accents: bool,
    stop_words: BTreeSet<String>,
}

impl Default for IndexConfigBuilder {
    fn default() -> Self {
        Self {
            alphabet: CharSet::from(DEFAULT_ALPHABET),
            word_separators: CharSet::from(DEFAULT_WORD_SEPARATORS),
            ngram_width: DEFAULT_NGRAM_WIDTH,
            max_ngrams_to_search: DEFAULT_MAX_NGRAMS_TO_SEARCH,
            max_candidate_set_size: DEFAULT_MAX_CANDIDATE_SET_SIZE,
            apply_prefix_scoring_to_all_words: true,
            index_full_words: true,
            index_short_prefixes: false,
            remove_accents: true,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

impl IndexConfigBuilder {
    pub fn alphabet(mut self, chars: &str) -> Self {
        self.alphabet = CharSet::from(chars);
        self
    }

    pub fn word_separators(mut self, chars: &str) -> Self {
        self.word_separators = CharSet::from(chars);
        self
    }

    pub fn ngram_width(mut self, width: usize) -> Self {
        self.ngram_width = width;
        self
    }

    pub fn max_ngrams_to_search(mut self, max: usize) -> Self {
        self.max_ngrams_to_search = max;
        self
    }

    pub fn max_candidate_set_size(mut self, max: usize) -> Self {
        self.max_candidate_set_size = max;
        self
    }

    pub fn apply_prefix_scoring_to_all_words(mut self, enabled: bool) -> Self {
        self.apply_prefix_scoring_to_all_words = enabled;
        self
    }

    pub fn index_full_words(mut self, enabled: bool) -> Self {
        self.index_full_words = enabled;
        self
    }

    pub fn index_short_prefixes(mut self, enabled: bool) -> Self {
        self.index_short_prefixes = enabled;
        self
    }

    pub fn remove_accents(mut self, enabled: bool) -> Self {
        self.remove_accents = enabled;
        self
    }

    /// Replace the stop word list.
    pub fn stop_words<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<IndexConfig> {
        if self.ngram_width == 0 {
            return Err(Error::InvalidConfig("ngram_width must be at least 1".into()));
        }
        if self.max_ngrams_to_search == 0 {
            return Err(Error::InvalidConfig(
                "max_ngrams_to_search must be at least 1".into(),
            ));
        }
        if self.max_candidate_set_size == 0 {
            return Err(Error::InvalidConfig(
                "max_candidate_set_size must be at least 1".into(),
            ));
        }
        if self.alphabet.is_empty() {
            return Err(Error::InvalidConfig("alphabet must not be empty".into()));
        }

        Ok(IndexConfig {
            alphabet: self.alphabet,
            word_separators: self.word_separators,
            ngram_width: self.ngram_width,
            max_ngrams_to_search: self.max_ngrams_to_search,
            max_candidate_set_size: self.max_candidate_set_size,
            apply_prefix_scoring_to_all_words: self.apply_prefix_scoring_to_all_words,
            index_full_words: self.index_full_words,
            index_short_prefixes: self.index_short_prefixes,
            remove_accents: self.remove_accents,
            stop_words: self.stop_words,
        })
    }
}

impl TryFrom<IndexConfigBuilder> for IndexConfig {
    type Error = Error;

    fn try_from(builder: IndexConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<IndexConfig> for IndexConfigBuilder {
    fn from(config: IndexConfig) -> Self {
        Self {
            alphabet: config.alphabet,
            word_separators: config.word_separators,
            ngram_width: config.ngram_width,
            max_ngrams_to_search: config.max_ngrams_to_search,
            max_candidate_set_size: config.max_candidate_set_size,
            apply_prefix_scoring_to_all_words: config.apply_prefix_scoring_to_all_words,
            index_full_words: config.index_full_words,
            index_short_prefixes: config.index_short_prefixes,
            remove_accents: config.remove_accents,
            stop_words: config.stop_words,
        }
    }
}
