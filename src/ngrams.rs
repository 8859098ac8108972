// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning a string into weighted n-grams.
//!
//! The same function feeds both sides of the index. At index time we extract
//! every n-gram (`bounded = false`); at query time we sample at most about
//! `max_ngrams_to_search` of them, spread evenly across the string so a long
//! query still probes its tail.
//!
//! # Scoring
//!
//! With `len` the character count of the normalized string:
//!
//! ```text
//! word-start n-gram   sqrt(1 + 1/len)
//! interior n-gram     sqrt(2/len)
//! full word / prefix  1 + 1/len
//! ```
//!
//! Query and posting scores get multiplied together at search time. The square
//! roots make that product behave like a similarity: a string scores higher
//! against itself than against any string containing it, and higher than
//! against any string it contains. Shorter strings give each n-gram more
//! weight, which is what ranks "Flowers" above "Flower Myth" for the query
//! "flowers".
//!
//! # Combining duplicates
//!
//! An n-gram seen at several offsets keeps its best score (max). Only after
//! that do raw n-grams, short prefixes and full words get summed, so a token
//! that is all three at once collects credit from each source.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::IndexConfig;
use crate::utils::normalize;

/// N-gram (or word) → score. Ordered so iteration is deterministic.
pub type NgramScores = BTreeMap<String, f64>;

/// Score of an n-gram that starts the string or a word.
#[inline]
pub fn word_start_score(len: usize) -> f64 {
    (1.0 + 1.0 / len as f64).sqrt()
}

/// Score of an n-gram in the middle of a word.
#[inline]
pub fn interior_score(len: usize) -> f64 {
    (2.0 / len as f64).sqrt()
}

/// Score added for a full word or a short prefix.
#[inline]
pub fn word_score(len: usize) -> f64 {
    1.0 + 1.0 / len as f64
}

/// Stride between sampled offsets.
///
/// Unbounded extraction takes every offset. Bounded extraction spreads
/// `max_ngrams_to_search` samples over the string: 3-grams from an 11
/// character string with a cap of 3 step by `ceil(8 / 3) = 3`.
pub fn step_size(len: usize, width: usize, max_ngrams: usize, bounded: bool) -> usize {
    if !bounded || len <= width {
        return 1;
    }
    (len - width).div_ceil(max_ngrams).max(1)
}

/// Extract scored n-grams from `text`.
///
/// `None` and strings with nothing left after normalization give an empty map.
/// A string shorter than `ngram_width` produces no raw n-grams but can still
/// produce full-word and short-prefix entries.
pub fn extract(text: Option<&str>, config: &IndexConfig, bounded: bool) -> NgramScores {
    let Some(text) = text else {
        return NgramScores::new();
    };

    let normalized = normalize(text, config);
    let chars: Vec<char> = normalized.chars().collect();
    let len = chars.len();
    if len == 0 {
        return NgramScores::new();
    }

    let mut scores = sliding_ngrams(&chars, config, bounded);

    if config.index_short_prefixes() || config.index_full_words() {
        let words: Vec<&str> = normalized
            .split(|c: char| config.is_separator(c))
            .collect();
        let bonus = word_score(len);

        if config.index_short_prefixes() {
            for prefix in short_prefixes(&words, &normalized, config) {
                *scores.entry(prefix).or_insert(0.0) += bonus;
            }
        }

        if config.index_full_words() {
            for word in full_words(&words, &normalized, config) {
                *scores.entry(word).or_insert(0.0) += bonus;
            }
        }
    }

    scores
}

/// Merge several score maps, summing shared keys.
pub fn merge_sum<I>(maps: I) -> NgramScores
where
    I: IntoIterator<Item = NgramScores>,
{
    let mut merged = NgramScores::new();
    for map in maps {
        for (ngram, score) in map {
            *merged.entry(ngram).or_insert(0.0) += score;
        }
    }
    merged
}

/// Fixed-width windows over the normalized characters, max score per n-gram.
fn sliding_ngrams(chars: &[char], config: &IndexConfig, bounded: bool) -> NgramScores {
    let len = chars.len();
    let width = config.ngram_width();
    let mut scores = NgramScores::new();

    if len < width {
        return scores;
    }

    let step = step_size(len, width, config.max_ngrams_to_search(), bounded);
    for i in (0..=len - width).step_by(step) {
        let word_start = i == 0
            || (config.apply_prefix_scoring_to_all_words() && config.is_separator(chars[i - 1]));
        let score = if word_start {
            word_start_score(len)
        } else {
            interior_score(len)
        };

        let ngram: String = chars[i..i + width].iter().collect();
        scores
            .entry(ngram)
            .and_modify(|best| {
                if score > *best {
                    *best = score;
                }
            })
            .or_insert(score);
    }

    scores
}

/// Stop words only count when they are the whole string.
fn counts_as_word(word: &str, whole: &str, config: &IndexConfig) -> bool {
    !config.is_stop_word(word) || word == whole
}

/// First `ngram_width - 1` characters of every qualifying word, once each.
fn short_prefixes(words: &[&str], whole: &str, config: &IndexConfig) -> Vec<String> {
    let prefix_len = config.ngram_width() - 1;
    let mut seen = BTreeSet::new();
    let mut prefixes = Vec::new();

    // A width of 1 would make every prefix empty.
    if prefix_len == 0 {
        return prefixes;
    }

    for word in words {
        if word.chars().count() < prefix_len {
            continue;
        }
        let prefix: String = word.chars().take(prefix_len).collect();
        if counts_as_word(word, whole, config) && seen.insert(prefix.clone()) {
            prefixes.push(prefix);
        }
    }
    prefixes
}

/// Every distinct qualifying word longer than one character.
fn full_words(words: &[&str], whole: &str, config: &IndexConfig) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for word in words {
        if word.chars().count() > 1
            && counts_as_word(word, whole, config)
            && seen.insert(*word)
        {
            out.push((*word).to_string());
        }
    }
    out
}
