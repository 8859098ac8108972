// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String normalization ahead of n-gram extraction.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

use crate::config::IndexConfig;

/// Normalize a string for n-gram extraction: fold accents, lowercase, then
/// keep only alphabet characters and word separators.
///
/// - "César Galicia" → "cesar galicia"
/// - "Untitled (cal%desert)" → "untitled caldesert"
/// - "naïve" → "naive"
///
/// Characters outside the configured alphabet are dropped, never replaced.
/// With `remove_accents` off, "César" becomes "csar": the accented letter is
/// simply not in the alphabet.
pub fn normalize(value: &str, config: &IndexConfig) -> String {
    let folded = if config.remove_accents() {
        fold_accents(value)
    } else {
        value.to_string()
    };

    folded
        .to_lowercase()
        .chars()
        .filter(|c| config.retains(*c))
        .collect()
}

/// Compatibility-decompose and drop the combining marks left behind.
///
/// "é" decomposes to "e" + U+0301; the mark goes, the base letter stays.
#[cfg(feature = "unicode-normalization")]
pub fn fold_accents(value: &str) -> String {
    value.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Without the normalization tables there is nothing to fold with, so the
/// string passes through untouched.
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold_accents(value: &str) -> String {
    value.to_string()
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
