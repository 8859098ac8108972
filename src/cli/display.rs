// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the ngramdex CLI: framed sections and a small palette.
//!
//! Colors are picked by role (frame, heading, good, bad...) from OneDark or
//! One Light. `NGRAMDEX_THEME=light|dark` wins, otherwise a light `COLORFGBG`
//! background selects One Light. `NO_COLOR` or a non-TTY stdout disables
//! escapes entirely, so piped output is plain text.

use std::sync::OnceLock;

/// Columns between the two `│` borders.
pub const BOX_WIDTH: usize = 72;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

type Rgb = (u8, u8, u8);

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub frame: Rgb,
    pub heading: Rgb,
    pub strong: Rgb,
    pub good: Rgb,
    pub fair: Rgb,
    pub bad: Rgb,
    pub class: Rgb,
}

/// OneDark (https://github.com/joshdick/onedark.vim)
pub const DARK: Palette = Palette {
    frame: (92, 99, 112),
    heading: (86, 182, 194),
    strong: (166, 226, 46),
    good: (152, 195, 121),
    fair: (229, 192, 123),
    bad: (224, 108, 117),
    class: (198, 120, 221),
};

/// One Light (https://github.com/sonph/onehalf)
pub const LIGHT: Palette = Palette {
    frame: (160, 161, 167),
    heading: (1, 132, 188),
    strong: (68, 140, 39),
    good: (80, 161, 79),
    fair: (193, 132, 1),
    bad: (228, 86, 73),
    class: (166, 38, 164),
};

fn light_background() -> bool {
    if let Ok(theme) = std::env::var("NGRAMDEX_THEME") {
        return matches!(theme.to_lowercase().as_str(), "light" | "l");
    }
    // "fg;bg": 7 and 9-15 are the light backgrounds.
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next()?.parse::<u8>().ok())
        .is_some_and(|bg| bg >= 7 && bg != 8)
}

pub fn palette() -> &'static Palette {
    static PALETTE: OnceLock<Palette> = OnceLock::new();
    PALETTE.get_or_init(|| if light_background() { LIGHT } else { DARK })
}

fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// STYLING
// ═══════════════════════════════════════════════════════════════════════════

fn escape((r, g, b): Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

/// `text` in `color`, optionally bold.
pub fn paint(color: Rgb, bold: bool, text: &str) -> String {
    if !colors_enabled() {
        return text.to_string();
    }
    let weight = if bold { BOLD } else { "" };
    format!("{}{}{}{}", weight, escape(color), text, RESET)
}

pub fn bold(text: &str) -> String {
    if colors_enabled() {
        format!("{}{}{}", BOLD, text, RESET)
    } else {
        text.to_string()
    }
}

pub fn dim(text: &str) -> String {
    paint(palette().frame, false, text)
}

/// Printed width of `s`, skipping `ESC ... m` sequences.
pub fn visible_len(s: &str) -> usize {
    let mut chars = s.chars();
    let mut len = 0;
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            chars.by_ref().find(|&c| c == 'm');
        } else {
            len += 1;
        }
    }
    len
}

fn fill(s: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(visible_len(s)))
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", fill(s, width), s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{}{}", s, fill(s, width))
}

// ═══════════════════════════════════════════════════════════════════════════
// FRAMES
// ═══════════════════════════════════════════════════════════════════════════

/// A horizontal border, with an optional heading set into it.
fn rule(left: char, heading: Option<&str>, right: char) {
    let heading = heading
        .map(|h| format!("─ {} ", paint(palette().heading, true, h)))
        .unwrap_or_default();
    let line = "─".repeat(BOX_WIDTH.saturating_sub(visible_len(&heading)));
    println!(
        "{}{}{}",
        dim(&left.to_string()),
        heading,
        dim(&format!("{}{}", line, right))
    );
}

pub fn section_top(heading: &str) {
    rule('┌', Some(heading), '┐');
}

pub fn section_mid(heading: &str) {
    rule('├', Some(heading), '┤');
}

pub fn section_bot() {
    rule('└', None, '┘');
}

/// One framed line, padded to the box width.
pub fn row(content: &str) {
    let border = dim("│");
    println!("{}{}{}{}", border, content, fill(content, BOX_WIDTH), border);
}

// ═══════════════════════════════════════════════════════════════════════════
// VALUES
// ═══════════════════════════════════════════════════════════════════════════

const SIZE_UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Bytes as B, KB, MB or GB with one decimal.
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

/// Space saved by compression, as a colored percentage.
pub fn savings(raw: usize, compressed: usize) -> String {
    if raw == 0 {
        return dim("   n/a");
    }
    let saved = (1.0 - compressed as f64 / raw as f64) * 100.0;
    let text = format!("{:>5.0}%", saved);
    match saved {
        s if s.abs() < 0.5 => dim(&text),
        s if s > 0.0 => paint(palette().good, true, &text),
        _ => paint(palette().bad, true, &text),
    }
}

pub fn status_badge(ok: bool) -> String {
    if ok {
        paint(palette().good, true, "ok")
    } else {
        paint(palette().bad, true, "MISMATCH")
    }
}

/// A lone exact word match scores a little over 1; each further shared
/// n-gram adds a fraction.
pub fn score_value(score: f64) -> String {
    let p = palette();
    let color = match score {
        s if s >= 2.0 => p.strong,
        s if s >= 1.0 => p.good,
        s if s >= 0.5 => p.fair,
        _ => p.frame,
    };
    paint(color, false, &format!("{:>8.4}", score))
}

pub fn class_label(class: &str) -> String {
    paint(palette().class, false, class)
}
