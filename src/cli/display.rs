// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the stemdex CLI.
//!
//! OneDark colors on dark terminals, One Light on light ones. `STEMDEX_THEME`
//! ("dark" / "light") wins; otherwise `COLORFGBG` is consulted, and dark is
//! the fallback. Colors switch off entirely for `NO_COLOR` and when stdout
//! is not a TTY, so piped output stays plain.

use std::sync::OnceLock;

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 72;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("STEMDEX_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // "fg;bg", a bg of 7 or above (except 8) is a light background
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(Ok(bg)) = colorfgbg.split(';').next_back().map(str::parse::<u8>) {
            if bg >= 7 && bg != 8 {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            rgb(match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            })
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Theme color plus modifiers, or plain text when colors are off.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn dim(text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", DIM, text, RESET)
    } else {
        text.to_string()
    }
}

/// Chars on screen, ignoring ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

fn border() -> String {
    if use_colors() {
        GRAY()
    } else {
        String::new()
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

/// │ content          │
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    let (b, r) = (border(), reset());
    println!("{b}│{r}{content}{}{b}│{r}", " ".repeat(pad));
}

/// │ label        value │
pub fn field(label: &str, value: &str) {
    row(&format!(" {} {}", pad_right(&dim(label), 18), value));
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    let (b, r) = (border(), reset());
    println!("{b}┌{r}{label_part}{b}{}┐{r}", "─".repeat(remaining));
}

/// └──────────────────┘
pub fn section_bot() {
    let (b, r) = (border(), reset());
    println!("{b}└{}┘{r}", "─".repeat(BOX_WIDTH));
}

pub fn title(text: &str) {
    println!();
    println!("  {}", themed(BRIGHT_CYAN, &[BOLD], text));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Words in green, unknown stems in gray.
pub fn word_label(word: &str, known: bool) -> String {
    if known {
        themed(GREEN, &[BOLD], word)
    } else {
        themed(GRAY, &[], word)
    }
}

pub fn template_badge(template: &str) -> String {
    themed(BLUE, &[], &format!("[{}]", template))
}

/// Similarity score (0-100): green near 100, yellow in the middle, red below.
pub fn score_value(score: f64) -> String {
    let text = format!("{:>6.1}", score);
    let color: fn() -> String = if score >= 90.0 {
        BRIGHT_GREEN
    } else if score >= 80.0 {
        GREEN
    } else if score >= 60.0 {
        YELLOW
    } else {
        RED
    };
    themed(color, &[], &text)
}

pub fn status(ok: bool, text: &str) -> String {
    if ok {
        themed(GREEN, &[BOLD], &format!("✓ {}", text))
    } else {
        themed(RED, &[BOLD], &format!("✗ {}", text))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
