//! Post-processing: deterministic cleanup of raw tesseract output.
//!
//! ## Why is post-processing necessary?
//!
//! Tesseract's stdout is close to, but not quite, clean text:
//!
//! - A form-feed character (`\x0c`) terminates every page's output
//! - Line endings follow the host platform (`\r\n` on Windows)
//! - Lines frequently end in stray spaces where word boxes were merged
//! - Empty regions of a page come out as runs of blank lines
//!
//! This module applies cheap, deterministic rules that fix engine quirks
//! without touching content. Each rule is independently testable.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: normalise line endings before
//! trimming so `\r` doesn't mask trailing spaces, and collapse blank lines
//! before the final-newline pass.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to raw tesseract output.
///
/// Runs the cleanup passes in a defined order. Each pass is a pure function
/// (`&str → String`) with no shared state, making the pipeline easy to
/// extend or re-order without side effects.
///
/// Rules (applied in order):
/// 1. Remove form-feed page terminators
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Ensure the text ends with exactly one newline
pub fn clean_ocr_text(input: &str) -> String {
    let s = remove_form_feeds(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Remove form-feed page terminators ────────────────────────────────

fn remove_form_feeds(input: &str) -> String {
    input.replace('\u{c}', "")
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 5: Ensure text ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}
