//! # Roman Numeral Codec Module
//!
//! ## Purpose
//! Parses the naming conventions embedded in the source document's labels:
//! `TITULO <roman>` headings, `Capitulo <n>` headings and `articulo-<n>` keys.
//! Also resolves caller-supplied Title identifiers, which may use Arabic or
//! Roman numerals interchangeably.
//!
//! ## Input/Output Specification
//! - **Input**: Free-form label strings from the source document or from URLs
//! - **Output**: `Option<u32>` numeric keys; `None` means "no recognizable number"
//! - **Leniency**: Non-canonical Roman numerals (e.g. `IIII`) are accepted and
//!   produce their arithmetic value
//!
//! ## Key Features
//! - Accent-tolerant, case-insensitive matching (`TÍTULO` / `TITULO`)
//! - Right-to-left subtractive accumulation for Roman numerals
//! - Dual-mode identifier resolution (Arabic first, Roman fallback)

use once_cell::sync::Lazy;
use regex::Regex;

static TITULO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)T[ÍI]TULO\s+([IVXLCDM]+)").expect("valid titulo regex"));

static CAPITULO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cap[íi]tulo\s+(\d+)").expect("valid capitulo regex"));

static ARTICULO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"articulo-(\d+)").expect("valid articulo regex"));

/// Value of a single Roman digit; unknown characters count as zero, which
/// keeps the codec lenient instead of rejecting the whole numeral.
fn digit_value(ch: char) -> i64 {
    match ch {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

/// Convert a Roman numeral to its arithmetic value.
///
/// Digits are processed right-to-left: a digit smaller than the previous one
/// is subtracted, otherwise added. Non-canonical input is not rejected; the
/// accumulation result is returned as-is when positive.
fn roman_to_int(roman: &str) -> Option<u32> {
    let mut total: i64 = 0;
    let mut prev: i64 = 0;
    for ch in roman.chars().rev() {
        let val = digit_value(ch.to_ascii_uppercase());
        if val < prev {
            total -= val;
        } else {
            total += val;
        }
        prev = val;
    }
    if total > 0 {
        Some(total as u32)
    } else {
        None
    }
}

/// Extract the Title number from a label containing `TITULO <roman>`.
///
/// Matching is case-insensitive and tolerates the accented `TÍTULO` form.
/// Returns `None` when no match is found or the numeral is not positive.
pub fn extract_title_number(label: &str) -> Option<u32> {
    let captures = TITULO_RE.captures(label)?;
    roman_to_int(captures.get(1)?.as_str())
}

/// Extract the Chapter number from a label containing `Capitulo <digits>`.
pub fn extract_chapter_number(label: &str) -> Option<u32> {
    let captures = CAPITULO_RE.captures(label)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Extract the Article number from a key containing an `articulo-<digits>`
/// token. Keys not matching this shape are silently skipped by callers.
pub fn extract_article_number(key: &str) -> Option<u32> {
    let captures = ARTICULO_RE.captures(key)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Resolve a caller-supplied Title identifier to a Title number.
///
/// Arabic numerals are tried first; anything else is treated as a Roman
/// numeral by prefixing it into a synthetic `TITULO <id>` label. Total
/// failure falls back to 0, which simply misses in the by-number map and
/// produces a not-found outcome upstream.
pub fn resolve_title_number(identifier: &str) -> u32 {
    let identifier = identifier.trim();
    if let Ok(numero) = identifier.parse::<u32>() {
        return numero;
    }
    extract_title_number(&format!("TITULO {}", identifier)).unwrap_or(0)
}
