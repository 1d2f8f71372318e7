// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Regex patterns and phrase lists for Power of Attorney boilerplate, plus the
// small text helpers the checks share.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

/// Month names and abbreviations accepted in written dates.
const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Phrases every cremation-authority POA must contain.
pub const REQUIRED_PHRASES: &[&str] = &[
    "power of attorney",
    "cremation",
    "disposition of remains",
    "authorize",
    "durable power of attorney",
];

/// Broader OR-group for cremation authority; catches paraphrased grants.
pub const CREMATION_AUTHORITY_PHRASES: &[&str] = &[
    "cremat",
    "disposition of remains",
    "final disposition",
    "dispose of my remains",
];

/// Relationships that disqualify a witness under the California Probate Code.
pub const PROHIBITED_WITNESS_TERMS: &[&str] = &[
    "agent",
    "attorney-in-fact",
    "spouse",
    "heir",
    "beneficiary",
];

lazy_static! {
    /// Any date in one of the accepted written forms.
    pub static ref DATE_PATTERN: Regex = Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}/\d{{1,2}}/\d{{2,4}}|\d{{4}}-\d{{1,2}}-\d{{1,2}}|(?:{m})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:day\s+of\s+)?(?:{m}),?\s+\d{{4}})\b",
        m = MONTHS
    ))
    .unwrap();

    // -- Notary ----------------------------------------------------------------

    pub static ref NOTARY_NAME_PATTERN: Regex =
        Regex::new(r"(?im)notary\s+public\s*:[ \t]*([^\n]*)").unwrap();

    pub static ref COMMISSION_NUMBER_PATTERN: Regex =
        Regex::new(r"(?im)commission\s+(?:number|no\.?|#)\s*:[ \t]*#?([A-Z0-9][A-Z0-9-]*)").unwrap();

    pub static ref COMMISSION_EXPIRES_PATTERN: Regex =
        Regex::new(r"(?im)commission\s+expires\s*:[ \t]*([^\n]*)").unwrap();

    // -- Witness ---------------------------------------------------------------

    /// `Witness: name`, also `Witness 1: name` and `Witness #2: name`.
    pub static ref WITNESS_LINE_PATTERN: Regex =
        Regex::new(r"(?im)^[ \t]*witness(?:[ \t]*#?\d+)?[ \t]*:[ \t]*([^\n]*)$").unwrap();

    pub static ref PRESENCE_PATTERN: Regex =
        Regex::new(r"(?im)signed\s+in\s+the\s+presence\s+of\s*:[ \t]*([^\n]*)").unwrap();

    /// Header of a `Witnesses:` block; names may follow on the same line.
    pub static ref WITNESS_BLOCK_PATTERN: Regex =
        Regex::new(r"(?im)^[ \t]*witnesses[ \t]*:[ \t]*([^\n]*)$").unwrap();

    /// A labelled field such as `Notary Public:` or `Signature of Agent:`.
    /// List numbering is not a label.
    pub static ref FIELD_LABEL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z .'#0-9-]{0,40}:").unwrap();

    /// Leading list numbering such as `1.`, `2)` or `(3)`.
    pub static ref LIST_NUMBER_PATTERN: Regex =
        Regex::new(r"^\(?\d+[.)]\s*").unwrap();

    pub static ref PROHIBITED_TERM_PATTERN: Regex =
        Regex::new(r"(?i)\b(agent|attorney[- ]in[- ]fact|spouse|heir|beneficiary)\b").unwrap();

    // -- Verbiage --------------------------------------------------------------

    pub static ref NON_DURABLE_PATTERN: Regex =
        Regex::new(r"(?i)\bnon-?\s?durable\b").unwrap();

    pub static ref DURABLE_PATTERN: Regex =
        Regex::new(r"(?i)\bdurable\b").unwrap();

    pub static ref CALIFORNIA_PATTERN: Regex =
        Regex::new(r"(?i)\b(california|calif\.|cal\.\s*prob)").unwrap();

    // -- Date ------------------------------------------------------------------

    /// `Dated:`, `Executed on`, `Signed this` and friends, followed by a date.
    pub static ref EXECUTION_DATE_PATTERN: Regex = Regex::new(&format!(
        r"(?i)\b(?:dated|executed|signed)(?:\s+(?:on|this))?\s*:?\s*({})",
        DATE_PATTERN.as_str().trim_start_matches("(?i)")
    ))
    .unwrap();

    static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(?i)(\d)(st|nd|rd|th)\b").unwrap();

    static ref DAY_OF: Regex = Regex::new(r"(?i)\bday\s+of\b").unwrap();

    // -- Signature -------------------------------------------------------------

    pub static ref PRINCIPAL_SIGNATURE_PATTERN: Regex = Regex::new(
        r"(?i)(principal'?s?\s+signature|signature\s+of\s+(?:the\s+)?principal|signed\s+by\s+(?:the\s+)?principal|principal\s*:\s*_{3,})"
    )
    .unwrap();

    pub static ref AGENT_SIGNATURE_PATTERN: Regex = Regex::new(
        r"(?i)(agent'?s?\s+signature|signature\s+of\s+(?:the\s+)?agent|signed\s+by\s+(?:the\s+)?agent|agent\s*:\s*_{3,}|attorney-in-fact\s+signature)"
    )
    .unwrap();
}

/// 1-based line number of a byte offset: newlines before it, plus one.
pub fn line_number_at(text: &str, byte_index: usize) -> usize {
    let end = byte_index.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Trimmed label value, or `None` if it is empty or a blank fill-in line.
pub fn field_value(raw: &str) -> Option<String> {
    let value = raw.trim().trim_end_matches('_').trim();
    if value.is_empty() || value.chars().all(|c| c == '_' || c == '-' || c.is_whitespace()) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a written date in any of the forms [`DATE_PATTERN`] accepts.
///
/// Numeric dates are read month-first (US convention).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let found = DATE_PATTERN.find(raw)?.as_str();

    let cleaned = ORDINAL_SUFFIX.replace_all(found, "$1");
    let cleaned = DAY_OF.replace_all(&cleaned, " ");
    let cleaned = cleaned.replace([',', '.'], " ");
    let cleaned = cleaned
        .split_whitespace()
        .map(|word| if word.eq_ignore_ascii_case("sept") { "sep" } else { word })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.contains('/') {
        let two_digit_year = cleaned.rsplit('/').next().is_some_and(|y| y.len() == 2);
        let format = if two_digit_year { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(&cleaned, format).ok();
    }

    ["%Y-%m-%d", "%B %d %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
}
