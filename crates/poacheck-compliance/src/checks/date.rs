// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Execution date check. Advisory only: never fails.

use chrono::NaiveDate;
use poacheck_core::types::{CheckStatus, DateCheck, DateDetails};

use crate::patterns::{EXECUTION_DATE_PATTERN, parse_date};

/// The first labelled date is the document date.
pub fn check_date(text: &str, today: NaiveDate) -> DateCheck {
    let dates_found: Vec<String> = EXECUTION_DATE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .collect();

    let document_date = dates_found.first().cloned();
    let parsed_date = document_date.as_deref().and_then(parse_date);

    let mut issues = Vec::new();
    match (&document_date, parsed_date) {
        (None, _) => issues.push("No execution date found".to_string()),
        (Some(raw), None) => issues.push(format!("Execution date could not be read: '{}'", raw)),
        (Some(raw), Some(date)) if date > today => {
            issues.push(format!("Execution date is in the future ({})", raw))
        }
        _ => {}
    }

    DateCheck {
        status: if issues.is_empty() {
            CheckStatus::Pass
        } else {
            CheckStatus::Warning
        },
        issues,
        details: DateDetails {
            dates_found,
            document_date,
            parsed_date,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn first_labelled_date_wins() {
        let text = "Dated: 01/15/2025\nExecuted on February 2, 2025\nCommission expires: 2030-01-01";
        let check = check_date(text, today());
        assert_eq!(check.status, CheckStatus::Pass);
        assert_eq!(check.details.dates_found.len(), 2);
        assert_eq!(check.details.document_date.as_deref(), Some("01/15/2025"));
        assert_eq!(check.details.parsed_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn missing_date_warns() {
        let check = check_date("No dates anywhere", today());
        assert_eq!(check.status, CheckStatus::Warning);
        assert_eq!(check.issues, vec!["No execution date found".to_string()]);
    }

    #[test]
    fn future_date_warns_never_fails() {
        let check = check_date("Signed this 4th day of July, 2031", today());
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.issues[0].contains("future"));
    }

    #[test]
    fn unlabelled_dates_are_ignored() {
        let check = check_date("Born March 3, 1950", today());
        assert!(check.details.dates_found.is_empty());
    }
}
