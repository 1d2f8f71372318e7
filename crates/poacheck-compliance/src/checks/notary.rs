// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notary acknowledgment check: notary name, commission number, and an
// unexpired commission, optionally confirmed against a state registry.

use chrono::NaiveDate;
use poacheck_core::error::PoaError;
use poacheck_core::types::{CheckStatus, NotaryCheck, NotaryDetails, RegistryVerification};
use regex::Regex;

use crate::patterns::{
    COMMISSION_EXPIRES_PATTERN, COMMISSION_NUMBER_PATTERN, NOTARY_NAME_PATTERN, field_value,
    parse_date,
};

/// Read the notary block. `today` decides whether the commission has lapsed.
pub fn check_notary(text: &str, today: NaiveDate) -> NotaryCheck {
    let mut issues = Vec::new();

    let notary_name = labelled(&NOTARY_NAME_PATTERN, text);
    if notary_name.is_none() {
        issues.push("Notary name not found".to_string());
    }

    let commission_number = labelled(&COMMISSION_NUMBER_PATTERN, text);
    if commission_number.is_none() {
        issues.push("Commission number not found".to_string());
    }

    let commission_expiry = labelled(&COMMISSION_EXPIRES_PATTERN, text);
    let expiry_date = commission_expiry.as_deref().and_then(parse_date);
    match (&commission_expiry, expiry_date) {
        (None, _) => issues.push("Commission expiration date not found".to_string()),
        (Some(raw), None) => {
            issues.push(format!("Commission expiration date could not be read: '{}'", raw))
        }
        (Some(raw), Some(expiry)) if expiry < today => {
            issues.push(format!("Notary commission has expired ({})", raw))
        }
        _ => {}
    }

    NotaryCheck {
        status: notary_status(issues.len()),
        issues,
        details: NotaryDetails {
            notary_name,
            commission_number,
            commission_expiry,
            expiry_date,
            is_valid: None,
            verification: RegistryVerification::NotConfigured,
        },
    }
}

/// More than two issues fail the check; one or two warn.
pub fn notary_status(issue_count: usize) -> CheckStatus {
    match issue_count {
        0 => CheckStatus::Pass,
        1 | 2 => CheckStatus::Warning,
        _ => CheckStatus::Fail,
    }
}

/// Fold a registry answer into the check. Lookup failures only lower
/// confidence; they never fail the check on their own.
pub fn apply_registry_verdict(check: &mut NotaryCheck, verdict: Result<bool, PoaError>) {
    match verdict {
        Ok(true) => {
            check.details.is_valid = Some(true);
            check.details.verification = RegistryVerification::Verified;
        }
        Ok(false) => {
            check.details.is_valid = Some(false);
            check.details.verification = RegistryVerification::Rejected;
            check
                .issues
                .push("Notary commission is not valid according to the state registry".to_string());
        }
        Err(err) => {
            check.details.verification = RegistryVerification::Unavailable;
            check.issues.push(format!(
                "Notary registry lookup unavailable ({}); manual verification recommended",
                err
            ));
        }
    }
    check.status = notary_status(check.issues.len());
}

fn labelled(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures_iter(text)
        .find_map(|caps| caps.get(1).and_then(|m| field_value(m.as_str())))
}
