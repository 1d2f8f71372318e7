// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Required-verbiage check: statutory phrases, cremation authority, POA
// subtype and California jurisdiction.

use poacheck_core::types::{CheckStatus, PhraseMatch, PoaType, VerbiageCheck, VerbiageDetails};

use crate::patterns::{
    CALIFORNIA_PATTERN, CREMATION_AUTHORITY_PHRASES, DURABLE_PATTERN, NON_DURABLE_PATTERN,
    REQUIRED_PHRASES, line_number_at,
};

pub fn check_verbiage(text: &str) -> VerbiageCheck {
    let lower = text.to_lowercase();
    let mut issues = Vec::new();

    let phrases: Vec<PhraseMatch> = REQUIRED_PHRASES
        .iter()
        .map(|phrase| {
            let line = lower.find(phrase).map(|idx| line_number_at(&lower, idx));
            if line.is_none() {
                issues.push(format!("Missing required phrase: '{}'", phrase));
            }
            PhraseMatch {
                phrase: (*phrase).to_string(),
                found: line.is_some(),
                line,
            }
        })
        .collect();

    let has_cremation_authority = CREMATION_AUTHORITY_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase));
    if !has_cremation_authority {
        issues.push("No cremation authority language found".to_string());
    }

    // Flagged through details and status only; issues stay one per missing
    // phrase plus cremation authority.
    let has_california_marker = CALIFORNIA_PATTERN.is_match(text);

    let status = if !has_cremation_authority {
        CheckStatus::Fail
    } else if !issues.is_empty() || !has_california_marker {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };

    VerbiageCheck {
        status,
        issues,
        details: VerbiageDetails {
            phrases,
            has_cremation_authority,
            poa_type: infer_poa_type(text, &lower),
            has_california_marker,
        },
    }
}

fn infer_poa_type(text: &str, lower: &str) -> PoaType {
    if NON_DURABLE_PATTERN.is_match(text) {
        PoaType::NonDurable
    } else if DURABLE_PATTERN.is_match(text) {
        PoaType::Durable
    } else if lower.contains("power of attorney") {
        PoaType::NonDurable
    } else {
        PoaType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLIANT: &str = "\
STATE OF CALIFORNIA
DURABLE POWER OF ATTORNEY FOR DISPOSITION OF REMAINS

I authorize my agent to arrange the cremation of my remains.
";

    #[test]
    fn compliant_text_passes() {
        let check = check_verbiage(COMPLIANT);
        assert_eq!(check.status, CheckStatus::Pass, "{:?}", check.issues);
        assert!(check.details.has_cremation_authority);
        assert_eq!(check.details.poa_type, PoaType::Durable);
        assert!(check.details.phrases.iter().all(|p| p.found));
    }

    #[test]
    fn records_first_occurrence_line() {
        let check = check_verbiage(COMPLIANT);
        let line_of = |phrase: &str| {
            check
                .details
                .phrases
                .iter()
                .find(|p| p.phrase == phrase)
                .and_then(|p| p.line)
        };
        assert_eq!(line_of("durable power of attorney"), Some(2));
        assert_eq!(line_of("authorize"), Some(4));
        assert_eq!(line_of("cremation"), Some(4));
    }

    #[test]
    fn missing_everything_fails_with_one_issue_per_phrase_plus_cremation() {
        let check = check_verbiage("State of California\nGeneral letter of instruction.");
        assert_eq!(check.status, CheckStatus::Fail);
        assert_eq!(check.issues.len(), REQUIRED_PHRASES.len() + 1);
        assert!(check.issues.contains(&"No cremation authority language found".to_string()));
        assert_eq!(check.details.poa_type, PoaType::Unknown);
    }

    #[test]
    fn missing_everything_without_jurisdiction_still_counts_phrases_plus_cremation() {
        let check = check_verbiage("Letter of instruction to my family.");
        let missing = check.details.phrases.iter().filter(|p| !p.found).count();
        assert_eq!(missing, REQUIRED_PHRASES.len());
        assert_eq!(check.issues.len(), missing + 1);
        assert_eq!(check.status, CheckStatus::Fail);
        assert!(!check.details.has_california_marker);
    }

    #[test]
    fn paraphrased_authority_counts() {
        let text = "California power of attorney. My agent may authorize the final disposition of my body.";
        let check = check_verbiage(text);
        assert!(check.details.has_cremation_authority);
        assert_eq!(check.status, CheckStatus::Warning);
        assert_eq!(check.details.poa_type, PoaType::NonDurable);
    }

    #[test]
    fn non_durable_wins_over_durable() {
        let check = check_verbiage("This is a non-durable power of attorney; it is not durable.");
        assert_eq!(check.details.poa_type, PoaType::NonDurable);
    }

    #[test]
    fn missing_jurisdiction_warns() {
        let text = COMPLIANT.replace("STATE OF CALIFORNIA", "STATE OF NEVADA");
        let check = check_verbiage(&text);
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.issues.is_empty());
        assert!(!check.details.has_california_marker);
    }

    #[test]
    fn probate_code_citation_is_a_marker() {
        let text = COMPLIANT.replace("STATE OF CALIFORNIA", "Pursuant to Cal. Prob. Code § 4000");
        assert!(check_verbiage(&text).details.has_california_marker);
    }
}
