// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature check. Only the principal's signature is required.

use poacheck_core::types::{CheckStatus, SignatureCheck, SignatureDetails};

use crate::patterns::{AGENT_SIGNATURE_PATTERN, PRINCIPAL_SIGNATURE_PATTERN};

pub fn check_signatures(text: &str) -> SignatureCheck {
    let details = SignatureDetails {
        principal_signature: PRINCIPAL_SIGNATURE_PATTERN.is_match(text),
        agent_signature: AGENT_SIGNATURE_PATTERN.is_match(text),
    };

    let mut issues = Vec::new();
    if !details.principal_signature {
        issues.push("Principal signature not detected".to_string());
    }

    SignatureCheck {
        status: if issues.is_empty() {
            CheckStatus::Pass
        } else {
            CheckStatus::Warning
        },
        issues,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_only_passes() {
        let check = check_signatures("Signature of Principal: __________");
        assert_eq!(check.status, CheckStatus::Pass);
        assert!(check.details.principal_signature);
        assert!(!check.details.agent_signature);
    }

    #[test]
    fn agent_only_warns() {
        let check = check_signatures("Agent's Signature: __________");
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.details.agent_signature);
        assert_eq!(check.issues, vec!["Principal signature not detected".to_string()]);
    }
}
