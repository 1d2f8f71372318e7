// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Witness check per California Probate Code: enough witnesses, none of them
// an interested party.

use std::collections::HashSet;

use poacheck_core::types::{CheckStatus, ProhibitedWitness, WitnessCheck, WitnessDetails};

use crate::patterns::{
    FIELD_LABEL_PATTERN, LIST_NUMBER_PATTERN, PRESENCE_PATTERN, PROHIBITED_TERM_PATTERN,
    WITNESS_BLOCK_PATTERN, WITNESS_LINE_PATTERN, field_value,
};

pub fn check_witnesses(text: &str, required: usize) -> WitnessCheck {
    let witnesses = collect_witnesses(text);
    let mut issues = Vec::new();
    let mut prohibited = Vec::new();

    for name in &witnesses {
        if let Some(found) = PROHIBITED_TERM_PATTERN.find(name) {
            let term = found.as_str().to_lowercase().replace(' ', "-");
            issues.push(format!(
                "Prohibited witness detected: '{}' contains '{}'",
                name, term
            ));
            prohibited.push(ProhibitedWitness {
                name: name.clone(),
                term,
            });
        }
    }

    let witness_count = witnesses.len();
    let status = if witness_count < required {
        issues.push(format!(
            "Insufficient witnesses: found {}, {} required",
            witness_count, required
        ));
        CheckStatus::Fail
    } else if !issues.is_empty() {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };

    WitnessCheck {
        status,
        issues,
        details: WitnessDetails {
            witnesses,
            witness_count,
            required_count: required,
            prohibited,
        },
    }
}

/// Longest block entry still read as a name rather than prose.
const MAX_NAME_WORDS: usize = 5;

/// Witness names from `Witness:` lines, `Signed in the presence of:` lines
/// and `Witnesses:` blocks, de-duplicated case-insensitively in document
/// order.
///
/// A block runs until a blank line, a labelled field (`Notary Public:`,
/// `Signature of Agent:`, another `Witness:`), or a line of prose.
fn collect_witnesses(text: &str) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = Vec::new();

    for caps in WITNESS_LINE_PATTERN
        .captures_iter(text)
        .chain(PRESENCE_PATTERN.captures_iter(text))
    {
        if let Some(m) = caps.get(1) {
            candidates.push((m.start(), m.as_str()));
        }
    }

    for caps in WITNESS_BLOCK_PATTERN.captures_iter(text) {
        let (Some(header), Some(inline)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        candidates.push((inline.start(), inline.as_str()));

        let Some(body) = text[header.end()..].strip_prefix('\n') else {
            continue;
        };
        let mut offset = header.end() + 1;
        for line in body.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            let entry = line.trim();
            if entry.is_empty()
                || FIELD_LABEL_PATTERN.is_match(entry)
                || entry.split_whitespace().count() > MAX_NAME_WORDS
            {
                break;
            }
            let name = LIST_NUMBER_PATTERN.find(entry).map_or(entry, |m| &entry[m.end()..]);
            candidates.push((line_start, name));
        }
    }

    candidates.sort_by_key(|(offset, _)| *offset);

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|(_, raw)| field_value(raw))
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_witness_meets_default_requirement() {
        let check = check_witnesses("Signed below.\nWitness: Jane Doe\n", 1);
        assert_eq!(check.status, CheckStatus::Pass);
        assert_eq!(check.details.witnesses, vec!["Jane Doe".to_string()]);
        assert_eq!(check.details.witness_count, 1);
    }

    #[test]
    fn agent_as_witness_is_prohibited() {
        let check = check_witnesses("Witness: John Smith, Agent\n", 1);
        assert_eq!(check.status, CheckStatus::Warning);
        assert_eq!(
            check.issues,
            vec!["Prohibited witness detected: 'John Smith, Agent' contains 'agent'".to_string()]
        );
        assert_eq!(check.details.prohibited[0].term, "agent");
    }

    #[test]
    fn attorney_in_fact_term_is_normalised() {
        let check = check_witnesses("Witness: Bob Ray (Attorney in Fact)\n", 1);
        assert_eq!(check.details.prohibited[0].term, "attorney-in-fact");
    }

    #[test]
    fn agency_is_not_agent() {
        let check = check_witnesses("Witness: Ann Lee, Travel Agency Manager\n", 1);
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[test]
    fn no_witnesses_fails() {
        let check = check_witnesses("Principal signature: ______", 1);
        assert_eq!(check.status, CheckStatus::Fail);
        assert!(check.issues[0].starts_with("Insufficient witnesses"));
    }

    #[test]
    fn blank_witness_line_does_not_count() {
        let check = check_witnesses("Witness: ____________________\n", 1);
        assert_eq!(check.details.witness_count, 0);
        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[test]
    fn collects_from_every_label_and_dedupes() {
        let text = "\
Signed in the presence of: Jane Doe
Witnesses:
1. JANE DOE
2) Carlos Ruiz
(3) ______

Witness 2: Priya Patel
";
        let check = check_witnesses(text, 2);
        assert_eq!(
            check.details.witnesses,
            vec!["Jane Doe".to_string(), "Carlos Ruiz".to_string(), "Priya Patel".to_string()]
        );
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[test]
    fn witness_block_stops_at_next_field_label() {
        let text = "Witnesses:\nJane Doe\nSignature of Agent: ____\nNotary Public: Maria Lopez\n";
        let check = check_witnesses(text, 1);
        assert_eq!(check.details.witnesses, vec!["Jane Doe".to_string()]);
        assert!(check.details.prohibited.is_empty());
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[test]
    fn witness_block_stops_at_prose() {
        let text = "\
Witnesses:
Jane Doe
This instrument was acknowledged before me on the date below
Notary Public: Maria Lopez";
        let check = check_witnesses(text, 2);
        assert_eq!(check.details.witness_count, 1);
        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[test]
    fn required_count_is_respected() {
        let check = check_witnesses("Witness: Jane Doe\n", 2);
        assert_eq!(check.status, CheckStatus::Fail);
        assert_eq!(check.details.required_count, 2);
    }
}
