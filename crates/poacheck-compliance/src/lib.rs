// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// poacheck-compliance: Rule checks over extracted Power of Attorney text.
//
// Five independent checks (notary, witness, verbiage, date, signature), each
// producing a status and issue list, plus an optional state notary registry
// lookup that refines the notary verdict.

pub mod checks;
pub mod guard;
pub mod patterns;
pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use poacheck_core::config::{ComplianceSettings, PipelineConfig};
use poacheck_core::error::PoaError;
use poacheck_core::types::{
    AdditionalChecks, CheckStatus, DateCheck, NotaryCheck, OverallStatus, SignatureCheck,
    VerbiageCheck, WitnessCheck,
};
use tracing::{debug, info, instrument, warn};

pub use guard::run_guarded;
pub use registry::{HttpNotaryRegistry, NotaryRegistry};

/// Every check's verdict for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceReport {
    pub notary: NotaryCheck,
    pub witness: WitnessCheck,
    pub verbiage: VerbiageCheck,
    pub date: DateCheck,
    pub signature: SignatureCheck,
}

impl ComplianceReport {
    /// Overall verdict from the primary checks only; date and signature are
    /// advisory.
    pub fn overall(&self) -> OverallStatus {
        OverallStatus::from_primary(&self.primary_statuses())
    }

    pub fn primary_statuses(&self) -> [CheckStatus; 3] {
        [self.notary.status, self.witness.status, self.verbiage.status]
    }

    pub fn additional_checks(&self) -> AdditionalChecks {
        AdditionalChecks {
            date: self.date.clone(),
            signature: self.signature.clone(),
        }
    }
}

/// Runs the checks with shared settings and an optional registry.
pub struct ComplianceEngine {
    settings: ComplianceSettings,
    registry: Option<Arc<dyn NotaryRegistry>>,
    registry_timeout: Duration,
}

impl ComplianceEngine {
    pub fn new(settings: ComplianceSettings) -> Self {
        Self {
            settings,
            registry: None,
            registry_timeout: Duration::from_secs(5),
        }
    }

    /// Engine with an HTTP registry client if one is configured.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PoaError> {
        let engine = Self::new(config.compliance.clone());
        match &config.registry {
            Some(registry) => Ok(engine.with_registry(
                Arc::new(HttpNotaryRegistry::new(registry)?),
                Duration::from_secs(registry.timeout_secs),
            )),
            None => Ok(engine),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn NotaryRegistry>, timeout: Duration) -> Self {
        self.registry = Some(registry);
        self.registry_timeout = timeout;
        self
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    /// Run all five checks. A panic inside one check fails only that check.
    ///
    /// `today` anchors the commission-expiry and future-date comparisons so
    /// identical text always yields identical results.
    pub fn run_checks(&self, text: &str, today: NaiveDate) -> ComplianceReport {
        let report = ComplianceReport {
            notary: run_guarded("notary", || checks::check_notary(text, today)),
            witness: run_guarded("witness", || {
                checks::check_witnesses(text, self.settings.required_witnesses)
            }),
            verbiage: run_guarded("verbiage", || checks::check_verbiage(text)),
            date: run_guarded("date", || checks::check_date(text, today)),
            signature: run_guarded("signature", || checks::check_signatures(text)),
        };
        debug!(
            notary = ?report.notary.status,
            witness = ?report.witness.status,
            verbiage = ?report.verbiage.status,
            date = ?report.date.status,
            signature = ?report.signature.status,
            "Checks complete"
        );
        report
    }

    /// [`run_checks`](Self::run_checks), then confirm the notary against the
    /// registry if one is configured.
    #[instrument(skip_all, fields(chars = text.len(), registry = self.has_registry()))]
    pub async fn validate(&self, text: &str, today: NaiveDate) -> ComplianceReport {
        let mut report = self.run_checks(text, today);
        self.verify_notary(&mut report.notary).await;
        info!(overall = ?report.overall(), "Compliance validation complete");
        report
    }

    async fn verify_notary(&self, check: &mut NotaryCheck) {
        let Some(registry) = &self.registry else {
            return;
        };

        let (Some(name), Some(number)) = (
            check.details.notary_name.clone(),
            check.details.commission_number.clone(),
        ) else {
            checks::apply_registry_verdict(
                check,
                Err(PoaError::ExternalLookup(
                    "notary name or commission number missing".into(),
                )),
            );
            return;
        };

        let lookup = registry.verify(&number, &name);
        let verdict = match tokio::time::timeout(self.registry_timeout, lookup).await {
            Ok(verdict) => verdict,
            Err(_) => Err(PoaError::Timeout(format!(
                "registry lookup exceeded {}s",
                self.registry_timeout.as_secs()
            ))),
        };
        if let Err(err) = &verdict {
            warn!(error = %err, "Notary registry lookup failed");
        }
        checks::apply_registry_verdict(check, verdict);
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(ComplianceSettings::default())
    }
}
