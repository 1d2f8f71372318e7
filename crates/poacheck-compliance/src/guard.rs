// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Panic isolation for rule checks.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use poacheck_core::error::PoaError;
use poacheck_core::types::CheckResult;
use tracing::warn;

/// Run a check, turning a panic into a `fail` result that explains itself.
/// Sibling checks are unaffected.
pub fn run_guarded<D, F>(check: &str, f: F) -> CheckResult<D>
where
    D: Default,
    F: FnOnce() -> CheckResult<D>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let err = PoaError::CheckExecution {
                check: check.to_string(),
                reason: panic_message(payload.as_ref()),
            };
            warn!(check, error = %err, "Check aborted; recording failure");
            CheckResult::failed(err.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
