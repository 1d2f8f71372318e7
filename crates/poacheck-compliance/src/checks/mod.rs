// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The five rule checks. Each is a pure function of the document text.

pub mod date;
pub mod notary;
pub mod signature;
pub mod verbiage;
pub mod witness;

pub use date::check_date;
pub use notary::{apply_registry_verdict, check_notary};
pub use signature::check_signatures;
pub use verbiage::check_verbiage;
pub use witness::check_witnesses;
