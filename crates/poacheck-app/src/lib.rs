// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// poacheck-app: Validation orchestrator for uploaded Power of Attorney
// documents. The `poacheck` binary is a thin CLI over this library.

pub mod services;

pub use services::{DocumentValidator, UploadInspection, ValidationFailure, inspect_upload};
