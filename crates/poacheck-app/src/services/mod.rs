// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: the validation orchestrator, upload inspection, and config
// file resolution.

pub mod inspect;
pub mod paths;
pub mod validator;

pub use inspect::{UploadInspection, detect_links, inspect_upload};
pub use validator::{DocumentValidator, ValidationFailure};
