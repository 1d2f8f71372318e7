// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the poacheck-compliance crate: all five checks
// over a representative two-page POA.

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use poacheck_compliance::ComplianceEngine;

const DOCUMENT: &str = "\
STATE OF CALIFORNIA
DURABLE POWER OF ATTORNEY FOR DISPOSITION OF REMAINS
(California Probate Code Section 4000 et seq.)

I, Robert Green, residing in Sacramento County, hereby appoint my daughter,
Emily Green, as my agent. I authorize my agent to make all arrangements for
the cremation of my remains and the final disposition of my ashes. This
power of attorney shall not be affected by my subsequent incapacity.

Dated: 05/01/2025
Signature of Principal: Robert Green

Signed in the presence of: Jane Doe
Witnesses:
1. Jane Doe
2. Carlos Ruiz

CERTIFICATE OF ACKNOWLEDGMENT OF NOTARY PUBLIC
On May 1, 2025 before me, the undersigned, personally appeared Robert Green.
Notary Public: Maria Lopez
Commission Number: 2345678
My commission expires: March 15, 2030
";

fn bench_run_checks(c: &mut Criterion) {
    let engine = ComplianceEngine::default();
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
    c.bench_function("run_checks (two-page POA)", |b| {
        b.iter(|| black_box(engine.run_checks(black_box(DOCUMENT), today)));
    });
}

criterion_group!(benches, bench_run_checks);
criterion_main!(benches);
