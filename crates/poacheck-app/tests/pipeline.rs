// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end pipeline tests: upload bytes in, `ValidationResult` out, with
// fake OCR and page rendering so no external tools are needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use image::{DynamicImage, GrayImage, Luma};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use poacheck_app::{DocumentValidator, inspect_upload};
use poacheck_compliance::ComplianceEngine;
use poacheck_core::config::{ExtractionSettings, OcrSettings, PreprocessOptions};
use poacheck_core::error::PoaError;
use poacheck_core::types::{CheckStatus, ExtractionStrategy, OverallStatus, PoaType};
use poacheck_document::{ImageProcessor, OcrBackend, OcrCache, OcrOutput, PageRenderer, TextExtractor};

// -- Fakes --------------------------------------------------------------------

struct FakeOcr {
    text: String,
    confidence: Option<f32>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeOcr {
    fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.into(),
            confidence: Some(82.0),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            text: "eventually".into(),
            confidence: None,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrBackend for FakeOcr {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, _image: &[u8], _settings: &OcrSettings) -> Result<OcrOutput, PoaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(OcrOutput {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

struct BlankPageRenderer;

impl PageRenderer for BlankPageRenderer {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn render_first_page(&self, _pdf: &[u8], _dpi: u32, _max_dim: u32) -> Result<Vec<u8>, PoaError> {
        Ok(scan_png())
    }
}

// -- Fixtures -----------------------------------------------------------------

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

const COMPLIANT: &str = "\
STATE OF CALIFORNIA
DURABLE POWER OF ATTORNEY FOR DISPOSITION OF REMAINS
I, Robert Green, authorize my agent to arrange the cremation of my remains.
Dated: 05/01/2025
Signature of Principal: Robert Green
Witness: Jane Doe
This instrument was notarized before me.
Notary Public: Maria Lopez
Commission Number: 2345678
My commission expires: March 15, 2030";

fn validator(ocr: Arc<FakeOcr>) -> DocumentValidator {
    let extractor = TextExtractor::new(
        ocr,
        Arc::new(BlankPageRenderer),
        Arc::new(OcrCache::new(100)),
        ExtractionSettings::default(),
        PreprocessOptions::default(),
    );
    DocumentValidator::new(
        Arc::new(extractor),
        Arc::new(ComplianceEngine::default()),
        OcrSettings::default(),
    )
}

fn scan_png() -> Vec<u8> {
    let img = GrayImage::from_fn(120, 160, |x, y| {
        Luma([if (y / 10) % 2 == 0 && x % 12 < 9 { 30 } else { 230 }])
    });
    ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
        .to_png_bytes()
        .unwrap()
}

fn text_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (i, line) in text.lines().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![40.into(), (800 - 14 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

// -- Scenarios ----------------------------------------------------------------

#[tokio::test]
async fn compliant_pdf_passes_without_ocr() {
    let ocr = FakeOcr::returning("unused");
    let result = validator(ocr.clone())
        .validate_with(&text_pdf(COMPLIANT), "poa.pdf", &OcrSettings::default(), today())
        .await
        .unwrap();

    assert_eq!(ocr.calls(), 0);
    assert_eq!(result.source_strategy, ExtractionStrategy::DirectPdf);
    assert_eq!(result.ocr_confidence, 95.0);
    assert_eq!(result.notary.status, CheckStatus::Pass, "{:?}", result.notary.issues);
    assert_eq!(result.witness.status, CheckStatus::Pass, "{:?}", result.witness.issues);
    assert_eq!(result.verbiage.status, CheckStatus::Pass, "{:?}", result.verbiage.issues);
    assert_eq!(result.verbiage.details.poa_type, PoaType::Durable);
    assert!(result.verbiage.details.has_cremation_authority);
    assert_eq!(result.overall, OverallStatus::Pass);
}

#[tokio::test]
async fn expired_commission_is_reported() {
    let text = COMPLIANT.replace("March 15, 2030", "March 15, 2021");
    let result = validator(FakeOcr::returning(&text))
        .validate_with(&scan_png(), "scan.png", &OcrSettings::default(), today())
        .await
        .unwrap();

    assert!(result.notary.issues.iter().any(|i| i.contains("commission has expired")));
    assert_ne!(result.notary.status, CheckStatus::Pass);
    assert_eq!(result.overall, OverallStatus::Warning);
    assert_eq!(result.source_strategy, ExtractionStrategy::ImageOcr);
    assert_eq!(result.ocr_confidence, 82.0);
}

#[tokio::test]
async fn agent_as_witness_is_flagged() {
    let text = COMPLIANT.replace("Witness: Jane Doe", "Witness: John Smith, Agent");
    let result = validator(FakeOcr::returning(&text))
        .validate_with(&scan_png(), "scan.jpg", &OcrSettings::default(), today())
        .await
        .unwrap();

    assert!(
        result
            .witness
            .issues
            .iter()
            .any(|i| i.starts_with("Prohibited witness detected") && i.contains("contains 'agent'"))
    );
    assert!(matches!(result.witness.status, CheckStatus::Warning | CheckStatus::Fail));
    assert_ne!(result.overall, OverallStatus::Pass);
}

#[tokio::test]
async fn blank_scan_fails_before_checks() {
    let failure = validator(FakeOcr::returning("   \n  "))
        .validate_with(&scan_png(), "blank.png", &OcrSettings::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(failure.reason(), PoaError::NoTextExtracted));
    assert!(failure.reason().is_fatal());
}

#[tokio::test]
async fn missing_verbiage_fails_overall() {
    let text = "Letter of instruction to my family.\nWitness: Jane Doe";
    let result = validator(FakeOcr::returning(text))
        .validate_with(&scan_png(), "letter.png", &OcrSettings::default(), today())
        .await
        .unwrap();

    assert_eq!(result.verbiage.status, CheckStatus::Fail);
    let missing = result.verbiage.details.phrases.iter().filter(|p| !p.found).count();
    assert_eq!(result.verbiage.issues.len(), missing + 1);
    assert_eq!(result.overall, OverallStatus::Fail);
}

// -- Pipeline contracts -------------------------------------------------------

#[tokio::test]
async fn unsupported_upload_is_rejected() {
    let ocr = FakeOcr::returning("text");
    let failure = validator(ocr.clone())
        .validate_with(b"PK\x03\x04", "poa.docx", &OcrSettings::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(failure.reason(), PoaError::UnsupportedFormat(_)));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn scanned_pdf_uses_page_ocr() {
    let ocr = FakeOcr::returning(COMPLIANT);
    let result = validator(ocr.clone())
        .validate_with(&text_pdf(""), "scan.pdf", &OcrSettings::default(), today())
        .await
        .unwrap();
    assert_eq!(result.source_strategy, ExtractionStrategy::PdfOcr);
    assert_eq!(result.overall, OverallStatus::Pass);
    assert_eq!(ocr.calls(), 1);
}

#[tokio::test]
async fn repeated_upload_reuses_ocr_result() {
    let ocr = FakeOcr::returning(COMPLIANT);
    let validator = validator(ocr.clone());
    let scan = scan_png();

    let first = validator
        .validate_with(&scan, "a.png", &OcrSettings::default(), today())
        .await
        .unwrap();
    let second = validator
        .validate_with(&scan, "a.png", &OcrSettings::default(), today())
        .await
        .unwrap();

    assert_eq!(ocr.calls(), 1);
    assert_eq!(first.notary, second.notary);
    assert_eq!(first.overall, second.overall);
}

#[tokio::test]
async fn slow_ocr_times_out_without_caching_the_late_result() {
    let settings = OcrSettings {
        timeout_secs: 1,
        ..Default::default()
    };
    let ocr = FakeOcr::slow(Duration::from_secs(2));
    let validator = validator(ocr.clone());
    let failure = validator
        .validate_with(&scan_png(), "slow.png", &settings, today())
        .await
        .unwrap_err();
    assert!(matches!(failure.reason(), PoaError::Timeout(_)));

    // Let the abandoned recognition finish on the blocking pool.
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(ocr.calls(), 1);
    assert!(validator.extractor().cache().is_empty());
}

#[tokio::test]
async fn processing_time_is_stamped() {
    let result = validator(FakeOcr::returning(COMPLIANT))
        .validate(&scan_png(), "scan.png")
        .await
        .unwrap();
    assert!(result.processing_time_ms < 60_000);
    assert!(!result.extracted_text.is_empty());
}

// -- Inspection ---------------------------------------------------------------

#[tokio::test]
async fn inspection_runs_every_branch() {
    let validator = validator(FakeOcr::returning(
        "Verify this commission at https://notary.sos.ca.gov/verify",
    ));
    let inspection = inspect_upload(&validator, &scan_png(), "scan.png", &OcrSettings::default()).await;

    assert!(inspection.quality.is_some());
    assert!(inspection.text.is_some());
    assert_eq!(
        inspection.links,
        Some(vec!["https://notary.sos.ca.gov/verify".to_string()])
    );
}

#[tokio::test]
async fn inspection_degrades_per_branch() {
    let validator = validator(FakeOcr::returning("   "));
    let inspection = inspect_upload(&validator, b"garbage", "broken.png", &OcrSettings::default()).await;

    assert!(inspection.quality.is_none());
    assert!(inspection.text.is_none());
    assert!(inspection.links.is_none());
}
