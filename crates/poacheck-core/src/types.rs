// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the poacheck validation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// -- Input formats ------------------------------------------------------------

/// Upload formats the extraction engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    Bmp,
    Webp,
}

impl DocumentFormat {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Infer the format from the extension of an uploaded filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

// -- Extraction ---------------------------------------------------------------

/// Which strategy produced a piece of extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Text layer embedded in the PDF.
    DirectPdf,
    /// OCR over a rendered PDF page.
    PdfOcr,
    /// OCR over an uploaded image.
    ImageOcr,
}

impl ExtractionStrategy {
    /// Confidence assigned when the strategy itself reports none.
    pub fn default_confidence(&self) -> f32 {
        match self {
            Self::DirectPdf => 95.0,
            Self::PdfOcr => 75.0,
            Self::ImageOcr => 50.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectPdf => "direct_pdf",
            Self::PdfOcr => "pdf_ocr",
            Self::ImageOcr => "image_ocr",
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text pulled out of an upload, with a reliability estimate (0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub confidence: f32,
    pub source_strategy: ExtractionStrategy,
}

impl ExtractedText {
    /// Build a result, falling back to the strategy's default confidence
    /// when the engine reported none. Confidence is clamped to 0–100.
    pub fn new(text: String, confidence: Option<f32>, source_strategy: ExtractionStrategy) -> Self {
        let confidence = confidence
            .unwrap_or_else(|| source_strategy.default_confidence())
            .clamp(0.0, 100.0);
        Self {
            text,
            confidence,
            source_strategy,
        }
    }
}

// -- Image quality ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub megapixels: f64,
    pub dpi: u32,
}

/// Advisory quality report for a raster image. Heuristic, not calibrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    pub resolution: Resolution,
    /// 0..1, intensity variance used as an edge-energy proxy.
    pub sharpness: f64,
    /// 0..1, mean intensity.
    pub brightness: f64,
    /// 0..1, intensity standard deviation relative to half range.
    pub contrast: f64,
    /// 0..100.
    pub overall_score: u8,
    pub recommendations: Vec<String>,
}

// -- Compliance checks --------------------------------------------------------

/// Verdict of a single rule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
    NotChecked,
}

/// Result of one rule category: a status, the issues that drove it, and
/// category-specific details flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult<D> {
    pub status: CheckStatus,
    pub issues: Vec<String>,
    #[serde(flatten)]
    pub details: D,
}

impl<D: Default> CheckResult<D> {
    /// A failed result carrying a single explanatory issue and empty details.
    pub fn failed(issue: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            issues: vec![issue.into()],
            details: D::default(),
        }
    }

    pub fn not_checked() -> Self {
        Self {
            status: CheckStatus::NotChecked,
            issues: Vec::new(),
            details: D::default(),
        }
    }
}

/// Outcome of the optional state-registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryVerification {
    /// No registry endpoint configured.
    #[default]
    NotConfigured,
    /// Registry confirmed the commission.
    Verified,
    /// Registry answered that the commission is not valid.
    Rejected,
    /// Registry configured but the lookup failed or timed out.
    Unavailable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotaryDetails {
    pub notary_name: Option<String>,
    pub commission_number: Option<String>,
    /// Expiry date as written in the document.
    pub commission_expiry: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    /// Set only by a registry answer.
    pub is_valid: Option<bool>,
    pub verification: RegistryVerification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProhibitedWitness {
    pub name: String,
    /// The disqualifying relationship term that matched.
    pub term: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WitnessDetails {
    pub witnesses: Vec<String>,
    pub witness_count: usize,
    pub required_count: usize,
    pub prohibited: Vec<ProhibitedWitness>,
}

/// Whether a required phrase appears, and on which line (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMatch {
    pub phrase: String,
    pub found: bool,
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoaType {
    Durable,
    NonDurable,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerbiageDetails {
    pub phrases: Vec<PhraseMatch>,
    pub has_cremation_authority: bool,
    pub poa_type: PoaType,
    pub has_california_marker: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateDetails {
    /// Every labelled date found, in document order.
    pub dates_found: Vec<String>,
    pub document_date: Option<String>,
    pub parsed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDetails {
    pub principal_signature: bool,
    pub agent_signature: bool,
}

pub type NotaryCheck = CheckResult<NotaryDetails>;
pub type WitnessCheck = CheckResult<WitnessDetails>;
pub type VerbiageCheck = CheckResult<VerbiageDetails>;
pub type DateCheck = CheckResult<DateDetails>;
pub type SignatureCheck = CheckResult<SignatureDetails>;

// -- Aggregate ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    Warning,
    Fail,
}

impl OverallStatus {
    /// Combine the primary check statuses (notary, witness, verbiage).
    ///
    /// Any `fail` wins, then any `warning`; all `pass` is a pass. Anything
    /// else, such as a check that never ran, is a warning.
    pub fn from_primary(statuses: &[CheckStatus]) -> Self {
        if statuses.contains(&CheckStatus::Fail) {
            Self::Fail
        } else if statuses.contains(&CheckStatus::Warning) {
            Self::Warning
        } else if !statuses.is_empty() && statuses.iter().all(|s| *s == CheckStatus::Pass) {
            Self::Pass
        } else {
            Self::Warning
        }
    }
}

/// Advisory checks that inform issues but never move the overall verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalChecks {
    pub date: DateCheck,
    pub signature: SignatureCheck,
}

/// Final outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub notary: NotaryCheck,
    pub witness: WitnessCheck,
    pub verbiage: VerbiageCheck,
    pub additional_checks: AdditionalChecks,
    pub overall: OverallStatus,
    pub extracted_text: String,
    pub ocr_confidence: f32,
    pub source_strategy: ExtractionStrategy,
    pub processing_time_ms: u64,
}

impl ValidationResult {
    /// Every issue raised by every check, prefixed with its category.
    pub fn all_issues(&self) -> Vec<String> {
        let groups: [(&str, &[String]); 5] = [
            ("notary", &self.notary.issues),
            ("witness", &self.witness.issues),
            ("verbiage", &self.verbiage.issues),
            ("date", &self.additional_checks.date.issues),
            ("signature", &self.additional_checks.signature.issues),
        ];
        groups
            .iter()
            .flat_map(|(name, issues)| issues.iter().map(move |i| format!("{name}: {i}")))
            .collect()
    }
}
