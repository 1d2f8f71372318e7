// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// poacheck: Power of Attorney validation from the command line.
//
// Entry point. Initialises logging, loads configuration, wires the pipeline
// and runs the requested subcommand.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use poacheck_app::services::paths;
use poacheck_app::DocumentValidator;
use poacheck_core::config::{PipelineConfig, RegistryConfig};
use poacheck_core::error::PoaError;
use poacheck_core::human_errors::humanize_error;
use poacheck_core::types::{CheckStatus, ValidationResult};
use poacheck_document::{OcrBackend, TesseractBackend, analyze_quality};

#[derive(Debug, Parser)]
#[command(name = "poacheck", version, about = "Validate Power of Attorney documents")]
struct Cli {
    /// Pipeline config (JSON). Defaults to $XDG_CONFIG_HOME/poacheck/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract text from a document and run the compliance checks.
    Validate {
        file: PathBuf,
        #[command(flatten)]
        ocr: OcrArgs,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
        #[arg(long, env = "POACHECK_REGISTRY_URL")]
        registry_url: Option<String>,
        #[arg(long, env = "POACHECK_REGISTRY_TOKEN", hide_env_values = true)]
        registry_token: Option<String>,
    },
    /// Score the scan quality of an image.
    Quality {
        image: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, clap::Args)]
struct OcrArgs {
    /// OCR language (tesseract code, e.g. eng, spa).
    #[arg(long)]
    lang: Option<String>,
    /// Skip image preprocessing before OCR.
    #[arg(long)]
    no_preprocess: bool,
    #[arg(long, value_enum, default_value_t = Engine::Tesseract)]
    engine: Engine,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    Tesseract,
    /// Pure-Rust engine; needs the `ocr` feature and downloaded models.
    Ocrs,
}

impl OcrArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if self.no_preprocess {
            config.ocr.preprocess = false;
        }
    }

    fn backend(&self) -> Result<Arc<dyn OcrBackend>, PoaError> {
        match self.engine {
            Engine::Tesseract => Ok(Arc::new(TesseractBackend::new())),
            #[cfg(feature = "ocr")]
            Engine::Ocrs => Ok(Arc::new(poacheck_document::OcrsBackend::with_defaults()?)),
            #[cfg(not(feature = "ocr"))]
            Engine::Ocrs => Err(PoaError::Ocr(
                "ocrs engine not compiled in (rebuild with --features ocr)".into(),
            )),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            tracing::debug!(error = %err, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), PoaError> {
    let mut config = paths::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Validate {
            file,
            ocr,
            json,
            registry_url,
            registry_token,
        } => {
            ocr.apply(&mut config);
            if let Some(url) = registry_url {
                let timeout_secs = config.registry.as_ref().map_or(5, |r| r.timeout_secs);
                config.registry = Some(RegistryConfig {
                    url,
                    token: registry_token,
                    timeout_secs,
                });
            }

            let validator = DocumentValidator::from_config(&config, ocr.backend()?)?;
            let (data, filename) = read_upload(&file)?;
            let result = validator
                .validate(&data, &filename)
                .await
                .map_err(|failure| failure.0)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
        Command::Quality { image, json } => {
            let data = std::fs::read(&image)?;
            let analysis = analyze_quality(&data)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                let r = analysis.resolution;
                println!("Quality score: {}/100", analysis.overall_score);
                println!(
                    "Resolution:    {}x{} ({:.1} MP, ~{} dpi)",
                    r.width, r.height, r.megapixels, r.dpi
                );
                println!(
                    "Sharpness {:.2}  Brightness {:.2}  Contrast {:.2}",
                    analysis.sharpness, analysis.brightness, analysis.contrast
                );
                for rec in &analysis.recommendations {
                    println!("  - {rec}");
                }
            }
        }
    }
    Ok(())
}

fn read_upload(path: &Path) -> Result<(Vec<u8>, String), PoaError> {
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((data, filename))
}

fn print_summary(result: &ValidationResult) {
    println!(
        "Overall: {:?}  (text via {}, confidence {:.0}%, {} ms)",
        result.overall, result.source_strategy, result.ocr_confidence, result.processing_time_ms
    );
    let rows = [
        ("Notary", result.notary.status, &result.notary.issues),
        ("Witness", result.witness.status, &result.witness.issues),
        ("Verbiage", result.verbiage.status, &result.verbiage.issues),
        ("Date", result.additional_checks.date.status, &result.additional_checks.date.issues),
        (
            "Signature",
            result.additional_checks.signature.status,
            &result.additional_checks.signature.issues,
        ),
    ];
    for (name, status, issues) in rows {
        println!("  {:<10} {}", name, status_label(status));
        for issue in issues {
            println!("      - {issue}");
        }
    }
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Warning => "WARNING",
        CheckStatus::Fail => "FAIL",
        CheckStatus::NotChecked => "NOT CHECKED",
    }
}
