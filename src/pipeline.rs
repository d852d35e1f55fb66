//! Batch pipeline
//! Orchestrates one run: load base rows, generate, save CSV, report, render

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::generator::EktpGenerator;
use crate::models::config::GeneratorConfig;
use crate::models::errors::AppResult;
use crate::models::types::{BaseRecord, EktpRecord};
use crate::render::{render_all, DocumentRenderer, JsonCardRenderer};
use crate::report::ValidationReport;
use crate::utils::csv_io::{read_records, write_rows};
use crate::utils::faker::fallback_base_records;

/// Where the base rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Csv,
    Fallback,
}

/// Everything a run produced
#[derive(Debug)]
pub struct BatchOutcome {
    pub seed: u64,
    pub source: InputSource,
    pub records: Vec<EktpRecord>,
    pub report: ValidationReport,
    /// `None` when the batch was empty and the write was skipped
    pub csv_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub card_paths: Vec<PathBuf>,
}

/// Read the applications CSV; a missing or empty file falls back to
/// synthesized rows drawn from the batch RNG.
pub fn load_base_records(
    config: &GeneratorConfig,
    generator: &mut EktpGenerator,
) -> AppResult<(Vec<BaseRecord>, InputSource)> {
    match read_records(&config.input_csv)? {
        Some(rows) if !rows.is_empty() => {
            info!(
                "📥 Loaded {} base record(s) from {}",
                rows.len(),
                config.input_csv.display()
            );
            Ok((rows, InputSource::Csv))
        }
        found => {
            if found.is_none() {
                warn!(
                    "⚠️  {} not found. Generating e-KTP data without job application reference.",
                    config.input_csv.display()
                );
            } else {
                warn!("⚠️  {} has no data rows", config.input_csv.display());
            }
            info!(
                "🔄 Synthesizing {} sample job application record(s)",
                config.fallback_records
            );
            let rows = fallback_base_records(generator.rng_mut(), config.fallback_records);
            Ok((rows, InputSource::Fallback))
        }
    }
}

/// Write the e-KTP CSV. An empty batch is reported and skipped.
pub fn save_ektp_csv(records: &[EktpRecord], path: &Path) -> AppResult<Option<PathBuf>> {
    if records.is_empty() {
        warn!("❌ No data to save! Skipping {}", path.display());
        return Ok(None);
    }

    let written = write_rows(
        path,
        &EktpRecord::CSV_HEADER,
        records.iter().map(EktpRecord::to_csv_fields),
    )?;

    info!("✅ e-KTP data saved to {}", path.display());
    info!("📊 Generated {} e-KTP records", written);
    Ok(Some(path.to_path_buf()))
}

/// Run one batch with the configured outputs
pub fn run_batch(config: &GeneratorConfig) -> AppResult<BatchOutcome> {
    let renderer = match &config.card_dir {
        Some(dir) => Some(JsonCardRenderer::new(dir, &config.photo_path)?),
        None => None,
    };
    let mut generator = EktpGenerator::new(config)?;
    run_batch_with(config, &mut generator, renderer.as_ref().map(|r| r as &dyn DocumentRenderer))
}

/// Run one batch with an explicit generator and optional renderer
pub fn run_batch_with(
    config: &GeneratorConfig,
    generator: &mut EktpGenerator,
    renderer: Option<&dyn DocumentRenderer>,
) -> AppResult<BatchOutcome> {
    let (bases, source) = load_base_records(config, generator)?;

    info!("🏗️  Generating e-KTP data for {} records...", bases.len());
    info!(
        "⚠️  {:.1}% of records will be mismatch candidates",
        config.mismatch_percentage
    );
    let records = generator.generate_batch(&bases)?;

    let csv_path = save_ektp_csv(&records, &config.output_csv)?;

    let report = ValidationReport::from_records(&records);
    let report_path = report.export_json(&config.report_json)?;
    info!("📋 Validation report saved to {}", report_path.display());

    let card_paths = match renderer {
        Some(r) => render_all(r, &records)?,
        None => Vec::new(),
    };

    Ok(BatchOutcome {
        seed: generator.seed(),
        source,
        records,
        report,
        csv_path,
        report_path,
        card_paths,
    })
}
