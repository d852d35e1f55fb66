//! Validation Report
//!
//! Aggregates a generated batch into the JSON report consumed by the
//! downstream validation team:
//! - VALID / MISMATCH counts
//! - Count per mismatch type
//! - One detail row per applied mutation

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::errors::AppResult;
use crate::models::types::{DataQuality, EktpRecord};

/// One applied mutation, flattened for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedMismatch {
    pub record_id: usize,
    pub nik: String,
    pub name: String,
    pub mismatch_type: String,
    pub details: String,
}

/// Batch-level validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// ISO-8601 local time of generation
    pub generated_timestamp: String,
    pub total_records: usize,
    pub valid_records: usize,
    pub mismatch_records: usize,
    /// Mismatch type -> number of applied mutations
    pub mismatch_types: BTreeMap<String, u64>,
    pub detailed_mismatches: Vec<DetailedMismatch>,
}

impl ValidationReport {
    /// Build the report at the current local time
    pub fn from_records(records: &[EktpRecord]) -> Self {
        Self::at(records, Local::now().naive_local())
    }

    /// Build the report stamped with `generated_at`
    pub fn at(records: &[EktpRecord], generated_at: NaiveDateTime) -> Self {
        let mut mismatch_types = BTreeMap::new();
        let mut detailed_mismatches = Vec::new();
        let mut valid_records = 0;
        let mut mismatch_records = 0;

        for record in records {
            match record.data_quality {
                DataQuality::Valid => {
                    valid_records += 1;
                    continue;
                }
                DataQuality::Mismatch => mismatch_records += 1,
            }

            for mismatch in &record.mismatches {
                let kind = mismatch.mismatch_type.as_str().to_string();
                *mismatch_types.entry(kind.clone()).or_insert(0) += 1;
                detailed_mismatches.push(DetailedMismatch {
                    record_id: record.record_id,
                    nik: record.identity.nik.clone(),
                    name: record.identity.full_name.clone(),
                    mismatch_type: kind,
                    details: mismatch.describe(),
                });
            }
        }

        Self {
            generated_timestamp: generated_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            total_records: records.len(),
            valid_records,
            mismatch_records,
            mismatch_types,
            detailed_mismatches,
        }
    }

    /// Share of MISMATCH records in percent
    pub fn mismatch_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.mismatch_records as f64 / self.total_records as f64 * 100.0
        }
    }

    /// Console summary
    pub fn summary(&self) -> String {
        let mut by_type = String::new();
        for (kind, count) in &self.mismatch_types {
            by_type.push_str(&format!("║      {:<24} {:>8}                     ║\n", kind, count));
        }

        format!(
            r#"
╔══════════════════════════════════════════════════════════╗
║           🪪 e-KTP GENERATION - VALIDATION REPORT         ║
╠══════════════════════════════════════════════════════════╣
║   📊 Total records:          {:>8}                     ║
║   ✅ Valid records:          {:>8}                     ║
║   ⚠️  Mismatch records:       {:>8}                     ║
║   📈 Mismatch rate:          {:>7.1}%                     ║
║   🔍 Mismatches by type:                                 ║
{}╚══════════════════════════════════════════════════════════╝
"#,
            self.total_records,
            self.valid_records,
            self.mismatch_records,
            self.mismatch_rate(),
            by_type,
        )
    }

    /// Pretty JSON
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`, creating parent directories
    pub fn export_json(&self, path: &Path) -> AppResult<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(path.to_path_buf())
    }
}
