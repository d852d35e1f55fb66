//! Configuration module for the e-KTP generator
//!
//! Nilai default diambil dari utils/constants.rs, lalu di-override lewat
//! environment variable `EKTP_*`.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    BIRTH_DATE_MISMATCH_PROBABILITY, DEFAULT_CREATED_BY, DEFAULT_FALLBACK_RECORDS,
    DEFAULT_INPUT_CSV, DEFAULT_MISMATCH_PERCENTAGE, DEFAULT_OUTPUT_CSV, DEFAULT_PHOTO_PATH,
    DEFAULT_REPORT_JSON, NAME_MISMATCH_PROBABILITY, NIK_MISMATCH_PROBABILITY,
    PHONE_MISMATCH_PROBABILITY,
};

/// Per-field activation probabilities applied to mismatch candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationProbabilities {
    pub name: f64,
    pub nik: f64,
    pub phone: f64,
    pub birth_date: f64,
}

impl Default for MutationProbabilities {
    fn default() -> Self {
        Self {
            name: NAME_MISMATCH_PROBABILITY,
            nik: NIK_MISMATCH_PROBABILITY,
            phone: PHONE_MISMATCH_PROBABILITY,
            birth_date: BIRTH_DATE_MISMATCH_PROBABILITY,
        }
    }
}

impl MutationProbabilities {
    /// Every field fires on every candidate
    pub fn always() -> Self {
        Self::uniform(1.0)
    }

    pub fn uniform(p: f64) -> Self {
        Self {
            name: p,
            nik: p,
            phone: p,
            birth_date: p,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        for (key, p) in [
            ("name", self.name),
            ("nik", self.nik),
            ("phone", self.phone),
            ("birth_date", self.birth_date),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(AppError::invalid_config(
                    key,
                    format!("activation probability {} outside [0, 1]", p),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Job-application CSV used as base records
    pub input_csv: PathBuf,
    /// Destination of the e-KTP CSV
    pub output_csv: PathBuf,
    /// Destination of the validation report
    pub report_json: PathBuf,
    /// Card payload directory; `None` skips card rendering
    pub card_dir: Option<PathBuf>,
    /// Photo referenced by every card payload
    pub photo_path: PathBuf,
    /// Share of records selected as mismatch candidates (0-100)
    pub mismatch_percentage: f64,
    /// Per-field activation probabilities
    pub probabilities: MutationProbabilities,
    /// Batch seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Records synthesized when the input CSV is missing
    pub fallback_records: usize,
    /// `created_by` stamp
    pub created_by: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from(DEFAULT_INPUT_CSV),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            report_json: PathBuf::from(DEFAULT_REPORT_JSON),
            card_dir: None,
            photo_path: PathBuf::from(DEFAULT_PHOTO_PATH),
            mismatch_percentage: DEFAULT_MISMATCH_PERCENTAGE,
            probabilities: MutationProbabilities::default(),
            seed: None,
            fallback_records: DEFAULT_FALLBACK_RECORDS,
            created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Build from `EKTP_*` environment variables on top of the defaults
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("EKTP_INPUT_CSV") {
            config.input_csv = PathBuf::from(v);
        }
        if let Some(v) = get("EKTP_OUTPUT_CSV") {
            config.output_csv = PathBuf::from(v);
        }
        if let Some(v) = get("EKTP_REPORT_JSON") {
            config.report_json = PathBuf::from(v);
        }
        if let Some(v) = get("EKTP_CARD_DIR") {
            config.card_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("EKTP_PHOTO_PATH") {
            config.photo_path = PathBuf::from(v);
        }
        if let Some(v) = get("EKTP_MISMATCH_PERCENTAGE") {
            config.mismatch_percentage = parse_value("EKTP_MISMATCH_PERCENTAGE", &v)?;
        }
        if let Some(v) = get("EKTP_SEED") {
            config.seed = Some(parse_value("EKTP_SEED", &v)?);
        }
        if let Some(v) = get("EKTP_FALLBACK_RECORDS") {
            config.fallback_records = parse_value("EKTP_FALLBACK_RECORDS", &v)?;
        }
        if let Some(v) = get("EKTP_CREATED_BY") {
            config.created_by = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=100.0).contains(&self.mismatch_percentage) {
            return Err(AppError::invalid_config(
                "mismatch_percentage",
                format!("{} outside [0, 100]", self.mismatch_percentage),
            ));
        }
        self.probabilities.validate()
    }

    pub fn log_summary(&self) {
        info!("📥 Input CSV:        {}", self.input_csv.display());
        info!("📄 Output CSV:       {}", self.output_csv.display());
        info!("📋 Report JSON:      {}", self.report_json.display());
        match &self.card_dir {
            Some(dir) => info!("🪪 Card payloads:    {}", dir.display()),
            None => info!("🪪 Card payloads:    disabled"),
        }
        info!("⚠️  Mismatch rate:    {:.1}%", self.mismatch_percentage);
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::invalid_config(key, format!("cannot parse '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mismatch_percentage, 30.0);
        assert_eq!(config.fallback_records, 50);
        assert_eq!(config.probabilities.name, 0.40);
        assert_eq!(config.probabilities.birth_date, 0.20);
        assert!(config.seed.is_none());
        assert!(config.card_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            ("EKTP_MISMATCH_PERCENTAGE", "75"),
            ("EKTP_SEED", "42"),
            ("EKTP_CARD_DIR", "cards"),
        ]))
        .unwrap();
        assert_eq!(config.mismatch_percentage, 75.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.card_dir, Some(PathBuf::from("cards")));
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        let err = GeneratorConfig::from_lookup(lookup(&[("EKTP_MISMATCH_PERCENTAGE", "120")]))
            .unwrap_err();
        assert_eq!(err.code_str(), "CFG_INVALID_VALUE");
    }

    #[test]
    fn test_rejects_unparsable_seed() {
        assert!(GeneratorConfig::from_lookup(lookup(&[("EKTP_SEED", "abc")])).is_err());
    }

    #[test]
    fn test_probability_validation() {
        assert!(MutationProbabilities::always().validate().is_ok());
        assert!(MutationProbabilities::uniform(1.5).validate().is_err());
    }
}
