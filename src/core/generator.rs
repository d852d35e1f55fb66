//! e-KTP batch generator
//!
//! Turns base job-application rows into full e-KTP records: draws the
//! holder's province, birth date and gender, encodes the NIK, runs the
//! mismatch injector, then fills the static and random card attributes.
//! One `ChaCha8Rng` seeded once per batch drives every draw.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::core::injector::{InjectionOutcome, MismatchInjector};
use crate::core::mutators::phone_digits;
use crate::core::nik::generate_nik;
use crate::models::config::GeneratorConfig;
use crate::models::errors::AppResult;
use crate::models::types::{BaseRecord, EktpRecord, IdentityRecord};
use crate::utils::constants::{
    province_name, BLOOD_TYPES, ISSUE_WINDOW_YEARS, MARITAL_STATUSES, MAX_AGE_YEARS, MAX_RT,
    MAX_RW, MIN_AGE_YEARS, NATIONALITY, OCCUPATIONS, PROVINCE_CODES, REGENCIES, RELIGIONS,
    TIMESTAMP_FORMAT, VALID_UNTIL,
};
use crate::utils::faker;

/// Base-record keys read for the phone number, in priority order
const PHONE_KEYS: [&str; 2] = ["phone_number", "phone_primary"];

/// Digit mutators need at least this many digits to operate on
const MIN_PHONE_DIGITS: usize = 2;

pub struct EktpGenerator {
    injector: MismatchInjector,
    rng: ChaCha8Rng,
    seed: u64,
    created_at: NaiveDateTime,
    created_by: String,
}

impl EktpGenerator {
    /// Seed from config, or draw a fresh seed (logged so the run can be replayed)
    pub fn new(config: &GeneratorConfig) -> AppResult<Self> {
        let injector = MismatchInjector::new(config.mismatch_percentage, config.probabilities)?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("🎲 Batch seed: {}", seed);

        Ok(Self {
            injector,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            created_at: Local::now().naive_local(),
            created_by: config.created_by.clone(),
        })
    }

    /// Pin "now" (age window, issue dates, `created_timestamp`)
    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.created_at = now;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.created_at.date()
    }

    /// Mutable access to the batch RNG, for synthesizing fallback input
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Draw the holder identity for one base record.
    ///
    /// Returns the province code alongside, since the card prints the
    /// province matching the NIK prefix.
    pub fn build_identity(
        &mut self,
        base: &BaseRecord,
    ) -> AppResult<(IdentityRecord, &'static str)> {
        let today = self.reference_date();
        let rng = &mut self.rng;

        let province_code = faker::choose(rng, &PROVINCE_CODES);
        let birth_date = faker::date_of_birth(rng, today, MIN_AGE_YEARS, MAX_AGE_YEARS);
        let gender = faker::gender(rng);
        let nik = generate_nik(rng, birth_date, gender, province_code)?;

        let full_name = match base.get("full_name") {
            Some(name) => name.to_string(),
            None => faker::full_name(rng, gender),
        };
        let phone_number = match base.get_any(&PHONE_KEYS) {
            Some(phone) if phone_digits(phone).len() >= MIN_PHONE_DIGITS => phone.to_string(),
            Some(phone) => {
                warn!("⚠️  Unusable phone '{}' in base row, synthesizing one", phone);
                faker::phone_number(rng)
            }
            None => faker::phone_number(rng),
        };

        Ok((
            IdentityRecord {
                full_name,
                nik,
                birth_date,
                gender,
                phone_number,
            },
            province_code,
        ))
    }

    /// Build one full record; `record_id` is 1-based
    pub fn generate_record(&mut self, record_id: usize, base: &BaseRecord) -> AppResult<EktpRecord> {
        let (identity, province_code) = self.build_identity(base)?;
        let outcome = self.injector.inject(&mut self.rng, &identity)?;
        self.assemble(record_id, province_code, outcome)
    }

    fn assemble(
        &mut self,
        record_id: usize,
        province_code: &str,
        outcome: InjectionOutcome,
    ) -> AppResult<EktpRecord> {
        let today = self.reference_date();
        let province = province_name(province_code)?;
        let data_quality = outcome.data_quality();
        let rng = &mut self.rng;

        let rt_rw = format!(
            "{:03}/{:03}",
            rng.gen_range(1..=MAX_RT),
            rng.gen_range(1..=MAX_RW)
        );
        let village = faker::city(rng);
        let district = faker::city(rng);
        let regency = faker::choose(rng, &REGENCIES).to_string();
        let birth_place = faker::city(rng);
        let blood_type = faker::choose(rng, &BLOOD_TYPES).to_string();
        let address = faker::street_address(rng);
        let religion = faker::choose(rng, &RELIGIONS).to_string();
        let marital_status = faker::choose(rng, &MARITAL_STATUSES).to_string();
        let occupation = faker::choose(rng, &OCCUPATIONS).to_string();
        let issue_date = faker::date_between(
            rng,
            faker::years_before(today, ISSUE_WINDOW_YEARS),
            today,
        );

        Ok(EktpRecord {
            record_id,
            identity: outcome.record,
            birth_place,
            blood_type,
            address,
            rt_rw,
            village_kelurahan: village,
            district_kecamatan: district,
            regency_city: regency.clone(),
            province: province.to_string(),
            religion,
            marital_status,
            occupation,
            nationality: NATIONALITY.to_string(),
            valid_until: VALID_UNTIL.to_string(),
            issue_date,
            issue_place: regency,
            data_quality,
            mismatch_candidate: outcome.state.is_candidate(),
            annotations: outcome.annotations,
            mismatches: outcome.mismatches,
            created_timestamp: self.created_at.format(TIMESTAMP_FORMAT).to_string(),
            created_by: self.created_by.clone(),
        })
    }

    /// Generate one record per base row, in order
    pub fn generate_batch(&mut self, bases: &[BaseRecord]) -> AppResult<Vec<EktpRecord>> {
        let mut records = Vec::with_capacity(bases.len());
        for (i, base) in bases.iter().enumerate() {
            let record = self.generate_record(i + 1, base)?;
            debug!(
                "🪪 #{} {} [{}]",
                record.record_id, record.identity.nik, record.data_quality
            );
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nik::NikParts;
    use crate::models::config::MutationProbabilities;
    use crate::models::types::DataQuality;

    fn config(percentage: f64, seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            mismatch_percentage: percentage,
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn bases(n: usize) -> Vec<BaseRecord> {
        (0..n)
            .map(|i| {
                BaseRecord::new()
                    .with("full_name", format!("Budi Santoso {}", i))
                    .with("phone_number", "0812-3456-7890")
            })
            .collect()
    }

    #[test]
    fn test_valid_records_have_consistent_nik() {
        let mut gen = EktpGenerator::new(&config(0.0, 1))
            .unwrap()
            .with_reference_time(noon());
        let records = gen.generate_batch(&bases(100)).unwrap();

        for r in &records {
            assert_eq!(r.data_quality, DataQuality::Valid);
            assert_eq!(r.annotations, vec!["VALID_DATA".to_string()]);
            let parts = NikParts::decode(&r.identity.nik).unwrap();
            assert_eq!(parts.province_name().unwrap(), r.province);
            assert_eq!(parts.gender, r.identity.gender);
            assert!(parts.matches_birth_date(r.identity.birth_date));
            assert_eq!(r.issue_place, r.regency_city);
            assert_eq!(r.created_timestamp, "2026-10-19 12:00:00");
        }
    }

    #[test]
    fn test_base_fields_are_used() {
        let mut gen = EktpGenerator::new(&config(0.0, 2)).unwrap();
        let base = BaseRecord::new()
            .with("full_name", "Ayu Lestari")
            .with("phone_primary", "+62 812-1111-2222");
        let record = gen.generate_record(7, &base).unwrap();
        assert_eq!(record.record_id, 7);
        assert_eq!(record.identity.full_name, "Ayu Lestari");
        assert_eq!(record.identity.phone_number, "+62 812-1111-2222");
    }

    #[test]
    fn test_missing_base_fields_are_synthesized() {
        let mut gen = EktpGenerator::new(&config(0.0, 3)).unwrap();
        let record = gen.generate_record(1, &BaseRecord::new()).unwrap();
        assert!(!record.identity.full_name.is_empty());
        assert!(!record.identity.phone_number.is_empty());
    }

    #[test]
    fn test_digitless_phone_is_replaced() {
        let mut cfg = config(100.0, 0);
        cfg.probabilities = MutationProbabilities {
            name: 0.0,
            nik: 0.0,
            phone: 1.0,
            birth_date: 0.0,
        };
        let bases: Vec<BaseRecord> = ["N/A", "-", "7"]
            .iter()
            .map(|phone| {
                BaseRecord::new()
                    .with("full_name", "Ayu Lestari")
                    .with("phone_number", *phone)
            })
            .collect();

        for seed in 0..20 {
            cfg.seed = Some(seed);
            let mut gen = EktpGenerator::new(&cfg).unwrap();
            let records = gen.generate_batch(&bases).unwrap();
            assert_eq!(records.len(), 3);
            for m in records.iter().flat_map(|r| &r.mismatches) {
                assert!(phone_digits(&m.original_value).len() >= 2);
            }
        }
    }

    #[test]
    fn test_same_seed_same_batch() {
        let run = || {
            EktpGenerator::new(&config(50.0, 99))
                .unwrap()
                .with_reference_time(noon())
                .generate_batch(&bases(40))
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_forced_mismatches() {
        let mut cfg = config(100.0, 4);
        cfg.probabilities = MutationProbabilities::always();
        let mut gen = EktpGenerator::new(&cfg).unwrap();
        let records = gen.generate_batch(&bases(25)).unwrap();
        for r in &records {
            assert!(r.is_mismatch());
            assert!(r.mismatch_candidate);
            assert_eq!(r.mismatches.len(), 4);
        }
    }
}
