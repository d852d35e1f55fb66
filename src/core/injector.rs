//! Mismatch Injection Engine
//!
//! Per record:
//! 1. Gate: uniform draw against the batch mismatch rate.
//! 2. Candidates get one independent draw per field (name, NIK, phone,
//!    birth date, in that order); each hit runs that field's mutator.
//! 3. Every applied mutation is annotated. Non-candidates carry the single
//!    `VALID_DATA` token.
//!
//! All randomness comes from the RNG passed in, so a batch seeded once is
//! fully reproducible.

use rand::Rng;
use tracing::debug;

use crate::core::mutators::{mutate_birth_date, mutate_name, mutate_nik, mutate_phone};
use crate::models::config::MutationProbabilities;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{DataQuality, IdentityRecord, MismatchAnnotation, MismatchType};
use crate::utils::constants::{CARD_DATE_FORMAT, VALID_DATA_TOKEN};

/// Terminal state of one record after injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionState {
    /// Not selected by the gate
    NotCandidate,
    /// Selected, but every per-field draw missed
    CandidateUnchanged,
    /// At least one field mutated
    Mismatch,
}

impl InjectionState {
    pub fn data_quality(&self) -> DataQuality {
        match self {
            InjectionState::Mismatch => DataQuality::Mismatch,
            InjectionState::NotCandidate | InjectionState::CandidateUnchanged => DataQuality::Valid,
        }
    }

    pub fn is_candidate(&self) -> bool {
        !matches!(self, InjectionState::NotCandidate)
    }
}

/// Result of running one identity through the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionOutcome {
    pub original: IdentityRecord,
    pub record: IdentityRecord,
    pub state: InjectionState,
    pub mismatches: Vec<MismatchAnnotation>,
    /// Annotation strings as written to CSV
    pub annotations: Vec<String>,
}

impl InjectionOutcome {
    /// Derived from the annotation list, not from the gate outcome
    pub fn data_quality(&self) -> DataQuality {
        DataQuality::from_annotation_strings(&self.annotations)
    }

    pub fn has(&self, mismatch_type: MismatchType) -> bool {
        self.mismatches.iter().any(|m| m.mismatch_type == mismatch_type)
    }
}

/// Decides and applies per-record field corruption
#[derive(Debug, Clone)]
pub struct MismatchInjector {
    mismatch_rate: f64,
    probabilities: MutationProbabilities,
}

impl MismatchInjector {
    /// `mismatch_percentage` in 0..=100
    pub fn new(mismatch_percentage: f64, probabilities: MutationProbabilities) -> AppResult<Self> {
        if !(0.0..=100.0).contains(&mismatch_percentage) {
            return Err(AppError::invalid_config(
                "mismatch_percentage",
                format!("{} outside [0, 100]", mismatch_percentage),
            ));
        }
        probabilities.validate()?;
        Ok(Self {
            mismatch_rate: mismatch_percentage / 100.0,
            probabilities,
        })
    }

    /// Mismatch decision gate
    pub fn is_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.mismatch_rate
    }

    /// Gate the record, then run the per-field pass if selected
    pub fn inject<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        identity: &IdentityRecord,
    ) -> AppResult<InjectionOutcome> {
        if !self.is_candidate(rng) {
            return Ok(InjectionOutcome {
                original: identity.clone(),
                record: identity.clone(),
                state: InjectionState::NotCandidate,
                mismatches: Vec::new(),
                annotations: vec![VALID_DATA_TOKEN.to_string()],
            });
        }
        self.mutate_fields(rng, identity)
    }

    /// Per-field mutation pass for a record already selected as candidate
    pub fn mutate_fields<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        identity: &IdentityRecord,
    ) -> AppResult<InjectionOutcome> {
        let mut record = identity.clone();
        let mut mismatches = Vec::new();
        let p = self.probabilities;

        if rng.gen::<f64>() < p.name {
            record.full_name = mutate_name(rng, &identity.full_name);
            mismatches.push(MismatchAnnotation::new(
                MismatchType::NameMismatch,
                &identity.full_name,
                &record.full_name,
            ));
        }

        if rng.gen::<f64>() < p.nik {
            record.nik = mutate_nik(rng, &identity.nik)?;
            mismatches.push(MismatchAnnotation::new(
                MismatchType::NikMismatch,
                &identity.nik,
                &record.nik,
            ));
        }

        if rng.gen::<f64>() < p.phone {
            record.phone_number = mutate_phone(rng, &identity.phone_number)?;
            mismatches.push(MismatchAnnotation::new(
                MismatchType::PhoneMismatch,
                &identity.phone_number,
                &record.phone_number,
            ));
        }

        if rng.gen::<f64>() < p.birth_date {
            record.birth_date = mutate_birth_date(rng, identity.birth_date)?;
            mismatches.push(MismatchAnnotation::new(
                MismatchType::BirthDateMismatch,
                identity.birth_date.format(CARD_DATE_FORMAT).to_string(),
                record.birth_date.format(CARD_DATE_FORMAT).to_string(),
            ));
        }

        let state = if mismatches.is_empty() {
            InjectionState::CandidateUnchanged
        } else {
            InjectionState::Mismatch
        };
        debug!(
            "🎲 Candidate '{}' -> {} mutation(s)",
            identity.full_name,
            mismatches.len()
        );

        let annotations = mismatches.iter().map(MismatchAnnotation::describe).collect();
        Ok(InjectionOutcome {
            original: identity.clone(),
            record,
            state,
            mismatches,
            annotations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn identity() -> IdentityRecord {
        IdentityRecord {
            full_name: "Siti Nur Rahmawati".to_string(),
            nik: "3201015503990001".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1999, 3, 15).unwrap(),
            gender: crate::models::types::Gender::Perempuan,
            phone_number: "0812-3456-7890".to_string(),
        }
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let injector = MismatchInjector::new(0.0, MutationProbabilities::always()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1_000 {
            let outcome = injector.inject(&mut rng, &identity()).unwrap();
            assert_eq!(outcome.state, InjectionState::NotCandidate);
            assert_eq!(outcome.annotations, vec!["VALID_DATA".to_string()]);
            assert_eq!(outcome.data_quality(), DataQuality::Valid);
            assert_eq!(outcome.record, identity());
        }
    }

    #[test]
    fn test_full_rate_all_fields() {
        let injector = MismatchInjector::new(100.0, MutationProbabilities::always()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let outcome = injector.inject(&mut rng, &identity()).unwrap();
            assert_eq!(outcome.state, InjectionState::Mismatch);
            for kind in MismatchType::ALL {
                assert!(outcome.has(kind), "missing {}", kind);
            }
            assert_eq!(outcome.annotations.len(), 4);
            assert_eq!(outcome.data_quality(), DataQuality::Mismatch);
        }
    }

    #[test]
    fn test_candidate_without_hits_is_valid() {
        let injector = MismatchInjector::new(100.0, MutationProbabilities::uniform(0.0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = injector.inject(&mut rng, &identity()).unwrap();
        assert_eq!(outcome.state, InjectionState::CandidateUnchanged);
        assert!(outcome.state.is_candidate());
        assert!(outcome.annotations.is_empty());
        assert_eq!(outcome.data_quality(), DataQuality::Valid);
        assert_eq!(outcome.state.data_quality(), outcome.data_quality());
    }

    #[test]
    fn test_annotation_text_uses_original_and_mutated() {
        let injector = MismatchInjector::new(100.0, MutationProbabilities::always()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let outcome = injector.inject(&mut rng, &identity()).unwrap();
        let birth = outcome
            .annotations
            .iter()
            .find(|a| a.starts_with("BIRTH_DATE_MISMATCH"))
            .unwrap();
        assert!(birth.starts_with("BIRTH_DATE_MISMATCH: '15-03-1999' -> '"));
        assert_eq!(outcome.original, identity());
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let injector = MismatchInjector::new(60.0, MutationProbabilities::default()).unwrap();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50)
                .map(|_| injector.inject(&mut rng, &identity()).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_candidate_share_tracks_percentage() {
        let injector = MismatchInjector::new(30.0, MutationProbabilities::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let draws = 10_000;
        let candidates = (0..draws).filter(|_| injector.is_candidate(&mut rng)).count();
        let share = candidates as f64 / draws as f64;
        assert!((share - 0.30).abs() < 0.02, "candidate share {}", share);
    }

    #[test]
    fn test_field_hit_rates_track_probabilities() {
        let injector = MismatchInjector::new(100.0, MutationProbabilities::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draws = 10_000;
        let mut hits = [0usize; 4];
        for _ in 0..draws {
            let outcome = injector.inject(&mut rng, &identity()).unwrap();
            assert!(outcome.state.is_candidate());
            for (i, kind) in MismatchType::ALL.iter().enumerate() {
                if outcome.has(*kind) {
                    hits[i] += 1;
                }
            }
        }

        let expected = [
            (MismatchType::NameMismatch, 0.40),
            (MismatchType::NikMismatch, 0.30),
            (MismatchType::PhoneMismatch, 0.25),
            (MismatchType::BirthDateMismatch, 0.20),
        ];
        for (kind, p) in expected {
            let i = MismatchType::ALL.iter().position(|k| *k == kind).unwrap();
            let rate = hits[i] as f64 / draws as f64;
            assert!((rate - p).abs() < 0.02, "{} hit rate {}", kind, rate);
        }
    }

    #[test]
    fn test_rejects_bad_percentage() {
        assert!(MismatchInjector::new(-1.0, MutationProbabilities::default()).is_err());
        assert!(MismatchInjector::new(100.5, MutationProbabilities::default()).is_err());
    }
}
