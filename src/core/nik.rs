//! NIK (Nomor Induk Kependudukan) encoding
//!
//! Format: PPKKSSDDMMYYXXXX
//! - PP   province code (must exist in the province table)
//! - KK   regency / city code
//! - SS   subdistrict code
//! - DD   birth day, +40 for PEREMPUAN
//! - MM   birth month
//! - YY   last two digits of the birth year
//! - XXXX sequence number

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Gender;
use crate::utils::constants::{is_known_province, province_name, FEMALE_DAY_OFFSET, NIK_LENGTH};

/// Build a NIK for the given holder. Fails on an unknown province code.
pub fn generate_nik<R: Rng + ?Sized>(
    rng: &mut R,
    birth_date: NaiveDate,
    gender: Gender,
    province_code: &str,
) -> AppResult<String> {
    if !is_known_province(province_code) {
        return Err(AppError::invalid_reference("province", province_code));
    }

    let regency: u32 = rng.gen_range(1..=99);
    let subdistrict: u32 = rng.gen_range(1..=99);
    let sequence: u32 = rng.gen_range(1..=9999);

    let mut day = birth_date.day();
    if gender == Gender::Perempuan {
        day += FEMALE_DAY_OFFSET;
    }

    Ok(format!(
        "{}{:02}{:02}{:02}{:02}{:02}{:04}",
        province_code,
        regency,
        subdistrict,
        day,
        birth_date.month(),
        birth_date.year().rem_euclid(100),
        sequence
    ))
}

/// Exactly 16 ASCII digits with a known province prefix
pub fn validate_nik(nik: &str) -> AppResult<()> {
    if nik.len() != NIK_LENGTH || !nik.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_nik(nik));
    }
    if !is_known_province(&nik[..2]) {
        return Err(AppError::invalid_reference("province", &nik[..2]));
    }
    Ok(())
}

#[inline]
pub fn is_valid_nik(nik: &str) -> bool {
    validate_nik(nik).is_ok()
}

/// Decoded NIK fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NikParts {
    pub province_code: String,
    pub regency_code: String,
    pub subdistrict_code: String,
    pub birth_day: u32,
    pub birth_month: u32,
    pub birth_year_suffix: u32,
    pub gender: Gender,
    pub sequence: String,
}

impl NikParts {
    pub fn decode(nik: &str) -> AppResult<Self> {
        validate_nik(nik)?;

        let num = |range: std::ops::Range<usize>| -> u32 {
            nik[range].bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        };

        let encoded_day = num(6..8);
        let (birth_day, gender) = if encoded_day > FEMALE_DAY_OFFSET {
            (encoded_day - FEMALE_DAY_OFFSET, Gender::Perempuan)
        } else {
            (encoded_day, Gender::LakiLaki)
        };

        Ok(Self {
            province_code: nik[0..2].to_string(),
            regency_code: nik[2..4].to_string(),
            subdistrict_code: nik[4..6].to_string(),
            birth_day,
            birth_month: num(8..10),
            birth_year_suffix: num(10..12),
            gender,
            sequence: nik[12..16].to_string(),
        })
    }

    pub fn province_name(&self) -> AppResult<&'static str> {
        province_name(&self.province_code)
    }

    /// Whether the embedded birth data matches `date`
    pub fn matches_birth_date(&self, date: NaiveDate) -> bool {
        self.birth_day == date.day()
            && self.birth_month == date.month()
            && self.birth_year_suffix == date.year().rem_euclid(100) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_and_decode_female() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let birth = NaiveDate::from_ymd_opt(1992, 7, 9).unwrap();
        let nik = generate_nik(&mut rng, birth, Gender::Perempuan, "35").unwrap();

        assert_eq!(nik.len(), 16);
        assert_eq!(&nik[6..12], "490792");

        let parts = NikParts::decode(&nik).unwrap();
        assert_eq!(parts.gender, Gender::Perempuan);
        assert_eq!(parts.birth_day, 9);
        assert!(parts.matches_birth_date(birth));
        assert_eq!(parts.province_name().unwrap(), "JAWA TIMUR");
    }

    #[test]
    fn test_generate_male_keeps_day() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let birth = NaiveDate::from_ymd_opt(2001, 12, 31).unwrap();
        let nik = generate_nik(&mut rng, birth, Gender::LakiLaki, "11").unwrap();
        assert_eq!(&nik[6..12], "311201");
        assert_eq!(NikParts::decode(&nik).unwrap().gender, Gender::LakiLaki);
    }

    #[test]
    fn test_unknown_province_fails_fast() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let birth = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let err = generate_nik(&mut rng, birth, Gender::LakiLaki, "99").unwrap_err();
        assert_eq!(err.code_str(), "REF_INVALID_CODE");
    }

    #[test]
    fn test_validate_nik() {
        assert!(is_valid_nik("3201011503990001"));
        assert!(!is_valid_nik("320101150399000"));
        assert!(!is_valid_nik("32010115039900011"));
        assert!(!is_valid_nik("32010115039900a1"));
        assert_eq!(
            validate_nik("9901011503990001").unwrap_err().code_str(),
            "REF_INVALID_CODE"
        );
    }
}
