//! Type definitions for the e-KTP generator
//! All core data structures for identity records and mismatch annotations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::utils::constants::{
    ANNOTATION_SEPARATOR, CARD_DATE_FORMAT, NO_ANNOTATIONS, VALID_DATA_TOKEN,
};

/// Gender as printed on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "LAKI-LAKI")]
    LakiLaki,
    #[serde(rename = "PEREMPUAN")]
    Perempuan,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::LakiLaki, Gender::Perempuan];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::LakiLaki => "LAKI-LAKI",
            Gender::Perempuan => "PEREMPUAN",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base identity of one synthetic applicant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub full_name: String,
    pub nik: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
}

/// Which field a mismatch touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchType {
    NameMismatch,
    NikMismatch,
    PhoneMismatch,
    BirthDateMismatch,
}

impl MismatchType {
    pub const ALL: [MismatchType; 4] = [
        MismatchType::NameMismatch,
        MismatchType::NikMismatch,
        MismatchType::PhoneMismatch,
        MismatchType::BirthDateMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchType::NameMismatch => "NAME_MISMATCH",
            MismatchType::NikMismatch => "NIK_MISMATCH",
            MismatchType::PhoneMismatch => "PHONE_MISMATCH",
            MismatchType::BirthDateMismatch => "BIRTH_DATE_MISMATCH",
        }
    }
}

impl fmt::Display for MismatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied mutation: what changed, from what, to what
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchAnnotation {
    pub mismatch_type: MismatchType,
    pub original_value: String,
    pub mutated_value: String,
}

impl MismatchAnnotation {
    pub fn new(
        mismatch_type: MismatchType,
        original_value: impl Into<String>,
        mutated_value: impl Into<String>,
    ) -> Self {
        Self {
            mismatch_type,
            original_value: original_value.into(),
            mutated_value: mutated_value.into(),
        }
    }

    /// Human-readable form: `TYPE: 'original' -> 'mutated'`
    pub fn describe(&self) -> String {
        format!(
            "{}: '{}' -> '{}'",
            self.mismatch_type, self.original_value, self.mutated_value
        )
    }
}

impl fmt::Display for MismatchAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Quality tag derived from the annotation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    Valid,
    Mismatch,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Valid => "VALID",
            DataQuality::Mismatch => "MISMATCH",
        }
    }

    /// MISMATCH iff the list is non-empty and is not the lone VALID_DATA token
    pub fn from_annotation_strings(annotations: &[String]) -> Self {
        let only_valid_token = annotations.len() == 1 && annotations[0] == VALID_DATA_TOKEN;
        if annotations.is_empty() || only_valid_token {
            DataQuality::Valid
        } else {
            DataQuality::Mismatch
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input row: column name -> value, as read from the applications CSV
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseRecord {
    fields: HashMap<String, String>,
}

impl BaseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// First non-empty value among `keys`
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for BaseRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Full e-KTP row written to CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EktpRecord {
    pub record_id: usize,
    pub identity: IdentityRecord,
    pub birth_place: String,
    pub blood_type: String,
    pub address: String,
    pub rt_rw: String,
    pub village_kelurahan: String,
    pub district_kecamatan: String,
    pub regency_city: String,
    pub province: String,
    pub religion: String,
    pub marital_status: String,
    pub occupation: String,
    pub nationality: String,
    pub valid_until: String,
    pub issue_date: NaiveDate,
    pub issue_place: String,
    pub data_quality: DataQuality,
    /// Selected by the mismatch gate, even if no field ended up mutated
    pub mismatch_candidate: bool,
    pub annotations: Vec<String>,
    pub mismatches: Vec<MismatchAnnotation>,
    pub created_timestamp: String,
    pub created_by: String,
}

impl EktpRecord {
    /// CSV column order
    pub const CSV_HEADER: [&'static str; 25] = [
        "record_id",
        "nik",
        "full_name",
        "birth_place",
        "birth_date",
        "gender",
        "blood_type",
        "address",
        "rt_rw",
        "village_kelurahan",
        "district_kecamatan",
        "regency_city",
        "province",
        "religion",
        "marital_status",
        "occupation",
        "nationality",
        "valid_until",
        "issue_date",
        "issue_place",
        "phone_number",
        "data_quality",
        "mismatch_annotations",
        "created_timestamp",
        "created_by",
    ];

    /// Annotation list joined for the CSV column
    pub fn annotation_column(&self) -> String {
        if self.annotations.is_empty() {
            NO_ANNOTATIONS.to_string()
        } else {
            self.annotations.join(ANNOTATION_SEPARATOR)
        }
    }

    /// Flatten into string fields, in `CSV_HEADER` order
    pub fn to_csv_fields(&self) -> Vec<String> {
        vec![
            self.record_id.to_string(),
            self.identity.nik.clone(),
            self.identity.full_name.clone(),
            self.birth_place.clone(),
            self.identity.birth_date.format(CARD_DATE_FORMAT).to_string(),
            self.identity.gender.as_str().to_string(),
            self.blood_type.clone(),
            self.address.clone(),
            self.rt_rw.clone(),
            self.village_kelurahan.clone(),
            self.district_kecamatan.clone(),
            self.regency_city.clone(),
            self.province.clone(),
            self.religion.clone(),
            self.marital_status.clone(),
            self.occupation.clone(),
            self.nationality.clone(),
            self.valid_until.clone(),
            self.issue_date.format(CARD_DATE_FORMAT).to_string(),
            self.issue_place.clone(),
            self.identity.phone_number.clone(),
            self.data_quality.as_str().to_string(),
            self.annotation_column(),
            self.created_timestamp.clone(),
            self.created_by.clone(),
        ]
    }

    pub fn is_mismatch(&self) -> bool {
        self.data_quality == DataQuality::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_format() {
        let a = MismatchAnnotation::new(MismatchType::NikMismatch, "3201", "3210");
        assert_eq!(a.describe(), "NIK_MISMATCH: '3201' -> '3210'");
    }

    #[test]
    fn test_data_quality_from_annotations() {
        assert_eq!(DataQuality::from_annotation_strings(&[]), DataQuality::Valid);
        assert_eq!(
            DataQuality::from_annotation_strings(&[VALID_DATA_TOKEN.to_string()]),
            DataQuality::Valid
        );
        assert_eq!(
            DataQuality::from_annotation_strings(&["NAME_MISMATCH: 'a' -> 'b'".to_string()]),
            DataQuality::Mismatch
        );
    }

    #[test]
    fn test_base_record_ignores_blank_values() {
        let base = BaseRecord::new()
            .with("phone_number", "  ")
            .with("phone_primary", "+62 812-1111-2222");
        assert_eq!(base.get("phone_number"), None);
        assert_eq!(
            base.get_any(&["phone_number", "phone_primary"]),
            Some("+62 812-1111-2222")
        );
    }

    #[test]
    fn test_header_and_fields_align() {
        assert_eq!(EktpRecord::CSV_HEADER.len(), 25);
        assert_eq!(EktpRecord::CSV_HEADER[21], "data_quality");
    }

    #[test]
    fn test_gender_serializes_as_card_text() {
        let json = serde_json::to_string(&Gender::LakiLaki).unwrap();
        assert_eq!(json, "\"LAKI-LAKI\"");
    }
}
