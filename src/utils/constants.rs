//! Constants Module - Single Source of Truth
//!
//! Semua tabel referensi (provinsi, agama, pekerjaan, nama) dan konstanta
//! format yang digunakan di seluruh aplikasi didefinisikan di sini.
//! Tidak ada hardcoded values di modul lain!

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::errors::{AppError, AppResult};

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "EktpForge";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `created_by` stamp on generated records
pub const DEFAULT_CREATED_BY: &str = "diwahsap";

// ============================================
// FILE DEFAULTS
// ============================================

pub const DEFAULT_INPUT_CSV: &str = "indonesian_job_applications.csv";
pub const DEFAULT_OUTPUT_CSV: &str = "indonesian_ektp_data.csv";
pub const DEFAULT_REPORT_JSON: &str = "validation_report.json";
pub const DEFAULT_PHOTO_PATH: &str = "src/assets/images.jpg";

/// Records synthesized when the input CSV is missing
pub const DEFAULT_FALLBACK_RECORDS: usize = 50;

/// Default share of records selected as mismatch candidates (percent)
pub const DEFAULT_MISMATCH_PERCENTAGE: f64 = 30.0;

// ============================================
// MISMATCH ACTIVATION PROBABILITIES
// ============================================

pub const NAME_MISMATCH_PROBABILITY: f64 = 0.40;
pub const NIK_MISMATCH_PROBABILITY: f64 = 0.30;
pub const PHONE_MISMATCH_PROBABILITY: f64 = 0.25;
pub const BIRTH_DATE_MISMATCH_PROBABILITY: f64 = 0.20;

// ============================================
// RECORD FORMAT CONSTANTS
// ============================================

/// Length of a well-formed NIK
pub const NIK_LENGTH: usize = 16;

/// Day offset encoding a female holder in the NIK
pub const FEMALE_DAY_OFFSET: u32 = 40;

/// Date format printed on the card and in CSV
pub const CARD_DATE_FORMAT: &str = "%d-%m-%Y";

/// `created_timestamp` column format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NATIONALITY: &str = "WNI";
pub const VALID_UNTIL: &str = "SEUMUR HIDUP";

/// Token recorded for records never selected as mismatch candidates
pub const VALID_DATA_TOKEN: &str = "VALID_DATA";

/// Written to `mismatch_annotations` when the list is empty
pub const NO_ANNOTATIONS: &str = "NONE";

/// Separator for the joined annotation column
pub const ANNOTATION_SEPARATOR: &str = "; ";

/// Applicant age range
pub const MIN_AGE_YEARS: i32 = 18;
pub const MAX_AGE_YEARS: i32 = 65;

/// Issue date lies within this many years before the reference date
pub const ISSUE_WINDOW_YEARS: i32 = 10;

/// RT / RW upper bounds for `rt_rw`
pub const MAX_RT: u32 = 20;
pub const MAX_RW: u32 = 15;

// ============================================
// PROVINCES - Single Source of Truth
// ============================================

/// Province codes in NIK order (first two digits)
pub const PROVINCE_CODES: [&str; 34] = [
    "11", "12", "13", "14", "15", "16", "17", "18", "19", "21", "31", "32", "33", "34", "35",
    "36", "51", "52", "53", "61", "62", "63", "64", "65", "71", "72", "73", "74", "75", "76",
    "81", "82", "91", "94",
];

lazy_static! {
    /// Province code -> province name as printed on the card
    pub static ref PROVINCES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("11", "ACEH");
        m.insert("12", "SUMATERA UTARA");
        m.insert("13", "SUMATERA BARAT");
        m.insert("14", "RIAU");
        m.insert("15", "JAMBI");
        m.insert("16", "SUMATERA SELATAN");
        m.insert("17", "BENGKULU");
        m.insert("18", "LAMPUNG");
        m.insert("19", "KEPULAUAN BANGKA BELITUNG");
        m.insert("21", "KEPULAUAN RIAU");
        m.insert("31", "DKI JAKARTA");
        m.insert("32", "JAWA BARAT");
        m.insert("33", "JAWA TENGAH");
        m.insert("34", "DI YOGYAKARTA");
        m.insert("35", "JAWA TIMUR");
        m.insert("36", "BANTEN");
        m.insert("51", "BALI");
        m.insert("52", "NUSA TENGGARA BARAT");
        m.insert("53", "NUSA TENGGARA TIMUR");
        m.insert("61", "KALIMANTAN BARAT");
        m.insert("62", "KALIMANTAN TENGAH");
        m.insert("63", "KALIMANTAN SELATAN");
        m.insert("64", "KALIMANTAN TIMUR");
        m.insert("65", "KALIMANTAN UTARA");
        m.insert("71", "SULAWESI UTARA");
        m.insert("72", "SULAWESI TENGAH");
        m.insert("73", "SULAWESI SELATAN");
        m.insert("74", "SULAWESI TENGGARA");
        m.insert("75", "GORONTALO");
        m.insert("76", "SULAWESI BARAT");
        m.insert("81", "MALUKU");
        m.insert("82", "MALUKU UTARA");
        m.insert("91", "PAPUA BARAT");
        m.insert("94", "PAPUA");
        m
    };
}

/// Look up a province name, failing on unknown codes
pub fn province_name(code: &str) -> AppResult<&'static str> {
    PROVINCES
        .get(code)
        .copied()
        .ok_or_else(|| AppError::invalid_reference("province", code))
}

/// Check whether a province code is known
#[inline]
pub fn is_known_province(code: &str) -> bool {
    PROVINCES.contains_key(code)
}

// ============================================
// DEMOGRAPHIC TABLES
// ============================================

pub const BLOOD_TYPES: [&str; 5] = ["A", "B", "AB", "O", "-"];

pub const RELIGIONS: [&str; 6] = ["ISLAM", "KRISTEN", "KATOLIK", "HINDU", "BUDDHA", "KHONGHUCU"];

pub const MARITAL_STATUSES: [&str; 4] = ["BELUM KAWIN", "KAWIN", "CERAI HIDUP", "CERAI MATI"];

pub const OCCUPATIONS: [&str; 15] = [
    "KARYAWAN SWASTA",
    "PNS",
    "WIRASWASTA",
    "PETANI",
    "NELAYAN",
    "GURU",
    "DOSEN",
    "DOKTER",
    "PENGACARA",
    "INSINYUR",
    "MAHASISWA",
    "PELAJAR",
    "MENGURUS RUMAH TANGGA",
    "PENSIUNAN",
    "BELUM/TIDAK BEKERJA",
];

/// Regency / city printed as `regency_city` and `issue_place`
pub const REGENCIES: [&str; 15] = [
    "JAKARTA PUSAT",
    "JAKARTA UTARA",
    "JAKARTA SELATAN",
    "JAKARTA TIMUR",
    "JAKARTA BARAT",
    "SURABAYA",
    "BANDUNG",
    "MEDAN",
    "SEMARANG",
    "MAKASSAR",
    "PALEMBANG",
    "TANGERANG",
    "DEPOK",
    "BEKASI",
    "BOGOR",
];

// ============================================
// FAKE-DATA TABLES
// ============================================

pub const MALE_FIRST_NAMES: [&str; 20] = [
    "Agus", "Budi", "Dedi", "Eko", "Fajar", "Hendra", "Irfan", "Joko", "Kurniawan", "Lukman",
    "Rizky", "Slamet", "Taufik", "Wahyu", "Yusuf", "Bambang", "Cahyo", "Dimas", "Gilang", "Hadi",
];

pub const FEMALE_FIRST_NAMES: [&str; 20] = [
    "Ayu", "Dewi", "Fitri", "Indah", "Kartika", "Lestari", "Maya", "Nur", "Putri", "Rina",
    "Sari", "Siti", "Wulan", "Yuni", "Citra", "Diah", "Endah", "Intan", "Nadia", "Ratna",
];

pub const LAST_NAMES: [&str; 20] = [
    "Pratama", "Saputra", "Wijaya", "Susanto", "Hidayat", "Nugroho", "Siregar", "Nasution",
    "Harahap", "Simanjuntak", "Lubis", "Kusuma", "Setiawan", "Gunawan", "Halim", "Purnomo",
    "Rahmawati", "Handayani", "Wulandari", "Permana",
];

pub const CITIES: [&str; 20] = [
    "Jakarta", "Surabaya", "Bandung", "Bekasi", "Medan", "Tangerang", "Depok", "Semarang",
    "Palembang", "Makassar", "Batam", "Bogor", "Pekanbaru", "Bandar Lampung", "Malang", "Padang",
    "Denpasar", "Yogyakarta", "Samarinda", "Banjarmasin",
];

pub const STREET_PREFIXES: [&str; 3] = ["Jl.", "Gg.", "Jalan"];

pub const STREET_NAMES: [&str; 15] = [
    "Merdeka", "Sudirman", "Thamrin", "Diponegoro", "Gatot Subroto", "Ahmad Yani", "Pahlawan",
    "Veteran", "Pemuda", "Cendrawasih", "Kenanga", "Melati", "Mawar", "Asia Afrika", "Gajah Mada",
];

/// Mobile prefixes after the leading zero / country code
pub const MOBILE_PREFIXES: [&str; 7] = ["811", "812", "813", "821", "852", "857", "878"];

pub const EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.co.id", "outlook.com", "mail.id"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_province_table_matches_codes() {
        assert_eq!(PROVINCES.len(), PROVINCE_CODES.len());
        for code in PROVINCE_CODES {
            assert!(is_known_province(code), "missing province {}", code);
        }
    }

    #[test]
    fn test_province_lookup() {
        assert_eq!(province_name("32").unwrap(), "JAWA BARAT");
        let err = province_name("99").unwrap_err();
        assert_eq!(err.code_str(), "REF_INVALID_CODE");
    }

    #[test]
    fn test_activation_probabilities_in_range() {
        for p in [
            NAME_MISMATCH_PROBABILITY,
            NIK_MISMATCH_PROBABILITY,
            PHONE_MISMATCH_PROBABILITY,
            BIRTH_DATE_MISMATCH_PROBABILITY,
        ] {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
