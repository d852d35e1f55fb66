//! Indonesian fake-data provider
//!
//! Samples the static tables in `constants.rs` with the caller's RNG. Stands
//! in for a locale faker: good enough for names, phones and addresses on a
//! synthetic card, nothing more.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;

use crate::models::types::{BaseRecord, Gender};
use crate::utils::constants::{
    CITIES, EMAIL_DOMAINS, FEMALE_FIRST_NAMES, LAST_NAMES, MALE_FIRST_NAMES, MOBILE_PREFIXES,
    STREET_NAMES, STREET_PREFIXES,
};

/// Uniform pick from a non-empty static table
pub fn choose<'a, R: Rng + ?Sized>(rng: &mut R, table: &[&'a str]) -> &'a str {
    table[rng.gen_range(0..table.len())]
}

pub fn gender<R: Rng + ?Sized>(rng: &mut R) -> Gender {
    Gender::ALL[rng.gen_range(0..Gender::ALL.len())]
}

/// "First Last", sometimes with a middle name
pub fn full_name<R: Rng + ?Sized>(rng: &mut R, gender: Gender) -> String {
    let firsts: &[&str] = match gender {
        Gender::LakiLaki => &MALE_FIRST_NAMES,
        Gender::Perempuan => &FEMALE_FIRST_NAMES,
    };
    let first = choose(rng, firsts);
    let last = choose(rng, &LAST_NAMES);
    if rng.gen_bool(0.3) {
        let middle = choose(rng, firsts);
        format!("{} {} {}", first, middle, last)
    } else {
        format!("{} {}", first, last)
    }
}

fn digits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| (b'0' + rng.gen_range(0..10u8)) as char)
        .collect()
}

/// Mobile or landline number in one of the common local notations
pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = choose(rng, &MOBILE_PREFIXES);
    match rng.gen_range(0..4) {
        0 => format!("0{}-{}-{}", prefix, digits(rng, 4), digits(rng, 4)),
        1 => format!("+62 {}-{}-{}", prefix, digits(rng, 4), digits(rng, 4)),
        2 => format!("0{}{}", prefix, digits(rng, 8)),
        _ => format!("(0{}) {} {}", rng.gen_range(21..=29), digits(rng, 3), digits(rng, 4)),
    }
}

pub fn email<R: Rng + ?Sized>(rng: &mut R, full_name: &str) -> String {
    let local: Vec<String> = full_name
        .split_whitespace()
        .take(2)
        .map(|t| t.to_lowercase())
        .collect();
    format!("{}@{}", local.join("."), choose(rng, &EMAIL_DOMAINS))
}

pub fn city<R: Rng + ?Sized>(rng: &mut R) -> String {
    choose(rng, &CITIES).to_string()
}

pub fn street_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} No. {}",
        choose(rng, &STREET_PREFIXES),
        choose(rng, &STREET_NAMES),
        rng.gen_range(1..=200)
    )
}

/// Uniform date in `[start, end]` (inclusive); returns `start` if the range is inverted
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.gen_range(0..=span))
}

/// `years` before `today`, landing on the 28th when the day does not exist
pub fn years_before(today: NaiveDate, years: i32) -> NaiveDate {
    let year = today.year() - years;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        .unwrap_or(today)
}

/// Birth date for an applicant aged `min_age..=max_age` on `today`
pub fn date_of_birth<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    min_age: i32,
    max_age: i32,
) -> NaiveDate {
    let oldest = years_before(today, max_age + 1) + Duration::days(1);
    let youngest = years_before(today, min_age);
    date_between(rng, oldest, youngest)
}

/// Minimal job-application rows used when no input CSV exists
pub fn fallback_base_records<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<BaseRecord> {
    (0..count)
        .map(|_| {
            let g = gender(rng);
            let name = full_name(rng, g);
            let mail = email(rng, &name);
            BaseRecord::new()
                .with("full_name", name)
                .with("phone_number", phone_number(rng))
                .with("email", mail)
        })
        .collect()
}
