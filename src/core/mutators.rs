//! Field Mutators
//!
//! Each field has an enum of variation kinds. A mutation picks one kind
//! uniformly with the caller's RNG, then applies a pure edit. Positional
//! edits (`replace_digit`, `swap_adjacent`, ...) are exposed so a specific
//! corruption can be reproduced without an RNG.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;

use crate::models::errors::{AppError, AppResult};

/// Academic-title markers that make the suffix toggle strip instead of append
const SUFFIX_MARKERS: [&str; 3] = [".", "S.", "M."];
const APPENDED_SUFFIX: &str = " S.Pd";

/// Pick one variant uniformly from a fixed table
fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[T]) -> T {
    table[rng.gen_range(0..table.len())]
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    (b'0' + rng.gen_range(0..10u8)) as char
}

// ============================================
// NAME
// ============================================

/// Spelling and formatting variations applied to a full name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameVariation {
    Substitute { from: &'static str, to: &'static str },
    Uppercase,
    Lowercase,
    TitleCase,
    DoubleSpaces,
    DropMiddleName,
    ToggleSuffix,
}

impl NameVariation {
    pub const ALL: [NameVariation; 16] = [
        NameVariation::Substitute { from: "i", to: "y" },
        NameVariation::Substitute { from: "y", to: "i" },
        NameVariation::Substitute { from: "d", to: "dh" },
        NameVariation::Substitute { from: "dh", to: "d" },
        NameVariation::Substitute { from: "f", to: "ph" },
        NameVariation::Substitute { from: "ph", to: "f" },
        NameVariation::Substitute { from: "c", to: "ch" },
        NameVariation::Substitute { from: "ch", to: "c" },
        NameVariation::Substitute { from: "k", to: "ck" },
        NameVariation::Substitute { from: "ck", to: "k" },
        NameVariation::Uppercase,
        NameVariation::Lowercase,
        NameVariation::TitleCase,
        NameVariation::DoubleSpaces,
        NameVariation::DropMiddleName,
        NameVariation::ToggleSuffix,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        pick(rng, &Self::ALL)
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            NameVariation::Substitute { from, to } => name.replace(*from, to),
            NameVariation::Uppercase => name.to_uppercase(),
            NameVariation::Lowercase => name.to_lowercase(),
            NameVariation::TitleCase => title_case(name),
            NameVariation::DoubleSpaces => name.replace(' ', "  "),
            NameVariation::DropMiddleName => drop_middle_name(name),
            NameVariation::ToggleSuffix => toggle_suffix(name),
        }
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Keep only the first two tokens; names with fewer than three are untouched
pub fn drop_middle_name(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.len() > 2 {
        tokens[..2].join(" ")
    } else {
        name.to_string()
    }
}

/// Append " S.Pd" to a bare name, or strip known academic suffixes
pub fn toggle_suffix(name: &str) -> String {
    if SUFFIX_MARKERS.iter().any(|m| name.contains(m)) {
        name.replace(APPENDED_SUFFIX, "")
            .replace(" M.", " ")
            .replace(" Dr.", " ")
    } else {
        format!("{}{}", name, APPENDED_SUFFIX)
    }
}

pub fn mutate_name<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
    NameVariation::random(rng).apply(name)
}

// ============================================
// DIGIT STRINGS (NIK, PHONE)
// ============================================

/// Structural corruption of a digit string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitVariation {
    DigitChange,
    DigitSwap,
    ExtraDigit,
    MissingDigit,
}

impl DigitVariation {
    pub const NIK_KINDS: [DigitVariation; 4] = [
        DigitVariation::DigitChange,
        DigitVariation::DigitSwap,
        DigitVariation::ExtraDigit,
        DigitVariation::MissingDigit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DigitVariation::DigitChange => "digit_change",
            DigitVariation::DigitSwap => "digit_swap",
            DigitVariation::ExtraDigit => "extra_digit",
            DigitVariation::MissingDigit => "missing_digit",
        }
    }

    /// Apply at a random position with a random replacement digit
    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, value: &str) -> AppResult<String> {
        let len = value.chars().count();
        match self {
            DigitVariation::DigitChange => {
                if len == 0 {
                    return Err(AppError::mutation_contract(
                        "digit_change on an empty string",
                    ));
                }
                let pos = rng.gen_range(0..len);
                replace_digit(value, pos, random_digit(rng))
            }
            DigitVariation::DigitSwap => {
                if len < 2 {
                    return Err(AppError::mutation_contract(format!(
                        "digit_swap needs at least 2 characters, got '{}'",
                        value
                    )));
                }
                let pos = rng.gen_range(0..len - 1);
                swap_adjacent(value, pos)
            }
            DigitVariation::ExtraDigit => {
                let pos = rng.gen_range(0..=len);
                insert_digit(value, pos, random_digit(rng))
            }
            DigitVariation::MissingDigit => {
                if len <= 1 {
                    return Err(AppError::mutation_contract(format!(
                        "missing_digit needs more than 1 character, got '{}'",
                        value
                    )));
                }
                let pos = rng.gen_range(0..len);
                remove_digit(value, pos)
            }
        }
    }
}

fn out_of_range(op: &str, pos: usize, value: &str) -> AppError {
    AppError::mutation_contract(format!(
        "{} position {} out of range for '{}'",
        op, pos, value
    ))
}

/// Overwrite the character at `pos`
pub fn replace_digit(value: &str, pos: usize, digit: char) -> AppResult<String> {
    let mut chars: Vec<char> = value.chars().collect();
    let slot = chars
        .get_mut(pos)
        .ok_or_else(|| out_of_range("digit_change", pos, value))?;
    *slot = digit;
    Ok(chars.into_iter().collect())
}

/// Swap the characters at `pos` and `pos + 1`
pub fn swap_adjacent(value: &str, pos: usize) -> AppResult<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if pos + 1 >= chars.len() {
        return Err(out_of_range("digit_swap", pos, value));
    }
    chars.swap(pos, pos + 1);
    Ok(chars.into_iter().collect())
}

/// Insert `digit` before position `pos` (`pos == len` appends)
pub fn insert_digit(value: &str, pos: usize, digit: char) -> AppResult<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if pos > chars.len() {
        return Err(out_of_range("extra_digit", pos, value));
    }
    chars.insert(pos, digit);
    Ok(chars.into_iter().collect())
}

/// Delete the character at `pos`
pub fn remove_digit(value: &str, pos: usize) -> AppResult<String> {
    let mut chars: Vec<char> = value.chars().collect();
    if pos >= chars.len() {
        return Err(out_of_range("missing_digit", pos, value));
    }
    chars.remove(pos);
    Ok(chars.into_iter().collect())
}

pub fn mutate_nik<R: Rng + ?Sized>(rng: &mut R, nik: &str) -> AppResult<String> {
    let variation = pick(rng, &DigitVariation::NIK_KINDS);
    variation.apply(rng, nik)
}

// ============================================
// PHONE
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneVariation {
    Digits(DigitVariation),
    FormatChange,
}

impl PhoneVariation {
    pub const ALL: [PhoneVariation; 4] = [
        PhoneVariation::Digits(DigitVariation::DigitChange),
        PhoneVariation::Digits(DigitVariation::ExtraDigit),
        PhoneVariation::Digits(DigitVariation::MissingDigit),
        PhoneVariation::FormatChange,
    ];

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, phone: &str) -> AppResult<String> {
        match self {
            PhoneVariation::Digits(kind) => kind.apply(rng, &phone_digits(phone)),
            PhoneVariation::FormatChange => Ok(reformat_prefix(phone)),
        }
    }
}

/// Keep ASCII digits only
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Flip between the `62` and `08` prefix conventions.
///
/// `62...` becomes `08...` (country code dropped), `08...` becomes
/// `+628...`. Any other prefix returns the input untouched, separators
/// included.
pub fn reformat_prefix(phone: &str) -> String {
    let digits = phone_digits(phone);
    if let Some(rest) = digits.strip_prefix("62") {
        format!("08{}", rest)
    } else if digits.starts_with("08") {
        format!("+62{}", &digits[1..])
    } else {
        phone.to_string()
    }
}

pub fn mutate_phone<R: Rng + ?Sized>(rng: &mut R, phone: &str) -> AppResult<String> {
    pick(rng, &PhoneVariation::ALL).apply(rng, phone)
}

// ============================================
// BIRTH DATE
// ============================================

/// Granularity of a birth-date shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShift {
    Day,
    Month,
    Year,
}

impl DateShift {
    pub const ALL: [DateShift; 3] = [DateShift::Day, DateShift::Month, DateShift::Year];

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, date: NaiveDate) -> AppResult<NaiveDate> {
        match self {
            DateShift::Day => shift_days(date, rng.gen_range(-5..=5)),
            DateShift::Month => shift_months(date, rng.gen_range(-2..=2)),
            DateShift::Year => shift_years(date, rng.gen_range(-2..=2)),
        }
    }
}

pub fn shift_days(date: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AppError::invalid_date(format!("{} {:+} days overflows", date, days)))
}

/// Move the month by `offset`, clamped to January..December; a day that does
/// not exist in the target month falls back to the 28th
pub fn shift_months(date: NaiveDate, offset: i32) -> AppResult<NaiveDate> {
    if offset == 0 {
        return Ok(date);
    }
    let month = (date.month() as i32 + offset).clamp(1, 12) as u32;
    with_fallback_day(date.year(), month, date.day())
}

/// Move the year by `offset`; 29 February in a non-leap target falls back to the 28th
pub fn shift_years(date: NaiveDate, offset: i32) -> AppResult<NaiveDate> {
    with_fallback_day(date.year() + offset, date.month(), date.day())
}

fn with_fallback_day(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
        .ok_or_else(|| AppError::invalid_date(format!("{:04}-{:02}-{:02}", year, month, day)))
}

pub fn mutate_birth_date<R: Rng + ?Sized>(rng: &mut R, date: NaiveDate) -> AppResult<NaiveDate> {
    pick(rng, &DateShift::ALL).apply(rng, date)
}
