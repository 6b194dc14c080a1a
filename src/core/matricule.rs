//! Luxembourg matricule (social-security code) helpers.
//!
//! The 13-digit matricule encodes the holder's birth date in its first
//! eight digits (YYYYMMDD). CNS patients must carry a parseable matricule;
//! private patients may carry anything.

use chrono::{Datelike, NaiveDate};

use super::error::MatriculeError;

/// Whether the code follows the CNS scheme: a first digit of 1 or 2
/// followed by 12 digits. Spaces are ignored.
pub fn is_valid_format(code_sn: &str) -> bool {
    let stripped: String = code_sn.chars().filter(|c| !c.is_whitespace()).collect();
    stripped.len() == 13
        && stripped.starts_with(['1', '2'])
        && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Extract the birth date from the first eight digits.
pub fn birth_date(code_sn: &str) -> Option<NaiveDate> {
    let stripped: String = code_sn.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = stripped.as_bytes();
    if bytes.len() < 8 || !bytes[..8].iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = stripped[..4].parse().ok()?;
    let month: u32 = stripped[4..6].parse().ok()?;
    let day: u32 = stripped[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Age in full years on `on_date`, per the encoded birth date.
pub fn age_on(code_sn: &str, on_date: NaiveDate) -> Option<i32> {
    let born = birth_date(code_sn)?;
    let mut age = on_date.year() - born.year();
    if (on_date.month(), on_date.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

/// Validate a CNS patient's matricule: parseable and implying an age
/// between 1 and 120 on `on_date`. Returns the age on success.
pub fn validate_cns(code_sn: &str, on_date: NaiveDate) -> Result<i32, MatriculeError> {
    if !is_valid_format(code_sn) {
        return Err(MatriculeError::Unparseable);
    }
    let age = age_on(code_sn, on_date).ok_or(MatriculeError::Unparseable)?;
    if !(1..=120).contains(&age) {
        return Err(MatriculeError::ImplausibleAge(age));
    }
    Ok(age)
}
