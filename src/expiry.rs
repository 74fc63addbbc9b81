//! Expiry date parsing and validation.
//!
//! The form's expiry field holds `MM/YY` (the mask guarantees the shape),
//! but the parser also takes `MM/YYYY`. Expiry is judged against a
//! [`Clock`](crate::clock::Clock) so the rule "not yet expired" can be
//! tested with a fixed date.
//!
//! # Example
//!
//! ```
//! use card_form::expiry::{parse_expiry, validate_expiry_at};
//! use chrono::NaiveDate;
//!
//! let expiry = parse_expiry("12/29").unwrap();
//! assert_eq!(expiry.month(), 12);
//! assert_eq!(expiry.year(), 2029);
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! assert!(validate_expiry_at("12/29", today, None).is_ok());
//! assert!(validate_expiry_at("01/20", today, None).is_err());
//! ```

use crate::mask::EXPIRY_PATTERN;
use crate::validator::FieldValidationState;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use thiserror::Error;

/// A parsed expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDate {
    /// Month (1-12)
    month: u8,
    /// Four-digit year
    year: u16,
}

impl ExpiryDate {
    /// Creates a new expiry date, `None` if the month is not 1-12.
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { month, year })
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// True once the expiry month lies before `today`'s month.
    ///
    /// A card stays usable through the end of its expiry month.
    pub fn is_expired_at(&self, today: NaiveDate) -> bool {
        let (year, month) = year_month(today);
        self.year < year || (self.year == year && self.month < month)
    }

    /// True if the year lies more than `max_years` after `today`'s year.
    pub fn is_too_far_future_at(&self, today: NaiveDate, max_years: u16) -> bool {
        let (year, _) = year_month(today);
        self.year > year.saturating_add(max_years)
    }

    /// Month as two digits, the instrument's `expirationMonth`.
    pub fn month_string(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Year as four digits, the instrument's `expirationYear`.
    pub fn year_string(&self) -> String {
        format!("{:04}", self.year)
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Errors that can occur during expiry parsing/validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    /// The input string is empty.
    #[error("expiry date is empty")]
    Empty,

    /// Not exactly two numeric components separated by `/`.
    #[error("invalid expiry format (expected MM/YY)")]
    InvalidFormat,

    /// Month is out of range.
    #[error("invalid month {0}: must be 1-12")]
    InvalidMonth(u8),

    /// The card has expired.
    #[error("card expired ({month:02}/{year})")]
    Expired {
        /// The expiry month.
        month: u8,
        /// The expiry year.
        year: u16,
    },

    /// Year is too far in the future.
    #[error("expiry year {year} is too far in the future (max: {max_year})")]
    TooFarFuture {
        /// The expiry year.
        year: u16,
        /// Maximum allowed year.
        max_year: u16,
    },
}

/// Parses `MM/YY` or `MM/YYYY` without checking the date against today.
///
/// # Arguments
///
/// * `input` - Month and year separated by `/`. Two-digit years are read
///   as `20YY`.
///
/// # Returns
///
/// The parsed [`ExpiryDate`], or an [`ExpiryError`] for empty input, a
/// wrong shape, or a month outside 1-12.
///
/// # Example
///
/// ```
/// use card_form::expiry::parse_expiry;
///
/// let expiry = parse_expiry("03/29").unwrap();
/// assert_eq!(expiry.month(), 3);
/// assert_eq!(expiry.year(), 2029);
///
/// assert!(parse_expiry("13/29").is_err());
/// assert!(parse_expiry("1229").is_err());
/// ```
pub fn parse_expiry(input: &str) -> Result<ExpiryDate, ExpiryError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ExpiryError::Empty);
    }

    let mut parts = input.split('/');
    let (Some(month_str), Some(year_str), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ExpiryError::InvalidFormat);
    };

    let month_str = month_str.trim();
    let year_str = year_str.trim();
    if !is_numeric(month_str) || !is_numeric(year_str) || month_str.len() > 2 {
        return Err(ExpiryError::InvalidFormat);
    }

    let month: u8 = month_str.parse().map_err(|_| ExpiryError::InvalidFormat)?;
    if !(1..=12).contains(&month) {
        return Err(ExpiryError::InvalidMonth(month));
    }

    let year: u16 = match year_str.len() {
        // Two-digit years are in the 2000s
        2 => 2000 + year_str.parse::<u16>().map_err(|_| ExpiryError::InvalidFormat)?,
        4 => year_str.parse().map_err(|_| ExpiryError::InvalidFormat)?,
        _ => return Err(ExpiryError::InvalidFormat),
    };

    Ok(ExpiryDate { month, year })
}

/// Parses and checks the date against `today`.
///
/// # Arguments
///
/// * `input` - `MM/YY` or `MM/YYYY`.
/// * `today` - The date the card must not have expired by. A card is good
///   through the last day of its month.
/// * `max_years_ahead` - Rejects years more than this far ahead; `None`
///   disables the check.
///
/// # Returns
///
/// The parsed date, or the first [`ExpiryError`] found.
///
/// # Example
///
/// ```
/// use card_form::expiry::{validate_expiry_at, ExpiryError};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// assert!(validate_expiry_at("10/26", today, None).is_ok());
/// assert!(matches!(
///     validate_expiry_at("09/26", today, None),
///     Err(ExpiryError::Expired { .. })
/// ));
/// assert!(matches!(
///     validate_expiry_at("12/45", today, Some(10)),
///     Err(ExpiryError::TooFarFuture { max_year: 2036, .. })
/// ));
/// ```
pub fn validate_expiry_at(
    input: &str,
    today: NaiveDate,
    max_years_ahead: Option<u16>,
) -> Result<ExpiryDate, ExpiryError> {
    let expiry = parse_expiry(input)?;

    if expiry.is_expired_at(today) {
        return Err(ExpiryError::Expired {
            month: expiry.month,
            year: expiry.year,
        });
    }

    if let Some(max_years) = max_years_ahead {
        if expiry.is_too_far_future_at(today, max_years) {
            let (year, _) = year_month(today);
            return Err(ExpiryError::TooFarFuture {
                year: expiry.year,
                max_year: year.saturating_add(max_years),
            });
        }
    }

    Ok(expiry)
}

/// Classifies expiry text as it is being typed.
///
/// Until the text reaches the full `MM/YY` length the verdict is withheld,
/// except when the month typed so far can no longer become 1-12.
pub fn classify_expiry(
    input: &str,
    today: NaiveDate,
    max_years_ahead: Option<u16>,
) -> FieldValidationState {
    if input.is_empty() {
        return FieldValidationState::NotAvailable;
    }

    if input.chars().count() < EXPIRY_PATTERN.len() {
        return match impossible_month_prefix(input) {
            Some(err) => FieldValidationState::Invalid(err.into()),
            None => FieldValidationState::NotAvailable,
        };
    }

    match validate_expiry_at(input, today, max_years_ahead) {
        Ok(_) => FieldValidationState::Valid,
        Err(err) => FieldValidationState::Invalid(err.into()),
    }
}

/// A partial month that no digit can complete into 1-12.
fn impossible_month_prefix(input: &str) -> Option<ExpiryError> {
    let month: String = input.chars().take_while(|&c| c != '/').collect();
    if !is_numeric(&month) && !month.is_empty() {
        return Some(ExpiryError::InvalidFormat);
    }
    let month_complete = input.contains('/');
    match month.as_bytes() {
        // A lone 2-9 cannot start a two digit month
        [first] if *first > b'1' && !month_complete => Some(ExpiryError::InvalidFormat),
        [_, _] => match month.parse::<u8>() {
            Ok(m) if (1..=12).contains(&m) => None,
            Ok(m) => Some(ExpiryError::InvalidMonth(m)),
            Err(_) => Some(ExpiryError::InvalidFormat),
        },
        [_, _, ..] => Some(ExpiryError::InvalidFormat),
        _ => None,
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn year_month(date: NaiveDate) -> (u16, u8) {
    (date.year().clamp(0, u16::MAX as i32) as u16, date.month() as u8)
}
