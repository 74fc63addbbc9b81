//! Field-level validation for the four card form fields.
//!
//! Each field has a strict predicate ([`FieldValidator::is_not_valid`]) used
//! to gate submission, and a typing-aware classifier
//! ([`FieldValidator::classify`]) used to drive highlighting without
//! flagging input that is merely incomplete.
//!
//! # Example
//!
//! ```
//! use card_form::validator::{FieldKind, FieldValidator};
//! use card_form::CardNetwork;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let validator = FieldValidator::new(CardNetwork::Visa, today);
//!
//! assert!(!validator.is_not_valid(FieldKind::Cvv, Some("123")));
//! assert!(validator.is_not_valid(FieldKind::Cvv, Some("12")));
//! assert!(validator.is_not_valid(FieldKind::Name, None));
//! ```

use crate::error::FieldValidationError;
use crate::{cvv, expiry, name, number, CardNetwork};
use chrono::NaiveDate;
use std::fmt;

/// The four fields of the card form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Cardholder name.
    Name,
    /// Card number.
    CardNumber,
    /// Expiry date, `MM/YY`.
    Expiry,
    /// Security code.
    Cvv,
}

impl FieldKind {
    /// All fields in form order.
    pub const ALL: [FieldKind; 4] = [Self::Name, Self::CardNumber, Self::Expiry, Self::Cvv];

    /// Position of the field in [`FieldKind::ALL`].
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::CardNumber => 1,
            Self::Expiry => 2,
            Self::Cvv => 3,
        }
    }

    /// Short label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CardNumber => "number",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Validity of one field as the user types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValidationState {
    /// The value is acceptable.
    Valid,
    /// The value is wrong and no further typing fixes it as is.
    Invalid(FieldValidationError),
    /// Empty or still being entered; no verdict yet.
    #[default]
    NotAvailable,
}

impl FieldValidationState {
    /// True for `Valid`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// True for `Invalid`.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The reason, for `Invalid`.
    pub fn error(&self) -> Option<&FieldValidationError> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }

    /// The tri-state as a highlight hint: `Some(true)`, `Some(false)`, or
    /// `None` when no verdict should be shown.
    pub fn as_hint(&self) -> Option<bool> {
        match self {
            Self::Valid => Some(true),
            Self::Invalid(_) => Some(false),
            Self::NotAvailable => None,
        }
    }
}

/// Pure validation over field text, parameterized by the CVV network and
/// the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidator {
    network: CardNetwork,
    today: NaiveDate,
    max_years_ahead: Option<u16>,
}

impl FieldValidator {
    /// Creates a validator for `network` judging expiry against `today`.
    pub fn new(network: CardNetwork, today: NaiveDate) -> Self {
        Self {
            network,
            today,
            max_years_ahead: None,
        }
    }

    /// Rejects expiry years more than `years` ahead of today.
    pub fn with_max_years_ahead(mut self, years: Option<u16>) -> Self {
        self.max_years_ahead = years;
        self
    }

    /// Network used for CVV length.
    #[inline]
    pub const fn network(&self) -> CardNetwork {
        self.network
    }

    /// Validates one field.
    pub fn validate(&self, kind: FieldKind, text: &str) -> Result<(), FieldValidationError> {
        match kind {
            FieldKind::Name => name::validate_name(text)?,
            FieldKind::CardNumber => {
                number::validate_number(text)?;
            }
            FieldKind::Expiry => {
                expiry::validate_expiry_at(text, self.today, self.max_years_ahead)?;
            }
            FieldKind::Cvv => cvv::validate_cvv(text, self.network)?,
        }
        Ok(())
    }

    /// True unless the field holds an acceptable value. Absent and empty
    /// text are never acceptable.
    #[inline]
    pub fn is_not_valid(&self, kind: FieldKind, text: Option<&str>) -> bool {
        text.map_or(true, |t| self.validate(kind, t).is_err())
    }

    /// Typing-aware classification of one field.
    pub fn classify(&self, kind: FieldKind, text: Option<&str>) -> FieldValidationState {
        let text = text.unwrap_or_default();
        match kind {
            FieldKind::Name => name::classify_name(text),
            FieldKind::CardNumber => number::classify_number(text),
            FieldKind::Expiry => expiry::classify_expiry(text, self.today, self.max_years_ahead),
            FieldKind::Cvv => cvv::classify_cvv(text, self.network),
        }
    }

    /// True if any field fails its predicate.
    ///
    /// ```
    /// use card_form::validator::{FieldKind, FieldValidator};
    /// use card_form::CardNetwork;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    /// let validator = FieldValidator::new(CardNetwork::Visa, today);
    /// let fields = [
    ///     (FieldKind::Name, Some("Jane Doe")),
    ///     (FieldKind::CardNumber, Some("4111 1111 1111 1111")),
    ///     (FieldKind::Expiry, Some("12/29")),
    ///     (FieldKind::Cvv, Some("123")),
    /// ];
    /// assert!(!validator.form_is_not_valid(fields));
    /// ```
    pub fn form_is_not_valid<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = (FieldKind, Option<&'a str>)>,
    {
        fields
            .into_iter()
            .any(|(kind, text)| self.is_not_valid(kind, text))
    }
}
