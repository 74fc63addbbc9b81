//! CVV/CVC/CID validation.
//!
//! The expected length comes from the current [`CardNetwork`]: 4 digits for
//! American Express, 3 for every other known network. While the network is
//! still unknown both 3 and 4 digit codes are accepted.
//!
//! # Example
//!
//! ```
//! use card_form::cvv::{is_valid_cvv, validate_cvv};
//! use card_form::CardNetwork;
//!
//! assert!(validate_cvv("123", CardNetwork::Visa).is_ok());
//! assert!(validate_cvv("1234", CardNetwork::Amex).is_ok());
//! assert!(!is_valid_cvv("1234", CardNetwork::Visa));
//! assert!(is_valid_cvv("1234", CardNetwork::Unknown));
//! ```

use crate::validator::FieldValidationState;
use crate::CardNetwork;
use thiserror::Error;

/// Longest CVV the field will hold.
pub const MAX_CVV_INPUT: usize = 4;

/// Errors that can occur during CVV validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CvvError {
    /// The input is empty.
    #[error("CVV is empty")]
    Empty,

    /// The CVV contains a non-digit character.
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter {
        /// The invalid character found.
        character: char,
        /// Position of the invalid character.
        position: usize,
    },

    /// The length does not match what the network requires.
    #[error("{network} cards require a {expected} digit CVV, got {length}")]
    WrongLengthForNetwork {
        /// The card network.
        network: CardNetwork,
        /// Actual length provided.
        length: usize,
        /// Expected length for this network.
        expected: usize,
    },

    /// The length is outside 3-4 digits while the network is unknown.
    #[error("CVV must be 3 or 4 digits, got {length}")]
    InvalidLength {
        /// Actual length provided.
        length: usize,
    },
}

/// Validates a CVV for `network`.
///
/// # Arguments
///
/// * `input` - The CVV text as typed.
/// * `network` - The card network; `Unknown` accepts 3 or 4 digits.
///
/// # Returns
///
/// `Ok(())` if the CVV is acceptable, or a [`CvvError`] describing the
/// problem.
///
/// # Example
///
/// ```
/// use card_form::cvv::{validate_cvv, CvvError};
/// use card_form::CardNetwork;
///
/// assert!(validate_cvv("1234", CardNetwork::Amex).is_ok());
/// assert!(matches!(
///     validate_cvv("123", CardNetwork::Amex),
///     Err(CvvError::WrongLengthForNetwork { expected: 4, .. })
/// ));
/// ```
pub fn validate_cvv(input: &str, network: CardNetwork) -> Result<(), CvvError> {
    if input.is_empty() {
        return Err(CvvError::Empty);
    }

    if let Some((position, character)) = input
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(CvvError::InvalidCharacter {
            character,
            position,
        });
    }

    let length = input.len();
    match network.cvv_length() {
        Some(expected) if length != expected => Err(CvvError::WrongLengthForNetwork {
            network,
            length,
            expected,
        }),
        None if !(3..=MAX_CVV_INPUT).contains(&length) => Err(CvvError::InvalidLength { length }),
        _ => Ok(()),
    }
}

/// Checks if `input` is a valid CVV for `network`.
#[inline]
pub fn is_valid_cvv(input: &str, network: CardNetwork) -> bool {
    validate_cvv(input, network).is_ok()
}

/// Classifies CVV text as it is being typed.
///
/// A code shorter than the expected length is still being entered and is
/// `NotAvailable`; it only turns `Invalid` once no further typing can fix it.
pub fn classify_cvv(input: &str, network: CardNetwork) -> FieldValidationState {
    let shortest = network.cvv_length().unwrap_or(3);
    match validate_cvv(input, network) {
        Ok(()) => FieldValidationState::Valid,
        Err(CvvError::Empty) => FieldValidationState::NotAvailable,
        Err(CvvError::WrongLengthForNetwork { length, .. } | CvvError::InvalidLength { length })
            if length < shortest =>
        {
            FieldValidationState::NotAvailable
        }
        Err(err) => FieldValidationState::Invalid(err.into()),
    }
}

/// Decides whether the CVV field accepts an edit.
///
/// Non-numeric text is refused, and so is any insertion that would reach
/// five or more characters. Clearing the field is always allowed.
///
/// # Arguments
///
/// * `candidate` - The text the field would hold after the edit.
/// * `is_insertion` - Whether the edit adds characters.
///
/// # Returns
///
/// `true` if the field should take the edit.
///
/// # Example
///
/// ```
/// use card_form::cvv::accepts_edit;
///
/// assert!(accepts_edit("12", true));
/// assert!(!accepts_edit("12a", true));
/// assert!(!accepts_edit("12345", true));
/// assert!(accepts_edit("", false));
/// ```
pub fn accepts_edit(candidate: &str, is_insertion: bool) -> bool {
    if !candidate.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !(is_insertion && candidate.len() > MAX_CVV_INPUT)
}
