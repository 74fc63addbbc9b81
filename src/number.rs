//! Card number validation.
//!
//! The number is cleaned by removing whitespace (the mask's separators),
//! then checked for digits only, a length acceptable to the network
//! detected from its prefix, and the Luhn checksum.
//!
//! # Example
//!
//! ```
//! use card_form::number::validate_number;
//! use card_form::CardNetwork;
//!
//! assert_eq!(validate_number("4111 1111 1111 1111"), Ok(CardNetwork::Visa));
//! assert!(validate_number("4111 1111 1111 1112").is_err());
//! ```

use crate::detect::detect_network;
use crate::error::CardNumberError;
use crate::format::strip_whitespace;
use crate::luhn;
use crate::validator::FieldValidationState;
use crate::CardNetwork;

/// Validates a card number and returns the network it belongs to.
///
/// Numbers with an unrecognized prefix are accepted as
/// [`CardNetwork::Unknown`] when their length is 12-19 and Luhn passes.
pub fn validate_number(input: &str) -> Result<CardNetwork, CardNumberError> {
    let cleaned = strip_whitespace(input);
    if cleaned.is_empty() {
        return Err(CardNumberError::Empty);
    }

    let digits = parse_digits(&cleaned)?;
    let count = digits.len();
    let network = detect_network(&digits);

    if count < network.min_length() {
        return Err(CardNumberError::TooShort {
            length: count,
            minimum: network.min_length(),
        });
    }

    if count > network.max_length() {
        return Err(CardNumberError::TooLong {
            length: count,
            maximum: network.max_length(),
        });
    }

    if !network.is_valid_length(count) {
        return Err(CardNumberError::InvalidLengthForNetwork {
            network,
            length: count,
        });
    }

    if !luhn::validate(&digits) {
        return Err(CardNumberError::InvalidChecksum);
    }

    Ok(network)
}

/// Checks if a card number is valid.
#[inline]
pub fn is_valid_number(input: &str) -> bool {
    validate_number(input).is_ok()
}

/// Classifies card number text as it is being typed.
///
/// Short numbers, and numbers that fail at a length the network can still
/// grow past, are `NotAvailable`. A number is `Invalid` only when it holds a
/// non-digit, is longer than the network allows, or fails once the mask
/// has no digit slot left.
pub fn classify_number(input: &str) -> FieldValidationState {
    match validate_number(input) {
        Ok(_) => FieldValidationState::Valid,
        Err(CardNumberError::Empty | CardNumberError::TooShort { .. }) => {
            FieldValidationState::NotAvailable
        }
        Err(err @ (CardNumberError::InvalidLengthForNetwork { .. } | CardNumberError::InvalidChecksum)) => {
            let cleaned = strip_whitespace(input);
            let network = detect_network(&parse_digits(&cleaned).unwrap_or_default());
            if cleaned.len() < network.max_typeable_length() {
                FieldValidationState::NotAvailable
            } else {
                FieldValidationState::Invalid(err.into())
            }
        }
        Err(err) => FieldValidationState::Invalid(err.into()),
    }
}

fn parse_digits(cleaned: &str) -> Result<Vec<u8>, CardNumberError> {
    cleaned
        .chars()
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or(CardNumberError::InvalidCharacter {
                    position,
                    character,
                })
        })
        .collect()
}
