//! Cardholder name validation.

use crate::error::NameError;
use crate::validator::FieldValidationState;

/// Validates a cardholder name.
///
/// The trimmed name must be non-empty and made of letters, spaces,
/// apostrophes, hyphens and periods.
///
/// ```
/// use card_form::name::validate_name;
///
/// assert!(validate_name("Jane Doe").is_ok());
/// assert!(validate_name("Seán O'Brien-Núñez Jr.").is_ok());
/// assert!(validate_name("   ").is_err());
/// assert!(validate_name("R2D2").is_err());
/// ```
pub fn validate_name(input: &str) -> Result<(), NameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    match trimmed.chars().find(|&c| !is_name_char(c)) {
        Some(c) => Err(NameError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

/// Classifies name text as it is being typed.
pub fn classify_name(input: &str) -> FieldValidationState {
    match validate_name(input) {
        Ok(()) => FieldValidationState::Valid,
        Err(NameError::Empty) => FieldValidationState::NotAvailable,
        Err(err) => FieldValidationState::Invalid(err.into()),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == ' ' || c == '\'' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Jane Doe").is_ok());
        assert!(validate_name("  Jane  ").is_ok());
        assert!(validate_name("J. R. R. Tolkien").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert_eq!(validate_name("\t "), Err(NameError::Empty));
        assert_eq!(
            validate_name("Jane_Doe"),
            Err(NameError::InvalidCharacter('_'))
        );
        assert_eq!(validate_name("Jane 2"), Err(NameError::InvalidCharacter('2')));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_name(""), FieldValidationState::NotAvailable);
        assert_eq!(classify_name("J"), FieldValidationState::Valid);
        assert!(classify_name("J@").is_invalid());
    }
}
