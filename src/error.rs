//! Error types for the card form.
//!
//! Field-level errors ([`FieldValidationError`] and the per-field reasons it
//! wraps) only ever drive the field's highlight. [`TokenizationError`] and
//! [`PresentationError`] end the flow and are forwarded to the router as
//! they are.

use crate::cvv::CvvError;
use crate::expiry::ExpiryError;
use crate::form::FormState;
use crate::CardNetwork;
use thiserror::Error;

/// Why a card number was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardNumberError {
    /// The input was empty.
    #[error("card number is empty")]
    Empty,

    /// A character other than a digit was found after removing whitespace.
    #[error("invalid character '{}' at position {} (only digits allowed)", .character.escape_default(), .position)]
    InvalidCharacter {
        /// Position in the cleaned number (0-indexed).
        position: usize,
        /// The offending character.
        character: char,
    },

    /// The number has too few digits for its network.
    #[error("card number too short: got {length} digits, minimum is {minimum}")]
    TooShort {
        /// Digits provided.
        length: usize,
        /// Minimum for the network.
        minimum: usize,
    },

    /// The number has too many digits for its network.
    #[error("card number too long: got {length} digits, maximum is {maximum}")]
    TooLong {
        /// Digits provided.
        length: usize,
        /// Maximum for the network.
        maximum: usize,
    },

    /// The length sits between two valid lengths of the network.
    #[error("{network} cards cannot have {length} digits")]
    InvalidLengthForNetwork {
        /// Detected network.
        network: CardNetwork,
        /// Digits provided.
        length: usize,
    },

    /// The Luhn checksum failed.
    #[error("invalid checksum (Luhn check failed) - please verify the card number")]
    InvalidChecksum,
}

/// Why a cardholder name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Nothing but whitespace was entered.
    #[error("cardholder name is empty")]
    Empty,

    /// A character outside letters, spaces, apostrophes, hyphens and periods.
    #[error("invalid character '{}' in cardholder name", .0.escape_default())]
    InvalidCharacter(char),
}

/// A per-field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldValidationError {
    /// Cardholder name.
    #[error(transparent)]
    Name(#[from] NameError),
    /// Card number.
    #[error(transparent)]
    CardNumber(#[from] CardNumberError),
    /// Expiry date.
    #[error(transparent)]
    Expiry(#[from] ExpiryError),
    /// Security code.
    #[error(transparent)]
    Cvv(#[from] CvvError),
}

/// Failure reported by the tokenization collaborator.
///
/// Opaque to the form: it is logged and handed to the router once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tokenization failed: {message}")]
pub struct TokenizationError {
    message: String,
}

impl TokenizationError {
    /// Wraps the collaborator's failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The collaborator's failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The platform payment sheet could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// The sheet refused to present.
    #[error("unable to present Apple Pay (diagnostics id {diagnostics_id})")]
    UnableToPresentApplePay {
        /// Correlation id for support.
        diagnostics_id: String,
    },

    /// The device cannot pay with any of the configured networks.
    #[error("unable to make payments on the provided networks (diagnostics id {diagnostics_id})")]
    UnableToMakePaymentsOnProvidedNetworks {
        /// Correlation id for support.
        diagnostics_id: String,
    },

    /// The payment method cannot run on this device.
    #[error("unable to present payment method {payment_method_type}: {message} (diagnostics id {diagnostics_id})")]
    UnableToPresentPaymentMethod {
        /// Payment method identifier, e.g. `APPLE_PAY`.
        payment_method_type: String,
        /// Human readable reason.
        message: String,
        /// Correlation id for support.
        diagnostics_id: String,
    },
}

impl PresentationError {
    /// Correlation id attached to the error.
    pub fn diagnostics_id(&self) -> &str {
        match self {
            Self::UnableToPresentApplePay { diagnostics_id }
            | Self::UnableToMakePaymentsOnProvidedNetworks { diagnostics_id }
            | Self::UnableToPresentPaymentMethod { diagnostics_id, .. } => diagnostics_id,
        }
    }
}

/// Errors surfaced by the form controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A field failed validation while building the instrument.
    #[error(transparent)]
    Field(#[from] FieldValidationError),

    /// Tokenization completed with an error.
    #[error(transparent)]
    Tokenization(#[from] TokenizationError),

    /// The payment sheet could not be presented.
    #[error(transparent)]
    Presentation(#[from] PresentationError),

    /// Field input arrived after the form stopped accepting edits.
    #[error("form is not editable in state {state:?}")]
    NotEditable {
        /// State the form was in.
        state: FormState,
    },

    /// A tokenization completion arrived with nothing outstanding.
    #[error("no tokenization in flight")]
    NoSubmissionInFlight,
}

/// Errors loading [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML for this schema.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(CardNumberError::Empty.to_string(), "card number is empty");

        assert_eq!(
            CardNumberError::TooShort {
                length: 10,
                minimum: 12
            }
            .to_string(),
            "card number too short: got 10 digits, minimum is 12"
        );

        assert_eq!(
            CardNumberError::InvalidCharacter {
                position: 5,
                character: 'x'
            }
            .to_string(),
            "invalid character 'x' at position 5 (only digits allowed)"
        );

        assert_eq!(
            CardNumberError::InvalidLengthForNetwork {
                network: CardNetwork::Visa,
                length: 14
            }
            .to_string(),
            "Visa cards cannot have 14 digits"
        );
    }

    #[test]
    fn test_field_error_is_transparent() {
        let err: FieldValidationError = NameError::Empty.into();
        assert_eq!(err.to_string(), "cardholder name is empty");

        let err: FormError = FieldValidationError::from(CardNumberError::InvalidChecksum).into();
        assert!(err.to_string().contains("Luhn"));
    }

    #[test]
    fn test_tokenization_error() {
        let err = TokenizationError::new("declined");
        assert_eq!(err.message(), "declined");
        assert_eq!(err.to_string(), "tokenization failed: declined");
    }

    #[test]
    fn test_presentation_diagnostics_id() {
        let err = PresentationError::UnableToPresentApplePay {
            diagnostics_id: "abc".into(),
        };
        assert_eq!(err.diagnostics_id(), "abc");
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldValidationError>();
        assert_send_sync::<FormError>();
        assert_send_sync::<SettingsError>();
    }
}
