//! # card_form
//!
//! Card-entry form core for payment SDKs: validation, input masking and
//! form state, with the UI left to the host.
//!
//! ## Features
//!
//! - Per-field validation for cardholder name, card number, expiry and CVV
//! - Typing-aware field states (`Valid`, `Invalid`, `NotAvailable`)
//! - Input masking (`#### #### #### #### ###`, `##/##`, per-network groups)
//! - A form controller driving exactly one tokenization per form
//! - Apple Pay request building and presentation gating
//! - TOML settings and an optional command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use card_form::clock::FixedClock;
//! use card_form::{FieldKind, FormController, PaymentInstrument, Settings, SubmitOutcome, Tokenizer};
//!
//! struct Gateway;
//! impl Tokenizer for Gateway {
//!     fn tokenize(&mut self, instrument: PaymentInstrument) {
//!         assert_eq!(instrument.number(), "4111111111111111");
//!         assert_eq!(instrument.expiration_month(), "12");
//!         assert_eq!(instrument.expiration_year(), "2029");
//!     }
//! }
//!
//! let mut form = FormController::new(Gateway, Settings::default())
//!     .with_clock(FixedClock::ymd(2026, 10, 16).unwrap());
//!
//! form.input(FieldKind::Name, "Jane Doe").unwrap();
//! form.input(FieldKind::CardNumber, "4111111111111111").unwrap();
//! form.input(FieldKind::Expiry, "1229").unwrap();
//! form.input(FieldKind::Cvv, "123").unwrap();
//!
//! assert_eq!(form.text(FieldKind::Expiry), "12/29");
//! assert_eq!(form.submit().unwrap(), SubmitOutcome::Submitted);
//! ```
//!
//! ## Masking
//!
//! ```rust
//! use card_form::mask::{self, EXPIRY_PATTERN};
//! use card_form::CARD_NUMBER_PATTERN;
//!
//! assert_eq!(mask::apply(CARD_NUMBER_PATTERN, "4111111111111111"), "4111 1111 1111 1111");
//! assert_eq!(mask::apply(EXPIRY_PATTERN, "1229"), "12/29");
//! ```
//!
//! ## Field Validation
//!
//! ```rust
//! use card_form::{CardNetwork, FieldKind, FieldValidator};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let amex = FieldValidator::new(CardNetwork::Amex, today);
//!
//! assert!(!amex.is_not_valid(FieldKind::Cvv, Some("1234")));
//! assert!(amex.is_not_valid(FieldKind::Cvv, Some("123")));
//! assert!(amex.is_not_valid(FieldKind::Expiry, Some("09/26")));
//! ```
//!
//! ## Supported Networks
//!
//! | Network | Prefix | Length | CVV | Groups |
//! |---------|--------|--------|-----|--------|
//! | Visa | 4 | 13, 16, 19 | 3 | 4-4-4-4-3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | 3 | 4-4-4-4-3 |
//! | American Express | 34, 37 | 15 | 4 | 4-6-5 |
//! | Discover | 6011, 644-649, 65 | 16-19 | 3 | 4-4-4-4-3 |
//! | Diners Club | 36, 38, 300-305 | 14-19 | 3 | 4-6-4-5 |
//! | JCB | 3528-3589 | 16-19 | 3 | 4-4-4-4-3 |
//! | UnionPay | 62 | 16-19 | 3 | 4-4-4-4-3 |
//! | Maestro | 50, 56-69 | 12-19 | 3 | 4-4-4-4-3 |
//! | Mir | 2200-2204 | 16-19 | 3 | 4-4-4-4-3 |
//! | Elo | 509, 6362, 6363 | 16 | 3 | 4-4-4-4-3 |
//! | Unknown | - | 12-19 | 3 or 4 | 4-4-4-4-3 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cli` | `cardform` command-line tool |
//!
//! ## Security
//!
//! - `PaymentInstrument` and `ScannedCard` are zeroized on drop
//! - `Debug` shows the last four digits of a card number only
//! - Card numbers are logged redacted
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod apple_pay;
pub mod clock;
pub mod cvv;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod form;
pub mod format;
pub mod instrument;
pub mod luhn;
pub mod mask;
pub mod name;
pub mod network;
pub mod number;
pub mod settings;
pub mod validator;

// Re-export main types at crate root
pub use error::{FieldValidationError, FormError, PresentationError, TokenizationError};
pub use form::{
    FlowMode, FollowUp, FormController, FormObserver, FormState, Outcome, Router, ScannedCard,
    SubmitOutcome, Tokenizer,
};
pub use instrument::PaymentInstrument;
pub use network::{CardNetwork, CARD_NUMBER_PATTERN, MAX_CARD_DIGITS, MIN_CARD_DIGITS};
pub use settings::Settings;
pub use validator::{FieldKind, FieldValidationState, FieldValidator};
