//! The tokenization payload built from a validated form.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::format::redact_number;

/// Card details handed to the tokenizer.
///
/// Only the form controller builds one, and only from input that passed
/// validation. The number and CVV are wiped from memory when the value is
/// dropped, and `Debug` shows the last four digits only.
///
/// ```
/// # use card_form::clock::FixedClock;
/// # use card_form::form::{FormController, Tokenizer};
/// # use card_form::validator::FieldKind;
/// # use card_form::instrument::PaymentInstrument;
/// # use card_form::settings::Settings;
/// struct Print;
/// impl Tokenizer for Print {
///     fn tokenize(&mut self, instrument: PaymentInstrument) {
///         assert_eq!(format!("{instrument:?}").contains("4111111111111111"), false);
///         assert_eq!(instrument.expiration_year(), "2029");
///     }
/// }
///
/// let mut form = FormController::new(Print, Settings::default())
///     .with_clock(FixedClock::ymd(2026, 10, 16).unwrap());
/// form.input(FieldKind::Name, "Jane Doe").unwrap();
/// form.input(FieldKind::CardNumber, "4111111111111111").unwrap();
/// form.input(FieldKind::Expiry, "1229").unwrap();
/// form.input(FieldKind::Cvv, "123").unwrap();
/// form.submit().unwrap();
/// ```
///
/// The instrument is built once and moved to the tokenizer; it cannot be
/// copied:
///
/// ```compile_fail
/// fn copyable<T: Clone>() {}
/// copyable::<card_form::PaymentInstrument>();
/// ```
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PaymentInstrument {
    number: String,
    cvv: String,
    expiration_month: String,
    expiration_year: String,
    cardholder_name: String,
}

impl PaymentInstrument {
    pub(crate) fn new(
        number: String,
        cvv: String,
        expiration_month: String,
        expiration_year: String,
        cardholder_name: String,
    ) -> Self {
        Self {
            number,
            cvv,
            expiration_month,
            expiration_year,
            cardholder_name,
        }
    }

    /// Card number, digits only.
    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Security code as typed.
    #[inline]
    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// Two-digit month, e.g. `"03"`.
    #[inline]
    pub fn expiration_month(&self) -> &str {
        &self.expiration_month
    }

    /// Four-digit year, e.g. `"2029"`.
    #[inline]
    pub fn expiration_year(&self) -> &str {
        &self.expiration_year
    }

    /// Cardholder name as typed.
    #[inline]
    pub fn cardholder_name(&self) -> &str {
        &self.cardholder_name
    }

    /// Last four digits of the number.
    pub fn last_four(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        &self.number[start..]
    }
}

impl fmt::Debug for PaymentInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentInstrument")
            .field("number", &redact_number(&self.number))
            .field("cvv", &"***")
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .field("cardholder_name", &self.cardholder_name)
            .finish()
    }
}
