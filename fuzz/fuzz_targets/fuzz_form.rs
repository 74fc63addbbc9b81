//! Fuzz target for the form controller.
//!
//! Drives the form with arbitrary action sequences and checks that it
//! never tokenizes twice or tokenizes an invalid form.

#![no_main]

use arbitrary::Arbitrary;
use card_form::clock::FixedClock;
use card_form::{
    CardNetwork, FieldKind, FormController, PaymentInstrument, Settings, SubmitOutcome,
    TokenizationError, Tokenizer,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Action {
    Input(u8, String),
    SetAmex,
    Submit,
    Complete(bool),
    Cancel,
}

#[derive(Default)]
struct Count(usize);

impl Tokenizer for Count {
    fn tokenize(&mut self, _instrument: PaymentInstrument) {
        self.0 += 1;
    }
}

fuzz_target!(|actions: Vec<Action>| {
    let Some(clock) = FixedClock::ymd(2026, 10, 16) else {
        return;
    };
    let mut form = FormController::new(Count::default(), Settings::default()).with_clock(clock);

    for action in actions {
        match action {
            Action::Input(field, text) => {
                let kind = FieldKind::ALL[field as usize % FieldKind::ALL.len()];
                let _ = form.input(kind, &text);
            }
            Action::SetAmex => {
                let _ = form.set_network(CardNetwork::Amex);
            }
            Action::Submit => {
                let was_valid = !form.form_is_not_valid() && form.state().is_editable();
                let outcome = form.submit();
                assert_eq!(outcome == Ok(SubmitOutcome::Submitted), was_valid);
            }
            Action::Complete(ok) => {
                let result = if ok {
                    Ok(())
                } else {
                    Err(TokenizationError::new("fuzz"))
                };
                let _ = form.complete_tokenization(result);
            }
            Action::Cancel => {
                let _ = form.cancel();
            }
        }
        assert!(form.tokenizer().0 <= 1);
    }
});
