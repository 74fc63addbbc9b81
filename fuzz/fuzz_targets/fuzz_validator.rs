//! Fuzz target for field validation.
//!
//! Tests that every field validator never panics and that the classifier
//! never contradicts the strict predicate.

#![no_main]

use card_form::clock::FixedClock;
use card_form::{CardNetwork, FieldKind, FieldValidator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Some(FixedClock(today)) = FixedClock::ymd(2026, 10, 16) else {
        return;
    };

    for network in [CardNetwork::Visa, CardNetwork::Amex, CardNetwork::Unknown] {
        let validator = FieldValidator::new(network, today);
        for kind in FieldKind::ALL {
            let not_valid = validator.is_not_valid(kind, Some(data));
            let state = validator.classify(kind, Some(data));
            if state.is_valid() {
                assert!(!not_valid, "{kind} classified valid but rejected");
            }
            if state.is_invalid() {
                assert!(not_valid, "{kind} classified invalid but accepted");
            }
        }
    }
});
