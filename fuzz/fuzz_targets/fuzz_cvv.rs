//! Fuzz target for CVV validation.
//!
//! Tests that CVV functions never panic on arbitrary input.

#![no_main]

use card_form::{cvv, CardNetwork};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // These should never panic
    let _ = cvv::accepts_edit(data, true);
    let _ = cvv::accepts_edit(data, false);

    for network in CardNetwork::KNOWN.into_iter().chain([CardNetwork::Unknown]) {
        let valid = cvv::is_valid_cvv(data, network);
        let state = cvv::classify_cvv(data, network);
        assert_eq!(valid, state.is_valid());
    }
});
