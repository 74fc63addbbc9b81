//! Fuzz target for input masking.
//!
//! Tests that masking never panics, stays within the pattern, and is
//! idempotent for patterns without digit literals.

#![no_main]

use card_form::mask::{self, EXPIRY_PATTERN};
use card_form::{format, CardNetwork, CARD_NUMBER_PATTERN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (pattern, raw) = data;

    for pattern in [CARD_NUMBER_PATTERN, EXPIRY_PATTERN, pattern] {
        let masked = mask::apply(pattern, raw);
        assert!(masked.chars().count() <= pattern.chars().count());
        // Digit literals in the pattern are re-read as input
        if !pattern.chars().any(|c| c.is_ascii_digit()) {
            assert_eq!(mask::apply(pattern, &masked), masked, "Masking should be idempotent");
        }
    }

    for network in CardNetwork::KNOWN {
        let _ = format::format_card_number(raw, network);
    }
    let _ = format::redact_number(raw);
    let _ = format::format_expiry(raw, pattern);
});
