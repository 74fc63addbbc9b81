//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry parsing never panics on arbitrary input.

#![no_main]

use card_form::clock::FixedClock;
use card_form::expiry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Some(FixedClock(today)) = FixedClock::ymd(2026, 10, 16) else {
        return;
    };

    // These should never panic
    let _ = expiry::parse_expiry(data);
    let _ = expiry::validate_expiry_at(data, today, None);
    let _ = expiry::validate_expiry_at(data, today, Some(20));
    let _ = expiry::classify_expiry(data, today, None);

    // If parsing succeeds, test other methods
    if let Ok(exp) = expiry::parse_expiry(data) {
        let _ = exp.is_expired_at(today);
        let _ = exp.is_too_far_future_at(today, u16::MAX);
        let _ = exp.month_string();
        let _ = exp.year_string();
        let _ = exp.to_string();
    }
});
