//! Input masking for the card number and expiry fields.
//!
//! A pattern uses `#` for each digit slot; every other character is a
//! literal emitted at its fixed position. The mask runs on every keystroke
//! against the field's current text and replaces it with the result.
//!
//! # Example
//!
//! ```
//! use card_form::mask::{Mask, EXPIRY_PATTERN};
//! use card_form::CARD_NUMBER_PATTERN;
//!
//! let number = Mask::new(CARD_NUMBER_PATTERN);
//! assert_eq!(number.apply("4111111111111111"), "4111 1111 1111 1111");
//! assert_eq!(number.apply("41111"), "4111 1");
//!
//! assert_eq!(Mask::new(EXPIRY_PATTERN).apply("1229"), "12/29");
//! ```

/// Digit slot marker.
pub const PLACEHOLDER: char = '#';

/// Expiry pattern, `MM/YY`.
pub const EXPIRY_PATTERN: &str = "##/##";

/// A digit mask over a fixed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask<'a> {
    pattern: &'a str,
}

impl<'a> Mask<'a> {
    /// Creates a mask for `pattern`.
    #[inline]
    pub const fn new(pattern: &'a str) -> Self {
        Self { pattern }
    }

    /// The pattern this mask was built from.
    #[inline]
    pub const fn pattern(&self) -> &'a str {
        self.pattern
    }

    /// Number of digit slots in the pattern.
    pub fn digit_slots(&self) -> usize {
        self.pattern.chars().filter(|&c| c == PLACEHOLDER).count()
    }

    /// Formats `raw` through the pattern.
    ///
    /// Non-digits are dropped first. Output stops as soon as either the
    /// digits or the pattern are exhausted, so a literal is only written when
    /// a digit follows it and extra digits beyond the last slot are cut.
    pub fn apply(&self, raw: &str) -> String {
        let mut digits = raw.chars().filter(|c| c.is_ascii_digit()).peekable();
        let mut result = String::with_capacity(self.pattern.len());

        for slot in self.pattern.chars() {
            if digits.peek().is_none() {
                break;
            }
            if slot == PLACEHOLDER {
                if let Some(d) = digits.next() {
                    result.push(d);
                }
            } else {
                result.push(slot);
            }
        }

        result
    }
}

/// Shorthand for `Mask::new(pattern).apply(raw)`.
#[inline]
pub fn apply(pattern: &str, raw: &str) -> String {
    Mask::new(pattern).apply(raw)
}
