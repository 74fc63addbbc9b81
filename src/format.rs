//! Text clean-up and display formatting for form values.
//!
//! # Example
//!
//! ```
//! use card_form::format::{format_card_number, strip_whitespace};
//! use card_form::CardNetwork;
//!
//! assert_eq!(format_card_number("378282246310005", CardNetwork::Amex), "3782 822463 10005");
//! assert_eq!(strip_whitespace("4111 1111 1111 1111"), "4111111111111111");
//! ```

use crate::mask::{self, EXPIRY_PATTERN};
use crate::CardNetwork;

/// Removes all whitespace, keeping every other character.
///
/// This is how the submitted card number is cleaned: separators inserted by
/// the mask go away, anything else stays and is caught by validation.
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keeps only ASCII digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups a card number the way the network prints it.
///
/// # Arguments
///
/// * `input` - Raw or already grouped text; non-digits are dropped.
/// * `network` - Selects the pattern, see [`CardNetwork::number_pattern`].
///
/// # Example
///
/// ```
/// use card_form::format::format_card_number;
/// use card_form::CardNetwork;
///
/// assert_eq!(format_card_number("378282246310005", CardNetwork::Amex), "3782 822463 10005");
/// assert_eq!(format_card_number("3600000000000008", CardNetwork::DinersClub), "3600 000000 0000 08");
/// ```
pub fn format_card_number(input: &str, network: CardNetwork) -> String {
    mask::apply(network.number_pattern(), input)
}

/// Formats a month and two- or four-digit year as `MM/YY`.
///
/// ```
/// use card_form::format::format_expiry;
///
/// assert_eq!(format_expiry("3", "2029"), "03/29");
/// assert_eq!(format_expiry("12", "29"), "12/29");
/// ```
pub fn format_expiry(month: &str, year: &str) -> String {
    let month = digits_only(month);
    let year = digits_only(year);
    let month = if month.len() == 1 {
        format!("0{}", month)
    } else {
        month
    };
    let year = if year.len() > 2 {
        year[year.len() - 2..].to_string()
    } else {
        year
    };
    mask::apply(EXPIRY_PATTERN, &format!("{}{}", month, year))
}

/// Masks a card number for logs: everything but the last four digits.
///
/// ```
/// use card_form::format::redact_number;
///
/// assert_eq!(redact_number("4111111111111111"), "************1111");
/// assert_eq!(redact_number("123"), "***");
/// ```
pub fn redact_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();
    if len <= 4 {
        return "*".repeat(len);
    }
    let mut result = "*".repeat(len - 4);
    result.extend(&digits[len - 4..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace("4111 1111 1111 1111"), "4111111111111111");
        assert_eq!(strip_whitespace(" 4111\t1111 "), "41111111");
        assert_eq!(strip_whitespace("4111-1111"), "4111-1111");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("4111-1111 1111.1111"), "4111111111111111");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(
            format_card_number("4111111111111111", CardNetwork::Visa),
            "4111 1111 1111 1111"
        );
        assert_eq!(
            format_card_number("30569309025904", CardNetwork::DinersClub),
            "3056 930902 5904"
        );
        assert_eq!(format_card_number("", CardNetwork::Visa), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("01", "2030"), "01/30");
        assert_eq!(format_expiry("1", "30"), "01/30");
        assert_eq!(format_expiry("", ""), "");
    }

    #[test]
    fn test_redact_number() {
        assert_eq!(redact_number("4111 1111 1111 1111"), "************1111");
        assert_eq!(redact_number(""), "");
    }
}
