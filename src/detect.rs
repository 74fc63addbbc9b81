//! Card network detection from the number prefix (BIN/IIN).
//!
//! The form does not call this by itself. It is the default implementation
//! of [`NetworkDetector`], which a host can install on the form controller
//! so that number edits update the network used for CVV validation.

use crate::CardNetwork;

/// Supplies the network for a (possibly partial) card number.
pub trait NetworkDetector {
    /// Detects the network from the digits typed so far.
    fn detect(&self, digits: &str) -> CardNetwork;
}

/// Prefix-matching detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixDetector;

impl NetworkDetector for PrefixDetector {
    fn detect(&self, digits: &str) -> CardNetwork {
        let values: Vec<u8> = digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .take(8)
            .collect();
        detect_network(&values)
    }
}

/// Detects the card network from a sequence of digit values (0-9).
///
/// Order matters for overlapping ranges: more specific prefixes come first.
///
/// # Example
///
/// ```
/// use card_form::detect::detect_network;
/// use card_form::CardNetwork;
///
/// assert_eq!(detect_network(&[4, 1, 1, 1]), CardNetwork::Visa);
/// assert_eq!(detect_network(&[3, 7, 8, 2]), CardNetwork::Amex);
/// assert_eq!(detect_network(&[]), CardNetwork::Unknown);
/// ```
#[inline]
pub fn detect_network(digits: &[u8]) -> CardNetwork {
    match digits {
        // Mir: 2200-2204 (before Mastercard 2221-2720)
        [2, 2, 0, 0..=4, ..] => CardNetwork::Mir,

        // Mastercard: 51-55 or 2221-2720
        [5, 1..=5, ..] => CardNetwork::Mastercard,
        [2, 2, 2, 1..=9, ..] => CardNetwork::Mastercard,
        [2, 2, 3..=9, _, ..] => CardNetwork::Mastercard,
        [2, 3..=6, _, _, ..] => CardNetwork::Mastercard,
        [2, 7, 0..=1, _, ..] => CardNetwork::Mastercard,
        [2, 7, 2, 0, ..] => CardNetwork::Mastercard,

        [3, 4, ..] | [3, 7, ..] => CardNetwork::Amex,

        // Diners Club: 36, 38, 300-305, 309
        [3, 6, ..] | [3, 8, ..] => CardNetwork::DinersClub,
        [3, 0, 0..=5, ..] | [3, 0, 9, ..] => CardNetwork::DinersClub,

        // JCB: 3528-3589
        [3, 5, 2, 8..=9, ..] => CardNetwork::Jcb,
        [3, 5, 3..=8, _, ..] => CardNetwork::Jcb,

        [4, ..] => CardNetwork::Visa,

        // Elo 509 (before Maestro 50)
        [5, 0, 9, ..] => CardNetwork::Elo,
        [5, 0, ..] | [5, 6..=8, ..] => CardNetwork::Maestro,

        // Discover: 6011, 644-649, 65
        [6, 0, 1, 1, ..] => CardNetwork::Discover,
        [6, 4, 4..=9, ..] => CardNetwork::Discover,
        [6, 5, ..] => CardNetwork::Discover,

        [6, 3, 6, 2..=3, ..] => CardNetwork::Elo,
        [6, 2, ..] => CardNetwork::UnionPay,
        [6, 0 | 1 | 3 | 6..=9, ..] => CardNetwork::Maestro,

        _ => CardNetwork::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visa_detection() {
        assert_eq!(detect_network(&[4, 1, 1, 1, 1, 1]), CardNetwork::Visa);
        assert_eq!(detect_network(&[4]), CardNetwork::Visa);
    }

    #[test]
    fn test_mastercard_detection() {
        assert_eq!(detect_network(&[5, 1, 0, 0]), CardNetwork::Mastercard);
        assert_eq!(detect_network(&[5, 5, 0, 0]), CardNetwork::Mastercard);
        assert_eq!(detect_network(&[2, 2, 2, 1]), CardNetwork::Mastercard);
        assert_eq!(detect_network(&[2, 7, 2, 0]), CardNetwork::Mastercard);
    }

    #[test]
    fn test_mir_before_mastercard() {
        assert_eq!(detect_network(&[2, 2, 0, 0]), CardNetwork::Mir);
        assert_eq!(detect_network(&[2, 2, 0, 4]), CardNetwork::Mir);
    }

    #[test]
    fn test_amex_and_diners() {
        assert_eq!(detect_network(&[3, 4]), CardNetwork::Amex);
        assert_eq!(detect_network(&[3, 7]), CardNetwork::Amex);
        assert_eq!(detect_network(&[3, 6]), CardNetwork::DinersClub);
        assert_eq!(detect_network(&[3, 0, 5]), CardNetwork::DinersClub);
    }

    #[test]
    fn test_six_prefixes() {
        assert_eq!(detect_network(&[6, 0, 1, 1]), CardNetwork::Discover);
        assert_eq!(detect_network(&[6, 5]), CardNetwork::Discover);
        assert_eq!(detect_network(&[6, 2]), CardNetwork::UnionPay);
        assert_eq!(detect_network(&[6, 3, 6, 2]), CardNetwork::Elo);
        assert_eq!(detect_network(&[6, 7]), CardNetwork::Maestro);
    }

    #[test]
    fn test_partial_prefix_is_unknown() {
        // A lone 3 could still become Amex, Diners or JCB
        assert_eq!(detect_network(&[3]), CardNetwork::Unknown);
        assert_eq!(detect_network(&[1, 2, 3]), CardNetwork::Unknown);
        assert_eq!(detect_network(&[]), CardNetwork::Unknown);
    }

    #[test]
    fn test_prefix_detector_ignores_separators() {
        let detector = PrefixDetector;
        assert_eq!(detector.detect("3782 822463"), CardNetwork::Amex);
        assert_eq!(detector.detect(""), CardNetwork::Unknown);
    }
}
