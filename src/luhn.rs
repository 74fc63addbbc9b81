//! Luhn ("modulus 10") checksum used by the card number validator.

/// Doubled digit, minus 9 when the double exceeds 9.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a sequence of digit values (0-9) with the Luhn algorithm.
///
/// # Arguments
///
/// * `digits` - Digit values, most significant first.
///
/// # Returns
///
/// `true` if the checksum is a multiple of 10. An empty slice is never
/// valid.
///
/// # Example
///
/// ```
/// use card_form::luhn::validate;
///
/// assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
/// assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    !digits.is_empty() && compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced modulo 10).
///
/// The rightmost digit is position 0 and is kept; every odd position from
/// the right is doubled.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Returns the check digit that makes `digits` followed by it pass Luhn.
///
/// # Arguments
///
/// * `digits` - The number without its check digit.
///
/// # Example
///
/// ```
/// use card_form::luhn::generate_check_digit;
///
/// assert_eq!(generate_check_digit(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), 1);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Appending a digit shifts every existing digit one position left,
    // so the doubling parity flips.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}
