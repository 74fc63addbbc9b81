//! Card networks and the per-network rules the form depends on.
//!
//! A [`CardNetwork`] parameterizes three things: which card number lengths
//! are acceptable, how many CVV digits are expected, and how the number is
//! grouped while the user types.

use crate::mask::Mask;
use serde::Deserialize;
use std::fmt;

/// Maximum number of digits in a card number.
pub const MAX_CARD_DIGITS: usize = 19;

/// Minimum number of digits in a card number.
pub const MIN_CARD_DIGITS: usize = 12;

/// Default card number pattern, wide enough for 19-digit cards.
pub const CARD_NUMBER_PATTERN: &str = "#### #### #### #### ###";

const AMEX_PATTERN: &str = "#### ###### #####";
// 14-digit cards group 4-6-4; longer ones run on in the last group
const DINERS_PATTERN: &str = "#### ###### #### #####";

/// Card networks known to the form.
///
/// The network is selected outside the form (card scanner, prefix detector)
/// and handed in; `Unknown` is the starting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardNetwork {
    /// Visa - prefix 4, lengths 13, 16, 19
    Visa,
    /// Mastercard - prefix 51-55, 2221-2720, length 16
    Mastercard,
    /// American Express - prefix 34, 37, length 15
    Amex,
    /// Discover - prefix 6011, 644-649, 65, length 16-19
    Discover,
    /// Diners Club - prefix 36, 38, 300-305, length 14-19
    DinersClub,
    /// JCB - prefix 3528-3589, length 16-19
    Jcb,
    /// UnionPay - prefix 62, length 16-19
    UnionPay,
    /// Maestro - prefix 50, 56-69, length 12-19
    Maestro,
    /// Mir - prefix 2200-2204, length 16-19
    Mir,
    /// Elo - prefix 509, 6362, 6363, length 16
    Elo,
    /// Not yet known.
    #[default]
    Unknown,
}

impl CardNetwork {
    /// Every known network, `Unknown` excluded.
    pub const KNOWN: [CardNetwork; 10] = [
        Self::Visa,
        Self::Mastercard,
        Self::Amex,
        Self::Discover,
        Self::DinersClub,
        Self::Jcb,
        Self::UnionPay,
        Self::Maestro,
        Self::Mir,
        Self::Elo,
    ];

    /// Returns the valid card number lengths for this network.
    #[inline]
    pub const fn valid_lengths(&self) -> &'static [u8] {
        match self {
            Self::Visa => &[13, 16, 19],
            Self::Mastercard => &[16],
            Self::Amex => &[15],
            Self::Discover => &[16, 17, 18, 19],
            Self::DinersClub => &[14, 15, 16, 17, 18, 19],
            Self::Jcb => &[16, 17, 18, 19],
            Self::UnionPay => &[16, 17, 18, 19],
            Self::Maestro | Self::Unknown => &[12, 13, 14, 15, 16, 17, 18, 19],
            Self::Mir => &[16, 17, 18, 19],
            Self::Elo => &[16],
        }
    }

    /// Returns true if a number of `length` digits is acceptable.
    #[inline]
    pub fn is_valid_length(&self, length: usize) -> bool {
        self.valid_lengths().iter().any(|&l| l as usize == length)
    }

    /// Shortest valid number length.
    #[inline]
    pub fn min_length(&self) -> usize {
        self.valid_lengths().first().map_or(MIN_CARD_DIGITS, |&l| l as usize)
    }

    /// Longest valid number length.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.valid_lengths().last().map_or(MAX_CARD_DIGITS, |&l| l as usize)
    }

    /// Longest number the user can still type for this network.
    ///
    /// The smaller of the network's longest valid length and the digit
    /// slots of its [`number_pattern`](Self::number_pattern).
    #[inline]
    pub fn max_typeable_length(&self) -> usize {
        Mask::new(self.number_pattern())
            .digit_slots()
            .min(self.max_length())
    }

    /// Expected CVV length, `None` when the network is unknown.
    ///
    /// American Express prints a 4 digit code on the front, everyone else a
    /// 3 digit code on the back.
    #[inline]
    pub const fn cvv_length(&self) -> Option<usize> {
        match self {
            Self::Amex => Some(4),
            Self::Unknown => None,
            _ => Some(3),
        }
    }

    /// Mask pattern used to group the card number while typing.
    #[inline]
    pub const fn number_pattern(&self) -> &'static str {
        match self {
            Self::Amex => AMEX_PATTERN,
            Self::DinersClub => DINERS_PATTERN,
            _ => CARD_NUMBER_PATTERN,
        }
    }

    /// Returns a human-readable name for the network.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "American Express",
            Self::Discover => "Discover",
            Self::DinersClub => "Diners Club",
            Self::Jcb => "JCB",
            Self::UnionPay => "UnionPay",
            Self::Maestro => "Maestro",
            Self::Mir => "Mir",
            Self::Elo => "Elo",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
