//! Shared types used across modules
//!
//! Small domain types for the 4FSK symbol alphabet and the soft-decision
//! values flowing between the slicer, the framer and the decoder.

/// One 4FSK symbol level.
///
/// The M17 dibit mapping puts the high bit on the sign and the low bit on
/// the magnitude: +1 -> 00, +3 -> 01, -1 -> 10, -3 -> 11. The high bit is
/// transmitted first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// +1 level, dibit 00
    PlusOne,
    /// +3 level, dibit 01
    PlusThree,
    /// -1 level, dibit 10
    MinusOne,
    /// -3 level, dibit 11
    MinusThree,
}

impl Symbol {
    /// Dibit value of this symbol (0b00..=0b11, high bit first on air)
    #[must_use]
    pub const fn dibit(self) -> u8 {
        match self {
            Self::PlusOne => 0b00,
            Self::PlusThree => 0b01,
            Self::MinusOne => 0b10,
            Self::MinusThree => 0b11,
        }
    }

    /// Symbol for a dibit value (low two bits)
    #[must_use]
    pub const fn from_dibit(dibit: u8) -> Self {
        match dibit & 0b11 {
            0b00 => Self::PlusOne,
            0b01 => Self::PlusThree,
            0b10 => Self::MinusOne,
            _ => Self::MinusThree,
        }
    }

    /// Nominal level on the conditioned grid
    #[must_use]
    pub const fn level(self) -> f32 {
        match self {
            Self::PlusOne => 1.0,
            Self::PlusThree => 3.0,
            Self::MinusOne => -1.0,
            Self::MinusThree => -3.0,
        }
    }

    /// True for the ±3 levels
    #[must_use]
    pub const fn is_outer(self) -> bool {
        matches!(self, Self::PlusThree | Self::MinusThree)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Symbol {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PlusOne => defmt::write!(fmt, "+1"),
            Self::PlusThree => defmt::write!(fmt, "+3"),
            Self::MinusOne => defmt::write!(fmt, "-1"),
            Self::MinusThree => defmt::write!(fmt, "-3"),
        }
    }
}

/// Soft-decision form of one symbol: two log-likelihood bits in
/// transmission order, positive meaning bit 1, saturating at ±127.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SoftDibit {
    /// First transmitted bit (sign of the symbol level)
    pub first: i8,
    /// Second transmitted bit (inner/outer magnitude)
    pub second: i8,
}

impl SoftDibit {
    /// Build from the two soft bits in transmission order
    #[must_use]
    pub const fn new(first: i8, second: i8) -> Self {
        Self { first, second }
    }

    /// Hard dibit recovered from the soft signs
    #[must_use]
    pub const fn hard(self) -> u8 {
        let hi = (self.first >= 0) as u8;
        let lo = (self.second >= 0) as u8;
        (hi << 1) | lo
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SoftDibit {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "({}, {})", self.first, self.second);
    }
}
