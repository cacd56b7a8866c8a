use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b1s0:                 0000_0000_0000_0010_0000_0000_0000_0001
/// b12345678s012345678:  0000_0001_1111_1110_0000_0001_1111_1111
/// ```
///
/// Bit `i` of either half being set means `i` live neighbors trigger a birth (or survival).
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Neighbor counts must be between 0 and 8, got '{got}'")]
    InvalidCount { got: char },

    #[error("Unexpected character '{got}'")]
    InvalidToken { got: char },

    #[error("Expected survivals and births separated by '/'")]
    MissingSeparator,

    #[error("Births on 0 neighbors would fill the whole plane")]
    BirthOnZero,

    #[error("Empty rule")]
    Empty,
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and `s`, numbers
    /// are set on a bit basis. Any bit past the 8th is ignored.
    ///
    /// Births on 0 neighbors are dropped, since no board could apply them to the whole plane.
    /// Parsing rejects them instead.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FE;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Whether a cell is alive in the next generation, given its current state and number of
    /// live neighbors.
    pub const fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let mask = 1 << neighbors;

        if alive {
            self.survivals() & mask != 0
        } else {
            self.births() & mask != 0
        }
    }

    /// Parse nameless rules like `23/3`, as found in RLE `#r` lines. Survivals come first.
    pub fn from_nameless(s: &str) -> Result<Self, RuleError> {
        let s = s.trim();
        let Some((survivals, births)) = s.split_once('/') else {
            return Err(RuleError::MissingSeparator);
        };

        Self::checked(digits_to_bits(births)?, digits_to_bits(survivals)?)
    }

    fn checked(b: u16, s: u16) -> Result<Self, RuleError> {
        if b & 1 == 1 {
            return Err(RuleError::BirthOnZero);
        }

        Ok(Self::new(b, s))
    }
}

/// Convert the human readable birth/survival digits to a packed bit representation
fn digits_to_bits(s: &str) -> Result<u16, RuleError> {
    let mut n = 0;

    for c in s.chars() {
        let Some(d) = c.to_digit(10) else {
            return Err(RuleError::InvalidToken { got: c });
        };

        if d > 8 {
            return Err(RuleError::InvalidCount { got: c });
        }

        n |= 1 << d;
    }

    Ok(n)
}

impl FromStr for RuleSet {
    type Err = RuleError;

    /// Parses `B3/S23` style rules. Case and the `/` separator are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum State {
            Start,
            Birth,
            Survival,
        }

        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        // Without letters, this is the `S/B` notation
        if !s.chars().any(|c| c.is_ascii_alphabetic()) {
            return Self::from_nameless(s);
        }

        let mut state = State::Start;
        let (mut b, mut s_) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' => state = State::Birth,
                's' | 'S' => state = State::Survival,
                '/' => {}
                c => {
                    let Some(n) = c.to_digit(10) else {
                        return Err(RuleError::InvalidToken { got: c });
                    };

                    if n > 8 {
                        return Err(RuleError::InvalidCount { got: c });
                    }

                    match state {
                        State::Start => return Err(RuleError::InvalidToken { got: c }),
                        State::Birth => b |= 1 << n,
                        State::Survival => s_ |= 1 << n,
                    }
                }
            }
        }

        Self::checked(b, s_)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |bits: u16| -> String {
            (0..=8u8)
                .filter(|&i| bits & (1 << i) != 0)
                .map(|i| char::from(b'0' + i))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}
