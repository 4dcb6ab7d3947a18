//! The bit string every estimator consumes.

use std::fmt;
use std::str::FromStr;

use crate::error::{SequenceError, SequenceResult};

/// Immutable sequence of bits, one `u8` (0 or 1) per position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Parse a string of ASCII `'0'`/`'1'` characters.
    ///
    /// The whole input is validated before anything is returned; the first
    /// offending character is reported with its position.
    pub fn parse(text: &str) -> SequenceResult<Self> {
        let mut bits = Vec::with_capacity(text.len());
        for (position, ch) in text.chars().enumerate() {
            match ch {
                '0' => bits.push(0),
                '1' => bits.push(1),
                found => return Err(SequenceError::InvalidCharacter { position, found }),
            }
        }
        Ok(Self { bits })
    }

    /// Unpack a byte slice into bits (MSB first per byte).
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(data.len() * 8);
        for &byte in data {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1);
            }
        }
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of `1` bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().map(|&b| b as usize).sum()
    }

    /// Every bit flipped.
    pub fn complement(&self) -> Self {
        Self {
            bits: self.bits.iter().map(|&b| b ^ 1).collect(),
        }
    }

    /// Bits in reverse order.
    pub fn reversed(&self) -> Self {
        Self {
            bits: self.bits.iter().rev().copied().collect(),
        }
    }
}

impl FromStr for BitSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let seq = BitSequence::parse("101101").unwrap();
        assert_eq!(seq.as_slice(), &[1, 0, 1, 1, 0, 1]);
        assert_eq!(seq.len(), 6);
        assert_eq!(seq.ones(), 4);
    }

    #[test]
    fn test_parse_empty_is_allowed() {
        let seq = BitSequence::parse("").unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_parse_rejects_other_characters() {
        assert_eq!(
            BitSequence::parse("10120"),
            Err(SequenceError::InvalidCharacter {
                position: 3,
                found: '2'
            })
        );
        // Whitespace is not silently skipped.
        assert_eq!(
            BitSequence::parse("1100 0100"),
            Err(SequenceError::InvalidCharacter {
                position: 4,
                found: ' '
            })
        );
    }

    #[test]
    fn test_parse_position_counts_chars_not_bytes() {
        assert_eq!(
            BitSequence::parse("1é0"),
            Err(SequenceError::InvalidCharacter {
                position: 1,
                found: 'é'
            })
        );
    }

    #[test]
    fn test_from_bytes_msb_first() {
        let seq = BitSequence::from_bytes(&[0b1011_0001]);
        assert_eq!(seq.as_slice(), &[1, 0, 1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_display_round_trips_text() {
        let text = "0011010";
        let seq: BitSequence = text.parse().unwrap();
        assert_eq!(seq.to_string(), text);
    }

    #[test]
    fn test_complement_and_reverse() {
        let seq = BitSequence::parse("1100").unwrap();
        assert_eq!(seq.complement().to_string(), "0011");
        assert_eq!(seq.reversed().to_string(), "0011");
        assert_eq!(seq.complement().ones(), 2);
    }
}
