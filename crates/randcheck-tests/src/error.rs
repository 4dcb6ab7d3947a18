use thiserror::Error;

/// Reasons a bit sequence cannot be scored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Input contained something other than `'0'` or `'1'`.
    #[error("invalid character {found:?} at position {position}: expected '0' or '1'")]
    InvalidCharacter { position: usize, found: char },

    /// Input is below the minimum length of the estimator that was invoked.
    #[error("sequence too short for {test}: need at least {needed} bits, got {got}")]
    SequenceTooShort {
        test: &'static str,
        needed: usize,
        got: usize,
    },
}

pub type SequenceResult<T> = Result<T, SequenceError>;

/// A test name that does not match any estimator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown test '{0}' (expected frequency, runs or longest-run)")]
pub struct UnknownTest(pub String);

/// Fail with [`SequenceError::SequenceTooShort`] when `got < needed`.
pub(crate) fn require_len(test: &'static str, needed: usize, got: usize) -> SequenceResult<()> {
    if got < needed {
        return Err(SequenceError::SequenceTooShort { test, needed, got });
    }
    Ok(())
}
