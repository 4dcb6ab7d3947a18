//! NIST SP 800-22 randomness tests over strings of `'0'`/`'1'` characters.
//!
//! Three independent estimators are provided: the monobit frequency test, the
//! consecutive-run test and the longest-run-of-ones test. Each returns a
//! p-value in `[0, 1]`; values near 1 look random, values near 0 do not.
//!
//! ```
//! let bits = "10110101101100010110001011101110011011111100111110000101010100010001110100111001110000011011011001011100011101110001111111000100";
//! let p = randcheck_tests::frequency_score(bits).unwrap();
//! assert!((p - 0.2888443663464849).abs() < 1e-9);
//! ```
//!
//! The battery layer ([`run_all_tests`]) wraps each estimator into a graded
//! [`TestResult`] for reporting.

mod error;
mod sequence;

pub use error::{SequenceError, SequenceResult, UnknownTest};
pub use sequence::BitSequence;

use error::require_len;
use log::debug;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;
use std::fmt;
use std::str::FromStr;

/// Significance level used by [`run_all_tests`].
pub const DEFAULT_SIGNIFICANCE: f64 = 0.01;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw outcome of one estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub p_value: f64,
    pub statistic: f64,
    pub details: String,
}

/// Result of a single randomness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold.
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_outcome(name: &str, outcome: SequenceResult<Measurement>, threshold: f64) -> Self {
        match outcome {
            Ok(m) => TestResult {
                name: name.to_string(),
                passed: TestResult::pass_from_p(Some(m.p_value), threshold),
                p_value: Some(m.p_value),
                statistic: m.statistic,
                details: m.details,
                grade: TestResult::grade_from_p(Some(m.p_value)),
            },
            Err(e) => TestResult {
                name: name.to_string(),
                passed: false,
                p_value: None,
                statistic: 0.0,
                details: e.to_string(),
                grade: 'F',
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. FREQUENCY
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency: how far the count of 1s strays from half of `n`.
///
/// S = ones - zeros, p = erfc(|S| / sqrt(n) / sqrt(2)). Needs at least one bit.
pub fn frequency(bits: &BitSequence) -> SequenceResult<Measurement> {
    let n = bits.len();
    require_len("Monobit Frequency", 1, n)?;
    let ones = bits.ones() as i64;
    let s = 2 * ones - n as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    debug!("monobit: n={n} S={s} s_obs={s_obs:.6} p={p}");
    Ok(Measurement {
        p_value: p,
        statistic: s_obs,
        details: format!("S={s}, n={n}"),
    })
}

/// [`frequency`] over a `'0'`/`'1'` string.
pub fn frequency_score(sequence: &str) -> SequenceResult<f64> {
    frequency(&BitSequence::parse(sequence)?).map(|m| m.p_value)
}

pub fn monobit_frequency(bits: &BitSequence, threshold: f64) -> TestResult {
    TestResult::from_outcome(TestKind::Frequency.title(), frequency(bits), threshold)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. RUNS
// ═══════════════════════════════════════════════════════════════════════════════

/// Consecutive-run test: does the rate of 0/1 transitions match independent bits?
///
/// Short-circuits to p = 0.0 when the proportion of ones fails the frequency
/// pre-test (|π - 0.5| >= 2/sqrt(n)) or when every bit is identical. `V` is the
/// number of adjacent pairs whose bits differ. Needs at least two bits.
pub fn run_consistency(bits: &BitSequence) -> SequenceResult<Measurement> {
    let n = bits.len();
    require_len("Runs Test", 2, n)?;
    let ones = bits.ones();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() || ones == 0 || ones == n {
        debug!("runs: pre-test failed, proportion={prop:.4} n={n}");
        return Ok(Measurement {
            p_value: 0.0,
            statistic: 0.0,
            details: format!("Pre-test failed: proportion={prop:.4}"),
        });
    }

    let transitions = bits
        .as_slice()
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .count();
    let spread = prop * (1.0 - prop);
    let expected = 2.0 * n as f64 * spread;
    let z = (transitions as f64 - expected).abs() / (2.0 * (2.0 * n as f64).sqrt() * spread);
    let p = erfc(z);
    debug!("runs: n={n} V={transitions} expected={expected:.3} p={p}");
    Ok(Measurement {
        p_value: p,
        statistic: z,
        details: format!("transitions={transitions}, expected={expected:.2}"),
    })
}

/// [`run_consistency`] over a `'0'`/`'1'` string.
pub fn run_consistency_score(sequence: &str) -> SequenceResult<f64> {
    run_consistency(&BitSequence::parse(sequence)?).map(|m| m.p_value)
}

pub fn runs_test(bits: &BitSequence, threshold: f64) -> TestResult {
    TestResult::from_outcome(TestKind::Runs.title(), run_consistency(bits), threshold)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. LONGEST RUN OF ONES
// ═══════════════════════════════════════════════════════════════════════════════

/// Block size and reference distribution for one sequence-length range.
#[derive(Debug)]
struct Regime {
    min_len: usize,
    block_size: usize,
    /// Longest-run value of the first class; it also absorbs anything shorter.
    lowest: usize,
    /// Class probabilities; the last class absorbs anything longer.
    probs: &'static [f64],
}

/// SP 800-22 section 2.4 tables, longest sequences first.
static REGIMES: [Regime; 3] = [
    Regime {
        min_len: 750_000,
        block_size: 10_000,
        lowest: 10,
        probs: &[0.0882, 0.2092, 0.2483, 0.1933, 0.1208, 0.0675, 0.0727],
    },
    Regime {
        min_len: 6272,
        block_size: 128,
        lowest: 4,
        probs: &[0.1174, 0.2430, 0.2493, 0.1752, 0.1027, 0.1124],
    },
    Regime {
        min_len: 128,
        block_size: 8,
        lowest: 1,
        probs: &[0.2148, 0.3672, 0.2305, 0.1875],
    },
];

/// Minimum length accepted by [`longest_run`].
pub const LONGEST_RUN_MIN_BITS: usize = 128;

fn longest_ones(block: &[u8]) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for &bit in block {
        if bit == 1 {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

/// Longest-run-of-ones test: chi-square of per-block longest runs against the
/// tabulated distribution for the sequence's length regime.
///
/// | n          | M      | classes          |
/// |------------|--------|------------------|
/// | >= 750000  | 10000  | <=10 .. >=16     |
/// | >= 6272    | 128    | <=4 .. >=9       |
/// | >= 128     | 8      | <=1, 2, 3, >=4   |
///
/// Trailing bits that do not fill a whole block are ignored, so reversing the
/// sequence leaves the p-value unchanged only when `n` is a multiple of `M`.
pub fn longest_run(bits: &BitSequence) -> SequenceResult<Measurement> {
    let n = bits.len();
    let Some(regime) = REGIMES.iter().find(|r| n >= r.min_len) else {
        return Err(SequenceError::SequenceTooShort {
            test: "Longest Run of Ones",
            needed: LONGEST_RUN_MIN_BITS,
            got: n,
        });
    };

    let classes = regime.probs.len();
    let highest = regime.lowest + classes - 1;
    let mut observed = vec![0u64; classes];
    for block in bits.as_slice().chunks_exact(regime.block_size) {
        let run = longest_ones(block).clamp(regime.lowest, highest);
        observed[run - regime.lowest] += 1;
    }
    let num_blocks = n / regime.block_size;

    let chi2: f64 = observed
        .iter()
        .zip(regime.probs)
        .map(|(&count, &prob)| {
            let expected = prob * num_blocks as f64;
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let df = (classes - 1) as f64;
    let p = ChiSquared::new(df).map(|dist| dist.sf(chi2)).unwrap_or(0.0);
    debug!(
        "longest run: n={n} M={} K={num_blocks} observed={observed:?} chi2={chi2:.6} p={p}",
        regime.block_size
    );
    Ok(Measurement {
        p_value: p,
        statistic: chi2,
        details: format!(
            "blocks={num_blocks}, M={}, observed={observed:?}",
            regime.block_size
        ),
    })
}

/// [`longest_run`] over a `'0'`/`'1'` string.
pub fn longest_run_score(sequence: &str) -> SequenceResult<f64> {
    longest_run(&BitSequence::parse(sequence)?).map(|m| m.p_value)
}

pub fn longest_run_of_ones(bits: &BitSequence, threshold: f64) -> TestResult {
    TestResult::from_outcome(TestKind::LongestRun.title(), longest_run(bits), threshold)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// The three estimators, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    Frequency,
    Runs,
    LongestRun,
}

impl TestKind {
    pub const ALL: [TestKind; 3] = [TestKind::Frequency, TestKind::Runs, TestKind::LongestRun];

    /// Short name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            TestKind::Frequency => "frequency",
            TestKind::Runs => "runs",
            TestKind::LongestRun => "longest-run",
        }
    }

    /// Display name used in [`TestResult::name`].
    pub fn title(self) -> &'static str {
        match self {
            TestKind::Frequency => "Monobit Frequency",
            TestKind::Runs => "Runs Test",
            TestKind::LongestRun => "Longest Run of Ones",
        }
    }

    pub fn measure(self, bits: &BitSequence) -> SequenceResult<Measurement> {
        match self {
            TestKind::Frequency => frequency(bits),
            TestKind::Runs => run_consistency(bits),
            TestKind::LongestRun => longest_run(bits),
        }
    }

    pub fn score(self, bits: &BitSequence) -> SequenceResult<f64> {
        self.measure(bits).map(|m| m.p_value)
    }

    pub fn run(self, bits: &BitSequence, threshold: f64) -> TestResult {
        match self {
            TestKind::Frequency => monobit_frequency(bits, threshold),
            TestKind::Runs => runs_test(bits, threshold),
            TestKind::LongestRun => longest_run_of_ones(bits, threshold),
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestKind {
    type Err = UnknownTest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frequency" | "monobit" => Ok(TestKind::Frequency),
            "runs" | "run" | "consecutive" => Ok(TestKind::Runs),
            "longest-run" | "longest_run" | "longest" => Ok(TestKind::LongestRun),
            _ => Err(UnknownTest(s.to_string())),
        }
    }
}

/// Run the full battery at [`DEFAULT_SIGNIFICANCE`].
pub fn run_all_tests(bits: &BitSequence) -> Vec<TestResult> {
    run_all_tests_with_threshold(bits, DEFAULT_SIGNIFICANCE)
}

/// Run the full battery, passing tests whose p-value is at least `threshold`.
pub fn run_all_tests_with_threshold(bits: &BitSequence, threshold: f64) -> Vec<TestResult> {
    TestKind::ALL
        .iter()
        .map(|kind| kind.run(bits, threshold))
        .collect()
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
