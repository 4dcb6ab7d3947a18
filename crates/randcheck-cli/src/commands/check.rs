use log::debug;
use randcheck_tests::TestKind;

pub fn run(input_path: &str, name: &str, test: &str, expected: f64, tolerance: f64) {
    let kind: TestKind = match test.parse() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let sequences = super::read_sequences(input_path);
    let bits = match super::select_sequence(&sequences, name) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let actual = match kind.score(&bits) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{kind} on '{name}': {e}");
            std::process::exit(1);
        }
    };
    debug!("{kind} on '{name}': actual={actual} expected={expected} tolerance={tolerance}");

    if within_tolerance(actual, expected, tolerance) {
        println!("PASS  {kind} on '{name}': {actual} (expected {expected})");
    } else {
        println!(
            "FAIL  {kind} on '{name}': {actual} (expected {expected}, off by {:e})",
            (actual - expected).abs()
        );
        std::process::exit(1);
    }
}

/// `true` when `actual` is within `tolerance` of `expected`. NaN never matches.
fn within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}
