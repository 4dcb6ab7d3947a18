use log::{info, warn};
use randcheck_tests::{BitSequence, TestResult};

pub struct RunCommandConfig<'a> {
    pub input_path: Option<&'a str>,
    pub bits: Option<&'a str>,
    pub name: Option<&'a str>,
    pub threshold: f64,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let mut failed = false;
    let sequences = collect_sequences(&cfg, &mut failed);

    if sequences.is_empty() {
        eprintln!("No sequences to test.");
        std::process::exit(1);
    }

    println!(
        "Running test battery on {} sequence(s), threshold p >= {}...\n",
        sequences.len(),
        cfg.threshold
    );

    let mut all_results = Vec::new();
    for (name, bits) in sequences {
        let results = randcheck_tests::run_all_tests_with_threshold(&bits, cfg.threshold);
        let score = randcheck_tests::calculate_quality_score(&results);
        let passed = results.iter().filter(|r| r.passed).count();
        info!("{name}: {passed}/{} passed, score {score:.0}", results.len());

        println!(
            "  {name} ({} bits) → {score:.0}/100 ({passed}/{} passed)",
            bits.len(),
            results.len()
        );
        for r in &results {
            print_result(r);
        }
        println!();

        all_results.push((name, bits.len(), results));
    }

    if let Some(path) = cfg.output_path {
        match write_report(path, &report_json(&all_results)) {
            Ok(()) => println!("Results written to {path}"),
            Err(e) => {
                eprintln!("{e}");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Resolve the sequences to test; invalid ones are reported and flagged.
fn collect_sequences(cfg: &RunCommandConfig<'_>, failed: &mut bool) -> Vec<(String, BitSequence)> {
    if let Some(text) = cfg.bits {
        return match BitSequence::parse(text) {
            Ok(bits) => vec![("inline".to_string(), bits)],
            Err(e) => {
                eprintln!("Invalid --bits: {e}");
                std::process::exit(1);
            }
        };
    }

    let Some(path) = cfg.input_path else {
        return Vec::new();
    };
    let sequences = super::read_sequences(path);

    if let Some(name) = cfg.name {
        return match super::select_sequence(&sequences, name) {
            Ok(bits) => vec![(name.to_string(), bits)],
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };
    }

    let mut selected = Vec::new();
    for name in sequences.keys() {
        match super::select_sequence(&sequences, name) {
            Ok(bits) => selected.push((name.clone(), bits)),
            Err(e) => {
                warn!("skipping {name}");
                eprintln!("{e}");
                *failed = true;
            }
        }
    }
    selected
}

fn write_report(path: &str, json: &serde_json::Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(json)
        .map_err(|e| format!("Failed to serialize results: {e}"))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write {path}: {e}"))
}

fn print_result(r: &TestResult) {
    let p = match r.p_value {
        Some(p) => format!("{p:.6}"),
        None => "-".to_string(),
    };
    let verdict = if r.passed { "PASS" } else { "FAIL" };
    println!(
        "    {:<22} {:>10} {:>3} {:>5}  {}",
        r.name, p, r.grade, verdict, r.details
    );
}

fn result_json(r: &TestResult) -> serde_json::Value {
    serde_json::json!({
        "name": r.name,
        "passed": r.passed,
        "p_value": r.p_value,
        "statistic": r.statistic,
        "details": r.details,
        "grade": r.grade.to_string(),
    })
}

fn report_json(all_results: &[(String, usize, Vec<TestResult>)]) -> serde_json::Value {
    let sequences: Vec<serde_json::Value> = all_results
        .iter()
        .map(|(name, len, results)| {
            serde_json::json!({
                "name": name,
                "bits": len,
                "quality_score": randcheck_tests::calculate_quality_score(results),
                "tests": results.iter().map(result_json).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::json!({ "sequences": sequences })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_json_fields() {
        let bits = BitSequence::parse("101101").unwrap();
        let results = randcheck_tests::run_all_tests(&bits);
        let json = result_json(&results[2]);
        assert_eq!(json["name"], "Longest Run of Ones");
        assert_eq!(json["passed"], false);
        assert!(json["p_value"].is_null());
        assert_eq!(json["grade"], "F");
    }

    #[test]
    fn test_report_json_shape() {
        let bits = BitSequence::parse("101101").unwrap();
        let results = randcheck_tests::run_all_tests(&bits);
        let json = report_json(&[("java".to_string(), bits.len(), results)]);
        let seq = &json["sequences"][0];
        assert_eq!(seq["name"], "java");
        assert_eq!(seq["bits"], 6);
        assert_eq!(seq["tests"].as_array().unwrap().len(), 3);
        let p = seq["tests"][0]["p_value"].as_f64().unwrap();
        assert!((p - 0.4142161782425251).abs() < 1e-9);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let path = path.to_str().unwrap();
        write_report(path, &serde_json::json!({ "sequences": [] })).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["sequences"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_write_report_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = write_report(path.to_str().unwrap(), &serde_json::json!({})).unwrap_err();
        assert!(err.starts_with("Failed to write"));
    }

    #[test]
    fn test_collect_inline_bits() {
        let cfg = RunCommandConfig {
            input_path: None,
            bits: Some("0110"),
            name: None,
            threshold: 0.01,
            output_path: None,
        };
        let mut failed = false;
        let sequences = collect_sequences(&cfg, &mut failed);
        assert!(!failed);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].0, "inline");
        assert_eq!(sequences[0].1.len(), 4);
    }
}
