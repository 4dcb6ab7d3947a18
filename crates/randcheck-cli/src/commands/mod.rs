pub mod check;
pub mod list;
pub mod run;

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use randcheck_tests::BitSequence;

/// Parse a JSON object of `name -> bit string`.
///
/// Values are kept as raw text; they are validated when a sequence is selected.
pub fn parse_sequences(contents: &str) -> Result<BTreeMap<String, String>, String> {
    serde_json::from_str::<BTreeMap<String, String>>(contents)
        .map_err(|e| format!("expected a JSON object of name -> bit string: {e}"))
}

/// Read and parse a sequence file.
pub fn try_read_sequences(path: &Path) -> Result<BTreeMap<String, String>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let sequences =
        parse_sequences(&contents).map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    info!("loaded {} sequence(s) from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// [`try_read_sequences`], exiting with status 1 on failure.
pub fn read_sequences(path: &str) -> BTreeMap<String, String> {
    match try_read_sequences(Path::new(path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Look up a sequence by name and validate it.
pub fn select_sequence(
    sequences: &BTreeMap<String, String>,
    name: &str,
) -> Result<BitSequence, String> {
    let text = sequences.get(name).ok_or_else(|| {
        let known: Vec<&str> = sequences.keys().map(String::as_str).collect();
        format!("Sequence '{name}' not found (available: {})", known.join(", "))
    })?;
    let bits = BitSequence::parse(text).map_err(|e| format!("Sequence '{name}': {e}"))?;
    debug!("selected '{name}' ({} bits)", bits.len());
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{"cpp": "10110101", "java": "101101"}"#;

    // -----------------------------------------------------------------------
    // parse_sequences tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_sequences() {
        let sequences = parse_sequences(SAMPLE).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences["java"], "101101");
    }

    #[test]
    fn test_parse_rejects_non_string_values() {
        assert!(parse_sequences(r#"{"cpp": 101}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_arrays() {
        let err = parse_sequences(r#"["101"]"#).unwrap_err();
        assert!(err.contains("JSON object"));
    }

    // -----------------------------------------------------------------------
    // select_sequence tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_select_known_name() {
        let sequences = parse_sequences(SAMPLE).unwrap();
        let bits = select_sequence(&sequences, "java").unwrap();
        assert_eq!(bits.to_string(), "101101");
    }

    #[test]
    fn test_select_unknown_name_lists_keys() {
        let sequences = parse_sequences(SAMPLE).unwrap();
        let err = select_sequence(&sequences, "python").unwrap_err();
        assert!(err.contains("'python' not found"));
        assert!(err.contains("cpp, java"));
    }

    #[test]
    fn test_select_invalid_bits() {
        let sequences = parse_sequences(r#"{"bad": "10a1"}"#).unwrap();
        let err = select_sequence(&sequences, "bad").unwrap_err();
        assert!(err.contains("invalid character 'a' at position 2"));
    }

    // -----------------------------------------------------------------------
    // try_read_sequences tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let sequences = try_read_sequences(file.path()).unwrap();
        assert_eq!(sequences["cpp"], "10110101");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = try_read_sequences(&dir.path().join("gen_results.json")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn test_read_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"cpp\": ").unwrap();
        let err = try_read_sequences(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse"));
    }
}
