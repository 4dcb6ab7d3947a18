pub fn run(input_path: &str) {
    let sequences = super::read_sequences(input_path);

    println!("Found {} sequence(s) in {input_path}:\n", sequences.len());
    for (name, text) in &sequences {
        println!("  {:<25} {:>8} bits", name, text.chars().count());
    }

    if sequences.is_empty() {
        println!("  (none found)");
    }
}
