//! CLI for randcheck — NIST frequency, runs and longest-run tests on bit strings.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "randcheck")]
#[command(about = "randcheck — NIST randomness tests for named bit sequences")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the named sequences in a JSON file and their lengths
    List {
        /// JSON object mapping names to strings of '0'/'1'
        #[arg(long)]
        input: String,
    },

    /// Run the test battery with pass/fail, p-values and grades
    Run {
        /// JSON object mapping names to strings of '0'/'1'
        #[arg(long, conflicts_with = "bits", required_unless_present = "bits")]
        input: Option<String>,

        /// Test a literal bit string instead of a file
        #[arg(long)]
        bits: Option<String>,

        /// Only test the sequence with this name
        #[arg(long, requires = "input")]
        name: Option<String>,

        /// Minimum p-value for a test to pass
        #[arg(long, default_value = "0.01")]
        threshold: f64,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Compare one test's p-value against an expected value
    Check {
        /// JSON object mapping names to strings of '0'/'1'
        #[arg(long)]
        input: String,

        /// Name of the sequence to test
        #[arg(long)]
        name: String,

        /// Test to run
        #[arg(long, value_parser = ["frequency", "runs", "longest-run"])]
        test: String,

        /// Expected p-value
        #[arg(long)]
        expected: f64,

        /// Allowed absolute difference
        #[arg(long, default_value = "1e-9")]
        tolerance: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { input } => commands::list::run(&input),
        Commands::Run {
            input,
            bits,
            name,
            threshold,
            output,
        } => commands::run::run(commands::run::RunCommandConfig {
            input_path: input.as_deref(),
            bits: bits.as_deref(),
            name: name.as_deref(),
            threshold,
            output_path: output.as_deref(),
        }),
        Commands::Check {
            input,
            name,
            test,
            expected,
            tolerance,
        } => commands::check::run(&input, &name, &test, expected, tolerance),
    }
}
