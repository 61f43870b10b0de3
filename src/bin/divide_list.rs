use std::path::PathBuf;

use clap::Parser;

use lineutils::common::{die, init_logging, parse_cli, reset_sigpipe};
use lineutils::divide::{self, DivideConfig};

const TOOL_NAME: &str = "divide-list";

#[derive(Parser)]
#[command(
    name = "divide-list",
    version,
    about = "Split a text file into a fixed number of parts by line count"
)]
struct Cli {
    /// File to divide
    input: PathBuf,

    /// Number of parts to create (at least 1)
    parts: u64,

    /// Directory receiving <stem>_part_<N>.txt
    output_dir: PathBuf,

    /// Log every part file as it is created
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = DivideConfig {
        parts: cli.parts,
        output_dir: cli.output_dir,
        verbose: cli.verbose,
    };

    if let Err(e) = divide::divide(&cli.input, &config) {
        die(TOOL_NAME, &e);
    }
}
