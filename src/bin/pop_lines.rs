use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use lineutils::common::{IoResultExt, die, init_logging, parse_cli, reset_sigpipe};
use lineutils::pop::{self, PopConfig};

const TOOL_NAME: &str = "pop-lines";

#[derive(Parser)]
#[command(
    name = "pop-lines",
    version,
    about = "Print the lines of a file matching a regular expression, optionally removing them"
)]
struct Cli {
    /// Also remove the matching lines from FILE
    #[arg(short = 'R', long = "remove")]
    remove: bool,

    /// Regular expression tested against each line
    regex: String,

    file: PathBuf,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = PopConfig {
        pattern: cli.regex,
        remove: cli.remove,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(256 * 1024, stdout.lock());
    let result = pop::pop_file(&cli.file, &config, &mut out)
        .and_then(|_| out.flush().with_path("standard output"));

    if let Err(e) = result {
        die(TOOL_NAME, &e);
    }
}
