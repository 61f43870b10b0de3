use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use lineutils::affix::AffixRules;
use lineutils::common::{IoResultExt, die, init_logging, parse_cli, reset_sigpipe};
use lineutils::edit::{self, EditConfig};

const TOOL_NAME: &str = "edit-lines";

#[derive(Parser)]
#[command(
    name = "edit-lines",
    version,
    about = "Remove or add a prefix and suffix on every line of a file"
)]
struct Cli {
    /// Prefix removed from each line when present
    #[arg(long = "rmpre", value_name = "PREFIX", default_value = "")]
    rmpre: String,

    /// Suffix removed from each line when present
    #[arg(long = "rmpos", value_name = "SUFFIX", default_value = "")]
    rmpos: String,

    /// Prefix added to each line
    #[arg(long = "addpre", value_name = "PREFIX", default_value = "")]
    addpre: String,

    /// Suffix added to each line
    #[arg(long = "addpos", value_name = "SUFFIX", default_value = "")]
    addpos: String,

    /// Rewrite FILE instead of printing the result
    #[arg(short = 'I', long = "in-place")]
    in_place: bool,

    file: PathBuf,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = EditConfig {
        rules: AffixRules {
            remove_prefix: cli.rmpre,
            remove_suffix: cli.rmpos,
            add_prefix: cli.addpre,
            add_suffix: cli.addpos,
        },
        in_place: cli.in_place,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(256 * 1024, stdout.lock());
    let result = edit::edit_file(&cli.file, &config, &mut out)
        .and_then(|_| out.flush().with_path("standard output"));

    if let Err(e) = result {
        die(TOOL_NAME, &e);
    }
}
