use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use lineutils::affix::AffixRules;
use lineutils::common::{die, init_logging, io_error_msg, parse_cli, reset_sigpipe};
use lineutils::rename::{self, RenameConfig, RenameOutcome};

const TOOL_NAME: &str = "rename-files";

#[derive(Parser)]
#[command(
    name = "rename-files",
    version,
    about = "Rename files by removing or adding a prefix and suffix on their names"
)]
struct Cli {
    /// Prefix removed from each name when present
    #[arg(long = "rmpre", value_name = "PREFIX", default_value = "")]
    rmpre: String,

    /// Suffix removed from each name when present
    #[arg(long = "rmpos", value_name = "SUFFIX", default_value = "")]
    rmpos: String,

    /// Prefix added to each name
    #[arg(long = "addpre", value_name = "PREFIX", default_value = "")]
    addpre: String,

    /// Suffix added to each name
    #[arg(long = "addpos", value_name = "SUFFIX", default_value = "")]
    addpos: String,

    /// Perform the renames (default only reports them)
    #[arg(short = 'I', long = "in-place")]
    in_place: bool,

    /// Do not overwrite an existing file
    #[arg(short = 'n', long = "no-clobber")]
    no_clobber: bool,

    /// Process every file below DIR, recursively
    #[arg(long = "dir", value_name = "DIR", conflicts_with = "files")]
    dir: Option<PathBuf>,

    /// Files to rename
    #[arg(required_unless_present = "dir")]
    files: Vec<PathBuf>,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = RenameConfig {
        rules: AffixRules {
            remove_prefix: cli.rmpre,
            remove_suffix: cli.rmpos,
            add_prefix: cli.addpre,
            add_suffix: cli.addpos,
        },
        in_place: cli.in_place,
        no_clobber: cli.no_clobber,
    };

    let outcomes = match &cli.dir {
        Some(dir) => match rename::rename_dir(dir, &config) {
            Ok(outcomes) => outcomes,
            Err(e) => die(TOOL_NAME, &e),
        },
        None => rename::rename_files(&cli.files, &config),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut failed = false;
    for outcome in &outcomes {
        match outcome {
            RenameOutcome::Renamed { .. } | RenameOutcome::WouldRename { .. } => {
                if let Err(e) = writeln!(out, "{}", outcome) {
                    die(TOOL_NAME, &format!("write error: {}", io_error_msg(&e)));
                }
            }
            _ => failed |= outcome.is_failure(),
        }
    }
    if let Err(e) = out.flush() {
        die(TOOL_NAME, &format!("write error: {}", io_error_msg(&e)));
    }

    if failed {
        process::exit(1);
    }
}
