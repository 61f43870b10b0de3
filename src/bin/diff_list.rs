use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use lineutils::affix::Trim;
use lineutils::common::{IoResultExt, die, init_logging, parse_cli, reset_sigpipe};
use lineutils::difflist::{self, DiffConfig};

const TOOL_NAME: &str = "diff-list";

#[derive(Parser)]
#[command(
    name = "diff-list",
    version,
    about = "Print the lines of FILE1 that do not appear in FILE2"
)]
struct Cli {
    /// Only print line counts
    #[arg(long = "count")]
    count: bool,

    /// Prefix stripped from FILE1 lines before comparing
    #[arg(long = "pre1", value_name = "PREFIX", default_value = "")]
    pre1: String,

    /// Suffix stripped from FILE1 lines before comparing
    #[arg(long = "suffix1", alias = "sufix1", value_name = "SUFFIX", default_value = "")]
    suffix1: String,

    /// Prefix stripped from FILE2 lines before comparing
    #[arg(long = "pre2", value_name = "PREFIX", default_value = "")]
    pre2: String,

    /// Suffix stripped from FILE2 lines before comparing
    #[arg(long = "suffix2", alias = "sufix2", value_name = "SUFFIX", default_value = "")]
    suffix2: String,

    file1: PathBuf,
    file2: PathBuf,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = DiffConfig {
        count_only: cli.count,
        trim1: Trim::new(cli.pre1, cli.suffix1),
        trim2: Trim::new(cli.pre2, cli.suffix2),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(256 * 1024, stdout.lock());

    let result = difflist::diff_files(&cli.file1, &cli.file2, &config, &mut out).and_then(
        |summary| {
            if config.count_only {
                let name1 = cli.file1.to_string_lossy();
                let name2 = cli.file2.to_string_lossy();
                difflist::write_summary(&mut out, &name1, &name2, &summary)
                    .with_path("standard output")?;
            }
            out.flush().with_path("standard output")
        },
    );

    if let Err(e) = result {
        die(TOOL_NAME, &e);
    }
}
