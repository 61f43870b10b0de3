use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use lineutils::common::{IoResultExt, die, init_logging, parse_cli, reset_sigpipe};
use lineutils::listing::{self, ListConfig};

const TOOL_NAME: &str = "list-files";

#[derive(Parser)]
#[command(
    name = "list-files",
    version,
    about = "List the files in a directory whose names match a prefix and suffix"
)]
struct Cli {
    /// Directory to list
    dir: PathBuf,

    /// Required name prefix
    #[arg(long = "pre", value_name = "PREFIX", default_value = "")]
    pre: String,

    /// Required name suffix
    #[arg(long = "post", value_name = "SUFFIX", default_value = "")]
    post: String,

    /// Descend into subdirectories
    #[arg(short = 'r', long = "recursive")]
    recursive: bool,
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = ListConfig {
        prefix: cli.pre,
        suffix: cli.post,
        recursive: cli.recursive,
    };

    let result = listing::list_files(&cli.dir, &config).and_then(|files| {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        for file in &files {
            writeln!(out, "{}", file.display()).with_path("standard output")?;
        }
        out.flush().with_path("standard output")
    });

    if let Err(e) = result {
        die(TOOL_NAME, &e);
    }
}
