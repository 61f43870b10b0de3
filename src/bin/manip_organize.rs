use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::{error, info, warn};

use lineutils::common::{init_logging, parse_cli, reset_sigpipe};
use lineutils::organize::{self, CargoCompiler, DEFAULT_SELF_NAME, OrganizeConfig};

#[derive(Parser)]
#[command(
    name = "manip-organize",
    version,
    about = "Build the line tools into a bin directory and put it on PATH",
    group(
        ArgGroup::new("action")
            .required(true)
            .multiple(true)
            .args(["list", "build_all", "setup_path"])
    )
)]
struct Cli {
    /// List the program sources
    #[arg(long = "list")]
    list: bool,

    /// Build every program into the bin directory
    #[arg(long = "build-all")]
    build_all: bool,

    /// Add the bin directory to PATH in the shell profile
    #[arg(long = "setup-path")]
    setup_path: bool,

    /// Directory holding the program sources
    #[arg(long = "sources", value_name = "DIR", default_value = "src/bin")]
    sources: PathBuf,

    /// Directory receiving the built programs
    #[arg(long = "bin-dir", value_name = "DIR", default_value = "bin")]
    bin_dir: PathBuf,

    /// Shell profile to patch [default: ~/.bashrc]
    #[arg(long = "profile", value_name = "FILE")]
    profile: Option<PathBuf>,
}

/// Source file name of this program, derived from the executable name.
fn self_source_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| format!("{}.rs", s.replace('-', "_")))
        })
        .unwrap_or_else(|| DEFAULT_SELF_NAME.to_string())
}

fn run_list(config: &OrganizeConfig) -> anyhow::Result<()> {
    let sources = organize::list_sources(config)?;
    if sources.is_empty() {
        warn!("no program sources found in {}", config.sources_dir.display());
    }
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for source in &sources {
        let name = source.file_name().unwrap_or(source.as_os_str());
        writeln!(out, "{}", name.to_string_lossy()).context("write error")?;
    }
    out.flush().context("write error")?;
    Ok(())
}

fn main() {
    reset_sigpipe();
    init_logging();
    let cli: Cli = parse_cli();

    let config = OrganizeConfig {
        sources_dir: cli.sources,
        bin_dir: cli.bin_dir,
        profile: cli.profile,
        self_name: self_source_name(),
    };

    let mut failed = false;

    if cli.list {
        if let Err(e) = run_list(&config) {
            error!("--list failed: {:#}", e);
            failed = true;
        }
    }

    if cli.build_all {
        info!("building programs from {}", config.sources_dir.display());
        if let Err(e) = organize::build_all(&config, &CargoCompiler::default()) {
            error!("--build-all failed: {:#}", e);
            failed = true;
        }
    }

    if cli.setup_path {
        if let Err(e) = organize::setup_path(&config) {
            error!("--setup-path failed: {:#}", e);
            failed = true;
        }
    }

    if failed {
        eprintln!("manip-organize: one or more actions failed");
        process::exit(1);
    }
}
