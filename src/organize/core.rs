use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};

/// Marker comment written above the PATH export.
pub const PATH_MARKER: &str = "# Added by manip-organize";

/// Source file of the helper itself, excluded from listing and building.
pub const DEFAULT_SELF_NAME: &str = "manip_organize.rs";

/// Configuration for manip-organize.
#[derive(Clone, Debug)]
pub struct OrganizeConfig {
    /// Directory holding the program sources (`*.rs`).
    pub sources_dir: PathBuf,
    /// Where built programs are placed.
    pub bin_dir: PathBuf,
    /// Shell profile to patch; `~/.bashrc` when `None`.
    pub profile: Option<PathBuf>,
    pub self_name: String,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("src/bin"),
            bin_dir: PathBuf::from("bin"),
            profile: None,
            self_name: DEFAULT_SELF_NAME.to_string(),
        }
    }
}

/// Builds one program from its source.
pub trait Compiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<()>;
}

/// Builds with `cargo build --release --bin <name>` and copies the
/// artifact out of the target directory.
#[derive(Clone, Debug)]
pub struct CargoCompiler {
    pub target_dir: PathBuf,
}

impl Default for CargoCompiler {
    fn default() -> Self {
        let target_dir = std::env::var_os("CARGO_TARGET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("target"));
        Self { target_dir }
    }
}

impl Compiler for CargoCompiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        let name = program_name(source)
            .with_context(|| format!("cannot derive a program name from {}", source.display()))?;
        let status = Command::new("cargo")
            .args(["build", "--release", "--bin", &name])
            .status()
            .context("failed to run cargo")?;
        if !status.success() {
            bail!("cargo build --bin {} exited with {}", name, status);
        }
        let artifact = self.target_dir.join("release").join(&name);
        fs::copy(&artifact, output).with_context(|| {
            format!("failed to copy {} to {}", artifact.display(), output.display())
        })?;
        Ok(())
    }
}

/// Binary name for a source file: `divide_list.rs` builds `divide-list`.
pub fn program_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    Some(stem.replace('_', "-"))
}

/// Program sources in `config.sources_dir`, sorted, without the helper's own.
pub fn list_sources(config: &OrganizeConfig) -> Result<Vec<PathBuf>> {
    let dir = &config.sources_dir;
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if name.ends_with(".rs") && name != config.self_name {
            sources.push(entry.path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Result of a build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub built: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Build every program source into `config.bin_dir`. A failing source is
/// logged and the rest still build; the run fails at the end if any did.
pub fn build_all(config: &OrganizeConfig, compiler: &dyn Compiler) -> Result<BuildReport> {
    fs::create_dir_all(&config.bin_dir)
        .with_context(|| format!("failed to create {}", config.bin_dir.display()))?;

    let sources = list_sources(config)?;
    if sources.is_empty() {
        warn!("no program sources found in {}", config.sources_dir.display());
    }

    let mut report = BuildReport::default();
    for source in sources {
        let Some(name) = program_name(&source) else {
            report
                .failed
                .push((source, "invalid program name".to_string()));
            continue;
        };
        let output = config.bin_dir.join(name);
        info!("building {}", source.display());
        match compiler.compile(&source, &output) {
            Ok(()) => {
                info!(" -> {}", output.display());
                report.built.push(output);
            }
            Err(e) => {
                error!("failed to build {}: {:#}", source.display(), e);
                report.failed.push((source, format!("{:#}", e)));
            }
        }
    }

    if !report.failed.is_empty() {
        bail!(
            "{} program(s) built, {} failed",
            report.built.len(),
            report.failed.len()
        );
    }
    info!(
        "{} program(s) built into {}",
        report.built.len(),
        config.bin_dir.display()
    );
    Ok(report)
}

/// The profile to patch: the configured one or `~/.bashrc`.
pub fn resolve_profile(config: &OrganizeConfig) -> Result<PathBuf> {
    if let Some(profile) = &config.profile {
        return Ok(profile.clone());
    }
    let home = dirs::home_dir().context("cannot determine the home directory")?;
    Ok(home.join(".bashrc"))
}

pub fn export_line(bin_dir: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", bin_dir.display())
}

fn already_configured(contents: &str, export: &str) -> bool {
    contents.lines().map(str::trim).any(|line| {
        line.contains(export) || line.starts_with(PATH_MARKER)
    })
}

/// Append the bin directory to `PATH` in the shell profile.
///
/// Returns `false` when the profile already carries the export line or the
/// marker, in which case nothing is written.
pub fn setup_path(config: &OrganizeConfig) -> Result<bool> {
    if !config.bin_dir.exists() {
        warn!("{} does not exist, creating it", config.bin_dir.display());
    }
    fs::create_dir_all(&config.bin_dir)
        .with_context(|| format!("failed to create {}", config.bin_dir.display()))?;
    let abs_bin = fs::canonicalize(&config.bin_dir)
        .with_context(|| format!("failed to resolve {}", config.bin_dir.display()))?;

    let profile = resolve_profile(config)?;
    let export = export_line(&abs_bin);

    let contents = match fs::read(&profile) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", profile.display()));
        }
    };
    if already_configured(&contents, &export) {
        info!(
            "{} already on PATH in {}, nothing to do",
            abs_bin.display(),
            profile.display()
        );
        return Ok(false);
    }

    info!("adding {} to PATH in {}", abs_bin.display(), profile.display());
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&profile)
        .with_context(|| format!("failed to open {}", profile.display()))?;
    let stamp = chrono::Local::now().to_rfc2822();
    write!(file, "\n{} ({})\n{}\n", PATH_MARKER, stamp, export)
        .with_context(|| format!("failed to write {}", profile.display()))?;

    info!("run `source {}` or open a new shell", profile.display());
    Ok(true)
}
