pub mod error;
pub mod io;
pub mod lines;


use std::process;

use tracing_subscriber::EnvFilter;

pub use self::error::{Error, IoResultExt, Result};

/// Reset SIGPIPE to default behavior (SIG_DFL).
/// Rust sets SIGPIPE to SIG_IGN by default, so `tool | head` would surface
/// as a write error instead of a quiet exit. Call at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}

/// Install the stderr log subscriber. Level defaults to `info` and can be
/// overridden with `RUST_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Parse command-line arguments, exiting with status 1 on usage errors
/// and 0 after `--help`/`--version`.
pub fn parse_cli<T: clap::Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    }
}

/// Print a fatal error the way every tool does and exit with status 1.
pub fn die(tool_name: &str, err: &dyn std::fmt::Display) -> ! {
    eprintln!("{}: {}", tool_name, err);
    process::exit(1);
}
