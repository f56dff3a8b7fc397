//! External toolchain invocation.
//!
//! Converted documents are plain files; turning a LaTeX master into a
//! PDF or DVI is the job of an installed TeX distribution. This module
//! hands a master file to that toolchain and reports back what
//! happened. Failure here is never a conversion error: the report
//! carries a flag and the captured log, nothing more.

use std::path::Path;
use std::process::Command;

use crate::config::Backend;

/// Outcome of one external toolchain run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Whether the toolchain exited successfully
    pub success: bool,
    /// Captured output, or the reason the run could not start
    pub log: String,
}

/// Runs a typesetting toolchain over a produced master file
pub trait TexRunner {
    /// Process `master` with the toolchain matching `backend`.
    ///
    /// Blocks until the run finishes. Implementations never panic and
    /// never return a structured error; problems surface in the report.
    fn run(&self, master: &Path, backend: Backend) -> RunReport;
}

/// The engine binary for a backend
pub fn backend_program(backend: Backend) -> &'static str {
    match backend {
        Backend::Pdftex => "pdflatex",
        Backend::Xetex => "xelatex",
        Backend::Generic | Backend::Dvips => "latex",
    }
}

/// [`TexRunner`] backed by `std::process::Command`.
///
/// Invokes the engine in the master's directory so auxiliary files land
/// next to it, in batch interaction mode so a broken document cannot
/// stall on a console prompt.
#[derive(Debug, Default)]
pub struct CommandTexRunner;

impl TexRunner for CommandTexRunner {
    fn run(&self, master: &Path, backend: Backend) -> RunReport {
        let program = backend_program(backend);
        let mut command = Command::new(program);
        command.arg("-interaction=nonstopmode");
        if let Some(dir) = master.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        match master.file_name() {
            Some(name) => command.arg(name),
            None => command.arg(master),
        };

        match command.output() {
            Ok(output) => {
                let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.is_empty() {
                    if !log.is_empty() {
                        log.push('\n');
                    }
                    log.push_str(&stderr);
                }
                RunReport {
                    success: output.status.success(),
                    log,
                }
            },
            Err(error) => RunReport {
                success: false,
                log: format!("could not start '{program}': {error}"),
            },
        }
    }
}
