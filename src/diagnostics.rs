//! # Diagnostics Module
//!
//! Observational plumbing for a generation run. Nothing in here influences
//! control flow.
//!
//! - **[`Stopwatch`]** - a scoped timer: [`Stopwatch::start`] returns a value,
//!   [`Stopwatch::stop`] consumes it and reports the elapsed wall time
//! - **[`DumpSink`]** - where inspection artifacts (registry dump, merged XML)
//!   go; [`FileDumpSink`] writes to a directory, [`MemoryDumpSink`] keeps them
//!   in memory for tests
//! - **[`DiagnosticSinks`]** - the error/warning stream and the optional
//!   diagnostic stream handed to generators
//! - **[`SharedBuffer`]** - an in-memory writer for capturing either stream

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Wall-clock timer for a single step.
#[derive(Debug)]
pub struct Stopwatch {
    label: String,
    started: Option<Instant>,
}

impl Stopwatch {
    /// Start timing `label`. A disabled stopwatch records nothing.
    #[must_use]
    pub fn start(label: impl Into<String>, enabled: bool) -> Self {
        Stopwatch {
            label: label.into(),
            started: enabled.then(Instant::now),
        }
    }

    /// Stop the timer and write `* Time to <label> = <secs>` to `out`.
    ///
    /// Returns the elapsed time, or `None` when the stopwatch was disabled.
    /// A failed write to `out` is ignored.
    pub fn stop(self, out: &mut dyn Write) -> Option<Duration> {
        let elapsed = self.started?.elapsed();
        debug!(step = %self.label, elapsed_ms = elapsed.as_millis() as u64, "Step timing");
        // timing output is best effort
        if writeln!(out, "* Time to {} = {:.6}", self.label, elapsed.as_secs_f64()).is_err() {
            debug!(step = %self.label, "Could not write timing line");
        }
        Some(elapsed)
    }
}

/// Destination for named inspection artifacts.
pub trait DumpSink {
    /// Store `contents` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the artifact cannot be stored.
    fn dump(&mut self, name: &str, contents: &str) -> io::Result<()>;
}

/// Writes artifacts as files under a directory.
#[derive(Debug, Clone)]
pub struct FileDumpSink {
    dir: PathBuf,
}

impl FileDumpSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileDumpSink { dir: dir.into() }
    }

    /// Directory artifacts are written into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DumpSink for FileDumpSink {
    fn dump(&mut self, name: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(name), contents)
    }
}

/// Keeps artifacts in memory, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct MemoryDumpSink {
    artifacts: BTreeMap<String, String>,
}

impl MemoryDumpSink {
    /// Contents stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    /// Names of every stored artifact, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl DumpSink for MemoryDumpSink {
    fn dump(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.artifacts.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Error/warning and diagnostic streams for one run.
pub struct DiagnosticSinks {
    /// Errors, warnings, timing and progress lines
    pub err: Box<dyn Write>,
    /// Verbose generator diagnostics, when requested
    pub diag: Option<Box<dyn Write>>,
}

impl DiagnosticSinks {
    /// Errors to stderr, no diagnostics.
    pub fn stderr() -> Self {
        DiagnosticSinks {
            err: Box::new(io::stderr()),
            diag: None,
        }
    }

    /// Build sinks from optional file paths, falling back to stderr for errors.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be created.
    pub fn from_paths(errfile: Option<&Path>, diagfile: Option<&Path>) -> io::Result<Self> {
        let err: Box<dyn Write> = match errfile {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stderr()),
        };
        let diag: Option<Box<dyn Write>> = match diagfile {
            Some(path) => Some(Box::new(File::create(path)?)),
            None => None,
        };
        Ok(DiagnosticSinks { err, diag })
    }

    /// Write one line to the error stream, ignoring write failures.
    pub fn error_line(&mut self, line: impl AsRef<str>) {
        if writeln!(self.err, "{}", line.as_ref()).is_err() {
            debug!("Could not write to error sink");
        }
    }

    /// Write one line to the diagnostic stream, if there is one.
    pub fn diag_line(&mut self, line: impl AsRef<str>) {
        if let Some(diag) = self.diag.as_mut() {
            if writeln!(diag, "{}", line.as_ref()).is_err() {
                debug!("Could not write to diagnostic sink");
            }
        }
    }
}

/// In-memory `Write` whose clones all append to the same buffer.
///
/// Hand one clone to [`DiagnosticSinks`] and keep another to read back what
/// the run wrote.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for DiagnosticSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSinks")
            .field("diag", &self.diag.is_some())
            .finish_non_exhaustive()
    }
}
