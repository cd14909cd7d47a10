//! The statistics log file.
//!
//! [`LogSink`] owns the only handle to `<output_dir>/log`. It is opened in
//! append mode so that a restarted run extends the file of the run it
//! continues, and it refuses rows at or below the last iteration already
//! present, which keeps the file strictly ordered across restarts. A fresh
//! start calls [`LogSink::reset`] to drop whatever an earlier run left.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use droplet_core::fmt_g;

/// One statistics row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogRow {
    /// Solver iteration.
    pub iteration: u64,
    /// Size of the last step.
    pub dt: f64,
    /// Simulation time.
    pub time: f64,
    /// Total kinetic energy.
    pub kinetic_energy: f64,
}

impl fmt::Display for LogRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.iteration,
            fmt_g(self.dt),
            fmt_g(self.time),
            fmt_g(self.kinetic_energy)
        )
    }
}

/// Exclusive, append-only handle to the statistics log.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    last_iteration: Option<u64>,
}

impl LogSink {
    /// Open `path` for appending.
    ///
    /// An empty or missing file receives `header` first. An existing file
    /// is scanned for the last iteration it records.
    pub fn open(path: &Path, header: &str) -> io::Result<Self> {
        let existing = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        let last_iteration = existing
            .lines()
            .filter(|l| !l.trim_start().starts_with('#'))
            .filter_map(|l| l.split_whitespace().next()?.parse::<u64>().ok())
            .max();

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        if existing.trim().is_empty() {
            writer.write_all(header.as_bytes())?;
            writer.flush()?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            last_iteration,
        })
    }

    /// Truncate the file, write `header` and forget earlier iterations.
    ///
    /// Reopens the file if the handle was closed.
    pub fn reset(&mut self, header: &str) -> io::Result<()> {
        if let Some(mut old) = self.writer.take() {
            old.flush()?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(header.as_bytes())?;
        writer.flush()?;
        self.writer = Some(writer);
        self.last_iteration = None;
        Ok(())
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last iteration recorded in the file, from this or an earlier run.
    pub fn last_iteration(&self) -> Option<u64> {
        self.last_iteration
    }

    /// Whether the handle is still open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Append `row` and flush.
    ///
    /// Returns `Ok(false)` without writing when the file already holds the
    /// row's iteration or a later one.
    pub fn append(&mut self, row: &LogRow) -> io::Result<bool> {
        if self.last_iteration.is_some_and(|last| row.iteration <= last) {
            return Ok(false);
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(io::Error::other(format!(
                "log '{}' is closed",
                self.path.display()
            )));
        };
        writeln!(writer, "{row}")?;
        writer.flush()?;
        self.last_iteration = Some(row.iteration);
        Ok(true)
    }

    /// Flush and release the file. Returns `Ok(true)` the first time and
    /// `Ok(false)` on every later call.
    pub fn close(&mut self) -> io::Result<bool> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
