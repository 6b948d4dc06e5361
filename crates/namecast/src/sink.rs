//! Error accumulation and the on-disk error log
//!
//! Every component reports recoverable problems into an [`ErrorSink`] owned by
//! the caller. The sink is flushed at process boundaries into a plain text log
//! named after the current file and task origins:
//!
//! ```text
//! <folder><file_origin>-<task_origin>.txt
//!
//! 10/18/2026 14:03:11 : import
//! selection_error: no file matched the given conditions: orders_2024
//! parse_warning: filename_is_hidden_file: .env
//!
//!
//! ```
//!
//! Fatal conditions go through [`ErrorSink::fatal`], which records, flushes,
//! and hands back the error for the caller to propagate.

use crate::error::{ErrorKind, NamecastError, Result};
use crate::paths::ensure_path;
use crate::schema::compose;
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Placeholder written for an origin label that was never set.
pub const UNKNOWN_ORIGIN: &str = "unknown";

const LOG_DELIMITER: &str = "-";
const LOG_EXTENSION: &str = ".txt";
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// A single recorded error. Timestamps are assigned at flush time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Options for [`ErrorSink::flush`].
#[derive(Debug, Clone)]
pub struct FlushOptions {
    /// Overrides the sink's default folder for this flush.
    pub folder: Option<String>,
    /// Truncate the log file instead of appending a new unit.
    pub overwrite: bool,
    /// Reset the task origin once the unit is written.
    pub clear_task_origin: bool,
}

impl Default for FlushOptions {
    fn default() -> Self {
        Self {
            folder: None,
            overwrite: true,
            clear_task_origin: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<ErrorRecord>,
    file_origin: Option<String>,
    task_origin: Option<String>,
    folder: String,
    echo: bool,
}

impl ErrorSink {
    /// Create an empty sink that flushes into `folder`.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: as_folder(folder.into()),
            ..Self::default()
        }
    }

    /// Emit each recorded error as a `warn` event in addition to storing it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.folder = as_folder(folder.into());
        debug!(folder = %self.folder, "Error folder set");
    }

    pub fn set_file_origin(&mut self, origin: impl Into<String>) {
        let origin = origin.into();
        debug!(file_origin = %origin, "File origin set");
        self.file_origin = Some(origin).filter(|o| !o.is_empty());
    }

    pub fn set_task_origin(&mut self, origin: impl Into<String>) {
        let origin = origin.into();
        debug!(task_origin = %origin, "Task origin set");
        self.task_origin = Some(origin).filter(|o| !o.is_empty());
    }

    pub fn clear_task_origin(&mut self) {
        self.task_origin = None;
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn file_origin(&self) -> Option<&str> {
        self.file_origin.as_deref()
    }

    pub fn task_origin(&self) -> Option<&str> {
        self.task_origin.as_deref()
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True if at least one record of `kind` is pending.
    pub fn has(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Record a recoverable error. Never stops the run.
    pub fn record(&mut self, kind: ErrorKind, message: impl Into<String>) {
        let message = message.into();
        if self.echo {
            warn!(kind = %kind, "{}", message);
        } else {
            debug!(kind = %kind, "{}", message);
        }
        self.errors.push(ErrorRecord { kind, message });
    }

    /// Record a fatal error, flush the log, and return the error to propagate.
    ///
    /// A failed flush is reported through tracing; the fatal error is returned
    /// either way.
    pub fn fatal(&mut self, kind: ErrorKind, message: impl Into<String>) -> NamecastError {
        let message = message.into();
        error!(kind = %kind, "{}", message);
        self.errors.push(ErrorRecord {
            kind,
            message: message.clone(),
        });

        if let Err(err) = self.flush(&FlushOptions::default()) {
            error!(error = %err, "Failed to flush error log after fatal error");
        }

        NamecastError::Fatal { kind, message }
    }

    /// Path of the log file the next flush would write into.
    pub fn log_path(&self, folder: Option<&str>) -> String {
        let folder = folder.unwrap_or(&self.folder);
        compose(
            [
                self.file_origin.as_deref().unwrap_or(UNKNOWN_ORIGIN),
                self.task_origin.as_deref().unwrap_or(UNKNOWN_ORIGIN),
            ],
            LOG_DELIMITER,
            folder,
            LOG_EXTENSION,
        )
    }

    /// Write one log unit and clear the pending errors.
    pub fn flush(&mut self, options: &FlushOptions) -> Result<PathBuf> {
        if self.file_origin.is_none() {
            debug!("No file origin was specified for the error log");
        }
        if self.task_origin.is_none() {
            debug!("No task origin was specified for the error log");
        }

        let folder = match &options.folder {
            Some(folder) => as_folder(folder.clone()),
            None => self.folder.clone(),
        };
        ensure_path(&folder)?;
        let path = PathBuf::from(self.log_path(Some(&folder)));

        let file = if options.overwrite {
            File::create(&path)?
        } else {
            OpenOptions::new().create(true).append(true).open(&path)?
        };
        let mut writer = BufWriter::new(file);

        let task_origin = self.task_origin.as_deref().unwrap_or(UNKNOWN_ORIGIN);
        writeln!(
            writer,
            "{} : {}",
            Local::now().format(TIMESTAMP_FORMAT),
            task_origin
        )?;
        for record in &self.errors {
            writeln!(writer, "{}", record)?;
        }
        writeln!(writer)?;
        writeln!(writer)?;
        writer.flush()?;

        info!(
            path = %path.display(),
            errors = self.errors.len(),
            fatal = self.errors.iter().any(|e| e.kind.is_fatal()),
            "Error log written"
        );

        self.errors.clear();
        if options.clear_task_origin {
            self.task_origin = None;
        }

        Ok(path)
    }
}

/// Folders are joined to file names by plain concatenation, so make sure a
/// non-empty folder ends with a separator.
fn as_folder(folder: String) -> String {
    if folder.is_empty() || folder.ends_with('/') {
        folder
    } else {
        format!("{}/", folder)
    }
}
