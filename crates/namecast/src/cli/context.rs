//! Per-command error sink handling

use super::GlobalArgs;
use anyhow::Context;
use namecast::settings::{default_error_directory, DEFAULT_FILE_ORIGIN};
use namecast::sink::{ErrorSink, FlushOptions};

pub struct CommandContext {
    pub sink: ErrorSink,
}

impl CommandContext {
    /// Sink for a standalone command: `--error-dir` or the home error folder.
    pub fn new(globals: &GlobalArgs, task: &str) -> Self {
        Self::with_defaults(globals, task, default_error_directory(), DEFAULT_FILE_ORIGIN)
    }

    /// Sink whose folder and file origin fall back to the given defaults when
    /// the global flags are absent.
    pub fn with_defaults(
        globals: &GlobalArgs,
        task: &str,
        error_dir: String,
        file_origin: &str,
    ) -> Self {
        let mut sink = ErrorSink::default().with_echo(true);
        sink.set_folder(globals.error_dir.clone().unwrap_or(error_dir));
        sink.set_file_origin(globals.file_origin.as_deref().unwrap_or(file_origin));
        sink.set_task_origin(task);
        Self { sink }
    }

    /// Flush pending errors, if any, into `folder` or the sink's own folder.
    /// Returns quietly when nothing was recorded.
    pub fn flush_pending(&mut self, folder: Option<String>) -> anyhow::Result<()> {
        if self.sink.is_empty() {
            return Ok(());
        }
        let options = FlushOptions {
            folder,
            clear_task_origin: false,
            ..FlushOptions::default()
        };
        let path = self
            .sink
            .flush(&options)
            .context("Failed to write error log")?;
        eprintln!("Error log outputted to: {}", path.display());
        Ok(())
    }

    /// Flush and finish. The command's own result wins over a flush failure.
    pub fn finish<T>(mut self, result: anyhow::Result<T>) -> anyhow::Result<T> {
        let flushed = self.flush_pending(None);
        let value = result?;
        flushed?;
        Ok(value)
    }
}
