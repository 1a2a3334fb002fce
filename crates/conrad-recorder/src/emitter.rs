//! Emitters deliver formatted events.
//!
//! The line emitters append exactly one `\n` to the formatted text.

use anyhow::anyhow;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StageError;

/// Delivers the formatted representation of an event.
pub trait Emitter: Send + Sync {
    fn emit(&self, formatted: &str) -> Result<(), StageError>;
}

/// The text plus its newline, so a line reaches the writer in one `write_all`.
fn line(formatted: &str) -> Vec<u8> {
    let mut line = Vec::with_capacity(formatted.len() + 1);
    line.extend_from_slice(formatted.as_bytes());
    line.push(b'\n');
    line
}

/// Writes each event as a line on stdout. The default emitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutEmitter;

impl Emitter for StdoutEmitter {
    fn emit(&self, formatted: &str) -> Result<(), StageError> {
        let mut out = io::stdout().lock();
        out.write_all(&line(formatted))?;
        out.flush()?;
        Ok(())
    }
}

/// Writes each event as a line on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrEmitter;

impl Emitter for StderrEmitter {
    fn emit(&self, formatted: &str) -> Result<(), StageError> {
        let mut err = io::stderr().lock();
        err.write_all(&line(formatted))?;
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmitter;

impl Emitter for NullEmitter {
    fn emit(&self, _formatted: &str) -> Result<(), StageError> {
        Ok(())
    }
}

/// Writes each event as a line to any writer.
pub struct WriterEmitter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Run `f` against the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> Result<R, StageError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow!("failed to acquire writer lock: {}", e))?;
        Ok(f(&mut writer))
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Emitter for WriterEmitter<W> {
    fn emit(&self, formatted: &str) -> Result<(), StageError> {
        let line = line(formatted);
        self.with_writer(|writer| -> io::Result<()> {
            writer.write_all(&line)?;
            writer.flush()
        })??;
        Ok(())
    }
}

impl<W> fmt::Debug for WriterEmitter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterEmitter").finish_non_exhaustive()
    }
}

/// Appends each event as a line to a file.
#[derive(Debug)]
pub struct FileEmitter {
    path: PathBuf,
    inner: WriterEmitter<File>,
}

impl FileEmitter {
    /// Open `path` for appending, creating it if needed.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            inner: WriterEmitter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Emitter for FileEmitter {
    fn emit(&self, formatted: &str) -> Result<(), StageError> {
        self.inner.emit(formatted)
    }
}

/// Emitter backed by a function or closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnEmitter<F> {
    f: F,
}

/// Wrap a function or closure as an emitter.
pub fn from_fn<F>(f: F) -> FnEmitter<F>
where
    F: Fn(&str) -> Result<(), StageError> + Send + Sync,
{
    FnEmitter { f }
}

impl<F> Emitter for FnEmitter<F>
where
    F: Fn(&str) -> Result<(), StageError> + Send + Sync,
{
    fn emit(&self, formatted: &str) -> Result<(), StageError> {
        (self.f)(formatted)
    }
}

impl<F> fmt::Debug for FnEmitter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEmitter").finish_non_exhaustive()
    }
}
