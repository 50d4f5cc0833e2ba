//! Append-only transcript of engine output
//!
//! Opened when the handle is constructed and closed by `stop()`. A sink that
//! cannot be opened or written is dropped with a warning; the handle works
//! the same without one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

type Sink = Option<LineWriter<File>>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Transcript {
    sink: Arc<Mutex<Sink>>,
}

impl Transcript {
    pub(crate) fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match open_append(path) {
            Ok(file) => Self {
                sink: Arc::new(Mutex::new(Some(LineWriter::new(file)))),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Engine log unavailable");
                Self::default()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    pub(crate) fn write_line(&self, line: &str) {
        let mut sink = self.lock();
        if let Some(writer) = sink.as_mut()
            && let Err(e) = writeln!(writer, "{line}")
        {
            warn!(error = %e, "Engine log write failed, closing it");
            *sink = None;
        }
    }

    pub(crate) fn close(&self) {
        if let Some(mut writer) = self.lock().take()
            && let Err(e) = writer.flush()
        {
            warn!(error = %e, "Failed to flush engine log");
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
