//! Crash-safe file writes
//!
//! Every file the index produces is written with the same pattern:
//! 1. Write to a temporary file (`.<name>.tmp`) in the same directory
//! 2. fsync the temporary file
//! 3. Atomic rename to the final path
//! 4. fsync the parent directory (callers batch this with [`sync_dir`])
//!
//! A reader therefore sees either the complete file or none at all. An
//! [`AtomicFile`] dropped without [`AtomicFile::commit`] removes its
//! temporary file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use quarry_core::{Error, Result};

/// Temporary path used while `final_path` is being written
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    final_path.with_file_name(format!(".{}.tmp", name))
}

/// Whether a file name is one of our temporary files
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// fsync a directory so renames inside it are durable
pub fn sync_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let handle = File::open(dir).map_err(|e| Error::io_at(dir, e))?;
        handle.sync_all().map_err(|e| Error::io_at(dir, e))?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

/// Buffered writer that lands on its final path only when committed
pub struct AtomicFile {
    final_path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl AtomicFile {
    /// Start writing `final_path`.
    ///
    /// A stale temporary file from an earlier crash is truncated.
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let temp_path = temp_path_for(&final_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io_at(&temp_path, e))?;
        Ok(AtomicFile {
            final_path,
            temp_path,
            writer: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// Path the file will have once committed
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Path being written
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Bytes written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write a buffer, labelling errors with the final path
    pub fn put(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf)
            .map_err(|e| Error::io_at(&self.final_path, e))
    }

    /// Flush, fsync and rename into place.
    ///
    /// The parent directory is not synced; call [`sync_dir`] once after the
    /// last rename of a batch.
    pub fn commit(mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let file = writer
            .into_inner()
            .map_err(|e| Error::io_at(&self.temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| Error::io_at(&self.temp_path, e))?;
        drop(file);
        std::fs::rename(&self.temp_path, &self.final_path)
            .map_err(|e| Error::io_at(&self.final_path, e))?;
        Ok(())
    }

    fn inner(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "file already committed"))
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner()?.flush()
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

/// Write a whole file atomically
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = AtomicFile::create(path)?;
    file.put(contents)?;
    file.commit()
}
