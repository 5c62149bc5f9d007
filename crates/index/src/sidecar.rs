//! Build sidecar files
//!
//! Written once per build, read only at query time:
//! - `encoding.ini`: the codec scheme name on a single line
//! - `url_list`: one url per processed document, in doc id order

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use quarry_core::{Error, Result};

use crate::atomic::{write_atomic, AtomicFile};
use crate::format::IndexPaths;

/// Persist the codec scheme name
pub fn write_codec_scheme(paths: &IndexPaths, scheme: &str) -> Result<()> {
    write_atomic(&paths.codec_scheme(), format!("{}\n", scheme).as_bytes())
}

/// Read the persisted codec scheme name
pub fn read_codec_scheme(paths: &IndexPaths) -> Result<String> {
    let path = paths.codec_scheme();
    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_at(&path, e))?;
    let scheme = content.lines().next().unwrap_or("").trim();
    if scheme.is_empty() {
        return Err(Error::format(&path, "no codec scheme recorded"));
    }
    Ok(scheme.to_string())
}

/// Streams urls into `url_list` as documents are processed
pub struct UrlListWriter {
    file: AtomicFile,
    count: u64,
}

impl UrlListWriter {
    /// Start a new url list in the index directory
    pub fn create(paths: &IndexPaths) -> Result<Self> {
        Ok(UrlListWriter {
            file: AtomicFile::create(paths.url_list())?,
            count: 0,
        })
    }

    /// Append the url of the next document.
    ///
    /// Line breaks would shift every following document, so they are
    /// rejected.
    pub fn push(&mut self, url: &str) -> Result<()> {
        if url.contains(|c: char| c == '\n' || c == '\r') {
            return Err(Error::invalid_input(format!(
                "url of document #{} contains a line break",
                self.count
            )));
        }
        let path = self.file.final_path().to_path_buf();
        self.file
            .write_all(url.as_bytes())
            .and_then(|_| self.file.write_all(b"\n"))
            .map_err(|e| Error::io_at(&path, e))?;
        self.count += 1;
        Ok(())
    }

    /// Urls written so far
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Whether no url was written
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Commit the list; returns the number of urls
    pub fn finish(self) -> Result<u64> {
        let count = self.count;
        self.file.commit()?;
        Ok(count)
    }
}

/// Url list loaded for lookups.
///
/// Line `n` holds the url of the `n`-th processed document. For the usual
/// dense numbering (doc ids `0, 1, 2, ...`) that is the url of doc id `n`.
#[derive(Debug, Clone, Default)]
pub struct UrlList {
    path: PathBuf,
    urls: Vec<String>,
}

impl UrlList {
    /// Load `url_list` from an index directory
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        Self::load(&paths.url_list())
    }

    /// Load a url list file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
        let urls = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io_at(path, e))?;
        Ok(UrlList {
            path: path.to_path_buf(),
            urls,
        })
    }

    /// Url at a line position
    pub fn get(&self, position: usize) -> Option<&str> {
        self.urls.get(position).map(String::as_str)
    }

    /// Url of a doc id under dense numbering
    pub fn url(&self, doc_id: quarry_core::DocId) -> Option<&str> {
        usize::try_from(doc_id).ok().and_then(|i| self.get(i))
    }

    /// Number of urls
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterate urls in document order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// File the list was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}
