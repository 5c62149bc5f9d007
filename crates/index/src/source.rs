//! Document sources
//!
//! A source is any iterator of `Result<Document>` yielding strictly
//! increasing doc ids. Two file layouts are provided:
//! - [`JsonLinesSource`]: one `{"doc_id", "url", "text"}` object per line
//! - [`SpiderDirSource`]: the crawler's output directory, an `index.json`
//!   mapping doc ids to urls plus one `<doc_id>.txt` per document

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quarry_core::{DocId, Document, Error, Result};

/// Crawler index file inside a spider directory
pub const SPIDER_INDEX_FILE: &str = "index.json";
/// Default text directory inside a spider directory
pub const SPIDER_TEXT_DIR: &str = "clean_texts";

/// Reads documents from JSON Lines.
///
/// Blank lines are skipped. A malformed line ends the stream with an error
/// naming its line number.
pub struct JsonLinesSource<R> {
    reader: R,
    label: String,
    line_no: usize,
    line: String,
    failed: bool,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a JSON Lines file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Read from any buffered reader; `label` names it in errors
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        JsonLinesSource {
            reader,
            label: label.into(),
            line_no: 0,
            line: String::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.line.clear();
            self.line_no += 1;
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::io_at(&self.label, e)));
                }
            }
            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(serde_json::from_str(trimmed).map_err(|e| {
                self.failed = true;
                Error::invalid_input(format!("{} line {}: {}", self.label, self.line_no, e))
            }));
        }
    }
}

/// Reads a crawler output directory.
///
/// `index.json` maps decimal doc ids to urls. Documents are yielded in
/// ascending numeric doc id order whatever the key order in the file, and
/// each text is read from `<text_dir>/<doc_id>.txt` when its document is
/// reached. Invalid UTF-8 in a text is replaced rather than rejected.
pub struct SpiderDirSource {
    text_dir: PathBuf,
    entries: std::vec::IntoIter<(DocId, String)>,
}

impl SpiderDirSource {
    /// Open `<root>/index.json` with texts in `<root>/clean_texts`
    pub fn open(root: &Path) -> Result<Self> {
        Self::with_text_dir(&root.join(SPIDER_INDEX_FILE), root.join(SPIDER_TEXT_DIR))
    }

    /// Open an index file with texts in an explicit directory
    pub fn with_text_dir(index_file: &Path, text_dir: impl Into<PathBuf>) -> Result<Self> {
        let file = File::open(index_file).map_err(|e| Error::io_at(index_file, e))?;
        let raw: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::format(index_file, e.to_string()))?;

        let mut entries = raw
            .into_iter()
            .map(|(key, url)| {
                key.trim()
                    .parse::<DocId>()
                    .map(|doc_id| (doc_id, url))
                    .map_err(|_| Error::format(index_file, format!("doc id '{}' is not a number", key)))
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(|(doc_id, _)| *doc_id);

        Ok(SpiderDirSource {
            text_dir: text_dir.into(),
            entries: entries.into_iter(),
        })
    }

    /// Documents not yet yielded
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    fn read_text(&self, doc_id: DocId) -> Result<String> {
        let path = self.text_dir.join(format!("{}.txt", doc_id));
        let bytes = std::fs::read(&path).map_err(|e| Error::io_at(&path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Iterator for SpiderDirSource {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let (doc_id, url) = self.entries.next()?;
        Some(
            self.read_text(doc_id)
                .map(|text| Document::new(doc_id, url, text)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
