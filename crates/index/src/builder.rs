//! Index build orchestration
//!
//! Drives one build: documents → tokenizer → hasher → accumulator, with a
//! partition flush after every `partition_size` documents and once more for
//! the trailing window. Tokenizing and hashing run on rayon in batches; the
//! results are applied to the accumulator one document at a time in source
//! order, so each term's list stays in doc id order.

use std::time::Instant;

use quarry_codec::get_codec;
use quarry_core::{Document, Error, Result, TermHasher, TermId, Tokenizer};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::accumulator::PostingAccumulator;
use crate::config::IndexConfig;
use crate::format::IndexPaths;
use crate::hasher::Xxh3TermHasher;
use crate::partition::PartitionWriter;
use crate::sidecar::{write_codec_scheme, UrlListWriter};
use crate::tokenizer::WordTokenizer;

/// What a build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Documents processed (including ones without tokens)
    pub documents: u64,
    /// Partitions written
    pub partitions: usize,
    /// Distinct term ids seen
    pub terms_seen: usize,
    /// Codec scheme recorded in `encoding.ini`
    pub codec: String,
}

/// Builds partitions and sidecars for one index directory
pub struct IndexBuilder {
    paths: IndexPaths,
    config: IndexConfig,
    tokenizer: Box<dyn Tokenizer>,
    hasher: Box<dyn TermHasher>,
}

impl IndexBuilder {
    /// Create a builder with the default tokenizer and hasher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn new(paths: IndexPaths, config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(IndexBuilder {
            tokenizer: Box::new(WordTokenizer::new(config.min_token_len)),
            hasher: Box::new(Xxh3TermHasher::new(config.hash_seed)),
            paths,
            config,
        })
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Replace the term hasher
    pub fn with_hasher(mut self, hasher: impl TermHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Build configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index directory
    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    /// Hasher terms are keyed by; queries must hash the same way
    pub fn hasher(&self) -> &dyn TermHasher {
        self.hasher.as_ref()
    }

    /// Consume a document stream and write its partitions.
    ///
    /// Doc ids must be strictly increasing. The directory must not already
    /// hold partitions: a leftover partition would be merged into the new
    /// index. On error, partitions written by this call are removed.
    pub fn build<I>(&self, documents: I) -> Result<BuildSummary>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        self.paths.create_directories()?;
        let existing = self.paths.discover_partitions()?;
        if !existing.is_empty() {
            return Err(Error::invalid_input(format!(
                "{} already holds {} partition(s); merge or remove them first",
                self.paths.root().display(),
                existing.len()
            )));
        }

        let codec = get_codec(&self.config.codec)?;
        let mut writer = PartitionWriter::new(self.paths.clone(), codec);
        match self.run(documents, &mut writer) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.discard_partitions(&writer);
                Err(e)
            }
        }
    }

    fn run<I>(&self, documents: I, writer: &mut PartitionWriter) -> Result<BuildSummary>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let started = Instant::now();
        info!(
            target: "quarry::build",
            root = %self.paths.root().display(),
            partition_size = self.config.partition_size,
            codec = %self.config.codec,
            "Build started"
        );

        let mut accumulator = PostingAccumulator::new();
        let mut urls = UrlListWriter::create(&self.paths)?;
        let mut documents = documents.into_iter();
        let mut batch: Vec<Document> = Vec::with_capacity(self.config.batch_size);
        let mut processed: u64 = 0;
        let mut in_window: usize = 0;

        loop {
            batch.clear();
            for item in documents.by_ref().take(self.config.batch_size) {
                batch.push(item?);
            }
            if batch.is_empty() {
                break;
            }

            let term_sets = self.hash_batch(&batch);
            for (doc, terms) in batch.iter().zip(term_sets) {
                accumulator.observe(doc.doc_id, terms)?;
                urls.push(&doc.url)?;
                processed += 1;
                in_window += 1;
                if in_window == self.config.partition_size {
                    writer.flush(&mut accumulator)?;
                    in_window = 0;
                }
            }
            debug!(target: "quarry::build", documents = processed, "Batch applied");
        }

        if in_window > 0 {
            writer.flush(&mut accumulator)?;
        }

        write_codec_scheme(&self.paths, &self.config.codec)?;
        urls.finish()?;

        let summary = BuildSummary {
            documents: processed,
            partitions: writer.partitions_written(),
            terms_seen: accumulator.term_count(),
            codec: self.config.codec.clone(),
        };
        info!(
            target: "quarry::build",
            documents = summary.documents,
            partitions = summary.partitions,
            terms = summary.terms_seen,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Build complete"
        );
        Ok(summary)
    }

    /// Tokenize and hash a batch in parallel, keeping document order.
    fn hash_batch(&self, batch: &[Document]) -> Vec<Vec<TermId>> {
        let tokenizer = self.tokenizer.as_ref();
        let hasher = self.hasher.as_ref();
        batch
            .par_iter()
            .map(|doc| {
                tokenizer
                    .tokenize(&doc.text)
                    .iter()
                    .map(|token| hasher.hash_term(token))
                    .collect()
            })
            .collect()
    }

    fn discard_partitions(&self, writer: &PartitionWriter) {
        // The partition being flushed when the build failed may have a blob
        let unfinished = self.paths.partition_blob(writer.next_id());
        if unfinished.exists() {
            if let Err(e) = std::fs::remove_file(&unfinished) {
                warn!(
                    target: "quarry::build",
                    file = %unfinished.display(),
                    error = %e,
                    "Could not remove partition of failed build"
                );
            }
        }
        for id in 0..writer.next_id() {
            let files = self.paths.partition_files(id);
            for path in [&files.dictionary, &files.blob] {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(
                        target: "quarry::build",
                        file = %path.display(),
                        error = %e,
                        "Could not remove partition of failed build"
                    );
                }
            }
        }
    }
}
