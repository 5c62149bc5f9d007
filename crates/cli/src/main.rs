//! Quarry CLI: build, merge and query partitioned inverted indexes.
//!
//! ```text
//! quarry build --input docs.jsonl           # write part000.dct/.idx, ...
//! quarry merge                              # -> terms_dict + entire_index
//! quarry lookup rust index                  # print posting lists
//! ```
//!
//! Logs go to stderr. `merge` always prints a one-line status there and
//! exits 0 on success, 1 on failure.

mod commands;
mod parse;

use std::path::Path;
use std::process;

use quarry_core::{Result, Tokenizer};
use quarry_index::{
    IndexBuilder, IndexConfig, IndexPaths, IndexReader, JsonLinesSource, PartitionMerger,
    SpiderDirSource, UrlList, WordTokenizer, Xxh3TermHasher,
};
use tracing::{info, Level};

use commands::build_cli;
use parse::{global_args, matches_to_action, BuildArgs, CliAction, InputFormat};

fn main() {
    let matches = build_cli().get_matches();
    let global = global_args(&matches);
    init_logging(global.log_level);

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(2);
        }
    };

    let paths = IndexPaths::from_root(&global.index_dir);
    let exit_code = match action {
        CliAction::Build(args) => report(run_build(&paths, &args)),
        CliAction::Merge => run_merge(&paths),
        CliAction::Lookup { tokens } => report(run_lookup(&paths, &tokens)),
    };
    process::exit(exit_code);
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}

/// Resolve the build configuration: explicit file, else the index
/// directory's `quarry.toml`, else defaults; flags override.
fn resolve_config(paths: &IndexPaths, args: &BuildArgs) -> Result<IndexConfig> {
    let mut config = match &args.config {
        Some(path) => IndexConfig::from_file(path)?,
        None if paths.config().exists() => IndexConfig::from_file(&paths.config())?,
        None => IndexConfig::default(),
    };
    if let Some(partition_size) = args.partition_size {
        config = config.with_partition_size(partition_size);
    }
    if let Some(codec) = &args.codec {
        config = config.with_codec(codec.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Lookup must hash with the seed the index was built with.
fn lookup_config(paths: &IndexPaths) -> Result<IndexConfig> {
    if paths.config().exists() {
        IndexConfig::from_file(&paths.config())
    } else {
        Ok(IndexConfig::default())
    }
}

fn run_build(paths: &IndexPaths, args: &BuildArgs) -> Result<()> {
    let config = resolve_config(paths, args)?;
    let builder = IndexBuilder::new(paths.clone(), config.clone())?;

    let summary = match &args.format {
        InputFormat::JsonLines => builder.build(JsonLinesSource::open(&args.input)?)?,
        InputFormat::Spider { text_dir } => {
            let source = match text_dir {
                Some(dir) => SpiderDirSource::with_text_dir(
                    &args.input.join(quarry_index::source::SPIDER_INDEX_FILE),
                    dir,
                )?,
                None => SpiderDirSource::open(&args.input)?,
            };
            builder.build(source)?
        }
    };
    config.write_to_file(&paths.config())?;

    info!(
        target: "quarry::build",
        config = %paths.config().display(),
        "Effective configuration recorded"
    );
    println!(
        "Indexed {} documents into {} partition(s), {} terms, codec {}",
        summary.documents, summary.partitions, summary.terms_seen, summary.codec
    );
    Ok(())
}

fn run_merge(paths: &IndexPaths) -> i32 {
    match PartitionMerger::new(paths.clone()).merge_directory() {
        Ok(outcome) => {
            eprintln!("{}", outcome.status_message());
            0
        }
        Err(e) => {
            eprintln!("Index build failed: {}", e);
            1
        }
    }
}

fn run_lookup(paths: &IndexPaths, tokens: &[String]) -> Result<()> {
    let config = lookup_config(paths)?;
    let reader = IndexReader::open(paths)?;
    let tokenizer = WordTokenizer::new(1);
    let hasher = Xxh3TermHasher::new(config.hash_seed);
    let urls = load_urls(&paths.url_list());

    for raw in tokens {
        for token in tokenizer.tokenize(raw) {
            match reader.postings_for_token(&token, &hasher)? {
                Some(docs) => {
                    println!("{}: {} document(s)", token, docs.len());
                    for doc_id in docs {
                        let url = urls.as_ref().and_then(|u| u.url(doc_id)).unwrap_or("");
                        println!("  {}\t{}", doc_id, url);
                    }
                }
                None => println!("{}: not indexed", token),
            }
        }
    }
    Ok(())
}

fn load_urls(path: &Path) -> Option<UrlList> {
    if !path.exists() {
        return None;
    }
    match UrlList::load(path) {
        Ok(urls) => Some(urls),
        Err(e) => {
            tracing::warn!(target: "quarry::reader", error = %e, "Url list unavailable");
            None
        }
    }
}
