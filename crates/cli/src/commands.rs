//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Default index directory
pub const DEFAULT_INDEX_DIR: &str = "temp_idx";

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("quarry")
        .about("Partitioned inverted-index builder")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("index-dir")
                .long("index-dir")
                .help("Index directory (default: temp_idx)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Debug logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_build())
        .subcommand(build_merge())
        .subcommand(build_lookup())
}

fn build_build() -> Command {
    Command::new("build")
        .about("Index a document collection into partitions")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .required(true)
                .help("JSON Lines file, or crawler directory with --format spider"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["jsonl", "spider"])
                .default_value("jsonl")
                .help("Input layout"),
        )
        .arg(
            Arg::new("text-dir")
                .long("text-dir")
                .help("Text directory for --format spider (default: <input>/clean_texts)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: <index-dir>/quarry.toml if present)"),
        )
        .arg(
            Arg::new("partition-size")
                .long("partition-size")
                .value_parser(value_parser!(usize))
                .help("Documents per partition"),
        )
        .arg(
            Arg::new("codec")
                .long("codec")
                .help("Posting codec: simple9 or varbyte"),
        )
}

fn build_merge() -> Command {
    Command::new("merge").about("Merge all partitions into terms_dict / entire_index")
}

fn build_lookup() -> Command {
    Command::new("lookup")
        .about("Print the posting lists of tokens in the merged index")
        .arg(
            Arg::new("tokens")
                .required(true)
                .num_args(1..)
                .help("Tokens to look up"),
        )
}
