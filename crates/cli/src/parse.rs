//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;
use tracing::Level;

use crate::commands::DEFAULT_INDEX_DIR;

/// Input layout of `quarry build`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFormat {
    /// One JSON document per line
    JsonLines,
    /// Crawler directory with `index.json`
    Spider {
        /// Explicit text directory
        text_dir: Option<PathBuf>,
    },
}

/// Settings for `quarry build`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    pub input: PathBuf,
    pub format: InputFormat,
    pub config: Option<PathBuf>,
    pub partition_size: Option<usize>,
    pub codec: Option<String>,
}

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Build(BuildArgs),
    Merge,
    Lookup { tokens: Vec<String> },
}

/// Options shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub index_dir: PathBuf,
    pub log_level: Level,
}

/// Extract the global flags.
pub fn global_args(matches: &ArgMatches) -> GlobalArgs {
    let index_dir = matches
        .get_one::<String>("index-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_DIR));
    let log_level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else if matches.get_flag("quiet") {
        Level::WARN
    } else {
        Level::INFO
    };
    GlobalArgs {
        index_dir,
        log_level,
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "build" => parse_build(sub_matches),
        "merge" => Ok(CliAction::Merge),
        "lookup" => {
            let tokens = sub_matches
                .get_many::<String>("tokens")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            Ok(CliAction::Lookup { tokens })
        }
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_build(matches: &ArgMatches) -> Result<CliAction, String> {
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| "--input is required".to_string())?;
    let text_dir = matches.get_one::<String>("text-dir").map(PathBuf::from);
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("spider") => InputFormat::Spider { text_dir },
        Some("jsonl") | None => {
            if text_dir.is_some() {
                return Err("--text-dir only applies to --format spider".to_string());
            }
            InputFormat::JsonLines
        }
        Some(other) => return Err(format!("Unknown input format: {}", other)),
    };

    Ok(CliAction::Build(BuildArgs {
        input,
        format,
        config: matches.get_one::<String>("config").map(PathBuf::from),
        partition_size: matches.get_one::<usize>("partition-size").copied(),
        codec: matches.get_one::<String>("codec").cloned(),
    }))
}
