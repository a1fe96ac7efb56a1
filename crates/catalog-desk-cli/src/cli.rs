use std::path::PathBuf;

use catalog_desk_core::EntryFilter;
use serde::Serialize;
use thiserror::Error;

use crate::command_apply::{ApplyCommandError, ApplyOptions, run_apply};
use crate::command_comments::{CommentsCommandError, CommentsOptions, run_comments};
use crate::command_entries::{EntriesCommandError, EntriesOptions, run_entries};
use crate::command_history::{HistoryCommandError, HistoryOptions, run_history};
use crate::command_stats::{StatsCommandError, StatsOptions, run_stats};
use crate::command_submit::{SubmitCommandError, SubmitOptions, run_submit};
use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Error)]
pub enum CliAppError {
    #[error("{0}")]
    Usage(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Entries(#[from] EntriesCommandError),
    #[error(transparent)]
    Apply(#[from] ApplyCommandError),
    #[error(transparent)]
    Submit(#[from] SubmitCommandError),
    #[error(transparent)]
    History(#[from] HistoryCommandError),
    #[error(transparent)]
    Stats(#[from] StatsCommandError),
    #[error(transparent)]
    Comments(#[from] CommentsCommandError),
}

pub fn run() -> Result<(), CliAppError> {
    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| CliAppError::Usage(usage()))?;
    match command.as_str() {
        "entries" => {
            let options = parse_entries_options(args.collect())?;
            print_json(&run_entries(&options)?)
        }
        "apply" => {
            let options = parse_apply_options(args.collect())?;
            print_json(&run_apply(&options)?)
        }
        "submit" => {
            let options = parse_submit_options(args.collect())?;
            print_json(&run_submit(&options)?)
        }
        "history" => {
            let options = parse_history_options(args.collect())?;
            print_json(&run_history(&options)?)
        }
        "stats" => {
            let options = parse_stats_options(args.collect())?;
            print_json(&run_stats(&options)?)
        }
        "comments" => {
            let options = parse_comments_options(args.collect())?;
            print_json(&run_comments(&options)?)
        }
        _ => Err(CliAppError::Usage(usage())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliAppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_entries_options(args: Vec<String>) -> Result<EntriesOptions, CliAppError> {
    let mut catalog_id = None;
    let mut filter = EntryFilter::All;
    let mut search = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--type" => {
                filter = next_value("--type", &mut iter)?
                    .parse()
                    .unwrap_or(EntryFilter::All)
            }
            "--search" => search = Some(next_value("--search", &mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(EntriesOptions {
        config_path,
        catalog_id,
        filter,
        search,
    })
}

fn parse_apply_options(args: Vec<String>) -> Result<ApplyOptions, CliAppError> {
    let mut catalog_id = None;
    let mut username = None;
    let mut changes_path = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--user" => username = Some(next_value("--user", &mut iter)?),
            "--changes" => changes_path = Some(PathBuf::from(next_value("--changes", &mut iter)?)),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    let username = username.ok_or_else(|| CliAppError::Usage(usage()))?;
    let changes_path = changes_path.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(ApplyOptions {
        config_path,
        catalog_id,
        username,
        changes_path,
    })
}

fn parse_submit_options(args: Vec<String>) -> Result<SubmitOptions, CliAppError> {
    let mut catalog_id = None;
    let mut username = None;
    let mut rows_path = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--user" => username = Some(next_value("--user", &mut iter)?),
            "--rows" => rows_path = Some(PathBuf::from(next_value("--rows", &mut iter)?)),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    let username = username.ok_or_else(|| CliAppError::Usage(usage()))?;
    let rows_path = rows_path.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(SubmitOptions {
        config_path,
        catalog_id,
        username,
        rows_path,
    })
}

fn parse_history_options(args: Vec<String>) -> Result<HistoryOptions, CliAppError> {
    let mut catalog_id = None;
    let mut username = None;
    let mut order_by = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--user" => username = Some(next_value("--user", &mut iter)?),
            "--order-by" => order_by = Some(next_value("--order-by", &mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    let username = username.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(HistoryOptions {
        config_path,
        catalog_id,
        username,
        order_by,
    })
}

fn parse_comments_options(args: Vec<String>) -> Result<CommentsOptions, CliAppError> {
    let mut catalog_id = None;
    let mut username = None;
    let mut identity = None;
    let mut add = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--user" => username = Some(next_value("--user", &mut iter)?),
            "--identity" => identity = Some(next_value("--identity", &mut iter)?),
            "--add" => add = Some(next_value("--add", &mut iter)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    let username = username.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(CommentsOptions {
        config_path,
        catalog_id,
        username,
        identity,
        add,
    })
}

fn parse_stats_options(args: Vec<String>) -> Result<StatsOptions, CliAppError> {
    let mut catalog_id = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => catalog_id = Some(parse_id(&next_value("--catalog", &mut iter)?)?),
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            _ => return Err(CliAppError::Usage(usage())),
        }
    }
    let catalog_id = catalog_id.ok_or_else(|| CliAppError::Usage(usage()))?;
    Ok(StatsOptions {
        config_path,
        catalog_id,
    })
}

fn parse_id(value: &str) -> Result<u64, CliAppError> {
    value
        .parse()
        .map_err(|_| CliAppError::Usage(format!("invalid catalog id {value:?}\n\n{}", usage())))
}

fn next_value(flag: &str, iter: &mut impl Iterator<Item = String>) -> Result<String, CliAppError> {
    iter.next()
        .ok_or_else(|| CliAppError::Usage(format!("{flag} requires a value\n\n{}", usage())))
}

fn usage() -> String {
    "usage: catalog-desk entries --catalog <id> [--type <translated|untranslated|fuzzy>] [--search <regex>] [--config <path>]\n       catalog-desk apply --catalog <id> --user <username> --changes <batch.json> [--config <path>]\n       catalog-desk submit --catalog <id> --user <username> --rows <rows.json> [--config <path>]\n       catalog-desk history --catalog <id> --user <username> [--order-by <[-]field>] [--config <path>]\n       catalog-desk stats --catalog <id> [--config <path>]\n       catalog-desk comments --catalog <id> --user <username> [--identity <hash>] [--add <body>] [--config <path>]".to_string()
}
