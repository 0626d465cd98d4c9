// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caseboard CLI entrypoint.
//!
//! Opens the board stored in a directory (the current one by default) and runs the TUI.

use std::error::Error;
use std::path::PathBuf;

use caseboard::config::BoardConfig;
use caseboard::session::BoardSession;
use caseboard::store::{DirStore, MemoryStore, WriteDurability};

const DEFAULT_LOG_FILE: &str = "caseboard.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--config <file>] [--log-file <path>] [--durable-writes] [--demo]\n  {program} [--store <dir>] [--config <file>] [--log-file <path>] [--durable-writes] [--demo]\n  {program} --ephemeral [--config <file>] [--log-file <path>] [--demo]\n\nIf store-dir/--store is omitted, the current working directory is used.\n--ephemeral keeps the board in memory only and cannot be combined with store-dir/--store.\n--demo seeds an empty board with a sample investigation.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nLogs go to <store-dir>/{DEFAULT_LOG_FILE} unless --log-file is given (none with --ephemeral).\nSet {} to adjust the log filter (e.g. `caseboard=debug`).",
        caseboard::logging::LOG_ENV_VAR
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    store_dir: Option<String>,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    durable_writes: bool,
    ephemeral: bool,
    demo: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--ephemeral" => {
                if options.ephemeral {
                    return Err(());
                }
                options.ephemeral = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(PathBuf::from(args.next().ok_or(())?));
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(arg);
            }
        }
    }

    if options.ephemeral && (options.store_dir.is_some() || options.durable_writes) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "caseboard".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config = match &options.config {
            Some(path) => BoardConfig::load(path)?,
            None => BoardConfig::default(),
        };

        let store_dir = PathBuf::from(options.store_dir.as_deref().unwrap_or("."));
        let log_file = options
            .log_file
            .clone()
            .or_else(|| (!options.ephemeral).then(|| store_dir.join(DEFAULT_LOG_FILE)));
        if let Some(path) = &log_file {
            caseboard::logging::init_file_logging(path)?;
        }

        let (mut session, status) = if options.ephemeral {
            BoardSession::open(config, Box::new(MemoryStore::new()))?
        } else {
            let durability = if options.durable_writes {
                WriteDurability::Durable
            } else {
                WriteDurability::BestEffort
            };
            let store = DirStore::new(&store_dir).with_durability(durability);
            BoardSession::open(config, Box::new(store))?
        };
        tracing::info!(
            store = %store_dir.display(),
            ephemeral = options.ephemeral,
            ?status,
            nodes = session.board().nodes().len(),
            "board opened"
        );

        if options.demo {
            if session.board().is_empty() {
                session.replace_board(caseboard::model::fixtures::investigation_small());
            } else {
                tracing::info!("stored board is not empty; demo board skipped");
            }
        }

        caseboard::tui::run(session)
    })();

    if let Err(err) = result {
        eprintln!("caseboard: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_positional_store_dir() {
        let options = parse(&["some/dir", "--demo"]).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
        assert!(options.demo);
        assert!(!options.ephemeral);
    }

    #[test]
    fn parses_store_flag_and_durable_writes() {
        let options = parse(&["--durable-writes", "--store", "some/dir"]).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
    }

    #[test]
    fn parses_config_and_log_file() {
        let options =
            parse(&["--config", "board.toml", "--log-file", "/tmp/cb.log"]).expect("parse options");
        assert_eq!(options.config.as_deref(), Some(Path::new("board.toml")));
        assert_eq!(options.log_file.as_deref(), Some(Path::new("/tmp/cb.log")));
    }

    #[test]
    fn parses_ephemeral_demo_in_any_order() {
        for args in [["--ephemeral", "--demo"], ["--demo", "--ephemeral"]] {
            let options = parse(&args).expect("parse options");
            assert!(options.ephemeral);
            assert!(options.demo);
            assert!(options.store_dir.is_none());
        }
    }

    #[test]
    fn rejects_ephemeral_with_a_store() {
        parse(&["--ephemeral", "dir"]).unwrap_err();
        parse(&["--store", "dir", "--ephemeral"]).unwrap_err();
        parse(&["--ephemeral", "--durable-writes"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--demo", "--demo"]).unwrap_err();
        parse(&["--store", ".", "--store", "other"]).unwrap_err();
        parse(&["--config", "a.toml", "--config", "b.toml"]).unwrap_err();
    }

    #[test]
    fn rejects_multiple_store_dirs() {
        parse(&["one", "two"]).unwrap_err();
        parse(&["--store", "one", "two"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse(&["--store"]).unwrap_err();
        parse(&["--config"]).unwrap_err();
        parse(&["--log-file"]).unwrap_err();
    }
}
