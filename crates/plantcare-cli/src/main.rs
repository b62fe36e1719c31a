// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::{Config, sort_key_names};
use plantcare_app::{PlantId, SortKey};
use runtime::{Command, FieldAssignment, ListOptions, Runtime};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let Some(command) = options.command else {
        bail!("missing command; run with --help to see supported commands");
    };

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `plantcare --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_level())?;

    let base_url = config.api_base_url();
    let client = plantcare_api::Client::new(&base_url, config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    debug!(%base_url, "plant API client ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut runtime = Runtime::new(
        client,
        config.session()?,
        config.view_state(),
        stdin.lock(),
        stdout.lock(),
    );
    runtime.execute(command)
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|error| anyhow!("invalid log level {level:?}: {error}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    show_help: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        show_help: false,
        command: None,
    };

    let mut iter = args.into_iter().map(|arg| arg.as_ref().to_owned());
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            name => {
                let rest: Vec<String> = iter.by_ref().collect();
                options.command = Some(parse_command(name, rest)?);
            }
        }
    }

    Ok(options)
}

fn parse_command(name: &str, args: Vec<String>) -> Result<Command> {
    let mut iter = args.into_iter();
    let mut positional = Vec::new();
    let mut list = ListOptions::default();
    let mut wizard = false;
    let mut assume_yes = false;
    let mut assignments = Vec::new();

    while let Some(arg) = iter.next() {
        match (name, arg.as_str()) {
            ("list", "--category") => {
                list.category = Some(flag_value(&mut iter, "--category", "a category")?);
            }
            ("list", "--sort") => {
                let raw = flag_value(&mut iter, "--sort", "a sort order")?;
                let sort = SortKey::parse(&raw).ok_or_else(|| {
                    anyhow!(
                        "unknown sort order {raw:?}; use one of: {}",
                        sort_key_names()
                    )
                })?;
                list.sort = Some(sort);
            }
            ("list", "--limit") => {
                let raw = flag_value(&mut iter, "--limit", "a number")?;
                let limit: usize = raw
                    .parse()
                    .with_context(|| format!("--limit expects a positive number, got {raw:?}"))?;
                if limit == 0 {
                    bail!("--limit must be positive");
                }
                list.limit = Some(limit);
            }
            ("list" | "categories", "--mine") => {
                list.mine = true;
            }
            ("add", "--wizard") => {
                wizard = true;
            }
            ("add" | "update", "--set") => {
                let raw = flag_value(&mut iter, "--set", "field=value")?;
                assignments.push(FieldAssignment::parse(&raw)?);
            }
            ("delete", "--yes" | "-y") => {
                assume_yes = true;
            }
            (_, flag) if flag.starts_with('-') => {
                bail!("unknown option {flag:?} for `{name}`; run with --help to see supported options");
            }
            _ => positional.push(arg),
        }
    }

    let command = match name {
        "list" => {
            no_positional(name, &positional)?;
            Command::List(list)
        }
        "categories" => {
            no_positional(name, &positional)?;
            Command::Categories { mine: list.mine }
        }
        "show" => Command::Show {
            id: single_id(name, positional)?,
        },
        "add" => {
            no_positional(name, &positional)?;
            Command::Add {
                wizard,
                assignments,
            }
        }
        "update" => Command::Update {
            id: single_id(name, positional)?,
            assignments,
        },
        "delete" => Command::Delete {
            id: single_id(name, positional)?,
            assume_yes,
        },
        unknown => {
            bail!("unknown command {unknown:?}; run with --help to see supported commands")
        }
    };
    Ok(command)
}

fn flag_value(iter: &mut impl Iterator<Item = String>, flag: &str, what: &str) -> Result<String> {
    iter.next()
        .ok_or_else(|| anyhow!("{flag} requires {what}"))
}

fn no_positional(name: &str, positional: &[String]) -> Result<()> {
    if let Some(extra) = positional.first() {
        bail!("`{name}` takes no arguments, got {extra:?}");
    }
    Ok(())
}

fn single_id(name: &str, positional: Vec<String>) -> Result<PlantId> {
    let mut positional = positional.into_iter();
    let Some(id) = positional.next() else {
        bail!("`{name}` requires a plant id; run `plantcare list` to see ids");
    };
    if let Some(extra) = positional.next() {
        bail!("`{name}` takes one plant id, got extra argument {extra:?}");
    }
    Ok(PlantId::new(id))
}

fn print_help() {
    println!("plantcare [options] <command>");
    println!();
    println!("Commands:");
    println!("  list [--category C] [--sort KEY] [--mine] [--limit N]");
    println!("                           List plants, filtered and sorted");
    println!("  categories [--mine]      Show categories with plant counts");
    println!("  show <id>                Show every field of one plant");
    println!("  add [--wizard] [--set field=value]...");
    println!("                           Add a plant, step by step with --wizard");
    println!("  update <id> --set field=value...");
    println!("                           Change fields of an existing plant");
    println!("  delete <id> [--yes]      Delete a plant after confirmation");
    println!();
    println!("Options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --help                   Show this help");
    println!();
    println!("Sort keys: {}", sort_key_names());
}
