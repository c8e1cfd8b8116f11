// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use roster_app::{AppCommand, RosterState};
use roster_source::RosterSource;
use roster_tui::UiOptions;
use runtime::SourceRuntime;
use std::env;
use std::path::PathBuf;

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

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `roster --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let source = resolve_source(&options, &config)?;
    if options.print_data_path {
        println!("{}", source.describe());
        return Ok(());
    }

    logging::init(config.log_path().as_deref(), config.log_level())?;
    tracing::info!(
        config = %options.config_path.display(),
        source = %source.describe(),
        "starting roster"
    );

    if options.check_only {
        let records = source
            .load()
            .with_context(|| format!("check roster source {}", source.describe()))?;
        let mut state = RosterState::default();
        state.dispatch(AppCommand::Load(records))?;
        println!(
            "ok: {} records, {} categories from {}",
            state.records().len(),
            state.categories().len(),
            source.describe()
        );
        return Ok(());
    }

    let ui_options = UiOptions {
        title: config.title().to_owned(),
        initial_query: config.initial_query().to_owned(),
    };
    let mut state = RosterState::default();
    let mut runtime = SourceRuntime::new(source);
    roster_tui::run_app(&mut state, &mut runtime, &ui_options)
}

fn resolve_source(options: &CliOptions, config: &Config) -> Result<RosterSource> {
    if options.builtin {
        return Ok(RosterSource::Builtin);
    }
    if let Some(path) = &options.data_path {
        roster_source::validate_roster_path(&path.to_string_lossy())?;
        return Ok(RosterSource::File(path.clone()));
    }
    if let Some(path) = config.data_path()? {
        return Ok(RosterSource::File(path));
    }

    let default_path = roster_source::default_roster_path()?;
    if default_path.exists() {
        return Ok(RosterSource::File(default_path));
    }
    Ok(RosterSource::Builtin)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    builtin: bool,
    print_config_path: bool,
    print_data_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        builtin: false,
        print_config_path: false,
        print_data_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--data requires a roster file path"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--builtin" => {
                options.builtin = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-data-path" => {
                options.print_data_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.builtin && options.data_path.is_some() {
        return Err(anyhow::anyhow!(
            "--builtin and --data are mutually exclusive; pick one roster source"
        ));
    }

    Ok(options)
}

#[cfg(test)]
fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn print_help() {
    println!("roster");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <path>            Load the roster from a .toml or .json file");
    println!("  --builtin                Use the built-in roster, ignoring [data].path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-data-path        Print the resolved roster source");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + roster source and exit");
    println!("  --help                   Show this help");
}
