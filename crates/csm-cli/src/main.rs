//! `csm`: clearskies v1 to v2 migration from the command line

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use csm_core::MigrationConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn path_arg<'a>(args: &'a clap::ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing argument <{name}>"))
}

fn run() -> Result<bool> {
    let matches = cli::build().get_matches();
    logging::init(matches.get_flag("verbose"), matches.get_flag("log-json"));

    let config_path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = MigrationConfig::load(config_path)?;
    tracing::debug!(
        "Using {}",
        config_path.map_or_else(|| "default configuration".to_string(), |p| p.display().to_string())
    );

    match matches.subcommand() {
        Some(("analyze", args)) => {
            commands::analyze(path_arg(args, "path")?, args.get_flag("json"), &config)
        }
        Some(("generate", args)) => commands::generate(
            path_arg(args, "project")?,
            path_arg(args, "output")?,
            args.get_flag("write"),
            &config,
        ),
        Some(("map", args)) => {
            let context = args.get_one::<String>("context").map_or("general", String::as_str);
            commands::map(path_arg(args, "file")?, context)
        }
        Some(("explain", args)) => {
            let concept = args.get_one::<String>("concept").context("missing argument <concept>")?;
            Ok(commands::explain(concept))
        }
        Some(("checklist", _)) => commands::checklist(),
        Some(("validate", args)) => commands::validate(path_arg(args, "dir")?, &config),
        _ => Ok(true),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
