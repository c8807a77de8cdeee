//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

pub(crate) fn build() -> Command {
    Command::new("csm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate clearskies v1 projects to v2")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Analyze a v1 project")
                .arg(project_arg("path"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate the v2 project (dry run unless --write)")
                .arg(project_arg("project"))
                .arg(
                    Arg::new("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory"),
                )
                .arg(
                    Arg::new("write")
                        .long("write")
                        .action(ArgAction::SetTrue)
                        .help("Write files instead of listing them"),
                ),
        )
        .subcommand(
            Command::new("map")
                .about("Translate a v1 snippet")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Snippet file, or - for stdin"),
                )
                .arg(
                    Arg::new("context")
                        .long("context")
                        .default_value("general")
                        .help("model, handler, di or general"),
                ),
        )
        .subcommand(
            Command::new("explain")
                .about("Explain how a concept changed")
                .arg(Arg::new("concept").required(true).help("Concept name")),
        )
        .subcommand(Command::new("checklist").about("Print the migration checklist"))
        .subcommand(
            Command::new("validate")
                .about("Validate a generated v2 tree")
                .arg(project_arg("dir")),
        )
}

fn project_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Project directory")
}
