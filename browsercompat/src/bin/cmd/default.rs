use std::path::PathBuf;

use clap::{crate_version, value_parser, Arg, Command};

pub fn command() -> Command {
    Command::new("browsercompat")
        .version(crate_version!())
        .about("Find web-platform features in your sources that your supported browsers lack")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log")
                .long("log")
                .help("Set logging level")
                .value_name("LEVEL")
                .value_parser(["off", "trace", "debug", "info", "warn", "error"])
                .default_value("info")
                .ignore_case(true)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration folder")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
}
