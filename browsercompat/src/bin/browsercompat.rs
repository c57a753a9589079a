mod cmd;

use std::{path::PathBuf, process::exit};

use browsercompat::{Config, Settings};
use console::{style, Style};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_ERR_EXIT_CODE: i32 = 1;
const LOG_ENV_VAR: &str = "BROWSERCOMPAT_LOG";

fn main() {
    let app = cmd::default::command()
        .subcommand(cmd::check_cmd::command())
        .subcommand(cmd::rules_cmd::command())
        .subcommand(cmd::config::command())
        .subcommand(cmd::completions_cmd::command());

    let matches = app.clone().get_matches();

    init_logging(
        matches
            .get_one::<String>("log")
            .map_or("info", String::as_str),
    );

    if let Some(("completions", subcommand_matches)) = matches.subcommand() {
        let cmd = cmd::completions_cmd::run(subcommand_matches, &mut app.clone());
        exit(cmd.code)
    }

    // load configuration
    let config = match Config::new(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Loading config error: {err}");
            exit(DEFAULT_ERR_EXIT_CODE)
        }
    };

    let res = match matches.subcommand() {
        Some(("check", subcommand_matches)) => {
            let settings = load_settings(&config);
            cmd::check_cmd::run(subcommand_matches, &config, &settings)
        }
        Some(("rules", subcommand_matches)) => cmd::rules_cmd::run(subcommand_matches, &config),
        Some(("config", subcommand_matches)) => cmd::config::run(subcommand_matches, &config),
        _ => unreachable!(),
    };

    let exit_with = match res {
        Ok(cmd) => {
            if let Some(message) = cmd.message {
                let style = if exitcode::is_success(cmd.code) {
                    Style::new().green()
                } else {
                    Style::new().red()
                };
                eprintln!("{}", style.apply_to(message));
            }
            cmd.code
        }
        Err(err) => {
            eprintln!("{}", Style::new().red().apply_to(&err));
            debug!(error = ?err, "command failed");
            DEFAULT_ERR_EXIT_CODE
        }
    };
    exit(exit_with)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn load_settings(config: &Config) -> Settings {
    match config.get_settings_from_file() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!(
                "Could not load config from file. Try resolving by running `{}`\nError: {err}",
                style("browsercompat config reset").bold().italic().underlined(),
            );
            exit(DEFAULT_ERR_EXIT_CODE)
        }
    }
}
