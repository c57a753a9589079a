use browsercompat::{error::Result, CmdExit, Config};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn command() -> Command {
    Command::new("config")
        .about("Manage browsercompat configuration")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Show current configuration"))
        .subcommand(
            Command::new("reset")
                .about("Reset configuration to defaults")
                .arg(
                    Arg::new("backup")
                        .long("backup")
                        .help("Keep the current settings file as a backup")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("path").about("Print the configuration folder"))
}

pub fn run(matches: &ArgMatches, config: &Config) -> Result<CmdExit> {
    match matches.subcommand() {
        Some(("show", _)) => run_show(config),
        Some(("reset", reset_matches)) => run_reset(config, reset_matches.get_flag("backup")),
        Some(("path", _)) => Ok(run_path(config)),
        _ => Ok(CmdExit {
            code: exitcode::USAGE,
            message: Some("Unknown config command. See: browsercompat config --help".to_string()),
        }),
    }
}

fn run_show(config: &Config) -> Result<CmdExit> {
    let settings = config.get_settings_from_file()?;
    println!("{}", serde_yaml::to_string(&settings)?);
    Ok(CmdExit {
        code: exitcode::OK,
        message: None,
    })
}

fn run_reset(config: &Config, backup: bool) -> Result<CmdExit> {
    let message = match config.reset_config(backup)? {
        Some(path) => format!(
            "Configuration reset, previous settings saved to {}",
            path.display()
        ),
        None => "Configuration reset".to_string(),
    };
    Ok(CmdExit {
        code: exitcode::OK,
        message: Some(message),
    })
}

fn run_path(config: &Config) -> CmdExit {
    println!("{}", config.root_folder.display());
    CmdExit {
        code: exitcode::OK,
        message: None,
    }
}
