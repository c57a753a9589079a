use std::io::{self, Write};

use browsercompat::CmdExit;
use clap::{Arg, ArgMatches, Command};
use clap_complete::{generate, Shell};
use clap_complete_nushell::Nushell;

const BIN_NAME: &str = "browsercompat";

/// Shells a completion script can be written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Clap(Shell),
    Nushell,
}

const TARGETS: [(&str, Target); 6] = [
    ("bash", Target::Clap(Shell::Bash)),
    ("zsh", Target::Clap(Shell::Zsh)),
    ("fish", Target::Clap(Shell::Fish)),
    ("elvish", Target::Clap(Shell::Elvish)),
    ("powershell", Target::Clap(Shell::PowerShell)),
    ("nushell", Target::Nushell),
];

impl Target {
    fn from_name(name: &str) -> Option<Self> {
        TARGETS
            .iter()
            .find(|(target_name, _)| *target_name == name)
            .map(|(_, target)| *target)
    }

    fn write_to(self, app: &mut Command, out: &mut dyn Write) {
        match self {
            Self::Clap(shell) => generate(shell, app, BIN_NAME, out),
            Self::Nushell => generate(Nushell, app, BIN_NAME, out),
        }
    }
}

pub fn command() -> Command {
    Command::new("completions")
        .about("Generate shell completion scripts")
        .arg(
            Arg::new("shell")
                .help("Shell to generate completions for")
                .required(true)
                .value_parser(TARGETS.map(|(name, _)| name)),
        )
}

pub fn run(matches: &ArgMatches, app: &mut Command) -> CmdExit {
    run_with_output(matches, app, &mut io::stdout())
}

fn run_with_output(matches: &ArgMatches, app: &mut Command, out: &mut dyn Write) -> CmdExit {
    let shell_name = matches
        .get_one::<String>("shell")
        .map_or("", String::as_str);

    let Some(target) = Target::from_name(shell_name) else {
        let supported: Vec<&str> = TARGETS.iter().map(|(name, _)| *name).collect();
        return CmdExit {
            code: exitcode::USAGE,
            message: Some(format!(
                "Unsupported shell: {shell_name}. Supported: {}",
                supported.join(", ")
            )),
        };
    };

    target.write_to(app, out);
    CmdExit {
        code: exitcode::OK,
        message: None,
    }
}
