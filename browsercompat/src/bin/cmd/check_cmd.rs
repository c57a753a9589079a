use std::{fmt::Write, path::PathBuf};

use browsercompat::{error::Result, CheckOptions, Checker, CmdExit, Config, FileReport, Settings};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;

pub fn command() -> Command {
    Command::new("check")
        .about("Check source files against the configured browser versions")
        .arg(
            Arg::new("files")
                .help("Source files to check")
                .value_name("FILES")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-download")
                .long("no-download")
                .help("Use the last downloaded data files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Do not color support statuses")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
}

pub fn run(matches: &ArgMatches, config: &Config, settings: &Settings) -> Result<CmdExit> {
    let options = CheckOptions {
        download: !matches.get_flag("no-download"),
        colored: !matches.get_flag("no-color") && console::colors_enabled(),
    };

    let Some(checker) = Checker::load(config, settings, options)? else {
        return Ok(CmdExit {
            code: exitcode::OK,
            message: Some("No browser compatibility check requested".to_string()),
        });
    };

    let reports = matches
        .get_many::<PathBuf>("files")
        .unwrap_or_default()
        .map(|path| checker.check_file(path))
        .collect::<Result<Vec<_>>>()?;

    let output = if matches.get_one::<String>("format").is_some_and(|f| f == "json") {
        let json: Vec<_> = reports.iter().map(FileReport::to_json).collect();
        serde_json::to_string_pretty(&json)?
    } else {
        render_text(&reports)
    };
    println!("{output}");

    Ok(exit_status(&reports))
}

fn render_text(reports: &[FileReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let _ = writeln!(output, "{}", style(report.path.display()).bold());
        let _ = writeln!(output, "{}", report.result);
    }
    output
}

fn exit_status(reports: &[FileReport]) -> CmdExit {
    let failures: Vec<String> = reports
        .iter()
        .filter_map(|report| {
            report
                .result
                .ensure_compatible()
                .err()
                .map(|err| format!("{}: {err}", report.path.display()))
        })
        .collect();

    if failures.is_empty() {
        CmdExit {
            code: exitcode::OK,
            message: None,
        }
    } else {
        CmdExit {
            code: exitcode::DATAERR,
            message: Some(failures.join("\n")),
        }
    }
}

#[cfg(test)]
mod test_check_cli_command {
    use std::{collections::BTreeMap, fs};

    use browsercompat_core::BrowserConfig;
    use tree_fs::Tree;

    use super::*;

    const DATASET: &str = r#"{
  "agents": { "ie": { "browser": "IE" } },
  "data": {
    "queryselector": {
      "title": "querySelector/querySelectorAll",
      "description": "Method of accessing DOM elements using CSS selectors",
      "categories": ["DOM"],
      "stats": { "ie": { "7": "n", "8": "a #1", "9": "y" } },
      "notes_by_num": { "1": "Only supports CSS 2.1 selectors" }
    }
  }
}"#;

    fn initialize(temp_dir: &Tree, fail: Option<&str>) -> (Config, Settings) {
        let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
        let settings = Settings {
            browsers: BTreeMap::from([("ie".to_string(), BrowserConfig::new(None, fail))]),
            ..Settings::default()
        };
        for source in &settings.sources {
            fs::write(source.backup_path(&config.data_dir()), DATASET).expect("write");
        }
        (config, settings)
    }

    fn matches(args: &[&str]) -> ArgMatches {
        command()
            .try_get_matches_from(args)
            .expect("valid arguments")
    }

    fn source_file(temp_dir: &Tree, content: &str) -> String {
        let path = temp_dir.root.join("main.js");
        fs::write(&path, content).expect("write");
        path.display().to_string()
    }

    #[test]
    fn required_version_issue_fails() {
        let temp_dir = tree_fs::TreeBuilder::default()
            .create()
            .expect("create tree");
        let (config, settings) = initialize(&temp_dir, Some("7"));
        let file = source_file(&temp_dir, "document.querySelector('#app');");

        let cmd = run(
            &matches(&["check", "--no-download", "--no-color", &file]),
            &config,
            &settings,
        )
        .expect("check ran");
        assert_eq!(cmd.code, exitcode::DATAERR);
        assert_eq!(
            cmd.message,
            Some(format!(
                "{file}: Code is incompatible with minimum browser version"
            ))
        );
    }

    #[test]
    fn issues_above_fail_version_only_report() {
        let temp_dir = tree_fs::TreeBuilder::default()
            .create()
            .expect("create tree");
        let (config, settings) = initialize(&temp_dir, Some("8"));
        let file = source_file(&temp_dir, "document.querySelector('#app');");

        let cmd = run(
            &matches(&["check", "--no-download", "--format", "json", &file]),
            &config,
            &settings,
        )
        .expect("check ran");
        assert_eq!(cmd.code, exitcode::OK);
        assert_eq!(cmd.message, None);
    }

    #[test]
    fn nothing_to_check_is_not_an_error() {
        let temp_dir = tree_fs::TreeBuilder::default()
            .create()
            .expect("create tree");
        let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
        let file = source_file(&temp_dir, "document.querySelector('#app');");

        let cmd = run(
            &matches(&["check", "--no-download", &file]),
            &config,
            &Settings {
                ignore_unlisted: true,
                ..Settings::default()
            },
        )
        .expect("check ran");
        assert_eq!(
            cmd,
            CmdExit {
                code: exitcode::OK,
                message: Some("No browser compatibility check requested".to_string()),
            }
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp_dir = tree_fs::TreeBuilder::default()
            .create()
            .expect("create tree");
        let (config, settings) = initialize(&temp_dir, None);
        let missing = temp_dir.root.join("missing.js").display().to_string();

        assert!(run(
            &matches(&["check", "--no-download", &missing]),
            &config,
            &settings
        )
        .is_err());
    }

    #[test]
    fn files_are_required() {
        assert!(command().try_get_matches_from(["check"]).is_err());
    }
}
