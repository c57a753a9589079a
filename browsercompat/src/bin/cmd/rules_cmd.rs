use std::fmt::Write;

use browsercompat::{error::Result, rules::all_rules, CmdExit, Config};
use browsercompat_core::Rule;
use clap::{Arg, ArgMatches, Command};

pub fn command() -> Command {
    Command::new("rules")
        .about("List feature detection rules, built-in and from the rules folder")
        .arg(
            Arg::new("group")
                .short('g')
                .long("group")
                .help("Only list rules of this group (js-api, dom, canvas or a custom file name)"),
        )
}

pub fn run(matches: &ArgMatches, config: &Config) -> Result<CmdExit> {
    let rules = all_rules(&config.rules_dir())?;
    let group = matches.get_one::<String>("group").map(String::as_str);
    println!("{}", render_rule_list(&rules, group));
    Ok(CmdExit {
        code: exitcode::OK,
        message: None,
    })
}

fn render_rule_list(rules: &[Rule], group: Option<&str>) -> String {
    let selected: Vec<&Rule> = rules
        .iter()
        .filter(|rule| group.map_or(true, |group| rule.from == group))
        .collect();

    let mut output = format!("{} rule(s):\n\n", selected.len());
    for rule in selected {
        let _ = writeln!(
            output,
            "  {id:<28} {group:<12} {desc}",
            id = rule.id,
            group = rule.from,
            desc = rule.description
        );
    }
    output
}

#[cfg(test)]
mod test_rules_cli_command {
    use browsercompat_core::parse_rules;
    use insta::assert_snapshot;

    use super::*;

    fn rules() -> Vec<Rule> {
        parse_rules(
            r"
- id: fetch
  from: js-api
  description: Fetch requests
  tests: ['\bfetch\(']
- id: canvas
  from: canvas
  description: 2D canvas
  tests: ['getContext']
",
        )
        .expect("valid rules")
    }

    #[test]
    fn can_list_all_rules() {
        assert_snapshot!(render_rule_list(&rules(), None).trim_end(), @r"
        2 rule(s):

          fetch                        js-api       Fetch requests
          canvas                       canvas       2D canvas
        ");
    }

    #[test]
    fn can_filter_by_group() {
        let output = render_rule_list(&rules(), Some("canvas"));
        assert!(output.starts_with("1 rule(s):"));
        assert!(!output.contains("fetch"));
    }

    #[test]
    fn can_run_with_custom_rules() {
        let temp_dir = tree_fs::TreeBuilder::default()
            .create()
            .expect("create tree");
        let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
        std::fs::write(
            config.rules_dir().join("team.yaml"),
            "- id: intl\n  tests: ['Intl\\.']\n",
        )
        .expect("write");

        let matches = command()
            .try_get_matches_from(["rules", "--group", "team"])
            .expect("valid arguments");
        assert_eq!(
            run(&matches, &config).expect("rules listed"),
            CmdExit {
                code: exitcode::OK,
                message: None,
            }
        );
    }
}
