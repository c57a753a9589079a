//! Settings file, data folder and rule folder wired through a full check.

use std::fs;

use browsercompat::{CheckOptions, Checker, Config};
use browsercompat_core::Outcome;

const SETTINGS: &str = r#"
ignore_unlisted: true
dont_download: true
browsers:
  chrome:
    report: 20
    fail: 30
  ie:
    fail: "10"
sources:
  - file: caniuse.json
    url: https://example.invalid/caniuse.json
    extension: data
"#;

const DATASET: &str = r#"{
  "agents": {
    "chrome": { "browser": "Chrome" },
    "ie": { "browser": "IE" },
    "firefox": { "browser": "Firefox" }
  },
  "data": {
    "promises": {
      "title": "Promises",
      "description": "A promise represents the eventual result of an asynchronous operation.",
      "notes": "",
      "categories": ["JS API"],
      "notes_by_num": { "1": "Partial support refers to a lack of `finally`." },
      "stats": {
        "chrome": { "19": "n", "25": "n", "30": "a #1", "33": "y" },
        "ie": { "10": "n", "11": "n" },
        "firefox": { "20": "n" }
      }
    },
    "intl": {
      "title": "Internationalization API",
      "description": "Locale-sensitive formatting.",
      "notes": "Requires locale data.\nOlder releases ship English only.",
      "categories": ["JS API"],
      "stats": {
        "chrome": { "19": "n", "25": "u", "30": "y" },
        "ie": { "10": "n", "11": "y" }
      }
    }
  }
}"#;

fn initialize(temp_dir: &tree_fs::Tree) -> (Config, browsercompat::Settings) {
    let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
    fs::write(&config.setting_file_path, SETTINGS).expect("write settings");
    fs::write(config.data_dir().join("caniuse.json.new"), DATASET).expect("write dataset");
    fs::write(
        config.rules_dir().join("i18n.yaml"),
        "- id: intl\n  description: Intl formatters\n  tests: ['\\bIntl\\.']\n",
    )
    .expect("write rules");
    let settings = config.get_settings_from_file().expect("valid settings");
    (config, settings)
}

#[test]
fn can_check_with_user_configuration() {
    let temp_dir = tree_fs::TreeBuilder::default()
        .create()
        .expect("create tree");
    let (config, settings) = initialize(&temp_dir);

    let checker = Checker::load(
        &config,
        &settings,
        CheckOptions {
            download: true,
            colored: false,
        },
    )
    .expect("loaded")
    .expect("browsers configured");

    let source = temp_dir.root.join("app.js");
    fs::write(
        &source,
        "new Promise(r => r(new Intl.NumberFormat('de').format(1)));",
    )
    .expect("write source");

    let report = checker.check_file(&source).expect("checked");

    // ie 10 is required and has no support
    assert!(report.result.failure);
    // the downloaded copy became the backup copy
    assert!(config.data_dir().join("caniuse.json").is_file());

    let Outcome::Issues { issues, summary } = &report.result.outcome else {
        panic!("expected issues");
    };
    assert_eq!(
        issues,
        "Browser: Chrome\n\
         \tVersion: 25\n\
         \t\tInternationalization API:Unknown Support\n\
         \t\tPromises:No Support\n\
         \tVersion: 30\n\
         \t\tPromises:Partial Support - Partial support refers to a lack of `finally`.\n\
         Browser: IE\n\
         \tVersion: 10\n\
         \t\tInternationalization API:No Support\n\
         \t\tPromises:No Support\n\
         \tVersion: 11\n\
         \t\tPromises:No Support\n"
    );
    assert_eq!(
        summary,
        "Internationalization API\n\t\tLocale-sensitive formatting.\n\tNotes:\n\t\tRequires locale data.\n\t\tOlder releases ship English only.\n\
         Promises\n\t\tA promise represents the eventual result of an asynchronous operation.\n\n"
    );
}

#[test]
fn nothing_to_check_skips_loading() {
    let temp_dir = tree_fs::TreeBuilder::default()
        .create()
        .expect("create tree");
    let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
    fs::write(&config.setting_file_path, "ignore_unlisted: true\n").expect("write settings");
    let settings = config.get_settings_from_file().expect("valid settings");

    let checker = Checker::load(&config, &settings, CheckOptions::default()).expect("loaded");
    assert!(checker.is_none());
    assert_eq!(
        fs::read_dir(config.data_dir()).expect("data dir").count(),
        0
    );
}

#[test]
fn settings_without_browsers_report_every_browser() {
    let temp_dir = tree_fs::TreeBuilder::default()
        .create()
        .expect("create tree");
    let config = Config::new(Some(&temp_dir.root.join("app"))).expect("Failed to create config");
    fs::write(
        &config.setting_file_path,
        "ignore_unlisted: false\ndont_download: true\nsources:\n  - file: caniuse.json\n    url: https://example.invalid/caniuse.json\n    extension: data\n",
    )
    .expect("write settings");
    fs::write(config.data_dir().join("caniuse.json"), DATASET).expect("write dataset");
    let settings = config.get_settings_from_file().expect("valid settings");

    let checker = Checker::load(&config, &settings, CheckOptions::default())
        .expect("loaded")
        .expect("every browser is checked");
    let report = checker
        .check_source(std::path::Path::new("app.js"), "new Promise(f);")
        .expect("checked");

    assert!(!report.result.failure);
    let browsers: Vec<&str> = report.grouped.browsers.keys().map(String::as_str).collect();
    assert_eq!(browsers, vec!["Chrome", "Firefox", "IE"]);
}
