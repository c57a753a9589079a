//! Built-in and user detection rules

use std::{fs, path::Path};

use browsercompat_core::{get_all_rules, parse_rules, Rule, Rules};
use tracing::debug;

use crate::error::Result;

/// Load user rules from every `.yaml`/`.yml` file of `rules_dir`.
///
/// Files are read in name order. Rules without a `from` group are assigned
/// the file name. A missing folder yields no rules.
///
/// # Errors
/// when a file can not be read or is not a valid rule list
pub fn load_custom_rules(rules_dir: &Path) -> Result<Vec<Rule>> {
    let mut custom_rules = Vec::new();
    if !rules_dir.is_dir() {
        return Ok(custom_rules);
    }

    let mut paths = fs::read_dir(rules_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if !path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            continue;
        }
        let group = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rules = parse_rules(&fs::read_to_string(&path)?)?;
        debug!(path = %path.display(), count = rules.len(), "custom rules loaded");
        custom_rules.extend(rules.into_iter().map(|mut rule| {
            if rule.from.is_empty() {
                rule.from.clone_from(&group);
            }
            rule
        }));
    }
    Ok(custom_rules)
}

/// Built-in rules followed by the user rules of `rules_dir`.
///
/// # Errors
/// when the built-in or the user rules can not be parsed
pub fn all_rules(rules_dir: &Path) -> Result<Vec<Rule>> {
    let mut rules = get_all_rules()?;
    rules.extend(load_custom_rules(rules_dir)?);
    Ok(rules)
}

/// Detection table of [`all_rules`].
///
/// # Errors
/// when the built-in or the user rules can not be parsed
pub fn active_rules(rules_dir: &Path) -> Result<Rules> {
    Ok(Rules::new(&all_rules(rules_dir)?))
}
