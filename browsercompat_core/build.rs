use std::{env, fs, fs::File, io::prelude::*, path::Path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=rules/");

    let out_dir = env::var("OUT_DIR")?;
    let dest_rules_path = Path::new(&out_dir).join("all-rules.yaml");

    // Try multiple possible paths for rules directory
    let possible_paths = ["rules", "../browsercompat_core/rules"];

    let mut rules_path = None;
    for path in &possible_paths {
        if Path::new(path).exists() {
            rules_path = Some(*path);
            break;
        }
    }

    let rules_path = rules_path.ok_or_else(|| {
        let msg = format!("Rules directory not found. Tried paths: {possible_paths:?}");
        std::io::Error::new(std::io::ErrorKind::NotFound, msg)
    })?;

    // read_dir order is platform dependent, sort so the embedded table is stable
    let mut paths = fs::read_dir(rules_path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let mut all_rules = String::new();
    for path in paths {
        if path.extension().is_some_and(|ext| ext == "yaml") {
            let contents = fs::read_to_string(&path)?;
            all_rules.push_str(&contents);
            all_rules.push('\n');
        }
    }

    let mut file = File::create(dest_rules_path)?;
    file.write_all(all_rules.as_bytes())?;

    Ok(())
}
