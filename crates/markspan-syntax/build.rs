use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const FIXTURE_DIR: &str = "src/snapshots";

/// Turn a fixture file stem into a valid test function name.
fn test_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Embeds every `.md` fixture into a generated test that parses it and
/// compares against the `.snap` of the same stem.
fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let fixture_dir = manifest_dir.join(FIXTURE_DIR);

    // Test name -> (snapshot name, fixture path). Sorted for stable output.
    let mut fixtures: BTreeMap<String, (String, PathBuf)> = BTreeMap::new();
    for entry in std::fs::read_dir(&fixture_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_none_or(|e| e != "md") {
            continue;
        }
        let stem = path.file_stem().unwrap().to_str().unwrap().to_string();
        let name = test_name(&stem);
        if let Some((other, _)) = fixtures.insert(name.clone(), (stem.clone(), path)) {
            panic!("fixtures {other}.md and {stem}.md both map to test `{name}`");
        }
    }

    let mut code = String::from("mod fixtures {\n    use super::snapshot_test;\n");
    for (name, (stem, path)) in &fixtures {
        println!("cargo::rerun-if-changed={}", path.display());
        write!(
            code,
            "\n    #[test]\n    fn {name}() {{\n        snapshot_test({stem:?}, include_str!({path:?}));\n    }}\n",
            path = path.display().to_string(),
        )
        .unwrap();
    }
    code.push_str("}\n");

    let dest = Path::new(&std::env::var("OUT_DIR").unwrap()).join("fixture_tests.rs");
    std::fs::write(dest, code).unwrap();

    println!("cargo::rerun-if-changed={FIXTURE_DIR}");
}
