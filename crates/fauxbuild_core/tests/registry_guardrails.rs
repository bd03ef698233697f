use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fauxbuild_core::convention::{self, NamingConvention};
use fauxbuild_core::defaults;
use fauxbuild_core::value::ValueType;

#[test]
fn convention_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, NamingConvention> = HashMap::new();

    for info in convention::CONVENTIONS {
        assert_eq!(
            convention::from_str(info.canonical),
            Some(info.id),
            "convention canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            convention::as_str(info.id),
            info.canonical,
            "convention as_str mismatch for {:?}",
            info.id
        );

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate convention spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }

        for &alias in info.aliases {
            assert_eq!(
                convention::from_str(alias),
                Some(info.id),
                "convention alias not resolvable: {}",
                alias
            );
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!(
                    "duplicate convention alias spelling {:?}: {:?} and {:?}",
                    alias, prev, info.id
                );
            }
        }
    }
}

#[test]
fn conventions_tell_writers_and_readers_apart() {
    for info in convention::CONVENTIONS {
        // A convention without any prefix relies on arity alone.
        if info.writer_prefix.is_empty() && info.reader_prefix.is_empty() {
            continue;
        }
        assert_ne!(
            info.writer_prefix, info.reader_prefix,
            "{} uses one prefix for both roles",
            info.canonical
        );
    }
}

#[test]
fn every_primitive_has_a_registered_zero() {
    for ty in ValueType::ALL.iter().copied().filter(|t| t.is_primitive()) {
        assert!(defaults::zero_value(ty).is_some(), "no zero registered for {ty}");
    }
}

// -------------------------------------------------------------------------------------------------
// Drift guardrails: naming prefixes come from the convention registry.
// -------------------------------------------------------------------------------------------------

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root missing")
        .to_path_buf()
}

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

fn find_string_literals(paths: &[PathBuf], literals: &[&str]) -> Vec<String> {
    fn is_comment_line(line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with("//") || trimmed.starts_with("///") || trimmed.starts_with("//!")
    }

    let mut hits: Vec<String> = Vec::new();
    for path in paths {
        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            if is_comment_line(line) {
                continue;
            }
            for &literal in literals {
                let needle = format!("\"{literal}\"");
                if line.contains(&needle) {
                    hits.push(format!("{}:{}: {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }
    hits
}

#[test]
fn no_prefix_string_literals_outside_the_registry() {
    let root = repo_root();
    let mut files = collect_rs_files(&root.join("src"));
    files.extend(collect_rs_files(&root.join("crates/fauxbuild_derive/src")));

    let hits = find_string_literals(&files, &[convention::WRITER_PREFIX, convention::READER_PREFIX]);
    assert!(
        hits.is_empty(),
        "naming prefixes must come from fauxbuild_core::convention; found:\n{}",
        hits.join("\n")
    );
}
