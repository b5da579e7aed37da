//! Layering guardrails for the workspace crates.
//!
//! `t262_core` is pure vocabulary and must stay dependency-free. `t262_syntax` may depend on `t262_core` and the
//! diagnostics stack only; it must never pull in the runtime, the CLI or the reporting stack.

fn dependency_names(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }

    names
}

#[test]
fn core_has_no_dependencies() {
    let deps = dependency_names(include_str!("../crates/t262_core/Cargo.toml"));
    assert!(deps.is_empty(), "t262_core must stay dependency-free, found: {deps:?}");
}

#[test]
fn syntax_depends_only_on_core_and_diagnostics() {
    let allowed = ["t262_core", "thiserror", "miette", "tracing"];
    let deps = dependency_names(include_str!("../crates/t262_syntax/Cargo.toml"));
    for dep in &deps {
        assert!(allowed.contains(&dep.as_str()), "t262_syntax must not depend on `{dep}`");
    }
    assert!(deps.iter().any(|d| d == "t262_core"));
}

#[test]
fn root_uses_workspace_crates_by_path() {
    let deps = dependency_names(include_str!("../Cargo.toml"));
    for member in ["t262_core", "t262_syntax"] {
        assert!(deps.iter().any(|d| d == member), "root crate should depend on `{member}`");
    }
}
