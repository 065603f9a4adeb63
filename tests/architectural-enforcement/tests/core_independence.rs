//! Integration Test: Core Independence
//!
//! The core crate must run headless: no terminal UI crates in its manifest
//! or its sources. Surfaces may only feed reveal ticks back to the core,
//! never mint their own, so the generation guard stays in one place.

use std::fs;

use architectural_enforcement::{describe, production_lines, rust_files, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_crates() {
    let manifest = fs::read_to_string(workspace_root().join("triage/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for line in manifest.lines() {
        let name = line.split('=').next().unwrap_or("").trim();
        assert!(
            !UI_CRATES.contains(&name),
            "triage-core must not depend on {name}"
        );
    }
}

#[test]
fn test_core_sources_have_no_ui_imports() {
    let mut violations = Vec::new();

    for path in rust_files("triage/core/src") {
        for (line_number, code) in production_lines(&path) {
            if UI_CRATES
                .iter()
                .any(|krate| code.contains(&format!("{krate}::")))
            {
                violations.push(describe(&path, line_number, &code));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI imports in triage-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_tui_never_mints_reveal_ticks() {
    let mut violations = Vec::new();

    for path in rust_files("tui/src") {
        for (line_number, code) in production_lines(&path) {
            if code.contains("RevealTick {") || code.contains("generation:") {
                violations.push(describe(&path, line_number, &code));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "The TUI builds its own reveal ticks:\n{}",
        violations.join("\n")
    );
}
