//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods.
//! **Exceptions**:
//! - The reveal scheduler in the core (the one place time passes)
//! - Frame rate limiting in the TUI event loop
//! - Test code

use std::path::Path;

use architectural_enforcement::{describe, production_lines, rust_files};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  {violation}");
        }

        eprintln!("\nACCEPTABLE sleep uses:");
        eprintln!("  - RevealScheduler (triage/core/src/reveal.rs)");
        eprintln!("  - Frame rate limiting in tui/src/app.rs");
        eprintln!("  - Test code");
        eprintln!("\nFORBIDDEN:");
        eprintln!("  - Sleeping to pace a draft stream outside the scheduler");
        eprintln!("  - Sleep in polling loops");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for path in rust_files("triage/core/src") {
        if path.ends_with("reveal.rs") {
            continue;
        }
        check_file(&path, &mut violations, false);
    }

    for path in rust_files("tui/src") {
        check_file(&path, &mut violations, path.ends_with("tui/src/app.rs"));
    }

    violations
}

fn check_file(path: &Path, violations: &mut Vec<String>, allow_frame_limiting: bool) {
    let lines = production_lines(path);

    for (idx, (line_number, code)) in lines.iter().enumerate() {
        if !is_sleep_call(code) {
            continue;
        }
        if allow_frame_limiting && is_frame_limiting_context(&lines, idx) {
            continue;
        }
        violations.push(describe(path, *line_number, code));
    }
}

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Check if sleep is used for frame rate limiting (acceptable in the TUI loop)
fn is_frame_limiting_context(lines: &[(usize, String)], current_idx: usize) -> bool {
    let start = current_idx.saturating_sub(6);
    let end = (current_idx + 2).min(lines.len());

    lines[start..end]
        .iter()
        .any(|(_, line)| line.to_lowercase().contains("frame"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(code: &[&str]) -> Vec<(usize, String)> {
        code.iter()
            .enumerate()
            .map(|(i, line)| (i + 1, (*line).to_string()))
            .collect()
    }

    #[test]
    fn test_sleep_detection() {
        assert!(is_sleep_call("    tokio::time::sleep(delay).await;"));
        assert!(is_sleep_call("    std::thread::sleep(delay);"));
        assert!(!is_sleep_call("    let interval = self.scheduler.interval();"));
    }

    #[test]
    fn test_frame_limiting_detection() {
        let lines = numbered(&[
            "    // Frame rate limiting",
            "    let elapsed = frame_start.elapsed();",
            "    if elapsed < self.frame_interval {",
            "        tokio::time::sleep(self.frame_interval - elapsed).await;",
            "    }",
        ]);
        assert!(is_frame_limiting_context(&lines, 3));

        let lines = numbered(&[
            "    for _ in 0..len {",
            "        tokio::time::sleep(delay).await;",
            "    }",
        ]);
        assert!(!is_frame_limiting_context(&lines, 1));
    }
}
