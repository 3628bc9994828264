use std::path::{Path, PathBuf};
use std::process::Command;

const MAX_LINES: usize = 750;

const CHECKED_EXTENSIONS: &[&str] = &["rs", "md", "toml"];

const EXCLUDED_DIRS: &[&str] = &["target", ".git", "examples"];

const EXCLUDED_FILES: &[&str] = &["Cargo.lock"];

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/main");

    let sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=OPENCODE_USAGE_GIT_SHA={}", sha);

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set");
    let root = PathBuf::from(&manifest_dir);
    let files = collect_files_to_check(&root);

    enforce_line_limits(&root, &files);
    enforce_no_dead_code_allows(&root, &files);
    enforce_serial_for_env_mutations(&root, &files);
}

fn enforce_line_limits(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();
    for file in files {
        println!("cargo:rerun-if-changed={}", file.display());
        match std::fs::read_to_string(file) {
            Ok(content) => {
                let line_count = content.lines().filter(|l| !l.trim().is_empty()).count();
                if line_count > MAX_LINES {
                    violations.push((relative(root, file), line_count));
                }
            }
            Err(e) => println!(
                "cargo:warning=Could not read file {}: {}",
                relative(root, file).display(),
                e
            ),
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("FILE LINE LIMIT EXCEEDED (max {} lines)", MAX_LINES);
        eprintln!("========================================");
        for (path, lines) in &violations {
            eprintln!("  {} - {} lines", path.display(), lines);
        }
        eprintln!("========================================\n");
        panic!(
            "Build failed: {} file(s) exceed the {} line limit",
            violations.len(),
            MAX_LINES
        );
    }
}

fn collect_files_to_check(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_directory(root, root, &mut files);
    files
}

fn walk_directory(dir: &Path, root: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if path.is_dir() {
            if !EXCLUDED_DIRS.contains(&name) {
                walk_directory(&path, root, files);
            }
        } else if should_check_file(&path, name) {
            files.push(path);
        }
    }
}

fn should_check_file(path: &Path, name: &str) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    CHECKED_EXTENSIONS.contains(&ext) && !EXCLUDED_FILES.contains(&name)
}

fn relative(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root).unwrap_or(file).to_path_buf()
}

fn rust_sources(files: &[PathBuf]) -> impl Iterator<Item = &PathBuf> {
    files.iter().filter(|p| {
        p.extension().and_then(|e| e.to_str()) == Some("rs")
            && p.file_name().and_then(|n| n.to_str()) != Some("build.rs")
    })
}

fn enforce_no_dead_code_allows(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();

    for file in rust_sources(files) {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
                && trimmed.contains("dead_code")
            {
                violations.push(format!(
                    "{}:{}",
                    relative(root, file).display(),
                    line_num + 1
                ));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("#[allow(dead_code)] IS NOT ALLOWED");
        eprintln!("========================================");
        for location in &violations {
            eprintln!("  {}", location);
        }
        eprintln!("\nDelete unused code, or gate test-only code with #[cfg(test)].\n");
        panic!(
            "Build failed: {} #[allow(dead_code)] occurrence(s) found.",
            violations.len()
        );
    }
}

/// Requires #[serial] for tests that mutate environment variables.
///
/// Environment variables are global state. Tests that modify them without
/// #[serial] race with every other test reading the same variable.
fn enforce_serial_for_env_mutations(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();

    for file in rust_sources(files) {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };

        let mut in_test_fn = false;
        let mut has_serial = false;
        let mut brace_depth = 0i32;
        let mut test_fn_start = 0;

        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
                has_serial = true;
            }
            if trimmed == "#[test]" || trimmed.starts_with("#[tokio::test") {
                in_test_fn = true;
                brace_depth = 0;
                test_fn_start = i + 1;
            }
            if !in_test_fn {
                continue;
            }

            for c in line.chars() {
                match c {
                    '{' => brace_depth += 1,
                    '}' => {
                        brace_depth -= 1;
                        if brace_depth == 0 {
                            in_test_fn = false;
                            has_serial = false;
                        }
                    }
                    _ => {}
                }
            }

            let mutates_env = !trimmed.starts_with("//")
                && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"));
            if mutates_env && !has_serial {
                violations.push(format!(
                    "{}:{}",
                    relative(root, file).display(),
                    test_fn_start
                ));
                in_test_fn = false;
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("ENV MUTATIONS REQUIRE #[serial]");
        eprintln!("========================================");
        for location in &violations {
            eprintln!("  {}", location);
        }
        eprintln!("\nAdd #[serial] from the serial_test crate to these tests.\n");
        panic!(
            "Build failed: {} test(s) mutate env vars without #[serial].",
            violations.len()
        );
    }
}
