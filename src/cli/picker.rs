//! Interactive data-directory picker.
//!
//! Kept separate from clap parsing: clap handles flags and subcommands, the
//! picker covers "run `sumo` somewhere and choose the data folder".
//!
//! A data directory is any directory under the current working directory that
//! holds `summary_stats.json`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::data::Resource;
use crate::error::AppError;

/// Default directory recursion depth for finding data directories.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a data directory from the current directory tree.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_data_dir() -> Result<PathBuf, AppError> {
    let dirs = discover_data_dirs();
    if dirs.is_empty() {
        return Err(AppError::input(
            "No data directory found. Provide one with `sumo --data <dir>` or set SUMO_DATA.",
        ));
    }
    let stdin = io::stdin();
    choose(&dirs, &mut stdin.lock(), &mut io::stdout())
}

fn choose(dirs: &[PathBuf], input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf, AppError> {
    let write_err = |e: io::Error| AppError::input(format!("Failed to write prompt: {e}"));

    writeln!(out, "Found {} data director(ies):", dirs.len()).map_err(write_err)?;
    for (idx, path) in dirs.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a directory by number (1-{}) or type a path (q to quit): ", dirs.len())
            .and_then(|()| out.flush())
            .map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::input(
                "No input received. Provide a data directory with `sumo --data <dir>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::input("Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=dirs.len()).contains(&choice) {
                return validate_data_dir(&dirs[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", dirs.len())
                .map_err(write_err)?;
            continue;
        }

        match validate_data_dir(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                writeln!(out, "{err}").map_err(write_err)?;
                continue;
            }
        }
    }
}

/// Validate the provided path is a directory holding the summary document.
pub fn validate_data_dir(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!("Data directory not found: {}", path.display())));
    }
    if !path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a directory, got a file: {}",
            path.display()
        )));
    }
    if !is_data_dir(path) {
        return Err(AppError::input(format!(
            "{} has no {}.",
            path.display(),
            Resource::SummaryStats.file_name()
        )));
    }

    Ok(path.to_path_buf())
}

/// Discover data directories under the current directory (deterministic order).
pub fn discover_data_dirs() -> Vec<PathBuf> {
    find_data_dirs(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn is_data_dir(path: &Path) -> bool {
    path.join(Resource::SummaryStats.file_name()).is_file()
}

fn find_data_dirs(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_data_dirs_inner(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_data_dirs_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    if is_data_dir(root) {
        out.push(root.to_path_buf());
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() && !should_skip_dir(&path) {
            find_data_dirs_inner(&path, depth + 1, max_depth, out);
        }
    }
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["docs/data", "b/data", "target/data", "empty"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        for sub in ["docs/data", "b/data", "target/data"] {
            fs::write(dir.path().join(sub).join("summary_stats.json"), "{}").unwrap();
        }
        dir
    }

    #[test]
    fn finds_directories_with_summary_document() {
        let dir = tree();
        let found = find_data_dirs(dir.path(), DEFAULT_SEARCH_DEPTH);
        let names: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("b/data"), PathBuf::from("docs/data")]);
    }

    #[test]
    fn validate_rejects_missing_and_incomplete() {
        let dir = tree();
        assert!(validate_data_dir(&dir.path().join("nope")).is_err());
        let err = validate_data_dir(&dir.path().join("empty")).unwrap_err();
        assert!(err.message().contains("summary_stats.json"));
        assert!(validate_data_dir(&dir.path().join("docs/data")).is_ok());
    }

    #[test]
    fn choose_by_number_after_a_bad_entry() {
        let dir = tree();
        let dirs = find_data_dirs(dir.path(), DEFAULT_SEARCH_DEPTH);
        let mut input = io::Cursor::new("9\n2\n");
        let mut out = Vec::new();
        let picked = choose(&dirs, &mut input, &mut out).unwrap();
        assert_eq!(picked, dirs[1]);
        assert!(String::from_utf8(out).unwrap().contains("Invalid choice: 9."));
    }

    #[test]
    fn choose_cancel_and_eof_are_input_errors() {
        let dirs = vec![PathBuf::from("data")];
        let err = choose(&dirs, &mut io::Cursor::new("q\n"), &mut Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(choose(&dirs, &mut io::Cursor::new(""), &mut Vec::new()).is_err());
    }
}
