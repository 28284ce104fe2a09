//! Note vault scanner.
//!
//! Walks the configured vault root and returns every readable note file
//! with its full contents. There is no index and no cache — each call
//! rescans the tree, which is acceptable for the small local collections
//! this tool targets.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::NotesConfig;

/// A single note file. `path` is the vault-relative path and serves as the
/// note's identifier everywhere else in the pipeline.
#[derive(Debug, Clone)]
pub struct Note {
    pub path: String,
    pub body: String,
}

/// Scan the vault for note files with the configured extension.
///
/// Files inside `.git`, `.obsidian`, and `node_modules` directories are
/// skipped, plus anything matching the configured extra exclude globs.
/// Files that cannot be read as UTF-8 are skipped with a warning.
/// Results are sorted by relative path for deterministic ordering.
pub fn scan_notes(config: &NotesConfig) -> Result<Vec<Note>> {
    let root = &config.root;
    if !root.exists() {
        bail!("Note vault root does not exist: {}", root.display());
    }

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/.obsidian/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut notes = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path
            .extension()
            .map(|ext| ext.to_string_lossy() != config.extension)
            .unwrap_or(true)
        {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }

        let body = match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(note = %rel_str, error = %e, "skipping unreadable note");
                continue;
            }
        };

        notes.push(Note {
            path: rel_str,
            body,
        });
    }

    notes.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(count = notes.len(), root = %root.display(), "scanned note vault");

    Ok(notes)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn vault_config(root: PathBuf) -> NotesConfig {
        NotesConfig {
            root,
            extension: "md".to_string(),
            exclude_globs: Vec::new(),
        }
    }

    #[test]
    fn test_scans_only_note_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "alpha").unwrap();
        fs::write(tmp.path().join("b.txt"), "beta").unwrap();

        let notes = scan_notes(&vault_config(tmp.path().to_path_buf())).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].path, "a.md");
        assert_eq!(notes[0].body, "alpha");
    }

    #[test]
    fn test_skips_excluded_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".obsidian")).unwrap();
        fs::write(tmp.path().join(".obsidian/workspace.md"), "internal").unwrap();
        fs::write(tmp.path().join("real.md"), "real note").unwrap();

        let notes = scan_notes(&vault_config(tmp.path().to_path_buf())).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].path, "real.md");
    }

    #[test]
    fn test_sorted_by_relative_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("topics")).unwrap();
        fs::write(tmp.path().join("zeta.md"), "z").unwrap();
        fs::write(tmp.path().join("alpha.md"), "a").unwrap();
        fs::write(tmp.path().join("topics/beta.md"), "b").unwrap();

        let notes = scan_notes(&vault_config(tmp.path().to_path_buf())).unwrap();
        let paths: Vec<&str> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["alpha.md", "topics/beta.md", "zeta.md"]);
    }

    #[test]
    fn test_missing_root_fails() {
        let config = vault_config(PathBuf::from("/nonexistent/vault/path"));
        assert!(scan_notes(&config).is_err());
    }
}
