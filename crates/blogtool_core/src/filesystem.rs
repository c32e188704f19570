use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

/// Extension that marks a file as a post.
pub const POST_EXTENSION: &str = "md";

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

pub fn is_post_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(POST_EXTENSION)
}

/// Immediate entries of `dir`, sorted by file name. A missing `dir` yields nothing.
pub fn list_children(dir: &Path) -> Result<Vec<DirEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        out.push(entry);
    }
    Ok(out)
}

/// Non-hidden subdirectories of `dir`, sorted by name.
pub fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_children(dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir() && !is_hidden_entry(entry))
        .map(DirEntry::into_path)
        .collect())
}

/// Post files sitting directly in `dir`, sorted by name.
pub fn post_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_children(dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file() && is_post_path(entry.path()))
        .map(DirEntry::into_path)
        .collect())
}

pub fn has_subdirectories(dir: &Path) -> Result<bool> {
    Ok(list_children(dir)?
        .iter()
        .any(|entry| entry.file_type().is_dir()))
}

pub fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(is_hidden_name)
}

/// Write `content` to `path` unless it already exists. Returns `true` when a write occurred.
pub fn write_text_file(path: &Path, content: &str, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create parent directory {}", parent.display()))?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `path` relative to `root` for display, falling back to the full path.
pub fn display_relative(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => normalize_path(relative),
        _ => normalize_path(path),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn child_dirs_are_sorted_and_skip_hidden() {
        let temp = tempdir().expect("tempdir");
        for name in ["zeta", "alpha", ".git", "Mid"] {
            fs::create_dir_all(temp.path().join(name)).expect("create dir");
        }
        fs::write(temp.path().join("file.md"), "x").expect("write file");

        let names: Vec<String> = child_dirs(temp.path())
            .expect("child dirs")
            .iter()
            .map(|path| file_name_string(path))
            .collect();
        assert_eq!(names, vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn post_files_only_returns_markdown_files() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("b.md"), "x").expect("write");
        fs::write(temp.path().join("a.md"), "x").expect("write");
        fs::write(temp.path().join("notes.txt"), "x").expect("write");
        fs::create_dir_all(temp.path().join("dir.md")).expect("create dir");

        let names: Vec<String> = post_files(temp.path())
            .expect("post files")
            .iter()
            .map(|path| file_name_string(path))
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing");
        assert!(list_children(&missing).expect("list").is_empty());
        assert!(child_dirs(&missing).expect("dirs").is_empty());
    }

    #[test]
    fn write_text_file_respects_existing_files() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("page.md");
        assert!(write_text_file(&path, "first", false).expect("first write"));
        assert!(!write_text_file(&path, "second", false).expect("second write"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "first");
        assert!(write_text_file(&path, "third", true).expect("forced write"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "third");
    }
}
