use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use similar::TextDiff;
use walkdir::WalkDir;

use crate::filesystem::{display_relative, file_name_string, is_hidden_name, is_post_path};
use crate::front_matter::{CategoryUpdate, plan_category_rewrite};
use crate::runtime::ResolvedPaths;

#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    pub dry_run: bool,
    pub include_diff: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshedPost {
    pub path: PathBuf,
    pub menu: String,
    pub category: String,
    pub diff: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub dry_run: bool,
    pub scanned: usize,
    pub updated: Vec<RefreshedPost>,
    pub unchanged: usize,
    pub without_front_matter: Vec<PathBuf>,
}

/// Post files exactly two folders below `posts_dir`, paired with their menu and category.
pub fn categorized_posts(posts_dir: &Path) -> Result<Vec<(PathBuf, String, String)>> {
    if !posts_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(posts_dir)
        .min_depth(3)
        .max_depth(3)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to walk {}", posts_dir.display()))?;
        if !entry.file_type().is_file() || !is_post_path(entry.path()) {
            continue;
        }
        let Some(category_dir) = entry.path().parent() else {
            continue;
        };
        let Some(menu_dir) = category_dir.parent() else {
            continue;
        };
        let menu = file_name_string(menu_dir);
        let category = file_name_string(category_dir);
        if is_hidden_name(&menu) || is_hidden_name(&category) {
            continue;
        }
        out.push((entry.path().to_path_buf(), menu, category));
    }
    Ok(out)
}

/// Rewrite each post's categories to `[menu, category]` from its folder location.
///
/// Only posts whose content actually changes are written, so an immediate
/// second run performs no writes.
pub fn refresh_categories(paths: &ResolvedPaths, options: &RefreshOptions) -> Result<RefreshReport> {
    let mut report = RefreshReport {
        dry_run: options.dry_run,
        scanned: 0,
        updated: Vec::new(),
        unchanged: 0,
        without_front_matter: Vec::new(),
    };

    for (path, menu, category) in categorized_posts(&paths.posts_dir)? {
        report.scanned += 1;
        let rewrite = plan_category_rewrite(&path, &menu, &category)?;
        match rewrite.outcome() {
            CategoryUpdate::NoFrontMatter => report.without_front_matter.push(path),
            CategoryUpdate::Unchanged => report.unchanged += 1,
            CategoryUpdate::Updated => {
                let Some(rewritten) = rewrite.rewritten.as_deref() else {
                    continue;
                };
                if !options.dry_run {
                    fs::write(&path, rewritten)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
                let diff = options.include_diff.then(|| {
                    let label = display_relative(&paths.project_root, &path);
                    render_diff(&rewrite.original, rewritten, &label)
                });
                report.updated.push(RefreshedPost {
                    path,
                    menu,
                    category,
                    diff,
                });
            }
        }
    }

    Ok(report)
}

fn render_diff(before: &str, after: &str, label: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(1)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}
