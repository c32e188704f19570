use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Marker line that opens and closes the metadata block of a post.
pub const DELIMITER: &str = "---";
pub const CATEGORIES_FIELD: &str = "categories";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryUpdate {
    Updated,
    Unchanged,
    NoFrontMatter,
}

/// A post's content before and after a categories rewrite.
#[derive(Debug, Clone)]
pub struct CategoryRewrite {
    pub original: String,
    pub rewritten: Option<String>,
}

impl CategoryRewrite {
    pub fn outcome(&self) -> CategoryUpdate {
        match &self.rewritten {
            None => CategoryUpdate::NoFrontMatter,
            Some(rewritten) if rewritten == &self.original => CategoryUpdate::Unchanged,
            Some(_) => CategoryUpdate::Updated,
        }
    }
}

pub fn categories_line(menu: &str, category: &str) -> String {
    format!("{CATEGORIES_FIELD}: [{menu}, {category}]")
}

/// Replace every `categories:` line of the front matter with `[menu, category]`,
/// appending the field when the block has none. Returns `None` when `content`
/// has no complete front matter block.
pub fn rewrite_categories(content: &str, menu: &str, category: &str) -> Option<String> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let opening = lines.first()?;
    if opening.trim_end() != DELIMITER {
        return None;
    }
    let closing = lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end() == DELIMITER)?
        + 1;

    let newline = if opening.ends_with("\r\n") { "\r\n" } else { "\n" };
    let replacement = categories_line(menu, category);
    let field_prefix = format!("{CATEGORIES_FIELD}:");

    let mut block: Vec<String> = Vec::with_capacity(closing);
    let mut replaced = false;
    for line in &lines[1..closing] {
        if line.starts_with(&field_prefix) {
            let ending = &line[line.trim_end_matches(['\r', '\n']).len()..];
            block.push(format!("{replacement}{ending}"));
            replaced = true;
        } else {
            block.push((*line).to_string());
        }
    }
    if !replaced {
        while block.last().is_some_and(|line| line.trim().is_empty()) {
            block.pop();
        }
        block.push(format!("{replacement}{newline}"));
    }

    let mut out = String::with_capacity(content.len() + replacement.len() + 2);
    out.push_str(opening);
    for line in &block {
        out.push_str(line);
    }
    for line in &lines[closing..] {
        out.push_str(line);
    }
    Some(out)
}

pub fn plan_category_rewrite(path: &Path, menu: &str, category: &str) -> Result<CategoryRewrite> {
    let original =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rewritten = rewrite_categories(&original, menu, category);
    Ok(CategoryRewrite {
        original,
        rewritten,
    })
}

/// Rewrite the categories of the post at `path`, writing only when the content changes.
pub fn update_post_categories(path: &Path, menu: &str, category: &str) -> Result<CategoryUpdate> {
    let rewrite = plan_category_rewrite(path, menu, category)?;
    let outcome = rewrite.outcome();
    if outcome == CategoryUpdate::Updated
        && let Some(content) = &rewrite.rewritten
    {
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(outcome)
}
