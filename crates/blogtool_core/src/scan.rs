use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::filesystem::{child_dirs, file_name_string, post_files};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryFolder {
    pub name: String,
    pub post_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MenuFolder {
    pub name: String,
    pub categories: Vec<CategoryFolder>,
}

/// Menu folders in directory listing order, each with its categories sorted by name.
/// All names are lower-cased; folders differing only by case are merged.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PostsStructure {
    pub menus: Vec<MenuFolder>,
}

impl PostsStructure {
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    pub fn menu(&self, name: &str) -> Option<&MenuFolder> {
        self.menus.iter().find(|menu| menu.name == name)
    }

    pub fn menu_names(&self) -> Vec<&str> {
        self.menus.iter().map(|menu| menu.name.as_str()).collect()
    }

    pub fn category_count(&self) -> usize {
        self.menus.iter().map(|menu| menu.categories.len()).sum()
    }

    pub fn post_count(&self) -> usize {
        self.menus
            .iter()
            .flat_map(|menu| &menu.categories)
            .map(|category| category.post_count)
            .sum()
    }

    /// Every (menu, category) pair, menu by menu.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.menus.iter().flat_map(|menu| {
            menu.categories
                .iter()
                .map(move |category| (menu.name.as_str(), category.name.as_str()))
        })
    }

    fn insert(&mut self, name: String, categories: Vec<CategoryFolder>) {
        let Some(existing) = self.menus.iter_mut().find(|menu| menu.name == name) else {
            self.menus.push(MenuFolder { name, categories });
            return;
        };
        for category in categories {
            merge_category(&mut existing.categories, category);
        }
        existing
            .categories
            .sort_by(|left, right| left.name.cmp(&right.name));
    }
}

fn merge_category(categories: &mut Vec<CategoryFolder>, category: CategoryFolder) {
    match categories.iter_mut().find(|item| item.name == category.name) {
        Some(item) => item.post_count += category.post_count,
        None => categories.push(category),
    }
}

/// Classify `posts_dir/<menu>/<category>/*.md` into menus and categories.
///
/// Hidden folders and categories without posts are skipped, as are menus left
/// with no categories. A missing `posts_dir` yields an empty structure.
pub fn scan_posts_structure(posts_dir: &Path) -> Result<PostsStructure> {
    let mut structure = PostsStructure::default();
    if !posts_dir.is_dir() {
        return Ok(structure);
    }

    for menu_dir in child_dirs(posts_dir)? {
        let mut categories = Vec::new();
        for category_dir in child_dirs(&menu_dir)? {
            let post_count = post_files(&category_dir)?.len();
            if post_count == 0 {
                continue;
            }
            merge_category(
                &mut categories,
                CategoryFolder {
                    name: file_name_string(&category_dir).to_lowercase(),
                    post_count,
                },
            );
        }
        if categories.is_empty() {
            continue;
        }
        categories.sort_by(|left, right| left.name.cmp(&right.name));
        structure.insert(file_name_string(&menu_dir).to_lowercase(), categories);
    }

    Ok(structure)
}
