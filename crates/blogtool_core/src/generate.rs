use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{BlogConfig, NavLink, NavigationSection};
use crate::filesystem::{file_name_string, post_files, write_text_file};
use crate::runtime::ResolvedPaths;
use crate::scan::{PostsStructure, scan_posts_structure};

/// One entry of the generated navigation file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NavEntry {
    Link(NavLink),
    Menu(MenuDescriptor),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MenuDescriptor {
    pub name: String,
    pub dropdown: Vec<NavLink>,
}

/// Front-matter-only landing page tying a permalink to a (category, menu) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub file_name: String,
    pub layout: String,
    pub permalink: String,
    pub title: String,
    pub category: String,
    pub menu: String,
}

impl CategoryPage {
    /// A `common` category takes its menu's identity.
    pub fn for_pair(menu: &str, category: &str, navigation: &NavigationSection) -> Self {
        let is_common = category == navigation.common_category;
        let title = if is_common {
            display_name(menu, navigation)
        } else {
            display_name(category, navigation)
        };
        let slug = link_slug(&title);
        Self {
            file_name: format!("{slug}.md"),
            layout: navigation.page_layout.clone(),
            permalink: format!("/{slug}/"),
            title,
            category: (if is_common { menu } else { category }).to_string(),
            menu: menu.to_string(),
        }
    }

    pub fn stem(&self) -> &str {
        self.file_name.strip_suffix(".md").unwrap_or(&self.file_name)
    }

    pub fn render(&self) -> String {
        format!(
            "---\nlayout: {}\npermalink: {}\ntitle: {}\ncategory: {}\nmenu: {}\n---\n",
            self.layout, self.permalink, self.title, self.category, self.menu
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub structure: PostsStructure,
    pub navigation_path: Option<PathBuf>,
    pub navigation_entries: usize,
    pub created_pages: Vec<String>,
    pub existing_pages: Vec<String>,
    pub orphan_pages: Vec<String>,
    pub warnings: Vec<String>,
}

/// Folder name to display name: override table first, else separators become
/// spaces and every word is title-cased.
pub fn display_name(name: &str, navigation: &NavigationSection) -> String {
    let lowered = name.to_lowercase();
    if let Some(display) = navigation.display_names.get(&lowered) {
        return display.clone();
    }
    title_case(&name.replace(['-', '_'], " "))
}

pub fn link_slug(display: &str) -> String {
    display.replace(' ', "-")
}

// Each run of letters gets an upper-case head and a lower-case tail.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

pub fn sort_menus<'a>(menus: &[&'a str], navigation: &NavigationSection) -> Vec<&'a str> {
    let mut sorted = menus.to_vec();
    sorted.sort_by_key(|menu| {
        match navigation
            .menu_order
            .iter()
            .position(|listed| listed == menu)
        {
            Some(index) => (0, index, String::new()),
            None => (1, 0, (*menu).to_string()),
        }
    });
    sorted
}

pub fn build_navigation(structure: &PostsStructure, navigation: &NavigationSection) -> Vec<NavEntry> {
    let mut entries: Vec<NavEntry> = navigation
        .leading
        .iter()
        .cloned()
        .map(NavEntry::Link)
        .collect();

    for menu_name in sort_menus(&structure.menu_names(), navigation) {
        let Some(menu) = structure.menu(menu_name) else {
            continue;
        };
        let dropdown = menu
            .categories
            .iter()
            .map(|category| {
                let page = CategoryPage::for_pair(&menu.name, &category.name, navigation);
                NavLink::new(page.title, page.permalink)
            })
            .collect();
        entries.push(NavEntry::Menu(MenuDescriptor {
            name: display_name(&menu.name, navigation),
            dropdown,
        }));
    }

    entries.extend(navigation.trailing.iter().cloned().map(NavEntry::Link));
    entries
}

pub fn render_navigation(entries: &[NavEntry]) -> Result<String> {
    serde_yaml::to_string(entries).context("failed to serialize navigation YAML")
}

pub fn category_pages(structure: &PostsStructure, navigation: &NavigationSection) -> Vec<CategoryPage> {
    structure
        .pairs()
        .map(|(menu, category)| CategoryPage::for_pair(menu, category, navigation))
        .collect()
}

/// Existing pages whose stem matches no current category page and no kept page.
pub fn find_orphan_pages(
    pages_dir: &Path,
    structure: &PostsStructure,
    navigation: &NavigationSection,
) -> Result<Vec<String>> {
    let mut valid: BTreeSet<String> = category_pages(structure, navigation)
        .iter()
        .map(|page| page.stem().to_lowercase())
        .collect();
    valid.extend(navigation.keep_pages.iter().map(|page| page.to_lowercase()));

    let mut orphans = Vec::new();
    for path in post_files(pages_dir)? {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !valid.contains(&stem) {
            orphans.push(file_name_string(&path));
        }
    }
    Ok(orphans)
}

/// Regenerate the navigation file and add any missing category pages.
///
/// The navigation file is always overwritten. Category pages are only ever
/// created; an existing page is left untouched even when its generated content
/// would differ. Orphan pages are reported, never deleted. When the posts tree
/// is empty nothing is written.
pub fn generate_site_navigation(paths: &ResolvedPaths, config: &BlogConfig) -> Result<GenerateReport> {
    let navigation = &config.navigation;
    let structure = scan_posts_structure(&paths.posts_dir)?;
    let mut report = GenerateReport {
        structure,
        navigation_path: None,
        navigation_entries: 0,
        created_pages: Vec::new(),
        existing_pages: Vec::new(),
        orphan_pages: Vec::new(),
        warnings: Vec::new(),
    };
    if report.structure.is_empty() {
        report.warnings.push(format!(
            "no posts structure found; make sure {} has menu/category subdirectories",
            paths.posts_dir.display()
        ));
        return Ok(report);
    }

    let entries = build_navigation(&report.structure, navigation);
    let navigation_dir = paths
        .navigation_path
        .parent()
        .unwrap_or(paths.data_dir.as_path());
    fs::create_dir_all(navigation_dir)
        .with_context(|| format!("failed to create {}", navigation_dir.display()))?;
    fs::write(&paths.navigation_path, render_navigation(&entries)?)
        .with_context(|| format!("failed to write {}", paths.navigation_path.display()))?;
    report.navigation_path = Some(paths.navigation_path.clone());
    report.navigation_entries = entries.len();

    fs::create_dir_all(&paths.pages_dir)
        .with_context(|| format!("failed to create {}", paths.pages_dir.display()))?;
    for page in category_pages(&report.structure, navigation) {
        let page_path = paths.pages_dir.join(&page.file_name);
        if write_text_file(&page_path, &page.render(), false)? {
            report.created_pages.push(page.file_name);
        } else if !report.existing_pages.contains(&page.file_name) {
            report.existing_pages.push(page.file_name);
        }
    }

    report.orphan_pages = find_orphan_pages(&paths.pages_dir, &report.structure, navigation)?;
    for orphan in &report.orphan_pages {
        report
            .warnings
            .push(format!("orphan page found: {orphan} (not removed)"));
    }

    Ok(report)
}
