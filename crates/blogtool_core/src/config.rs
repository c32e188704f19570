use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POSTS_DIR: &str = "_posts";
pub const DEFAULT_DATA_DIR: &str = "_data";
pub const DEFAULT_PAGES_DIR: &str = "_pages";
pub const DEFAULT_NAVIGATION_FILE: &str = "navigation.yml";
pub const DEFAULT_PAGE_LAYOUT: &str = "category";
pub const DEFAULT_COMMON_CATEGORY: &str = "common";

const MENU_ORDER: [&str; 8] = [
    "programming",
    "frontend",
    "mobile",
    "backend",
    "infra",
    "tools",
    "language",
    "knowledge",
];

const DISPLAY_NAMES: [(&str, &str); 5] = [
    ("ai", "AI"),
    ("devops", "DevOps"),
    ("nodejs", "NodeJS"),
    ("javascript", "JavaScript"),
    ("ios", "iOS"),
];

// (legacy folder, menu, category); `None` keeps the legacy name as the category.
const FOLDER_MAPPINGS: [(&str, &str, Option<&str>); 29] = [
    ("kotlin", "programming", None),
    ("java", "programming", None),
    ("scala", "programming", None),
    ("python", "programming", None),
    ("golang", "programming", None),
    ("c", "programming", None),
    ("ruby", "programming", None),
    ("programming", "programming", Some("common")),
    ("javascript", "frontend", None),
    ("nodejs", "frontend", None),
    ("frontend", "frontend", Some("common")),
    ("android", "mobile", None),
    ("mobile", "mobile", Some("common")),
    ("spring", "backend", None),
    ("database", "backend", None),
    ("devops", "infra", None),
    ("security", "infra", None),
    ("automation", "infra", None),
    ("spark", "infra", None),
    ("mac", "tools", None),
    ("jekyll", "tools", None),
    ("obsidian", "tools", None),
    ("tools", "tools", Some("common")),
    ("ai", "knowledge", None),
    ("history", "knowledge", None),
    ("science", "knowledge", None),
    ("law", "knowledge", None),
    ("knowledge", "knowledge", Some("common")),
    ("miscellanea", "knowledge", None),
];

const LANGUAGE_TAGS: [&str; 6] = ["korean", "english", "chinese", "hindi", "arabic", "indonesian"];
const LANGUAGE_PRIORITY: [&str; 6] = ["chinese", "arabic", "hindi", "indonesian", "english", "korean"];
const DATED_PREFIX: &str = "2025-12-28-";
const MISPLACED_MARKERS: [&str; 2] = ["golang", "ruby"];

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct BlogConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub navigation: NavigationSection,
    #[serde(default)]
    pub migration: MigrationSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsSection {
    pub posts_dir: String,
    pub data_dir: String,
    pub pages_dir: String,
    /// Relative to `data_dir`.
    pub navigation_file: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            posts_dir: DEFAULT_POSTS_DIR.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            pages_dir: DEFAULT_PAGES_DIR.to_string(),
            navigation_file: DEFAULT_NAVIGATION_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NavLink {
    pub name: String,
    pub link: String,
}

impl NavLink {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationSection {
    /// Menus listed here come first, in this order; the rest follow alphabetically.
    pub menu_order: Vec<String>,
    pub leading: Vec<NavLink>,
    pub trailing: Vec<NavLink>,
    /// Page stems never reported as orphans.
    pub keep_pages: Vec<String>,
    pub page_layout: String,
    pub common_category: String,
    /// Lower-cased folder name to display name.
    pub display_names: BTreeMap<String, String>,
}

impl Default for NavigationSection {
    fn default() -> Self {
        Self {
            menu_order: MENU_ORDER.iter().map(|name| (*name).to_string()).collect(),
            leading: vec![NavLink::new("Home", "/")],
            trailing: vec![NavLink::new("About", "/about")],
            keep_pages: vec!["about".to_string()],
            page_layout: DEFAULT_PAGE_LAYOUT.to_string(),
            common_category: DEFAULT_COMMON_CATEGORY.to_string(),
            display_names: DISPLAY_NAMES
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FolderMapping {
    pub legacy: String,
    pub menu: String,
    pub category: Option<String>,
}

impl FolderMapping {
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.legacy)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MigrationSection {
    /// Flat legacy folder of multi-language posts, split by file name.
    pub language_folder: String,
    /// Menu the language split lands under.
    pub language_menu: String,
    /// Fallback substring order.
    pub language_tags: Vec<String>,
    /// Strong-match order for `<dated_prefix><tag>` and `-<tag>-`.
    pub language_priority: Vec<String>,
    pub dated_prefix: String,
    /// Name fragments of non-language posts that ended up in the language folder.
    pub misplaced_markers: Vec<String>,
    /// Tag for language-folder posts that match no language.
    pub fallback_language_tag: String,
    pub folders: Vec<FolderMapping>,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            language_folder: "language".to_string(),
            language_menu: "language".to_string(),
            language_tags: LANGUAGE_TAGS.iter().map(|tag| (*tag).to_string()).collect(),
            language_priority: LANGUAGE_PRIORITY
                .iter()
                .map(|tag| (*tag).to_string())
                .collect(),
            dated_prefix: DATED_PREFIX.to_string(),
            misplaced_markers: MISPLACED_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
            fallback_language_tag: DEFAULT_COMMON_CATEGORY.to_string(),
            folders: FOLDER_MAPPINGS
                .iter()
                .map(|(legacy, menu, category)| FolderMapping {
                    legacy: (*legacy).to_string(),
                    menu: (*menu).to_string(),
                    category: category.map(str::to_string),
                })
                .collect(),
        }
    }
}

impl BlogConfig {
    pub fn validate(&self) -> Result<()> {
        for mapping in &self.migration.folders {
            if mapping.legacy.trim().is_empty() || mapping.menu.trim().is_empty() {
                bail!("folder mapping entries need a non-empty legacy folder and menu");
            }
            if mapping.legacy.contains(['/', '\\']) || mapping.menu.contains(['/', '\\']) {
                bail!(
                    "folder mapping `{}` -> `{}` must name single folders",
                    mapping.legacy,
                    mapping.menu
                );
            }
        }
        if self.migration.language_menu.trim().is_empty() {
            bail!("migration.language_menu cannot be empty");
        }
        Ok(())
    }
}

/// Load and parse a BlogConfig from a TOML file. Returns default if file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<BlogConfig> {
    if !config_path.exists() {
        return Ok(BlogConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: BlogConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    parsed
        .validate()
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
    Ok(parsed)
}

pub fn render_default_config() -> Result<String> {
    let body = toml::to_string_pretty(&BlogConfig::default())
        .context("failed to serialize default config TOML")?;
    Ok(format!(
        "# blogtool configuration (materialized by `blogtool init`)\n# Every key is optional; removed keys fall back to these defaults.\n\n{body}"
    ))
}
