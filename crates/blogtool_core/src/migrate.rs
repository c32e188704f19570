use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use walkdir::DirEntry;

use crate::config::{BlogConfig, FolderMapping, MigrationSection};
use crate::filesystem::{
    display_relative, file_name_string, has_subdirectories, is_hidden_entry, is_post_path,
    list_children, post_files,
};
use crate::front_matter::{CategoryUpdate, plan_category_rewrite, update_post_categories};
use crate::runtime::ResolvedPaths;

/// One filesystem mutation of a migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MoveAction {
    CreateDir { path: PathBuf },
    Rename { from: PathBuf, to: PathBuf },
    RemoveDir { path: PathBuf },
    RemoveFile { path: PathBuf },
}

impl MoveAction {
    pub fn apply(&self) -> Result<()> {
        match self {
            Self::CreateDir { path } => fs::create_dir_all(path)
                .with_context(|| format!("failed to create {}", path.display())),
            Self::Rename { from, to } => fs::rename(from, to).with_context(|| {
                format!("failed to move {} to {}", from.display(), to.display())
            }),
            Self::RemoveDir { path } => fs::remove_dir(path)
                .with_context(|| format!("failed to remove directory {}", path.display())),
            Self::RemoveFile { path } => fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display())),
        }
    }

    pub fn describe(&self, root: &Path) -> String {
        match self {
            Self::CreateDir { path } => format!("create {}", display_relative(root, path)),
            Self::Rename { from, to } => format!(
                "move {} -> {}",
                display_relative(root, from),
                display_relative(root, to)
            ),
            Self::RemoveDir { path } => format!("remove dir {}", display_relative(root, path)),
            Self::RemoveFile { path } => format!("remove file {}", display_relative(root, path)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostUpdate {
    pub path: PathBuf,
    pub outcome: CategoryUpdate,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderMigration {
    pub legacy: String,
    pub menu: String,
    pub category: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub actions: Vec<MoveAction>,
    pub posts: Vec<PostUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageMove {
    pub file_name: String,
    pub tag: String,
    pub destination: PathBuf,
    pub outcome: CategoryUpdate,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageSplit {
    pub source: PathBuf,
    pub actions: Vec<MoveAction>,
    pub moves: Vec<LanguageMove>,
    pub skipped: Vec<String>,
    pub cleanup: Vec<MoveAction>,
}

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub dry_run: bool,
    pub posts_dir: PathBuf,
    pub language: Option<LanguageSplit>,
    pub language_already_split: bool,
    pub folders: Vec<FolderMigration>,
    pub already_migrated: Vec<String>,
    pub warnings: Vec<String>,
}

/// A post that ends up directly inside a migrated category folder.
#[derive(Debug, Clone)]
struct PlannedPost {
    current: PathBuf,
    target: PathBuf,
}

/// Move actions that bring `source` to `destination`.
///
/// A missing destination is a plain rename. An existing destination receives
/// the children of `source` one by one; a child directory that already exists
/// there receives the grandchildren instead. When `destination` lies inside
/// `source`, only the posts loose in `source` move. A colliding hidden file is
/// dropped from `source`; any other move onto an existing file is refused.
pub fn plan_folder_move(source: &Path, destination: &Path) -> Result<Vec<MoveAction>> {
    let mut actions = Vec::new();

    if destination.starts_with(source) {
        if !destination.exists() {
            actions.push(MoveAction::CreateDir {
                path: destination.to_path_buf(),
            });
        }
        for post in post_files(source)? {
            actions.push(rename_into(&post, destination)?);
        }
        return Ok(actions);
    }

    if !destination.exists() {
        if let Some(parent) = destination.parent()
            && !parent.exists()
        {
            actions.push(MoveAction::CreateDir {
                path: parent.to_path_buf(),
            });
        }
        actions.push(MoveAction::Rename {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
        });
        return Ok(actions);
    }

    if !destination.is_dir() {
        bail!(
            "cannot merge {} into {}: destination is not a directory",
            source.display(),
            destination.display()
        );
    }

    for child in list_children(source)? {
        let target = destination.join(child.file_name());
        if child.file_type().is_dir() && target.is_dir() {
            for grandchild in list_children(child.path())? {
                actions.push(merge_into(&grandchild, &target)?);
            }
            actions.push(MoveAction::RemoveDir {
                path: child.path().to_path_buf(),
            });
        } else {
            actions.push(merge_into(&child, destination)?);
        }
    }
    actions.push(MoveAction::RemoveDir {
        path: source.to_path_buf(),
    });
    Ok(actions)
}

// A hidden file already present in `directory` wins over the incoming copy.
fn merge_into(entry: &DirEntry, directory: &Path) -> Result<MoveAction> {
    if !entry.file_type().is_dir()
        && is_hidden_entry(entry)
        && directory.join(entry.file_name()).exists()
    {
        return Ok(MoveAction::RemoveFile {
            path: entry.path().to_path_buf(),
        });
    }
    rename_into(entry.path(), directory)
}

fn rename_into(path: &Path, directory: &Path) -> Result<MoveAction> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("path has no file name: {}", path.display()))?;
    let target = directory.join(name);
    if target.exists() {
        bail!(
            "refusing to move {} onto existing {}",
            path.display(),
            target.display()
        );
    }
    Ok(MoveAction::Rename {
        from: path.to_path_buf(),
        to: target,
    })
}

fn planned_posts(
    source: &Path,
    destination: &Path,
    actions: &[MoveAction],
) -> Result<Vec<PlannedPost>> {
    let mut posts: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    if destination.is_dir() {
        for post in post_files(destination)? {
            posts.insert(post.clone(), post);
        }
    }
    for action in actions {
        let MoveAction::Rename { from, to } = action else {
            continue;
        };
        if from == source {
            for post in post_files(source)? {
                posts.insert(destination.join(file_name_string(&post)), post);
            }
        } else if to.parent() == Some(destination) && from.is_file() && is_post_path(to) {
            posts.insert(to.clone(), from.clone());
        }
    }
    Ok(posts
        .into_iter()
        .map(|(target, current)| PlannedPost { current, target })
        .collect())
}

fn rewrite_posts(
    posts: &[PlannedPost],
    menu: &str,
    category: &str,
    dry_run: bool,
) -> Result<Vec<PostUpdate>> {
    let mut updates = Vec::with_capacity(posts.len());
    for post in posts {
        let outcome = if dry_run {
            plan_category_rewrite(&post.current, menu, category)?.outcome()
        } else {
            update_post_categories(&post.target, menu, category)?
        };
        updates.push(PostUpdate {
            path: post.target.clone(),
            outcome,
        });
    }
    Ok(updates)
}

fn apply_actions(actions: &[MoveAction]) -> Result<()> {
    for action in actions {
        action.apply()?;
    }
    Ok(())
}

/// Plan, and unless `dry_run` apply, one entry of the folder mapping table.
/// Returns `None` when the legacy folder does not exist or has nothing left to move.
pub fn migrate_folder(
    posts_dir: &Path,
    mapping: &FolderMapping,
    dry_run: bool,
) -> Result<Option<FolderMigration>> {
    let source = posts_dir.join(&mapping.legacy);
    if !source.is_dir() {
        return Ok(None);
    }
    let category = mapping.category();
    let destination = posts_dir.join(&mapping.menu).join(category);

    let actions = plan_folder_move(&source, &destination)?;
    let moves_posts = actions
        .iter()
        .any(|action| matches!(action, MoveAction::Rename { .. }));
    if !moves_posts {
        return Ok(None);
    }

    let posts = planned_posts(&source, &destination, &actions)?;
    if !dry_run {
        apply_actions(&actions)?;
    }
    let posts = rewrite_posts(&posts, &mapping.menu, category, dry_run)?;

    Ok(Some(FolderMigration {
        legacy: mapping.legacy.clone(),
        menu: mapping.menu.clone(),
        category: category.to_string(),
        source,
        destination,
        actions,
        posts,
    }))
}

/// Language tag for a post in the flat language folder.
///
/// A `<dated_prefix><tag>` prefix or a `-<tag>-` fragment wins, checked in
/// priority order; then any tag appearing anywhere in the name; else the
/// fallback tag.
pub fn detect_language(file_name: &str, migration: &MigrationSection) -> String {
    let lowered = file_name.to_lowercase();
    for tag in &migration.language_priority {
        let dated = format!("{}{tag}", migration.dated_prefix);
        if lowered.starts_with(&dated) || lowered.contains(&format!("-{tag}-")) {
            return tag.clone();
        }
    }
    migration
        .language_tags
        .iter()
        .find(|tag| lowered.contains(tag.as_str()))
        .cloned()
        .unwrap_or_else(|| migration.fallback_language_tag.clone())
}

fn is_misplaced(file_name: &str, migration: &MigrationSection) -> bool {
    let lowered = file_name.to_lowercase();
    migration
        .misplaced_markers
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Split the flat language folder into `<language_menu>/<tag>/` folders.
pub fn split_language_folder(
    posts_dir: &Path,
    migration: &MigrationSection,
    dry_run: bool,
) -> Result<LanguageSplit> {
    let source = posts_dir.join(&migration.language_folder);
    let menu_dir = posts_dir.join(&migration.language_menu);

    let mut split = LanguageSplit {
        source: source.clone(),
        actions: Vec::new(),
        moves: Vec::new(),
        skipped: Vec::new(),
        cleanup: Vec::new(),
    };
    let mut planned: Vec<(PathBuf, PathBuf, String)> = Vec::new();

    for post in post_files(&source)? {
        let file_name = file_name_string(&post);
        let tag = detect_language(&file_name, migration);
        if tag == migration.fallback_language_tag && is_misplaced(&file_name, migration) {
            split.skipped.push(file_name);
            continue;
        }

        let tag_dir = menu_dir.join(&tag);
        let create = MoveAction::CreateDir {
            path: tag_dir.clone(),
        };
        if !tag_dir.exists() && !split.actions.contains(&create) {
            split.actions.push(create);
        }
        let action = rename_into(&post, &tag_dir)?;
        if let MoveAction::Rename { to, .. } = &action {
            planned.push((post.clone(), to.clone(), tag.clone()));
        }
        split.actions.push(action);
    }

    if !dry_run {
        apply_actions(&split.actions)?;
    }

    for (current, target, tag) in planned {
        let outcome = if dry_run {
            plan_category_rewrite(&current, &migration.language_menu, &tag)?.outcome()
        } else {
            update_post_categories(&target, &migration.language_menu, &tag)?
        };
        split.moves.push(LanguageMove {
            file_name: file_name_string(&target),
            tag,
            destination: target,
            outcome,
        });
    }

    if !dry_run && source.is_dir() {
        split.cleanup = plan_language_cleanup(&source)?;
        apply_actions(&split.cleanup)?;
    }

    Ok(split)
}

// An emptied source folder is removed, along with stray hidden files if those are all that remain.
fn plan_language_cleanup(source: &Path) -> Result<Vec<MoveAction>> {
    let remaining = list_children(source)?;
    let only_hidden_files = remaining
        .iter()
        .all(|entry| !entry.file_type().is_dir() && is_hidden_entry(entry));
    if !only_hidden_files {
        return Ok(Vec::new());
    }
    let mut actions: Vec<MoveAction> = remaining
        .into_iter()
        .map(|entry| MoveAction::RemoveFile {
            path: entry.into_path(),
        })
        .collect();
    actions.push(MoveAction::RemoveDir {
        path: source.to_path_buf(),
    });
    Ok(actions)
}

/// Migrate a one-level posts tree to the two-level menu/category layout.
///
/// The flat language folder is split first (skipped when it already has
/// subdirectories), then every folder mapping is applied in table order. With
/// `dry_run` the plan is computed and reported but nothing on disk changes.
pub fn migrate_layout(
    paths: &ResolvedPaths,
    config: &BlogConfig,
    options: &MigrateOptions,
) -> Result<MigrationReport> {
    let posts_dir = &paths.posts_dir;
    let migration = &config.migration;
    let mut report = MigrationReport {
        dry_run: options.dry_run,
        posts_dir: posts_dir.clone(),
        language: None,
        language_already_split: false,
        folders: Vec::new(),
        already_migrated: Vec::new(),
        warnings: Vec::new(),
    };
    if !posts_dir.is_dir() {
        report.warnings.push(format!(
            "{} does not exist; nothing to migrate",
            posts_dir.display()
        ));
        return Ok(report);
    }

    let language_source = posts_dir.join(&migration.language_folder);
    if language_source.is_dir() {
        if has_subdirectories(&language_source)? {
            report.language_already_split = true;
        } else {
            let split = split_language_folder(posts_dir, migration, options.dry_run)?;
            for skipped in &split.skipped {
                report
                    .warnings
                    .push(format!("skipping misplaced file: {skipped}"));
            }
            report.language = Some(split);
        }
    }

    for mapping in &migration.folders {
        let source = posts_dir.join(&mapping.legacy);
        if !source.is_dir() {
            continue;
        }
        match migrate_folder(posts_dir, mapping, options.dry_run)? {
            Some(folder) => report.folders.push(folder),
            None => report.already_migrated.push(mapping.legacy.clone()),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::runtime::ValueSource;

    fn paths(project_root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            project_root: project_root.to_path_buf(),
            state_dir: project_root.join(".blogtool"),
            config_path: project_root.join(".blogtool").join("config.toml"),
            posts_dir: project_root.join("_posts"),
            data_dir: project_root.join("_data"),
            pages_dir: project_root.join("_pages"),
            navigation_path: project_root.join("_data").join("navigation.yml"),
            root_source: ValueSource::Flag,
            config_source: ValueSource::Default,
            posts_source: ValueSource::Default,
        }
    }

    fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(path, content).expect("write file");
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).expect("read file")
    }

    fn mapping(legacy: &str, menu: &str, category: Option<&str>) -> FolderMapping {
        FolderMapping {
            legacy: legacy.to_string(),
            menu: menu.to_string(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn legacy_folder_is_renamed_and_posts_rewritten() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(
            &posts.join("devops").join("2024-01-01-k8s.md"),
            "---\ntitle: K8s\ncategories: [devops]\n---\nbody\n",
        );

        let folder = migrate_folder(&posts, &mapping("devops", "infra", None), false)
            .expect("migrate")
            .expect("folder migrated");

        assert!(!posts.join("devops").exists());
        let moved = posts.join("infra").join("devops").join("2024-01-01-k8s.md");
        assert_eq!(
            read(&moved),
            "---\ntitle: K8s\ncategories: [infra, devops]\n---\nbody\n"
        );
        assert_eq!(folder.posts.len(), 1);
        assert_eq!(folder.posts[0].outcome, CategoryUpdate::Updated);
        assert_eq!(
            folder.actions[0],
            MoveAction::CreateDir {
                path: posts.join("infra")
            }
        );
    }

    #[test]
    fn existing_destination_receives_children() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(
            &posts.join("tools").join("mac").join("old.md"),
            "---\ntitle: old\ncategories: [mac]\n---\n",
        );
        write_file(&posts.join("mac").join("a.md"), "---\ntitle: a\n---\n");
        write_file(&posts.join("mac").join("img").join("shot.png"), "png");

        let folder = migrate_folder(&posts, &mapping("mac", "tools", None), false)
            .expect("migrate")
            .expect("folder migrated");

        assert!(!posts.join("mac").exists());
        let destination = posts.join("tools").join("mac");
        assert_eq!(
            read(&destination.join("a.md")),
            "---\ntitle: a\ncategories: [tools, mac]\n---\n"
        );
        assert_eq!(
            read(&destination.join("old.md")),
            "---\ntitle: old\ncategories: [tools, mac]\n---\n"
        );
        assert_eq!(folder.posts.len(), 2);
        assert!(destination.join("img").join("shot.png").exists());
    }

    #[test]
    fn colliding_hidden_files_do_not_block_a_merge() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(&posts.join("mac").join("a.md"), "---\ntitle: a\n---\n");
        write_file(&posts.join("mac").join(".DS_Store"), "legacy");
        write_file(&posts.join("mac").join("img").join(".DS_Store"), "legacy");
        write_file(&posts.join("tools").join("mac").join(".DS_Store"), "current");
        write_file(
            &posts.join("tools").join("mac").join("img").join(".DS_Store"),
            "current",
        );

        let folder = migrate_folder(&posts, &mapping("mac", "tools", None), false)
            .expect("migrate")
            .expect("folder migrated");

        assert!(!posts.join("mac").exists());
        let destination = posts.join("tools").join("mac");
        assert!(destination.join("a.md").exists());
        assert_eq!(read(&destination.join(".DS_Store")), "current");
        assert_eq!(read(&destination.join("img").join(".DS_Store")), "current");
        assert!(folder.actions.contains(&MoveAction::RemoveFile {
            path: posts.join("mac").join(".DS_Store")
        }));
    }

    #[test]
    fn conflicting_child_directory_is_merged_one_level_down() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(
            &posts.join("tools").join("jekyll").join("assets").join("old.png"),
            "old",
        );
        write_file(&posts.join("jekyll").join("assets").join("new.png"), "new");
        write_file(&posts.join("jekyll").join("post.md"), "---\n---\n");

        let folder = migrate_folder(&posts, &mapping("jekyll", "tools", None), false)
            .expect("migrate")
            .expect("folder migrated");

        let assets = posts.join("tools").join("jekyll").join("assets");
        assert!(assets.join("old.png").exists());
        assert!(assets.join("new.png").exists());
        assert!(!posts.join("jekyll").exists());
        assert!(folder.actions.contains(&MoveAction::RemoveDir {
            path: posts.join("jekyll").join("assets")
        }));
        assert_eq!(
            read(&posts.join("tools").join("jekyll").join("post.md")),
            "---\ncategories: [tools, jekyll]\n---\n"
        );
    }

    #[test]
    fn menu_named_legacy_folder_moves_only_loose_posts() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(
            &posts.join("programming").join("kotlin").join("k.md"),
            "---\ncategories: [programming, kotlin]\n---\n",
        );
        write_file(
            &posts.join("programming").join("general.md"),
            "---\ntitle: general\n---\n",
        );

        let folder = migrate_folder(
            &posts,
            &mapping("programming", "programming", Some("common")),
            false,
        )
        .expect("migrate")
        .expect("folder migrated");

        let common = posts.join("programming").join("common");
        assert_eq!(
            read(&common.join("general.md")),
            "---\ntitle: general\ncategories: [programming, common]\n---\n"
        );
        assert_eq!(
            read(&posts.join("programming").join("kotlin").join("k.md")),
            "---\ncategories: [programming, kotlin]\n---\n"
        );
        assert_eq!(folder.posts.len(), 1);

        let second = migrate_folder(
            &posts,
            &mapping("programming", "programming", Some("common")),
            false,
        )
        .expect("migrate again");
        assert!(second.is_none());
    }

    #[test]
    fn moving_onto_an_existing_post_is_refused() {
        let temp = tempdir().expect("tempdir");
        let posts = temp.path().join("_posts");
        write_file(&posts.join("java").join("same.md"), "legacy");
        write_file(
            &posts.join("programming").join("java").join("same.md"),
            "current",
        );

        let error = migrate_folder(&posts, &mapping("java", "programming", None), false)
            .expect_err("must refuse");
        assert!(error.to_string().contains("refusing to move"));
        assert_eq!(read(&posts.join("java").join("same.md")), "legacy");
        assert_eq!(
            read(&posts.join("programming").join("java").join("same.md")),
            "current"
        );
    }

    #[test]
    fn detect_language_prefers_specific_patterns() {
        let migration = MigrationSection::default();
        assert_eq!(
            detect_language("2025-12-28-chinese-intro.md", &migration),
            "chinese"
        );
        assert_eq!(
            detect_language("2024-05-01-chinese-korean-grammar.md", &migration),
            "chinese"
        );
        assert_eq!(
            detect_language("2024-05-01-learn-arabic-fast.md", &migration),
            "arabic"
        );
        assert_eq!(detect_language("english.md", &migration), "english");
        assert_eq!(
            detect_language("2024-02-02-ruby-basics.md", &migration),
            "common"
        );
    }

    #[test]
    fn language_folder_is_split_by_file_name() {
        let temp = tempdir().expect("tempdir");
        let paths = paths(temp.path());
        let language = paths.posts_dir.join("language");
        write_file(
            &language.join("2025-12-28-chinese-intro.md"),
            "---\ntitle: intro\ncategories: [language]\n---\n",
        );
        write_file(&language.join("2024-03-03-korean-verbs.md"), "---\n---\n");
        write_file(&language.join("2024-04-04-golang-tips.md"), "---\n---\n");
        write_file(&language.join("study-plan.md"), "---\n---\n");

        let report = migrate_layout(&paths, &BlogConfig::default(), &MigrateOptions::default())
            .expect("migrate");

        let chinese = language.join("chinese").join("2025-12-28-chinese-intro.md");
        assert_eq!(
            read(&chinese),
            "---\ntitle: intro\ncategories: [language, chinese]\n---\n"
        );
        assert!(language.join("korean").join("2024-03-03-korean-verbs.md").exists());
        assert!(language.join("common").join("study-plan.md").exists());
        assert!(language.join("2024-04-04-golang-tips.md").exists());

        let split = report.language.expect("language split");
        assert_eq!(split.moves.len(), 3);
        assert_eq!(split.skipped, vec!["2024-04-04-golang-tips.md".to_string()]);
        assert!(
            report
                .warnings
                .iter()
                .any(|warning| warning.contains("golang"))
        );
    }

    #[test]
    fn language_folder_with_subdirectories_is_left_alone() {
        let temp = tempdir().expect("tempdir");
        let paths = paths(temp.path());
        let language = paths.posts_dir.join("language");
        write_file(&language.join("korean").join("a.md"), "---\n---\n");
        write_file(&language.join("2025-12-28-hindi-x.md"), "---\n---\n");

        for dry_run in [true, false] {
            let report = migrate_layout(&paths, &BlogConfig::default(), &MigrateOptions { dry_run })
                .expect("migrate");
            assert!(report.language_already_split);
            assert!(report.language.is_none());
        }
        assert!(language.join("2025-12-28-hindi-x.md").exists());
    }

    #[test]
    fn emptied_language_source_is_removed_with_hidden_leftovers() {
        let temp = tempdir().expect("tempdir");
        let paths = paths(temp.path());
        let mut config = BlogConfig::default();
        config.migration.language_folder = "languages".to_string();
        let source = paths.posts_dir.join("languages");
        write_file(&source.join("english-idioms.md"), "---\n---\n");
        write_file(&source.join(".DS_Store"), "junk");

        let report =
            migrate_layout(&paths, &config, &MigrateOptions::default()).expect("migrate");

        assert!(!source.exists());
        assert!(
            paths
                .posts_dir
                .join("language")
                .join("english")
                .join("english-idioms.md")
                .exists()
        );
        let split = report.language.expect("language split");
        assert_eq!(split.cleanup.len(), 2);
    }

    #[test]
    fn dry_run_reports_plan_without_touching_disk() {
        let temp = tempdir().expect("tempdir");
        let paths = paths(temp.path());
        let devops = paths.posts_dir.join("devops").join("post.md");
        write_file(&devops, "---\ntitle: x\n---\n");
        let korean = paths.posts_dir.join("language").join("korean-101.md");
        write_file(&korean, "---\n---\n");

        let report = migrate_layout(
            &paths,
            &BlogConfig::default(),
            &MigrateOptions { dry_run: true },
        )
        .expect("dry run");

        assert!(report.dry_run);
        assert_eq!(read(&devops), "---\ntitle: x\n---\n");
        assert!(korean.exists());
        assert!(!paths.posts_dir.join("infra").exists());

        assert_eq!(report.folders.len(), 1);
        let folder = &report.folders[0];
        assert_eq!(folder.legacy, "devops");
        assert_eq!(folder.posts.len(), 1);
        assert_eq!(
            folder.posts[0].path,
            paths.posts_dir.join("infra").join("devops").join("post.md")
        );
        assert_eq!(folder.posts[0].outcome, CategoryUpdate::Updated);
        let split = report.language.expect("language split");
        assert_eq!(split.moves.len(), 1);
        assert_eq!(split.moves[0].tag, "korean");
        assert!(split.cleanup.is_empty());
    }

    #[test]
    fn missing_posts_dir_is_nothing_to_do() {
        let temp = tempdir().expect("tempdir");
        let paths = paths(temp.path());
        let report = migrate_layout(&paths, &BlogConfig::default(), &MigrateOptions::default())
            .expect("migrate");
        assert!(report.folders.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }
}
