use std::path::PathBuf;

use anyhow::Result;
use blogtool_core::filesystem::{display_relative, normalize_path};
use blogtool_core::front_matter::CategoryUpdate;
use blogtool_core::generate::generate_site_navigation;
use blogtool_core::migrate::{MigrateOptions, MigrationReport, migrate_layout};
use blogtool_core::refresh::{RefreshOptions, refresh_categories};
use blogtool_core::runtime::{
    InitOptions, PathOverrides, ResolutionContext, Runtime, init_layout, inspect_runtime,
    resolve_runtime,
};
use blogtool_core::scan::{PostsStructure, scan_posts_structure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "blogtool",
    version,
    about = "Maintenance commands for a menu/category tree of Markdown posts"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    posts_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print resolved runtime diagnostics")]
    diagnostics: bool,
    #[arg(long, global = true, help = "Print the report as JSON")]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone)]
struct RuntimeOptions {
    project_root: Option<PathBuf>,
    config: Option<PathBuf>,
    posts_dir: Option<PathBuf>,
    diagnostics: bool,
    json: bool,
}

impl RuntimeOptions {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            project_root: cli.project_root.clone(),
            config: cli.config.clone(),
            posts_dir: cli.posts_dir.clone(),
            diagnostics: cli.diagnostics,
            json: cli.json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Write the default configuration file")]
    Init(InitArgs),
    #[command(about = "Show resolved paths and what exists on disk")]
    Status,
    #[command(about = "List menus and categories found under the posts directory")]
    Scan,
    #[command(about = "Regenerate the navigation file and add missing category pages")]
    Generate,
    #[command(about = "Move one-level legacy folders into the menu/category layout")]
    Migrate(MigrateArgs),
    #[command(about = "Rewrite post categories from their folder location")]
    Refresh(RefreshArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    #[arg(long, help = "Overwrite an existing config file")]
    force: bool,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[arg(long, help = "Show what would be done without making changes")]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct RefreshArgs {
    #[arg(long, help = "Report posts that would change without writing them")]
    dry_run: bool,
    #[arg(long, help = "Print a unified diff of every rewrite")]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = RuntimeOptions::from_cli(&cli);

    match cli.command {
        Some(Commands::Init(args)) => run_init(&options, args),
        Some(Commands::Status) => run_status(&options),
        Some(Commands::Scan) => run_scan(&options),
        Some(Commands::Generate) => run_generate(&options),
        Some(Commands::Migrate(args)) => run_migrate(&options, args),
        Some(Commands::Refresh(args)) => run_refresh(&options, args),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_init(options: &RuntimeOptions, args: InitArgs) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let paths = &runtime.paths;
    let report = init_layout(paths, &InitOptions { force: args.force })?;
    if options.json {
        return print_json(&report);
    }

    println!("init");
    println!("project_root: {}", normalize_path(&paths.project_root));
    println!("config_path: {}", normalize_path(&paths.config_path));
    println!("created_dirs: {}", report.created_dirs.len());
    for dir in &report.created_dirs {
        println!("created_dirs.path: {}", normalize_path(dir));
    }
    if report.wrote_config {
        println!("wrote_config: yes");
    } else {
        println!("wrote_config: no (already exists; use --force to overwrite)");
    }
    print_diagnostics(options, &runtime);
    Ok(())
}

fn run_status(options: &RuntimeOptions) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let paths = &runtime.paths;
    let status = inspect_runtime(paths);
    if options.json {
        return print_json(&status);
    }

    println!("runtime status");
    println!("project_root: {}", normalize_path(&paths.project_root));
    println!(
        "project_root_exists: {}",
        format_flag(status.project_root_exists)
    );
    println!("config_exists: {}", format_flag(status.config_exists));
    println!("posts_dir_exists: {}", format_flag(status.posts_dir_exists));
    println!("data_dir_exists: {}", format_flag(status.data_dir_exists));
    println!("pages_dir_exists: {}", format_flag(status.pages_dir_exists));
    println!("navigation_exists: {}", format_flag(status.navigation_exists));
    print_warnings(&status.warnings);
    print_diagnostics(options, &runtime);
    Ok(())
}

fn run_scan(options: &RuntimeOptions) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let structure = scan_posts_structure(&runtime.paths.posts_dir)?;
    if options.json {
        return print_json(&structure);
    }

    println!("scan");
    println!("posts_dir: {}", normalize_path(&runtime.paths.posts_dir));
    print_structure("scan", &structure);
    print_diagnostics(options, &runtime);
    Ok(())
}

fn run_generate(options: &RuntimeOptions) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let report = generate_site_navigation(&runtime.paths, &runtime.config)?;
    if options.json {
        return print_json(&report);
    }

    println!("generate");
    println!("posts_dir: {}", normalize_path(&runtime.paths.posts_dir));
    print_structure("scan", &report.structure);
    match &report.navigation_path {
        Some(path) => {
            println!("navigation.path: {}", normalize_path(path));
            println!("navigation.entries: {}", report.navigation_entries);
        }
        None => println!("navigation.path: <not written>"),
    }
    println!("pages.created.count: {}", report.created_pages.len());
    for page in &report.created_pages {
        println!("pages.created: {page}");
    }
    println!("pages.existing.count: {}", report.existing_pages.len());
    println!("pages.orphans.count: {}", report.orphan_pages.len());
    print_warnings(&report.warnings);
    print_diagnostics(options, &runtime);
    Ok(())
}

fn run_migrate(options: &RuntimeOptions, args: MigrateArgs) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let report = migrate_layout(
        &runtime.paths,
        &runtime.config,
        &MigrateOptions {
            dry_run: args.dry_run,
        },
    )?;
    if options.json {
        return print_json(&report);
    }

    println!("migrate");
    println!("posts_dir: {}", normalize_path(&report.posts_dir));
    if report.dry_run {
        println!("mode: dry-run (no changes will be made)");
    }
    print_migration(&report);
    print_warnings(&report.warnings);
    if !report.dry_run {
        println!("next steps:");
        println!("  1) review the moved files with your version control status");
        println!("  2) run `blogtool generate` to rebuild navigation and category pages");
    }
    print_diagnostics(options, &runtime);
    Ok(())
}

fn print_migration(report: &MigrationReport) {
    let root = &report.posts_dir;
    if report.language_already_split {
        println!("language: already split into subfolders (skipped)");
    }
    if let Some(split) = &report.language {
        println!("language.source: {}", display_relative(root, &split.source));
        for action in &split.actions {
            println!("language.action: {}", action.describe(root));
        }
        for item in &split.moves {
            println!(
                "language.post: {} -> {} ({})",
                item.file_name,
                item.tag,
                format_update(item.outcome)
            );
        }
        for name in &split.skipped {
            println!("language.skipped: {name}");
        }
        for action in &split.cleanup {
            println!("language.cleanup: {}", action.describe(root));
        }
    }

    println!("folders.migrated: {}", report.folders.len());
    for folder in &report.folders {
        println!(
            "folder: {} -> {}/{}",
            folder.legacy, folder.menu, folder.category
        );
        for action in &folder.actions {
            println!("  action: {}", action.describe(root));
        }
        for post in &folder.posts {
            println!(
                "  post: {} ({})",
                display_relative(root, &post.path),
                format_update(post.outcome)
            );
        }
    }
    if !report.already_migrated.is_empty() {
        println!(
            "folders.already_migrated: {}",
            report.already_migrated.join(", ")
        );
    }
}

fn run_refresh(options: &RuntimeOptions, args: RefreshArgs) -> Result<()> {
    let runtime = resolve_runtime_paths(options)?;
    let report = refresh_categories(
        &runtime.paths,
        &RefreshOptions {
            dry_run: args.dry_run,
            include_diff: args.diff,
        },
    )?;
    if options.json {
        return print_json(&report);
    }

    let root = &runtime.paths.project_root;
    println!("refresh");
    println!("posts_dir: {}", normalize_path(&runtime.paths.posts_dir));
    if report.dry_run {
        println!("mode: dry-run (no changes will be made)");
    }
    for post in &report.updated {
        println!("updated: {}", display_relative(root, &post.path));
        if let Some(diff) = &post.diff {
            print!("{diff}");
        }
    }
    for path in &report.without_front_matter {
        println!("skipped.no_front_matter: {}", display_relative(root, path));
    }
    println!("scanned: {}", report.scanned);
    println!("unchanged: {}", report.unchanged);
    println!("total_updated: {}", report.updated.len());
    print_diagnostics(options, &runtime);
    Ok(())
}

fn resolve_runtime_paths(options: &RuntimeOptions) -> Result<Runtime> {
    dotenvy::dotenv().ok();

    let context = ResolutionContext::from_process()?;
    let overrides = PathOverrides {
        project_root: options.project_root.clone(),
        config: options.config.clone(),
        posts_dir: options.posts_dir.clone(),
    };

    let initial = resolve_runtime(&context, &overrides)?;
    let project_env = initial.paths.project_root.join(".env");
    if project_env.exists() {
        let _ = dotenvy::from_path_override(&project_env);
        return resolve_runtime(&context, &overrides);
    }
    Ok(initial)
}

fn print_structure(prefix: &str, structure: &PostsStructure) {
    println!("{prefix}.menus: {}", structure.menus.len());
    println!("{prefix}.categories: {}", structure.category_count());
    println!("{prefix}.posts: {}", structure.post_count());
    if structure.is_empty() {
        println!("{prefix}.structure: <empty>");
        return;
    }
    for menu in &structure.menus {
        let categories = menu
            .categories
            .iter()
            .map(|category| format!("{} ({})", category.name, category.post_count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{prefix}.menu.{}: {categories}", menu.name);
    }
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("warnings:");
    for warning in warnings {
        println!("  - {warning}");
    }
}

fn print_diagnostics(options: &RuntimeOptions, runtime: &Runtime) {
    if options.diagnostics {
        println!("\n[diagnostics]\n{}", runtime.paths.diagnostics());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_update(outcome: CategoryUpdate) -> &'static str {
    match outcome {
        CategoryUpdate::Updated => "updated",
        CategoryUpdate::Unchanged => "unchanged",
        CategoryUpdate::NoFrontMatter => "no front matter",
    }
}

fn format_flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
