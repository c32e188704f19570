use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{BlogConfig, DEFAULT_POSTS_DIR, load_config, render_default_config};
use crate::filesystem::{normalize_path, write_text_file};

pub const STATE_DIR_NAME: &str = ".blogtool";
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Flag,
    Env,
    Config,
    Heuristic,
    Default,
}

impl ValueSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Config => "config",
            Self::Heuristic => "heuristic",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub project_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub posts_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub cwd: PathBuf,
    pub executable_dir: Option<PathBuf>,
}

impl ResolutionContext {
    pub fn from_process() -> Result<Self> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        let executable_dir = env::current_exe()
            .ok()
            .and_then(|path| path.parent().map(Path::to_path_buf));
        Ok(Self {
            cwd,
            executable_dir,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPaths {
    pub project_root: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
    pub posts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub navigation_path: PathBuf,
    pub root_source: ValueSource,
    pub config_source: ValueSource,
    pub posts_source: ValueSource,
}

impl ResolvedPaths {
    pub fn diagnostics(&self) -> String {
        format!(
            "project_root={} ({})\nstate_dir={}\nconfig_path={} ({})\nposts_dir={} ({})\ndata_dir={}\npages_dir={}\nnavigation_path={}",
            normalize_path(&self.project_root),
            self.root_source.as_str(),
            normalize_path(&self.state_dir),
            normalize_path(&self.config_path),
            self.config_source.as_str(),
            normalize_path(&self.posts_dir),
            self.posts_source.as_str(),
            normalize_path(&self.data_dir),
            normalize_path(&self.pages_dir),
            normalize_path(&self.navigation_path),
        )
    }
}

/// Resolved paths plus the configuration they were resolved against.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub paths: ResolvedPaths,
    pub config: BlogConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStatus {
    pub project_root_exists: bool,
    pub config_exists: bool,
    pub posts_dir_exists: bool,
    pub data_dir_exists: bool,
    pub pages_dir_exists: bool,
    pub navigation_exists: bool,
    pub warnings: Vec<String>,
}

pub fn resolve_runtime(context: &ResolutionContext, overrides: &PathOverrides) -> Result<Runtime> {
    resolve_runtime_with_lookup(context, overrides, |key| env::var(key).ok())
}

fn resolve_runtime_with_lookup<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: F,
) -> Result<Runtime>
where
    F: Fn(&str) -> Option<String>,
{
    let (project_root, root_source) = resolve_project_root(context, overrides, &lookup_env);
    let state_dir = project_root.join(STATE_DIR_NAME);

    let (config_path, config_source) = if let Some(path) = overrides.config.as_deref() {
        (absolutize(path, &project_root), ValueSource::Flag)
    } else if let Some(value) = non_empty_env(&lookup_env, "BLOGTOOL_CONFIG") {
        (absolutize(Path::new(&value), &project_root), ValueSource::Env)
    } else {
        (state_dir.join(CONFIG_FILENAME), ValueSource::Default)
    };

    let config = load_config(&config_path)?;
    let configured_posts_source = if config_path.exists() {
        ValueSource::Config
    } else {
        ValueSource::Default
    };

    let (posts_dir, posts_source) = if let Some(path) = overrides.posts_dir.as_deref() {
        (absolutize(path, &project_root), ValueSource::Flag)
    } else if let Some(value) = non_empty_env(&lookup_env, "BLOGTOOL_POSTS_DIR") {
        (absolutize(Path::new(&value), &project_root), ValueSource::Env)
    } else {
        (
            absolutize(Path::new(&config.paths.posts_dir), &project_root),
            configured_posts_source,
        )
    };

    let data_dir = absolutize(Path::new(&config.paths.data_dir), &project_root);
    let pages_dir = absolutize(Path::new(&config.paths.pages_dir), &project_root);
    let navigation_path = data_dir.join(&config.paths.navigation_file);

    Ok(Runtime {
        paths: ResolvedPaths {
            project_root,
            state_dir,
            config_path,
            posts_dir,
            data_dir,
            pages_dir,
            navigation_path,
            root_source,
            config_source,
            posts_source,
        },
        config,
    })
}

pub fn inspect_runtime(paths: &ResolvedPaths) -> RuntimeStatus {
    let posts_dir_exists = paths.posts_dir.is_dir();
    let pages_dir_exists = paths.pages_dir.is_dir();
    let navigation_exists = paths.navigation_path.is_file();

    let mut warnings = Vec::new();
    if !posts_dir_exists {
        warnings.push(format!(
            "{} is missing; scan, generate, migrate and refresh will find nothing to do",
            normalize_path(&paths.posts_dir)
        ));
    }
    if !pages_dir_exists {
        warnings.push(format!(
            "{} is missing; `blogtool generate` will create it",
            normalize_path(&paths.pages_dir)
        ));
    }
    if !navigation_exists {
        warnings.push(format!(
            "{} has not been generated yet",
            normalize_path(&paths.navigation_path)
        ));
    }

    RuntimeStatus {
        project_root_exists: paths.project_root.is_dir(),
        config_exists: paths.config_path.is_file(),
        posts_dir_exists,
        data_dir_exists: paths.data_dir.is_dir(),
        pages_dir_exists,
        navigation_exists,
        warnings,
    }
}

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub created_dirs: Vec<PathBuf>,
    pub wrote_config: bool,
}

pub fn init_layout(paths: &ResolvedPaths, options: &InitOptions) -> Result<InitReport> {
    let mut created_dirs = Vec::new();
    for dir in [
        &paths.state_dir,
        &paths.posts_dir,
        &paths.data_dir,
        &paths.pages_dir,
    ] {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            created_dirs.push(dir.clone());
        }
    }

    let wrote_config = write_text_file(
        &paths.config_path,
        &render_default_config()?,
        options.force,
    )?;

    Ok(InitReport {
        created_dirs,
        wrote_config,
    })
}

fn resolve_project_root<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: &F,
) -> (PathBuf, ValueSource)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = overrides.project_root.as_deref() {
        return (absolutize(path, &context.cwd), ValueSource::Flag);
    }

    if let Some(value) = non_empty_env(lookup_env, "BLOGTOOL_PROJECT_ROOT") {
        return (absolutize(Path::new(&value), &context.cwd), ValueSource::Env);
    }

    let root = detect_project_root_heuristic(&context.cwd, context.executable_dir.as_deref());
    (root, ValueSource::Heuristic)
}

fn detect_project_root_heuristic(cwd: &Path, executable_dir: Option<&Path>) -> PathBuf {
    let mut seen = HashSet::new();
    for candidate in candidate_roots(cwd, executable_dir) {
        if !seen.insert(normalize_path(&candidate)) {
            continue;
        }
        if candidate.join(DEFAULT_POSTS_DIR).is_dir() || candidate.join(STATE_DIR_NAME).is_dir() {
            return candidate;
        }
    }
    cwd.to_path_buf()
}

fn candidate_roots(cwd: &Path, executable_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = cwd.ancestors().map(Path::to_path_buf).collect();
    if let Some(exe_dir) = executable_dir {
        out.extend(exe_dir.ancestors().map(Path::to_path_buf));
    }
    out
}

fn non_empty_env<F>(lookup_env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup_env(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
