//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".embedcode/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embed: Embed,
    #[serde(default)]
    pub title: Title,
    #[serde(default)]
    pub http: Http,
}

/// Which fences are treated as embeds and where local sources live.
///
/// Unset fields fall through to lower layers, then to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Embed {
    #[serde(default)]
    languages: Option<Vec<String>>,
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    template: Option<String>,
}

impl Embed {
    fn default_languages() -> Vec<String> {
        [
            "c", "cpp", "java", "python", "go", "rust", "ruby", "javascript", "js",
            "typescript", "ts", "shell", "sh", "bash",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect()
    }

    fn default_template() -> &'static str {
        "caption"
    }

    pub fn languages(&self) -> Vec<String> {
        self.languages
            .clone()
            .unwrap_or_else(Self::default_languages)
    }

    /// Root directory backing `vault://` locations.
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn template(&self) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| Self::default_template().to_owned())
    }

    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = Some(root.into());
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }
}

/// Styling applied to the caption rendered above an embedded block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Title {
    #[serde(default)]
    font_color: Option<String>,
    #[serde(default)]
    background_color: Option<String>,
}

impl Title {
    fn default_background_color() -> &'static str {
        "#00000020"
    }

    /// CSS color of the caption text; empty leaves it to the stylesheet.
    pub fn font_color(&self) -> String {
        self.font_color.clone().unwrap_or_default()
    }

    pub fn background_color(&self) -> String {
        self.background_color
            .clone()
            .unwrap_or_else(|| Self::default_background_color().to_owned())
    }

    pub fn set_font_color(&mut self, color: impl Into<String>) {
        self.font_color = Some(color.into());
    }
}

/// Transport settings for remote sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Http {
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Http {
    fn default_user_agent() -> &'static str {
        concat!("embedcode/", env!("CARGO_PKG_VERSION"))
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| Self::default_user_agent().to_owned())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    languages: Option<String>,
    root: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            languages: env::var("EMBEDCODE_LANGUAGES").ok(),
            root: env::var("EMBEDCODE_ROOT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(languages: &str, root: &str) -> Self {
        Self {
            languages: Some(languages.to_owned()),
            root: Some(root.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading user config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            embed: merge_embed(self.embed, other.embed),
            title: merge_title(self.title, other.title),
            http: merge_http(self.http, other.http),
        }
    }
}

fn merge_embed(mut base: Embed, overlay: Embed) -> Embed {
    if let Some(languages) = overlay.languages {
        base.languages = Some(languages);
    }
    if let Some(root) = overlay.root {
        base.root = Some(root);
    }
    if let Some(template) = overlay.template {
        base.template = Some(template);
    }
    base
}

fn merge_title(base: Title, overlay: Title) -> Title {
    Title {
        font_color: overlay.font_color.or(base.font_color),
        background_color: overlay.background_color.or(base.background_color),
    }
}

fn merge_http(base: Http, overlay: Http) -> Http {
    Http {
        user_agent: overlay.user_agent.or(base.user_agent),
        timeout_secs: overlay.timeout_secs.or(base.timeout_secs),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("embedcode/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(languages) = env.languages {
        config.embed.languages = Some(split_languages(&languages));
    }
    if let Some(root) = env.root {
        config.embed.root = Some(PathBuf::from(root));
    }
    config
}

/// Split a comma-separated language list, dropping blanks.
pub fn split_languages(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
        .collect()
}
