//! Configuration management utilities.
//!
//! Every layer is a TOML table. Layers are merged key by key, then the result
//! is deserialized once, so the embedded `default-config.toml` is the only
//! place default values live.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".acmego/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub acme: Acme,
    pub share: Share,
    pub defaults: Defaults,
    pub logging: Logging,
    /// Program to execute for each tool, keyed by tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, String>,
}

/// Where the acme and plumber file servers are mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acme {
    fs_root: PathBuf,
    plumb_root: PathBuf,
}

impl Acme {
    pub fn fs_root(&self) -> PathBuf {
        self.fs_root.clone()
    }

    pub fn plumb_root(&self) -> PathBuf {
        self.plumb_root.clone()
    }
}

/// Snippet sharing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    url: String,
    timeout_secs: u64,
}

impl Share {
    pub fn url(&self) -> String {
        self.url.trim_end_matches('/').to_owned()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Analysis scope passed to guru when a command gets none.
    scope: String,
}

impl Defaults {
    pub fn scope(&self) -> String {
        self.scope.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    level: String,
}

impl Logging {
    pub fn level(&self) -> String {
        self.level.clone()
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    acme_fs: Option<String>,
    plumb_fs: Option<String>,
    share_url: Option<String>,
    log_level: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            acme_fs: env::var("ACMEGO_ACME_FS").ok(),
            plumb_fs: env::var("ACMEGO_PLUMB_FS").ok(),
            share_url: env::var("ACMEGO_SHARE_URL").ok(),
            log_level: env::var("ACMEGO_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(acme_fs: &str, share_url: &str) -> Self {
        Self {
            acme_fs: Some(acme_fs.to_owned()),
            share_url: Some(share_url.to_owned()),
            ..Self::default()
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

    /// The embedded defaults alone.
    pub fn builtin() -> Result<Self> {
        Self::load_with_layers(None, None, EnvOverrides::default())
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut merged = parse_layer(&DEFAULT_CONFIG).context("invalid built-in config")?;

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            merge_layer(&mut merged, read_layer(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            merge_layer(&mut merged, read_layer(&workspace_path)?);
        }

        let config = Self::resolve(merged)?;
        Ok(apply_env_overrides(config, env_overrides))
    }

    /// Turn a fully merged table into a config. Missing keys are an error.
    fn resolve(merged: Table) -> Result<Self> {
        Value::Table(merged)
            .try_into()
            .context("invalid configuration")
    }

    /// The program to run for `tool`, honoring `[tools]` overrides.
    pub fn program(&self, tool: &str) -> String {
        self.tools
            .get(tool)
            .cloned()
            .unwrap_or_else(|| tool.to_owned())
    }
}

fn read_layer(path: &Path) -> Result<Table> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_layer(&data).with_context(|| format!("in config file: {}", path.display()))
}

fn parse_layer(contents: &str) -> Result<Table> {
    toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())
}

/// Overlay `layer` onto `base`; nested tables are merged, anything else replaced.
fn merge_layer(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        if let Value::Table(table) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_layer(existing, table);
                continue;
            }
            base.insert(key, Value::Table(table));
        } else {
            base.insert(key, value);
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("acmego/config.toml"))
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
    if let Some(root) = env.acme_fs {
        config.acme.fs_root = root.into();
    }
    if let Some(root) = env.plumb_fs {
        config.acme.plumb_root = root.into();
    }
    if let Some(url) = env.share_url {
        config.share.url = url;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::builtin().expect("load default config");
        assert_eq!(config.acme.fs_root(), PathBuf::from("/mnt/acme"));
        assert_eq!(config.acme.plumb_root(), PathBuf::from("/mnt/plumb"));
        assert_eq!(config.share.url(), "https://play.golang.org");
        assert_eq!(config.share.timeout(), Duration::from_secs(30));
        assert_eq!(config.defaults.scope(), ".");
        assert_eq!(config.logging.level(), "warn");
        assert_eq!(config.program("guru"), "guru");
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
scope = "example.com/..."
[tools]
guru = "/opt/go/bin/guru"
impl = "/opt/go/bin/impl"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".acmego"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".acmego/config.toml"),
            r#"
[share]
url = "https://go.dev/_/"
[tools]
guru = "./bin/guru"
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".acmego/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.defaults.scope(), "example.com/...");
        assert_eq!(config.share.url(), "https://go.dev/_");
        assert_eq!(config.share.timeout(), Duration::from_secs(30));
        assert_eq!(config.program("guru"), "./bin/guru");
        assert_eq!(config.program("impl"), "/opt/go/bin/impl");
        assert_eq!(config.program("gorename"), "gorename");

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("/tmp/acme", "http://localhost:8080");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.acme.fs_root(), PathBuf::from("/tmp/acme"));
        assert_eq!(config.acme.plumb_root(), PathBuf::from("/mnt/plumb"));
        assert_eq!(config.share.url(), "http://localhost:8080");
        Ok(())
    }

    #[test]
    fn repo_root_is_found_from_nested_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir_all(temp.path().join(".git"))?;
        assert_eq!(find_repo_root(&nested), Some(temp.path().to_path_buf()));
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = read_layer(&file);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn missing_keys_are_reported_not_filled_in() -> Result<()> {
        let partial = parse_layer("[acme]\nfs_root = \"/mnt/acme\"\n")?;
        let err = Config::resolve(partial).unwrap_err();
        assert!(format!("{err:#}").contains("plumb_root"));
        Ok(())
    }

    #[test]
    fn wrongly_typed_layer_fails_to_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("config.toml");
        fs::write(&file, "[share]\ntimeout_secs = \"soon\"\n")?;
        let result = Config::load_with_layers(Some(file), None, EnvOverrides::default());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn nested_tables_merge_key_by_key() -> Result<()> {
        let mut base = parse_layer("[acme]\nfs_root = \"/a\"\nplumb_root = \"/p\"\n")?;
        merge_layer(&mut base, parse_layer("[acme]\nfs_root = \"/b\"\n")?);
        assert_eq!(base["acme"]["fs_root"].as_str(), Some("/b"));
        assert_eq!(base["acme"]["plumb_root"].as_str(), Some("/p"));
        Ok(())
    }
}
