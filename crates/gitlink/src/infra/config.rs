//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::ProviderTemplate;
use crate::domain::provider::ProviderRegistry;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".gitlink/config.toml";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_REMOTE: &str = "origin";

/// Effective configuration after every layer and env override has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Config {
    pub defaults: Defaults,
    pub custom_providers: Vec<ProviderTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defaults {
    pub default_branch: String,
    pub remote: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_owned(),
            remote: DEFAULT_REMOTE.to_owned(),
        }
    }
}

/// One config file as written. Unset keys stay `None` so they never mask a lower layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
struct ConfigLayer {
    #[serde(default)]
    defaults: DefaultsLayer,
    #[serde(default, alias = "customProviders")]
    custom_providers: Vec<ProviderTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
struct DefaultsLayer {
    #[serde(default, alias = "defaultBranch")]
    default_branch: Option<String>,
    #[serde(default)]
    remote: Option<String>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data).with_context(|| format!("in config file {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())
    }

    /// `overlay` wins every key it sets; provider lists concatenate in layer order.
    fn merge(self, overlay: Self) -> Self {
        let mut custom_providers = self.custom_providers;
        custom_providers.extend(overlay.custom_providers);
        Self {
            defaults: DefaultsLayer {
                default_branch: overlay.defaults.default_branch.or(self.defaults.default_branch),
                remote: overlay.defaults.remote.or(self.defaults.remote),
            },
            custom_providers,
        }
    }

    fn resolve(self) -> Config {
        Config {
            defaults: Defaults {
                default_branch: self
                    .defaults
                    .default_branch
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_owned()),
                remote: self
                    .defaults
                    .remote
                    .unwrap_or_else(|| DEFAULT_REMOTE.to_owned()),
            },
            custom_providers: self.custom_providers,
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    default_branch: Option<String>,
    remote: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            default_branch: non_empty_var("GITLINK_DEFAULT_BRANCH"),
            remote: non_empty_var("GITLINK_REMOTE"),
        }
    }

    #[cfg(test)]
    fn for_tests(default_branch: &str, remote: &str) -> Self {
        Self {
            default_branch: Some(default_branch.to_owned()),
            remote: Some(remote.to_owned()),
        }
    }

    fn into_layer(self) -> ConfigLayer {
        ConfigLayer {
            defaults: DefaultsLayer {
                default_branch: self.default_branch,
                remote: self.remote,
            },
            custom_providers: Vec::new(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Load configuration for a workspace rooted at `workspace`, with an optional explicit file
    /// layered on top of the discovered ones.
    pub fn load(workspace: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace.map(workspace_config_path);
        Self::load_with_layers(global, workspace, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<ConfigLayer> = Vec::new();

        layers.push(ConfigLayer::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&workspace_path)?);
        }

        // Unlike discovered layers, an explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(ConfigLayer::from_file(&explicit_path)?);
        }

        layers.push(env_overrides.into_layer());

        let merged = layers
            .into_iter()
            .reduce(ConfigLayer::merge)
            .unwrap_or_default();
        Ok(merged.resolve())
    }

    /// Provider registry for this configuration: built-ins, then custom entries in layer order.
    pub fn provider_registry(&self) -> ProviderRegistry {
        ProviderRegistry::with_custom(self.custom_providers.clone())
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("gitlink/config.toml"))
}

fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_WORKSPACE_CONFIG_PATH)
}
