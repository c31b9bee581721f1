use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::project::{
    BuildSteps, FeatureFlags, PackageManager, ProjectConfig, UiOptions, DEFAULT_IMPORT_ALIAS,
};

/// Root configuration structure for next-express.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NextExpressConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via next-express.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    #[serde(default)]
    pub package_manager: PackageManager,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default = "default_import_alias")]
    pub import_alias: String,

    #[serde(default)]
    pub steps: BuildSteps,

    #[serde(default)]
    pub ui: UiOptions,

    #[serde(default = "default_scaffold")]
    pub scaffold: ScaffoldSettings,

    #[serde(default = "default_shadcn")]
    pub shadcn: ShadcnSettings,

    #[serde(default = "default_editor")]
    pub editor: EditorSettings,

    #[serde(default = "default_dev_server")]
    pub dev_server: DevServerSettings,

    #[serde(default = "default_preflight")]
    pub preflight: PreflightSettings,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::default(),
            features: FeatureFlags::default(),
            import_alias: default_import_alias(),
            steps: BuildSteps::default(),
            ui: UiOptions::default(),
            scaffold: default_scaffold(),
            shadcn: default_shadcn(),
            editor: default_editor(),
            dev_server: default_dev_server(),
            preflight: default_preflight(),
        }
    }
}

impl Defaults {
    /// Seed a project config from these defaults.
    pub fn project_config(&self, name: impl Into<String>, path: impl Into<PathBuf>) -> ProjectConfig {
        ProjectConfig {
            name: name.into(),
            path: path.into(),
            package_manager: self.package_manager,
            features: self.features,
            import_alias: self.import_alias.clone(),
            steps: self.steps,
            ui: self.ui,
        }
    }
}

/// How create-next-app is launched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldSettings {
    pub runner: String,
    #[serde(default)]
    pub runner_args: Vec<String>,
    pub package: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// How `shadcn init` is launched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShadcnSettings {
    pub runner: String,
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DevServerSettings {
    pub script: String,
    pub ready_patterns: Vec<String>,
    pub default_port: u16,
    pub ready_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreflightSettings {
    pub enabled: bool,
    /// semver requirement checked against `node --version`
    pub node_version: String,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_import_alias() -> String {
    DEFAULT_IMPORT_ALIAS.to_string()
}

fn default_scaffold() -> ScaffoldSettings {
    ScaffoldSettings {
        runner: "npx".to_string(),
        runner_args: vec!["--yes".to_string()],
        package: "create-next-app@latest".to_string(),
        env: BTreeMap::from([
            ("CI".to_string(), "true".to_string()),
            ("NEXT_TELEMETRY_DISABLED".to_string(), "1".to_string()),
        ]),
    }
}

fn default_shadcn() -> ShadcnSettings {
    ShadcnSettings {
        runner: "npx".to_string(),
        args: vec!["shadcn@latest".to_string(), "init".to_string()],
        env: BTreeMap::from([(
            "NPM_CONFIG_LEGACY_PEER_DEPS".to_string(),
            "true".to_string(),
        )]),
    }
}

fn default_editor() -> EditorSettings {
    EditorSettings {
        command: "code".to_string(),
        args: vec![".".to_string()],
    }
}

fn default_dev_server() -> DevServerSettings {
    DevServerSettings {
        script: "dev".to_string(),
        ready_patterns: vec![
            "Local:".to_string(),
            "ready - started server on".to_string(),
        ],
        default_port: 3000,
        ready_timeout_secs: 30,
    }
}

fn default_preflight() -> PreflightSettings {
    PreflightSettings {
        enabled: true,
        node_version: ">=18.18.0".to_string(),
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If next-express.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full next-express.json config, falling back to defaults on any error.
pub fn load_config() -> NextExpressConfig {
    load_config_from_file().unwrap_or_default()
}

fn load_config_from_file() -> crate::Result<NextExpressConfig> {
    let path = paths::defaults_json()?;

    if !path.exists() {
        return Err(crate::Error::internal_unexpected("next-express.json not found"));
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to next-express.json (creates if missing).
pub fn save_config(config: &NextExpressConfig) -> crate::Result<()> {
    let path = paths::defaults_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize next-express.json".to_string()))
    })?;

    // Staged beside the target, then renamed over it.
    let staged = path.with_extension("json.tmp");
    fs::write(&staged, content)
        .and_then(|_| fs::rename(&staged, &path))
        .map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
        })
}

pub fn config_exists() -> bool {
    paths::defaults_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete next-express.json (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::defaults_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

pub fn config_path() -> crate::Result<String> {
    Ok(paths::defaults_json()?.display().to_string())
}

pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
