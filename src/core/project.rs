//! Project configuration collected from the user before a run.
//!
//! A [`ProjectConfig`] is built once (CLI flags, JSON spec, defaults file) and
//! then treated as read-only for the whole sequence.

use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_IMPORT_ALIAS: &str = "@/*";

// ============================================================================
// Package manager
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Executable name.
    pub fn program(&self) -> &'static str {
        self.as_str()
    }

    /// create-next-app flag selecting this package manager.
    pub fn use_flag(&self) -> &'static str {
        match self {
            PackageManager::Npm => "--use-npm",
            PackageManager::Yarn => "--use-yarn",
            PackageManager::Pnpm => "--use-pnpm",
        }
    }

    /// Arguments that add `packages` as dependencies of the current project.
    pub fn add_args(&self, packages: &[&str]) -> Vec<String> {
        let verb: &[&str] = match self {
            PackageManager::Npm => &["install"],
            PackageManager::Yarn | PackageManager::Pnpm => &["add"],
        };
        verb.iter().chain(packages).map(|p| p.to_string()).collect()
    }

    /// Same as [`add_args`](Self::add_args), as dev dependencies.
    pub fn add_dev_args(&self, packages: &[&str]) -> Vec<String> {
        let verb: &[&str] = match self {
            PackageManager::Npm => &["install", "--save-dev"],
            PackageManager::Yarn | PackageManager::Pnpm => &["add", "-D"],
        };
        verb.iter().chain(packages).map(|p| p.to_string()).collect()
    }

    /// Arguments that run a package.json script.
    pub fn run_script_args(&self, script: &str) -> Vec<String> {
        match self {
            PackageManager::Npm => vec!["run".to_string(), script.to_string()],
            PackageManager::Yarn | PackageManager::Pnpm => vec![script.to_string()],
        }
    }

    pub fn all() -> [PackageManager; 3] {
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PackageManager::all()
            .into_iter()
            .find(|pm| pm.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "packageManager",
                    format!("Unknown package manager '{}'", s),
                    None,
                    Some(vec!["npm".into(), "yarn".into(), "pnpm".into()]),
                )
            })
    }
}

// ============================================================================
// Feature flags
// ============================================================================

/// A named boolean option of the project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Typescript,
    Tailwind,
    Eslint,
    SrcDir,
    AppRouter,
    ImportAlias,
    Turbopack,
    Redux,
    Axios,
    NextAuth,
    Prisma,
    ReactHookForm,
    ReactQuery,
    Shadcn,
}

impl Feature {
    /// Features that become create-next-app flags, in emission order.
    pub const SCAFFOLD: [Feature; 7] = [
        Feature::Typescript,
        Feature::Tailwind,
        Feature::Eslint,
        Feature::SrcDir,
        Feature::AppRouter,
        Feature::ImportAlias,
        Feature::Turbopack,
    ];

    /// Features installed as extra libraries after scaffolding, in install order.
    pub const LIBRARIES: [Feature; 6] = [
        Feature::Redux,
        Feature::Axios,
        Feature::NextAuth,
        Feature::Prisma,
        Feature::ReactHookForm,
        Feature::ReactQuery,
    ];

    pub fn all() -> impl Iterator<Item = Feature> {
        Self::SCAFFOLD
            .into_iter()
            .chain(Self::LIBRARIES)
            .chain(std::iter::once(Feature::Shadcn))
    }

    /// camelCase key used in JSON specs and the defaults file.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Typescript => "typescript",
            Feature::Tailwind => "tailwind",
            Feature::Eslint => "eslint",
            Feature::SrcDir => "srcDir",
            Feature::AppRouter => "appRouter",
            Feature::ImportAlias => "importAlias",
            Feature::Turbopack => "turbopack",
            Feature::Redux => "redux",
            Feature::Axios => "axios",
            Feature::NextAuth => "nextAuth",
            Feature::Prisma => "prisma",
            Feature::ReactHookForm => "reactHookForm",
            Feature::ReactQuery => "reactQuery",
            Feature::Shadcn => "shadcn",
        }
    }

    /// kebab-case name used on the command line and in step ids.
    pub fn cli_name(&self) -> String {
        self.key().to_kebab_case()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cli_name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    /// Accepts `react-hook-form`, `reactHookForm` and `react_hook_form`.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_kebab_case();
        Feature::all()
            .find(|f| f.cli_name() == wanted)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "feature",
                    format!("Unknown feature '{}'", s),
                    None,
                    Some(Feature::all().map(|f| f.cli_name()).collect()),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub typescript: bool,
    pub tailwind: bool,
    pub eslint: bool,
    pub src_dir: bool,
    pub app_router: bool,
    pub import_alias: bool,
    pub turbopack: bool,
    pub redux: bool,
    pub axios: bool,
    pub next_auth: bool,
    pub prisma: bool,
    pub react_hook_form: bool,
    pub react_query: bool,
    pub shadcn: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            typescript: true,
            tailwind: true,
            eslint: true,
            src_dir: true,
            app_router: true,
            import_alias: true,
            turbopack: false,
            redux: false,
            axios: false,
            next_auth: false,
            prisma: false,
            react_hook_form: false,
            react_query: false,
            shadcn: false,
        }
    }
}

impl FeatureFlags {
    /// Every flag off.
    pub fn none() -> Self {
        let mut flags = Self::default();
        for feature in Feature::all() {
            flags.set(feature, false);
        }
        flags
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Typescript => self.typescript,
            Feature::Tailwind => self.tailwind,
            Feature::Eslint => self.eslint,
            Feature::SrcDir => self.src_dir,
            Feature::AppRouter => self.app_router,
            Feature::ImportAlias => self.import_alias,
            Feature::Turbopack => self.turbopack,
            Feature::Redux => self.redux,
            Feature::Axios => self.axios,
            Feature::NextAuth => self.next_auth,
            Feature::Prisma => self.prisma,
            Feature::ReactHookForm => self.react_hook_form,
            Feature::ReactQuery => self.react_query,
            Feature::Shadcn => self.shadcn,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        let slot = match feature {
            Feature::Typescript => &mut self.typescript,
            Feature::Tailwind => &mut self.tailwind,
            Feature::Eslint => &mut self.eslint,
            Feature::SrcDir => &mut self.src_dir,
            Feature::AppRouter => &mut self.app_router,
            Feature::ImportAlias => &mut self.import_alias,
            Feature::Turbopack => &mut self.turbopack,
            Feature::Redux => &mut self.redux,
            Feature::Axios => &mut self.axios,
            Feature::NextAuth => &mut self.next_auth,
            Feature::Prisma => &mut self.prisma,
            Feature::ReactHookForm => &mut self.react_hook_form,
            Feature::ReactQuery => &mut self.react_query,
            Feature::Shadcn => &mut self.shadcn,
        };
        *slot = enabled;
    }

    pub fn enabled(&self) -> Vec<Feature> {
        Feature::all().filter(|f| self.is_enabled(*f)).collect()
    }
}

// ============================================================================
// Build steps
// ============================================================================

/// Optional post-scaffold step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    GitInit,
    Build,
    OpenEditor,
    StartDevServer,
    OpenBrowser,
}

impl BuildStep {
    pub const ALL: [BuildStep; 5] = [
        BuildStep::GitInit,
        BuildStep::Build,
        BuildStep::OpenEditor,
        BuildStep::StartDevServer,
        BuildStep::OpenBrowser,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BuildStep::GitInit => "gitInit",
            BuildStep::Build => "build",
            BuildStep::OpenEditor => "openEditor",
            BuildStep::StartDevServer => "startDevServer",
            BuildStep::OpenBrowser => "openBrowser",
        }
    }

    pub fn cli_name(&self) -> String {
        self.key().to_kebab_case()
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cli_name())
    }
}

impl FromStr for BuildStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_kebab_case();
        BuildStep::ALL
            .into_iter()
            .find(|step| step.cli_name() == wanted)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "step",
                    format!("Unknown step '{}'", s),
                    None,
                    Some(BuildStep::ALL.iter().map(|s| s.cli_name()).collect()),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildSteps {
    pub git_init: bool,
    pub build: bool,
    pub open_editor: bool,
    pub start_dev_server: bool,
    pub open_browser: bool,
}

impl Default for BuildSteps {
    fn default() -> Self {
        Self {
            git_init: false,
            build: true,
            open_editor: true,
            start_dev_server: true,
            open_browser: true,
        }
    }
}

impl BuildSteps {
    pub fn none() -> Self {
        Self {
            git_init: false,
            build: false,
            open_editor: false,
            start_dev_server: false,
            open_browser: false,
        }
    }

    pub fn is_enabled(&self, step: BuildStep) -> bool {
        match step {
            BuildStep::GitInit => self.git_init,
            BuildStep::Build => self.build,
            BuildStep::OpenEditor => self.open_editor,
            BuildStep::StartDevServer => self.start_dev_server,
            BuildStep::OpenBrowser => self.open_browser,
        }
    }

    pub fn set(&mut self, step: BuildStep, enabled: bool) {
        let slot = match step {
            BuildStep::GitInit => &mut self.git_init,
            BuildStep::Build => &mut self.build,
            BuildStep::OpenEditor => &mut self.open_editor,
            BuildStep::StartDevServer => &mut self.start_dev_server,
            BuildStep::OpenBrowser => &mut self.open_browser,
        };
        *slot = enabled;
    }
}

// ============================================================================
// shadcn/ui answers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UiStyle {
    #[default]
    Default,
    NewYork,
    Zinc,
    Slate,
    Stone,
    Gray,
}

impl UiStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiStyle::Default => "default",
            UiStyle::NewYork => "new-york",
            UiStyle::Zinc => "zinc",
            UiStyle::Slate => "slate",
            UiStyle::Stone => "stone",
            UiStyle::Gray => "gray",
        }
    }

    /// Palette styles pin the base color to their own palette.
    pub fn forced_color(&self) -> Option<BaseColor> {
        match self {
            UiStyle::Zinc => Some(BaseColor::Zinc),
            UiStyle::Slate => Some(BaseColor::Slate),
            UiStyle::Stone => Some(BaseColor::Stone),
            UiStyle::Gray => Some(BaseColor::Gray),
            UiStyle::Default | UiStyle::NewYork => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaseColor {
    #[default]
    Neutral,
    Gray,
    Zinc,
    Stone,
    Slate,
}

impl BaseColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseColor::Neutral => "neutral",
            BaseColor::Gray => "gray",
            BaseColor::Zinc => "zinc",
            BaseColor::Stone => "stone",
            BaseColor::Slate => "slate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReactCompat {
    #[default]
    Force,
    LegacyPeerDeps,
}

impl ReactCompat {
    /// Menu label answered to shadcn's peer dependency prompt.
    pub fn answer(&self) -> &'static str {
        match self {
            ReactCompat::Force => "Use --force",
            ReactCompat::LegacyPeerDeps => "Use --legacy-peer-deps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiOptions {
    pub style: UiStyle,
    pub base_color: BaseColor,
    pub css_variables: bool,
    pub react_compat: ReactCompat,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            style: UiStyle::Default,
            base_color: BaseColor::Neutral,
            css_variables: true,
            react_compat: ReactCompat::Force,
        }
    }
}

impl UiOptions {
    pub fn effective_color(&self) -> BaseColor {
        self.style.forced_color().unwrap_or(self.base_color)
    }
}

// ============================================================================
// ProjectConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    pub path: PathBuf,
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
}

fn default_import_alias() -> String {
    DEFAULT_IMPORT_ALIAS.to_string()
}

impl ProjectConfig {
    /// Config with the built-in form defaults.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            package_manager: PackageManager::default(),
            features: FeatureFlags::default(),
            import_alias: default_import_alias(),
            steps: BuildSteps::default(),
            ui: UiOptions::default(),
        }
    }

    /// Directory create-next-app runs in.
    pub fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Directory the post-scaffold steps run in.
    pub fn project_dir(&self) -> &Path {
        &self.path
    }

    /// Input checks. Nothing touches the filesystem here.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name".to_string());
        }
        if self.path.as_os_str().is_empty() {
            missing.push("path".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::validation_missing_argument(missing)
                .with_hint("Project name and path are required"));
        }

        let name = self.name.trim();

        let dir_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "path",
                    "Path must end in the project directory",
                    Some(self.path.display().to_string()),
                    None,
                )
            })?;

        if dir_name != name {
            return Err(Error::validation_invalid_argument(
                "path",
                format!(
                    "Project directory '{}' does not match project name '{}'",
                    dir_name, name
                ),
                Some(self.path.display().to_string()),
                None,
            ));
        }

        if self.features.import_alias && self.import_alias.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "importAlias",
                "Import alias cannot be empty when the importAlias feature is on",
                None,
                None,
            ));
        }

        Ok(())
    }

    /// Filesystem checks done before any process is spawned.
    ///
    /// The project directory may exist only if it is an empty directory, and
    /// its parent must be an existing writable directory.
    pub fn check_target(&self) -> Result<()> {
        let target = self.project_dir();
        let shown = target.display().to_string();

        if target.exists() {
            if !target.is_dir() {
                return Err(Error::path_conflict(shown, "a file already exists at this path"));
            }
            let mut entries = fs::read_dir(target).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("read {}", shown)))
            })?;
            if entries.next().is_some() {
                return Err(Error::path_conflict(shown, "directory is not empty"));
            }
        }

        let parent = self.parent_dir();
        if !parent.is_dir() {
            return Err(Error::path_not_writable(
                parent.display().to_string(),
                "parent directory does not exist",
            ));
        }
        if !is_writable(parent) {
            return Err(Error::path_not_writable(
                parent.display().to_string(),
                "parent directory is not writable",
            ));
        }

        Ok(())
    }
}

/// Create and drop a scratch file in `dir`; permission bits alone miss ACLs
/// and read-only mounts.
fn is_writable(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".next-express-")
        .tempfile_in(dir)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn feature_names_parse_in_any_case_style() {
        assert_eq!("react-hook-form".parse::<Feature>().unwrap(), Feature::ReactHookForm);
        assert_eq!("reactHookForm".parse::<Feature>().unwrap(), Feature::ReactHookForm);
        assert_eq!("src_dir".parse::<Feature>().unwrap(), Feature::SrcDir);
        assert!("jquery".parse::<Feature>().is_err());
    }

    #[test]
    fn build_step_names_parse() {
        assert_eq!("git-init".parse::<BuildStep>().unwrap(), BuildStep::GitInit);
        assert_eq!("startDevServer".parse::<BuildStep>().unwrap(), BuildStep::StartDevServer);
    }

    #[test]
    fn feature_flags_set_and_read_back() {
        let mut flags = FeatureFlags::none();
        assert!(flags.enabled().is_empty());

        flags.set(Feature::Prisma, true);
        flags.set(Feature::Typescript, true);
        assert_eq!(flags.enabled(), vec![Feature::Typescript, Feature::Prisma]);
    }

    #[test]
    fn config_deserializes_camel_case_with_defaults() {
        let config: ProjectConfig = serde_json::from_str(
            r#"{"name":"demo","path":"/tmp/demo","packageManager":"pnpm",
                "features":{"reactQuery":true,"eslint":false},
                "steps":{"gitInit":true,"openBrowser":false}}"#,
        )
        .unwrap();

        assert_eq!(config.package_manager, PackageManager::Pnpm);
        assert!(config.features.react_query);
        assert!(!config.features.eslint);
        assert!(config.features.typescript);
        assert!(config.steps.git_init);
        assert!(config.steps.build);
        assert!(!config.steps.open_browser);
        assert_eq!(config.import_alias, "@/*");
    }

    #[test]
    fn validate_rejects_empty_name_and_path() {
        let err = ProjectConfig::new("", "").validate().unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
        assert_eq!(err.details["args"], serde_json::json!(["name", "path"]));
    }

    #[test]
    fn validate_rejects_mismatched_directory_name() {
        let err = ProjectConfig::new("demo", "/tmp/other").validate().unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn validate_accepts_matching_directory_name() {
        assert!(ProjectConfig::new("demo", "/tmp/demo").validate().is_ok());
    }

    #[test]
    fn validate_requires_alias_value_when_enabled() {
        let mut config = ProjectConfig::new("demo", "/tmp/demo");
        config.import_alias = "  ".to_string();
        assert!(config.validate().is_err());

        config.features.import_alias = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn check_target_leaves_no_scratch_file_behind() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::new("demo", tmp.path().join("demo"));
        config.check_target().unwrap();
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn check_target_rejects_read_only_parent() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("locked");
        fs::create_dir(&parent).unwrap();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores the mode bits
        let writable_anyway = fs::write(parent.join("x"), "").is_ok();
        let result = ProjectConfig::new("demo", parent.join("demo")).check_target();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();
        if writable_anyway {
            return;
        }

        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "path.not_writable");
    }

    #[test]
    fn check_target_accepts_missing_and_empty_dirs() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::new("demo", tmp.path().join("demo"));
        assert!(config.check_target().is_ok());

        fs::create_dir(tmp.path().join("demo")).unwrap();
        assert!(config.check_target().is_ok());
    }

    #[test]
    fn check_target_rejects_non_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("demo");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("package.json"), "{}").unwrap();

        let err = ProjectConfig::new("demo", &dir).check_target().unwrap_err();
        assert_eq!(err.code.as_str(), "path.conflict");
    }

    #[test]
    fn check_target_rejects_existing_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("demo");
        fs::write(&file, "").unwrap();

        let err = ProjectConfig::new("demo", &file).check_target().unwrap_err();
        assert_eq!(err.code.as_str(), "path.conflict");
    }

    #[test]
    fn check_target_rejects_missing_parent() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::new("demo", tmp.path().join("nope").join("demo"));
        let err = config.check_target().unwrap_err();
        assert_eq!(err.code.as_str(), "path.not_writable");
    }

    #[test]
    fn ui_palette_style_forces_color() {
        let ui = UiOptions {
            style: UiStyle::Slate,
            base_color: BaseColor::Neutral,
            ..UiOptions::default()
        };
        assert_eq!(ui.effective_color(), BaseColor::Slate);

        let ui = UiOptions {
            style: UiStyle::NewYork,
            base_color: BaseColor::Zinc,
            ..UiOptions::default()
        };
        assert_eq!(ui.effective_color(), BaseColor::Zinc);
    }

    #[test]
    fn package_manager_commands() {
        assert_eq!(
            PackageManager::Npm.add_args(&["axios"]),
            vec!["install", "axios"]
        );
        assert_eq!(
            PackageManager::Yarn.add_args(&["@reduxjs/toolkit", "react-redux"]),
            vec!["add", "@reduxjs/toolkit", "react-redux"]
        );
        assert_eq!(
            PackageManager::Yarn.add_dev_args(&["clsx"]),
            vec!["add", "-D", "clsx"]
        );
        assert_eq!(
            PackageManager::Npm.add_dev_args(&["clsx"]),
            vec!["install", "--save-dev", "clsx"]
        );
        assert_eq!(PackageManager::Npm.run_script_args("build"), vec!["run", "build"]);
        assert_eq!(PackageManager::Pnpm.run_script_args("dev"), vec!["dev"]);
        assert_eq!("PNPM".parse::<PackageManager>().unwrap(), PackageManager::Pnpm);
    }
}
