//! Step list construction.
//!
//! Order is fixed: scaffold, one install per library feature, shadcn/ui
//! base packages and init, git init, build, editor, dev server, browser.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::defaults::Defaults;
use crate::project::{Feature, ProjectConfig};
use crate::scaffold;
use crate::utils::shell;
use crate::utils::template::TemplateVars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    Scaffold,
    Install,
    UiSetup,
    GitInit,
    Build,
    OpenEditor,
    DevServer,
    OpenBrowser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl StepCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Shell-quoted command line, for logs and error details.
    pub fn display(&self) -> String {
        shell::join_command(&self.program, &self.args)
    }
}

/// Text to watch for in a step's output and the line to answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum StepMode {
    /// Run to completion.
    Wait,
    /// Run to completion, answering interactive prompts on stdin.
    #[serde(rename_all = "camelCase")]
    Prompted { responses: Vec<PromptResponse> },
    /// Start, wait for a readiness line, leave running.
    #[serde(rename_all = "camelCase")]
    Background {
        ready_patterns: Vec<String>,
        ready_timeout_secs: u64,
        default_port: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub label: String,
    pub command: StepCommand,
    #[serde(flatten)]
    pub mode: StepMode,
}

impl Step {
    fn new(id: impl Into<String>, kind: StepKind, label: impl Into<String>, command: StepCommand) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            command,
            mode: StepMode::Wait,
        }
    }

    fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPlan {
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl StepPlan {
    pub fn ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.kind).collect()
    }
}

/// npm packages installed for a library feature.
pub fn library_packages(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Redux => &["@reduxjs/toolkit", "react-redux"],
        Feature::Axios => &["axios"],
        Feature::NextAuth => &["next-auth"],
        Feature::Prisma => &["@prisma/client", "prisma"],
        Feature::ReactHookForm => &["react-hook-form"],
        Feature::ReactQuery => &["@tanstack/react-query"],
        _ => &[],
    }
}

/// Dev dependencies the shadcn/ui components import, installed before `init`.
pub const UI_BASE_PACKAGES: &[&str] = &[
    "@radix-ui/react-icons",
    "@radix-ui/react-slot",
    "class-variance-authority",
    "clsx",
    "tailwind-merge",
    "lucide-react",
    "tailwindcss-animate",
];

fn library_label(feature: Feature) -> &'static str {
    match feature {
        Feature::Redux => "Redux Toolkit",
        Feature::Axios => "Axios",
        Feature::NextAuth => "NextAuth.js",
        Feature::Prisma => "Prisma ORM",
        Feature::ReactHookForm => "React Hook Form",
        Feature::ReactQuery => "React Query",
        _ => "library",
    }
}

/// OS opener for a URL; the URL is left as a `{{url}}` placeholder.
pub fn browser_command(cwd: PathBuf) -> StepCommand {
    let url = format!("{{{{{}}}}}", TemplateVars::URL);

    #[cfg(target_os = "macos")]
    let (program, args) = ("open", vec![url]);

    #[cfg(windows)]
    let (program, args) = ("cmd", vec!["/C".to_string(), "start".to_string(), String::new(), url]);

    #[cfg(not(any(target_os = "macos", windows)))]
    let (program, args) = ("xdg-open", vec![url]);

    StepCommand::new(program, args, cwd)
}

fn shadcn_responses(config: &ProjectConfig) -> Vec<PromptResponse> {
    let ui = &config.ui;
    let answer = |prompt: &str, answer: &str| PromptResponse {
        prompt: prompt.to_string(),
        answer: answer.to_string(),
    };

    vec![
        answer("Which style would you like to use?", ui.style.as_str()),
        answer(
            "Which color would you like to use as the base color?",
            ui.effective_color().as_str(),
        ),
        answer(
            "Would you like to use CSS variables for theming?",
            if ui.css_variables { "yes" } else { "no" },
        ),
        answer("How would you like to proceed?", ui.react_compat.answer()),
    ]
}

/// Build the ordered step list for a config.
pub fn plan(config: &ProjectConfig, defaults: &Defaults) -> StepPlan {
    let pm = config.package_manager;
    let project_dir = config.project_dir().to_path_buf();
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    let scaffold_settings = &defaults.scaffold;
    steps.push(Step::new(
        "scaffold",
        StepKind::Scaffold,
        "Create Next.js app",
        StepCommand::new(
            scaffold_settings.runner.clone(),
            scaffold::args(config, &scaffold_settings.runner_args, &scaffold_settings.package),
            config.parent_dir(),
        )
        .with_env(&scaffold_settings.env),
    ));

    for feature in Feature::LIBRARIES {
        if !config.features.is_enabled(feature) {
            continue;
        }
        steps.push(Step::new(
            format!("install-{}", feature.cli_name()),
            StepKind::Install,
            format!("Install {}", library_label(feature)),
            StepCommand::new(pm.program(), pm.add_args(library_packages(feature)), &project_dir),
        ));
    }

    if config.features.shadcn {
        let shadcn = &defaults.shadcn;
        steps.push(Step::new(
            "ui-deps",
            StepKind::Install,
            "Install shadcn/ui base packages",
            StepCommand::new(pm.program(), pm.add_dev_args(UI_BASE_PACKAGES), &project_dir),
        ));
        steps.push(
            Step::new(
                "ui-setup",
                StepKind::UiSetup,
                "Initialize shadcn/ui",
                StepCommand::new(shadcn.runner.clone(), shadcn.args.clone(), &project_dir)
                    .with_env(&shadcn.env),
            )
            .with_mode(StepMode::Prompted {
                responses: shadcn_responses(config),
            }),
        );
    }

    if config.steps.git_init {
        steps.push(Step::new(
            "git-init",
            StepKind::GitInit,
            "Initialize Git repository",
            StepCommand::new("git", vec!["init".to_string()], &project_dir),
        ));
    }

    if config.steps.build {
        steps.push(Step::new(
            "build",
            StepKind::Build,
            "Build project",
            StepCommand::new(pm.program(), pm.run_script_args("build"), &project_dir),
        ));
    }

    if config.steps.open_editor {
        let editor = &defaults.editor;
        steps.push(Step::new(
            "open-editor",
            StepKind::OpenEditor,
            format!("Open in {}", editor.command),
            StepCommand::new(editor.command.clone(), editor.args.clone(), &project_dir),
        ));
    }

    if config.steps.start_dev_server {
        let dev = &defaults.dev_server;
        steps.push(
            Step::new(
                "dev-server",
                StepKind::DevServer,
                "Start development server",
                StepCommand::new(pm.program(), pm.run_script_args(&dev.script), &project_dir),
            )
            .with_mode(StepMode::Background {
                ready_patterns: dev.ready_patterns.clone(),
                ready_timeout_secs: dev.ready_timeout_secs,
                default_port: dev.default_port,
            }),
        );
    }

    if config.steps.open_browser {
        if config.steps.start_dev_server {
            steps.push(Step::new(
                "open-browser",
                StepKind::OpenBrowser,
                "Open in browser",
                browser_command(project_dir.clone()),
            ));
        } else {
            warnings.push(
                "openBrowser needs startDevServer; the browser step was left out".to_string(),
            );
        }
    }

    StepPlan { steps, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{BuildSteps, FeatureFlags, PackageManager};

    fn config() -> ProjectConfig {
        ProjectConfig::new("demo", "/tmp/demo")
    }

    #[test]
    fn scaffold_always_comes_first() {
        let mut config = config();
        config.features = FeatureFlags::none();
        config.steps = BuildSteps::none();

        let plan = plan(&config, &Defaults::default());
        assert_eq!(plan.ids(), vec!["scaffold"]);

        let scaffold = &plan.steps[0];
        assert_eq!(scaffold.command.program, "npx");
        assert_eq!(scaffold.command.cwd, PathBuf::from("/tmp"));
        assert_eq!(scaffold.command.env.get("CI").map(String::as_str), Some("true"));
        assert!(scaffold.command.args.contains(&"demo".to_string()));
    }

    #[test]
    fn demo_typescript_tailwind_npm_scaffold_command() {
        let mut config = config();
        config.features = FeatureFlags::none();
        config.features.typescript = true;
        config.features.tailwind = true;
        config.steps = BuildSteps::none();

        let line = plan(&config, &Defaults::default()).steps[0].command.display();
        assert!(line.starts_with("npx --yes create-next-app@latest demo --typescript --tailwind"));
        assert!(line.ends_with("--use-npm"));
    }

    #[test]
    fn git_init_without_build_skips_build_step() {
        let mut config = config();
        config.features.redux = true;
        config.features.axios = true;
        config.steps = BuildSteps {
            git_init: true,
            build: false,
            open_editor: true,
            start_dev_server: true,
            open_browser: true,
        };

        let plan = plan(&config, &Defaults::default());
        assert_eq!(
            plan.ids(),
            vec![
                "scaffold",
                "install-redux",
                "install-axios",
                "git-init",
                "open-editor",
                "dev-server",
                "open-browser"
            ]
        );
        assert!(!plan.kinds().contains(&StepKind::Build));
    }

    #[test]
    fn full_plan_follows_fixed_order() {
        let mut config = config();
        for feature in Feature::LIBRARIES {
            config.features.set(feature, true);
        }
        config.features.shadcn = true;
        config.steps.git_init = true;

        let plan = plan(&config, &Defaults::default());
        assert_eq!(
            plan.kinds(),
            vec![
                StepKind::Scaffold,
                StepKind::Install,
                StepKind::Install,
                StepKind::Install,
                StepKind::Install,
                StepKind::Install,
                StepKind::Install,
                StepKind::Install,
                StepKind::UiSetup,
                StepKind::GitInit,
                StepKind::Build,
                StepKind::OpenEditor,
                StepKind::DevServer,
                StepKind::OpenBrowser,
            ]
        );
        assert_eq!(plan.steps[4].id, "install-prisma");
        assert_eq!(plan.steps[5].id, "install-react-hook-form");
        assert_eq!(plan.steps[7].id, "ui-deps");
        assert_eq!(plan.steps[8].id, "ui-setup");
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn install_steps_use_package_manager_verbs() {
        let mut config = config();
        config.package_manager = PackageManager::Pnpm;
        config.features.react_query = true;
        config.steps = BuildSteps::none();

        let plan = plan(&config, &Defaults::default());
        let install = &plan.steps[1];
        assert_eq!(install.command.program, "pnpm");
        assert_eq!(install.command.args, vec!["add", "@tanstack/react-query"]);
        assert_eq!(install.command.cwd, PathBuf::from("/tmp/demo"));
    }

    #[test]
    fn browser_without_dev_server_is_dropped_with_warning() {
        let mut config = config();
        config.steps = BuildSteps::none();
        config.steps.open_browser = true;

        let plan = plan(&config, &Defaults::default());
        assert_eq!(plan.ids(), vec!["scaffold"]);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn dev_server_runs_in_background_mode() {
        let mut config = config();
        config.package_manager = PackageManager::Yarn;
        config.steps = BuildSteps::none();
        config.steps.start_dev_server = true;

        let plan = plan(&config, &Defaults::default());
        let dev = &plan.steps[1];
        assert_eq!(dev.command.display(), "yarn dev");
        match &dev.mode {
            StepMode::Background { default_port, ready_patterns, .. } => {
                assert_eq!(*default_port, 3000);
                assert!(ready_patterns.iter().any(|p| p == "Local:"));
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn shadcn_step_answers_prompts_from_ui_options() {
        let mut config = config();
        config.features.shadcn = true;
        config.steps = BuildSteps::none();
        config.ui.style = crate::project::UiStyle::Stone;
        config.ui.css_variables = false;

        config.package_manager = PackageManager::Pnpm;

        let plan = plan(&config, &Defaults::default());
        assert_eq!(plan.ids(), vec!["scaffold", "ui-deps", "ui-setup"]);

        let deps = &plan.steps[1];
        assert_eq!(deps.command.program, "pnpm");
        assert_eq!(&deps.command.args[..2], ["add", "-D"]);
        assert!(deps.command.args.iter().any(|a| a == "tailwindcss-animate"));
        assert_eq!(deps.command.args.len(), 2 + UI_BASE_PACKAGES.len());

        let ui = &plan.steps[2];
        assert_eq!(ui.command.env.get("NPM_CONFIG_LEGACY_PEER_DEPS").map(String::as_str), Some("true"));
        let StepMode::Prompted { responses } = &ui.mode else {
            panic!("shadcn step should answer prompts");
        };
        assert_eq!(responses[0].answer, "stone");
        assert_eq!(responses[1].answer, "stone");
        assert_eq!(responses[2].answer, "no");
        assert_eq!(responses[3].answer, "Use --force");
    }
}
