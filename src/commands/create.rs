use clap::Args;
use serde::Serialize;

use next_express::defaults::{self, Defaults};
use next_express::log::RunLog;
use next_express::process::{DevServer, ProcessExecutor};
use next_express::project::{BuildStep, Feature, PackageManager, ProjectConfig};
use next_express::utils::json;
use next_express::{log_status, paths, Error, RunReport, Sequencer};

use super::{parse_json_spec, CmdResult};

/// Project selection shared by `create` and `plan`.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    /// Project name, also used as the directory name
    pub name: Option<String>,

    /// Directory the project is created in (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub parent: Option<String>,

    /// Package manager: npm, yarn or pnpm
    #[arg(long = "pm", value_name = "PM")]
    pub package_manager: Option<String>,

    /// Turn a feature on (repeatable), e.g. --with redux --with shadcn
    #[arg(long = "with", value_name = "FEATURE")]
    pub with: Vec<String>,

    /// Turn a feature off (repeatable), e.g. --without eslint
    #[arg(long = "without", value_name = "FEATURE")]
    pub without: Vec<String>,

    /// Turn a post-scaffold step on (repeatable), e.g. --step git-init
    #[arg(long = "step", value_name = "STEP")]
    pub step: Vec<String>,

    /// Turn a post-scaffold step off (repeatable), e.g. --skip open-browser
    #[arg(long = "skip", value_name = "STEP")]
    pub skip: Vec<String>,

    /// Import alias passed to create-next-app
    #[arg(long, value_name = "ALIAS")]
    pub import_alias: Option<String>,

    /// Project config as JSON (supports @file and - for stdin). Flags win.
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,
}

impl ProjectArgs {
    /// Build a config: defaults, then the JSON spec, then flags.
    pub fn resolve(&self, defaults: &Defaults) -> next_express::Result<ProjectConfig> {
        let seed = defaults.project_config("", "");
        let mut doc = serde_json::to_value(&seed).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize project config".to_string()))
        })?;

        let mut path_from_spec = false;
        if let Some(spec) = &self.json {
            let patch = parse_json_spec(spec)?;
            path_from_spec = patch.get("path").is_some_and(|p| !p.is_null());
            json::json_merge_patch(&mut doc, patch);
        }

        let mut config: ProjectConfig = serde_json::from_value(doc).map_err(|e| {
            Error::validation_invalid_json(e, Some("parse project config".to_string()), None)
        })?;

        if let Some(name) = &self.name {
            config.name = name.trim().to_string();
        }

        if path_from_spec && self.name.is_none() && self.parent.is_none() {
            let raw = config.path.to_string_lossy().to_string();
            config.path = paths::absolutize(&paths::expand(&raw)?)?;
        } else if !config.name.trim().is_empty() {
            let parent = paths::expand(self.parent.as_deref().unwrap_or("."))?;
            config.path = paths::absolutize(&parent)?.join(config.name.trim());
        }

        if let Some(pm) = &self.package_manager {
            config.package_manager = pm.parse::<PackageManager>()?;
        }
        for raw in &self.with {
            config.features.set(raw.parse::<Feature>()?, true);
        }
        for raw in &self.without {
            config.features.set(raw.parse::<Feature>()?, false);
        }
        for raw in &self.step {
            config.steps.set(raw.parse::<BuildStep>()?, true);
        }
        for raw in &self.skip {
            config.steps.set(raw.parse::<BuildStep>()?, false);
        }
        if let Some(alias) = &self.import_alias {
            config.import_alias = alias.clone();
        }

        Ok(config)
    }
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Do not check for node, the package manager and git first
    #[arg(long)]
    pub skip_preflight: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutput {
    command: String,
    config: ProjectConfig,
    pub report: RunReport,
}

pub fn run(args: CreateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<CreateOutput> {
    let defaults = defaults::load_defaults();
    let config = args.project.resolve(&defaults)?;

    log_status!(
        "create",
        "Creating {} with {} in {}",
        config.name,
        config.package_manager,
        config.parent_dir().display()
    );

    let sequencer = Sequencer::new(ProcessExecutor, defaults).skip_preflight(args.skip_preflight);
    let mut log = RunLog::terminal();
    let report = sequencer.run(&config, &mut log)?;

    Ok((
        CreateOutput {
            command: "create".to_string(),
            config,
            report,
        },
        0,
    ))
}

/// Stream dev server output until it exits (or the user interrupts).
pub fn follow(mut server: DevServer) -> i32 {
    log_status!("create", "Following dev server at {} (Ctrl-C to stop)", server.url());
    let mut log = RunLog::terminal();

    // The server runs in its own process group, so Ctrl-C has to be forwarded.
    let handle = server.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        if let Err(err) = handle.stop() {
            log_status!("create", "Could not stop dev server: {}", err.message);
        }
    }) {
        log.warn(format!("Ctrl-C will not stop the dev server: {}", e));
    }

    match server.follow(&mut log) {
        Ok(code) => code,
        Err(err) => {
            log.error(err.message);
            1
        }
    }
}
