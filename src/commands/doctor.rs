use clap::Args;
use serde::Serialize;

use next_express::defaults;
use next_express::log_status;
use next_express::preflight::{self, ToolReport};
use next_express::process::ProcessExecutor;
use next_express::project::PackageManager;

use super::CmdResult;

#[derive(Args)]
pub struct DoctorArgs {
    /// Package manager to check (default: from defaults)
    #[arg(long = "pm", value_name = "PM")]
    pub package_manager: Option<String>,

    /// Also check for git
    #[arg(long)]
    pub git: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorOutput {
    command: String,
    ok: bool,
    tools: Vec<ToolReport>,
}

pub fn run(args: DoctorArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<DoctorOutput> {
    let defaults = defaults::load_defaults();
    let mut config = defaults.project_config("", "");
    if let Some(pm) = &args.package_manager {
        config.package_manager = pm.parse::<PackageManager>()?;
    }
    config.steps.git_init |= args.git;

    let tools = preflight::report(&ProcessExecutor, &config, &defaults)?;
    let ok = tools.iter().all(|t| t.ok);
    log_status!(
        "doctor",
        "{} of {} tools ready",
        tools.iter().filter(|t| t.ok).count(),
        tools.len()
    );

    Ok((
        DoctorOutput {
            command: "doctor".to_string(),
            ok,
            tools,
        },
        if ok { 0 } else { 20 },
    ))
}
