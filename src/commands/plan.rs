use clap::Args;
use serde::Serialize;

use next_express::defaults;
use next_express::project::ProjectConfig;
use next_express::steps::{self, StepPlan};

use super::create::ProjectArgs;
use super::CmdResult;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    command: String,
    config: ProjectConfig,
    #[serde(flatten)]
    plan: StepPlan,
    /// Problem with the target directory, if any; a create would stop here.
    #[serde(skip_serializing_if = "Option::is_none")]
    target_problem: Option<String>,
}

pub fn run(args: PlanArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<PlanOutput> {
    let defaults = defaults::load_defaults();
    let config = args.project.resolve(&defaults)?;
    config.validate()?;

    let plan = steps::plan(&config, &defaults);
    let target_problem = config.check_target().err().map(|e| e.message);

    Ok((
        PlanOutput {
            command: "plan".to_string(),
            config,
            plan,
            target_problem,
        },
        0,
    ))
}
