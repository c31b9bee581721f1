//! Tool availability check run before any step.

use semver::{Version, VersionReq};
use serde::Serialize;

use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::project::ProjectConfig;
use crate::sequencer::StepExecutor;
use crate::utils::parser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReport {
    pub tool: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
}

/// Programs a run of `config` will invoke, in check order, without duplicates.
pub fn required_tools(config: &ProjectConfig, defaults: &Defaults) -> Vec<String> {
    let mut tools = vec!["node".to_string()];
    let mut add = |tool: &str| {
        if !tools.iter().any(|t| t == tool) {
            tools.push(tool.to_string());
        }
    };

    add(&defaults.scaffold.runner);
    add(config.package_manager.program());
    if config.features.shadcn {
        add(&defaults.shadcn.runner);
    }
    if config.steps.git_init {
        add("git");
    }
    tools
}

fn node_requirement(defaults: &Defaults) -> Result<VersionReq> {
    let raw = &defaults.preflight.node_version;
    VersionReq::parse(raw).map_err(|e| {
        Error::config_invalid_value(
            "defaults.preflight.nodeVersion",
            Some(raw.clone()),
            e.to_string(),
        )
    })
}

fn inspect<E: StepExecutor + ?Sized>(executor: &E, tool: &str, node_req: &VersionReq) -> ToolReport {
    let output = executor.probe(tool, &["--version"]);
    let version = output.as_deref().and_then(parser::extract_version);

    let mut report = ToolReport {
        tool: tool.to_string(),
        ok: output.is_some(),
        version,
        required: None,
    };

    if tool == "node" {
        report.required = Some(node_req.to_string());
        if report.ok {
            report.ok = report
                .version
                .as_deref()
                .and_then(|v| Version::parse(v).ok())
                .is_some_and(|v| node_req.matches(&v));
        }
    }

    report
}

/// Probe every required tool and report each one, passing or not.
pub fn report<E: StepExecutor + ?Sized>(
    executor: &E,
    config: &ProjectConfig,
    defaults: &Defaults,
) -> Result<Vec<ToolReport>> {
    let node_req = node_requirement(defaults)?;
    Ok(required_tools(config, defaults)
        .iter()
        .map(|tool| inspect(executor, tool, &node_req))
        .collect())
}

/// Like [`report`], but fails on the first tool that is missing or too old.
pub fn check<E: StepExecutor + ?Sized>(
    executor: &E,
    config: &ProjectConfig,
    defaults: &Defaults,
) -> Result<Vec<ToolReport>> {
    let reports = report(executor, config, defaults)?;

    if let Some(bad) = reports.iter().find(|r| !r.ok) {
        let found = if bad.required.is_some() { bad.version.clone() } else { None };
        let required = if found.is_some() { bad.required.clone() } else { None };
        return Err(Error::preflight_tool_missing(&bad.tool, found, required));
    }

    Ok(reports)
}
