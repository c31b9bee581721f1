use serde_json::Value;
use std::io::Read;
use std::path::Path;

use next_express::process::DevServer;

pub type CmdResult<T> = next_express::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

// ============================================================================
// JSON Input Parsing (CLI layer)
// ============================================================================

/// Read JSON spec from string, file (@path), or stdin (-).
fn read_json_spec_to_string(spec: &str) -> next_express::Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(next_express::Error::validation_invalid_argument(
                "json",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin.read_to_string(&mut buf).map_err(|e| {
            next_express::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
        })?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(next_express::Error::validation_invalid_argument(
                "json",
                "Invalid JSON spec '@' (missing file path)",
                None,
                None,
            ));
        }
        return std::fs::read_to_string(Path::new(path)).map_err(|e| {
            next_express::Error::internal_io(e.to_string(), Some(format!("read {}", path)))
        });
    }

    Ok(spec.to_string())
}

/// Parse a JSON spec given inline, as `@file`, or `-` for stdin.
pub fn parse_json_spec(spec: &str) -> next_express::Result<Value> {
    let raw = read_json_spec_to_string(spec)?;
    serde_json::from_str(&raw).map_err(|e| {
        next_express::Error::validation_invalid_json(
            e,
            Some("parse JSON spec".to_string()),
            Some(raw.chars().take(200).collect::<String>()),
        )
    })
}

pub mod config;
pub mod create;
pub mod doctor;
pub mod plan;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {{
        let (json, code) = crate::output::map_cmd_result_to_json($module::run($args, $global));
        (json, code, None)
    }};
}

/// JSON result, exit code, and a dev server left running by `create`.
pub(crate) type Dispatched = (next_express::Result<Value>, i32, Option<DevServer>);

pub(crate) fn run_json(command: crate::Commands, global: &GlobalArgs) -> Dispatched {
    match command {
        crate::Commands::Create(args) => {
            let mut result = create::run(args, global);
            let server = result
                .as_mut()
                .ok()
                .and_then(|(output, _)| output.report.dev_server.take());
            let (json, code) = crate::output::map_cmd_result_to_json(result);
            (json, code, server)
        }
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Doctor(args) => dispatch!(args, global, doctor),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
