use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use next_express::defaults::{self, Defaults, NextExpressConfig};
use next_express::utils::json;
use next_express::Error;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore next-express.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Set a configuration value at a JSON pointer path
    Set {
        /// JSON pointer path (e.g., /defaults/packageManager)
        pointer: String,
        /// Value to set (JSON)
        value: String,
    },
    /// Remove a configuration value at a JSON pointer path
    Remove {
        /// JSON pointer path (e.g., /defaults/editor)
        pointer: String,
    },
    /// Reset configuration to built-in defaults (deletes next-express.json)
    Reset,
    /// Show the path to next-express.json
    Path,
}

#[derive(Debug, Serialize, Default)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<NextExpressConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin),
        ConfigCommand::Set { pointer, value } => set(&pointer, &value),
        ConfigCommand::Remove { pointer } => remove(&pointer),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool) -> CmdResult<ConfigOutput> {
    let output = if builtin {
        ConfigOutput {
            command: "config.show".to_string(),
            defaults: Some(defaults::builtin_defaults()),
            ..ConfigOutput::default()
        }
    } else {
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(defaults::load_config()),
            ..ConfigOutput::default()
        }
    };
    Ok((output, 0))
}

/// Apply `edit` to the config as JSON and save it if it still deserializes.
fn edit_config(
    edit: impl FnOnce(&mut Value) -> next_express::Result<()>,
) -> next_express::Result<NextExpressConfig> {
    let config = defaults::load_config();
    let mut config_json = serde_json::to_value(&config).map_err(|e| {
        Error::internal_unexpected(format!("Failed to serialize config: {}", e))
    })?;

    edit(&mut config_json)?;

    let config: NextExpressConfig = serde_json::from_value(config_json).map_err(|e| {
        Error::validation_invalid_json(e, Some("deserialize config".to_string()), None)
    })?;
    defaults::save_config(&config)?;
    Ok(config)
}

fn set(pointer: &str, value_str: &str) -> CmdResult<ConfigOutput> {
    let value: Value = serde_json::from_str(value_str).map_err(|e| {
        Error::validation_invalid_json(
            e,
            Some("parse value".to_string()),
            Some(value_str.chars().take(200).collect::<String>()),
        )
    })?;

    let config = edit_config(|doc| json::set_json_pointer(doc, pointer, value.clone()))?;

    Ok((
        ConfigOutput {
            command: "config.set".to_string(),
            config: Some(config),
            pointer: Some(pointer.to_string()),
            value: Some(value),
            ..ConfigOutput::default()
        },
        0,
    ))
}

fn remove(pointer: &str) -> CmdResult<ConfigOutput> {
    let config = edit_config(|doc| json::remove_json_pointer(doc, pointer))?;

    Ok((
        ConfigOutput {
            command: "config.remove".to_string(),
            config: Some(config),
            pointer: Some(pointer.to_string()),
            ..ConfigOutput::default()
        },
        0,
    ))
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = defaults::reset_config()?;

    Ok((
        ConfigOutput {
            command: "config.reset".to_string(),
            defaults: Some(defaults::builtin_defaults()),
            path: Some(defaults::config_path()?),
            deleted: Some(deleted),
            ..ConfigOutput::default()
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
            ..ConfigOutput::default()
        },
        0,
    ))
}
