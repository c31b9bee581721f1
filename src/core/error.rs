use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,

    PathConflict,
    PathNotWritable,

    ProcessSpawnFailed,
    ProcessExitFailed,

    PreflightToolMissing,

    SequenceInFlight,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::PathConflict => "path.conflict",
            ErrorCode::PathNotWritable => "path.not_writable",

            ErrorCode::ProcessSpawnFailed => "process.spawn_failed",
            ErrorCode::ProcessExitFailed => "process.exit_failed",

            ErrorCode::PreflightToolMissing => "preflight.tool_missing",

            ErrorCode::SequenceInFlight => "sequence.in_flight",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpawnFailedDetails {
    pub step_id: String,
    pub program: String,
    pub error: String,
}

/// Failing step of a sequence, with everything it printed before exiting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessExitFailedDetails {
    pub step_id: String,
    pub command: String,
    pub exit_code: i32,
    pub output: String,
    pub completed_steps: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMissingDetails {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(
        err: serde_json::Error,
        context: Option<String>,
        excerpt: Option<String>,
    ) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
            "excerpt": excerpt,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn path_conflict(path: impl Into<String>, problem: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(PathDetails {
            path: path.clone(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::PathConflict,
            format!("Target path '{}' is not available", path),
            details,
        )
        .with_hint("Choose a new directory, or empty the existing one")
    }

    pub fn path_not_writable(path: impl Into<String>, problem: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(PathDetails {
            path: path.clone(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::PathNotWritable,
            format!("Cannot create a project under '{}'", path),
            details,
        )
    }

    pub fn process_spawn_failed(
        step_id: impl Into<String>,
        program: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let program = program.into();
        let details = to_details(ProcessSpawnFailedDetails {
            step_id: step_id.into(),
            program: program.clone(),
            error: error.into(),
        });

        Self::new(
            ErrorCode::ProcessSpawnFailed,
            format!("Failed to start '{}'", program),
            details,
        )
        .with_hint(format!("Check that '{}' is installed and on PATH", program))
    }

    pub fn process_exit_failed(details: ProcessExitFailedDetails) -> Self {
        let message = format!(
            "Step '{}' failed with exit code {}",
            details.step_id, details.exit_code
        );

        // The scaffold already wrote the directory; rerunning hits path.conflict.
        Self::new(ErrorCode::ProcessExitFailed, message, to_details(details)).with_retryable(false)
    }

    pub fn preflight_tool_missing(
        tool: impl Into<String>,
        found: Option<String>,
        required: Option<String>,
    ) -> Self {
        let tool = tool.into();
        let message = match (&found, &required) {
            (Some(found), Some(required)) => {
                format!("{} {} is too old (requires {})", tool, found, required)
            }
            _ => format!("Required tool '{}' was not found", tool),
        };
        let details = to_details(ToolMissingDetails {
            tool: tool.clone(),
            found,
            required,
        });

        Self::new(ErrorCode::PreflightToolMissing, message, details)
            .with_hint("Install Node.js (https://nodejs.org/) and the selected package manager")
            .with_hint("Run 'next-express doctor' to see every tool check")
    }

    pub fn sequence_in_flight() -> Self {
        Self::new(
            ErrorCode::SequenceInFlight,
            "A project is already being created by this sequencer",
            Value::Object(serde_json::Map::new()),
        )
        .with_retryable(true)
        .with_hint("Retry once the current run has finished")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_exit_failed_carries_command_and_output() {
        let err = Error::process_exit_failed(ProcessExitFailedDetails {
            step_id: "build".to_string(),
            command: "npm run build".to_string(),
            exit_code: 2,
            output: "Type error".to_string(),
            completed_steps: vec!["scaffold".to_string()],
        });

        assert_eq!(err.code.as_str(), "process.exit_failed");
        assert_eq!(err.details["command"], "npm run build");
        assert_eq!(err.details["exitCode"], 2);
        assert_eq!(err.details["output"], "Type error");
        assert!(err.message.contains("build"));
        assert_eq!(err.retryable, Some(false));
    }

    #[test]
    fn path_conflict_includes_hint() {
        let err = Error::path_conflict("/tmp/demo", "directory is not empty");
        assert_eq!(err.code, ErrorCode::PathConflict);
        assert_eq!(err.details["path"], "/tmp/demo");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn preflight_message_mentions_version_when_known() {
        let err = Error::preflight_tool_missing(
            "node",
            Some("16.0.0".to_string()),
            Some(">=18.18.0".to_string()),
        );
        assert!(err.message.contains("16.0.0"));

        let err = Error::preflight_tool_missing("pnpm", None, None);
        assert!(err.message.contains("'pnpm'"));
    }
}
