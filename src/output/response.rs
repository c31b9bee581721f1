//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use next_express::error::Hint;
use next_express::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
                retryable: err.retryable,
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print the envelope for a command result on stdout.
pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::ValidationInvalidJson => 2,

        ErrorCode::PathConflict | ErrorCode::PathNotWritable => 3,

        ErrorCode::ProcessSpawnFailed
        | ErrorCode::ProcessExitFailed
        | ErrorCode::PreflightToolMissing => 20,

        ErrorCode::SequenceInFlight
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_carries_code_and_hints() {
        let err = Error::path_conflict("/tmp/demo", "directory is not empty");
        let json = serde_json::to_value(CliResponse::<()>::from_error(&err)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "path.conflict");
        assert_eq!(json["error"]["details"]["path"], "/tmp/demo");
        assert!(json["error"]["hints"].is_array());
        assert!(json.get("data").is_none());
        assert!(json["error"].get("retryable").is_none());
    }

    #[test]
    fn error_envelope_carries_retryable_when_known() {
        let json = serde_json::to_value(CliResponse::<()>::from_error(&Error::sequence_in_flight()))
            .unwrap();
        assert_eq!(json["error"]["code"], "sequence.in_flight");
        assert_eq!(json["error"]["retryable"], true);
    }

    #[test]
    fn exit_codes_group_by_failure_kind() {
        assert_eq!(exit_code_for_error(ErrorCode::ValidationMissingArgument), 2);
        assert_eq!(exit_code_for_error(ErrorCode::PathNotWritable), 3);
        assert_eq!(exit_code_for_error(ErrorCode::ProcessExitFailed), 20);
        assert_eq!(exit_code_for_error(ErrorCode::PreflightToolMissing), 20);
        assert_eq!(exit_code_for_error(ErrorCode::SequenceInFlight), 1);
    }

    #[test]
    fn map_result_keeps_success_exit_code() {
        let (value, code) = map_cmd_result_to_json(Ok((serde_json::json!({"ok": true}), 0)));
        assert_eq!(code, 0);
        assert_eq!(value.unwrap()["ok"], true);

        let (value, code) =
            map_cmd_result_to_json::<()>(Err(Error::process_spawn_failed("scaffold", "npx", "not found")));
        assert_eq!(code, 20);
        assert!(value.is_err());
    }
}
