//! Child process plumbing: spawn, stream output into the run log, answer
//! prompts, and keep long-running servers alive.

use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::log::RunLog;
use crate::sequencer::{BackgroundOutcome, StepExecutor};
use crate::steps::{PromptResponse, Step, StepCommand, StepMode};
use crate::utils::parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A chunk of child output. `complete` is false for a trailing fragment
/// still waiting on its newline (typically an interactive prompt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub success: bool,
}

fn pump<R: Read + Send + 'static>(mut reader: R, stream: Stream, tx: Sender<OutputLine>) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        let mut pending: Vec<u8> = Vec::new();

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            pending.extend_from_slice(&buf[..n]);

            while let Some(pos) = pending.iter().position(|b| *b == b'\n' || *b == b'\r') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
                let out = OutputLine { stream, text, complete: true };
                if tx.send(out).is_err() {
                    return;
                }
            }

            if !pending.is_empty() {
                let text = String::from_utf8_lossy(&pending).into_owned();
                let out = OutputLine { stream, text, complete: false };
                if tx.send(out).is_err() {
                    return;
                }
            }
        }

        if !pending.is_empty() {
            let text = String::from_utf8_lossy(&pending).into_owned();
            let _ = tx.send(OutputLine { stream, text, complete: true });
        }
    });
}

/// `Command` for a program that may be a `.cmd` shim on Windows
/// (`npm`, `npx`, `pnpm`, `code`), which `CreateProcess` cannot start directly.
pub fn command_for(program: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", program]);
        cmd
    }

    #[cfg(not(windows))]
    {
        Command::new(program)
    }
}

/// Spawn with piped output. With `own_group` the child leads a new process
/// group on unix, so everything it forks can be stopped together.
fn spawn(
    step_id: &str,
    cmd: &StepCommand,
    stdin: Stdio,
    own_group: bool,
) -> Result<(Child, Receiver<OutputLine>)> {
    let mut command = command_for(&cmd.program);
    command
        .args(&cmd.args)
        .current_dir(&cmd.cwd)
        .envs(&cmd.env)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if own_group {
            command.process_group(0);
        }
    }
    #[cfg(not(unix))]
    let _ = own_group;

    let mut child = command
        .spawn()
        .map_err(|e| Error::process_spawn_failed(step_id, &cmd.program, e.to_string()))?;

    let (tx, rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        pump(stdout, Stream::Stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        pump(stderr, Stream::Stderr, tx);
    }

    Ok((child, rx))
}

fn wait(step_id: &str, child: &mut Child) -> Result<i32> {
    let status = child.wait().map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("wait for step '{}'", step_id)))
    })?;
    Ok(status.code().unwrap_or(-1))
}

struct Responder<'a> {
    stdin: Option<ChildStdin>,
    responses: &'a [PromptResponse],
    answered: Vec<bool>,
}

impl<'a> Responder<'a> {
    fn new(stdin: Option<ChildStdin>, responses: &'a [PromptResponse]) -> Self {
        Self {
            stdin,
            responses,
            answered: vec![false; responses.len()],
        }
    }

    fn observe(&mut self, step_id: &str, text: &str, log: &mut RunLog) {
        let Some(stdin) = self.stdin.as_mut() else {
            return;
        };
        let clean = parser::strip_ansi(text);

        for (idx, response) in self.responses.iter().enumerate() {
            if self.answered[idx] || !clean.contains(&response.prompt) {
                continue;
            }
            self.answered[idx] = true;
            let written = stdin
                .write_all(format!("{}\n", response.answer).as_bytes())
                .and_then(|_| stdin.flush());
            match written {
                Ok(()) => log.info(format!("Answered '{}' with '{}'", response.prompt, response.answer)),
                Err(e) => log.warn(format!("Could not answer prompt in step '{}': {}", step_id, e)),
            }
        }

        // Close stdin once everything is answered so a stray prompt sees EOF.
        if self.answered.iter().all(|a| *a) {
            self.stdin = None;
        }
    }
}

/// Run a command to completion, forwarding every line to `log`.
///
/// When `responses` is non-empty the child gets a stdin pipe and each prompt
/// is answered once, the first time its text shows up in the output.
pub fn run_streaming(
    step_id: &str,
    cmd: &StepCommand,
    log: &mut RunLog,
    responses: &[PromptResponse],
) -> Result<ProcessOutput> {
    let stdin = if responses.is_empty() {
        Stdio::null()
    } else {
        Stdio::piped()
    };
    let (mut child, rx) = spawn(step_id, cmd, stdin, false)?;
    let mut responder = Responder::new(child.stdin.take(), responses);

    for line in rx {
        if line.complete {
            log.output(step_id, &line.text);
        }
        responder.observe(step_id, &line.text, log);
    }
    drop(responder);

    let exit_code = wait(step_id, &mut child)?;
    Ok(ProcessOutput {
        exit_code,
        success: exit_code == 0,
    })
}

/// A long-running child started by [`start_background`].
pub struct DevServer {
    step_id: String,
    child: Child,
    lines: Receiver<OutputLine>,
    pub port: u16,
    pub ready: bool,
    /// Set when the process exited before becoming ready.
    pub exit_code: Option<i32>,
}

impl DevServer {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Stream remaining output into `log` until the server exits.
    pub fn follow(&mut self, log: &mut RunLog) -> Result<i32> {
        for line in self.lines.iter() {
            if line.complete {
                log.output(&self.step_id, &line.text);
            }
        }
        wait(&self.step_id, &mut self.child)
    }

    /// Handle that can stop the server's process group from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            pgid: self.child.id(),
        }
    }

    /// Stop the server and everything it spawned (`npm run dev` forks node).
    pub fn stop(&mut self) -> Result<()> {
        let group = self.stop_handle().stop();

        if let Ok(Some(_)) = self.child.try_wait() {
            return group;
        }
        self.child.kill().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stop step '{}'", self.step_id)))
        })?;
        wait(&self.step_id, &mut self.child)?;
        group
    }
}

/// Stops a background step's process group. `Send + Copy`, for signal handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopHandle {
    pgid: u32,
}

impl StopHandle {
    /// Send SIGTERM to the whole group. A group that is already gone is fine.
    #[cfg(unix)]
    pub fn stop(&self) -> Result<()> {
        let script = format!("kill -TERM -- -{} 2>/dev/null", self.pgid);
        let status = Command::new("sh")
            .args(["-c", script.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("signal process group {}", self.pgid)))
            })?;

        if status.success() || !group_alive(self.pgid) {
            Ok(())
        } else {
            Err(Error::internal_io(
                format!("kill exited with {}", status.code().unwrap_or(-1)),
                Some(format!("signal process group {}", self.pgid)),
            ))
        }
    }

    /// Windows children share the console, so Ctrl-C already reaches them.
    #[cfg(not(unix))]
    pub fn stop(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
fn group_alive(pgid: u32) -> bool {
    let script = format!("kill -0 -- -{} 2>/dev/null", pgid);
    Command::new("sh")
        .args(["-c", script.as_str()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl std::fmt::Debug for DevServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevServer")
            .field("step_id", &self.step_id)
            .field("pid", &self.child.id())
            .field("port", &self.port)
            .field("ready", &self.ready)
            .finish()
    }
}

/// Start a command and wait until a line contains one of `ready_patterns`.
///
/// Returns with `ready == false` on timeout; the process keeps running.
/// The port is read from the ready line, else `default_port`.
pub fn start_background(
    step_id: &str,
    cmd: &StepCommand,
    log: &mut RunLog,
    ready_patterns: &[String],
    timeout: Duration,
    default_port: u16,
) -> Result<DevServer> {
    let (mut child, rx) = spawn(step_id, cmd, Stdio::null(), true)?;
    let deadline = Instant::now() + timeout;
    let mut port = default_port;
    let mut ready = false;
    let mut exit_code = None;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) => {
                if !line.complete {
                    continue;
                }
                log.output(step_id, &line.text);
                let clean = parser::strip_ansi(&line.text);
                if ready_patterns.iter().any(|p| clean.contains(p.as_str())) {
                    if let Some(found) = parser::extract_port(&clean) {
                        port = found;
                    }
                    ready = true;
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                exit_code = Some(wait(step_id, &mut child)?);
                break;
            }
        }
    }

    Ok(DevServer {
        step_id: step_id.to_string(),
        child,
        lines: rx,
        port,
        ready,
        exit_code,
    })
}

/// Executes steps as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl StepExecutor for ProcessExecutor {
    fn run(&self, step: &Step, log: &mut RunLog) -> Result<ProcessOutput> {
        let responses: &[PromptResponse] = match &step.mode {
            StepMode::Prompted { responses } => responses,
            _ => &[],
        };
        run_streaming(&step.id, &step.command, log, responses)
    }

    fn start(&self, step: &Step, log: &mut RunLog) -> Result<BackgroundOutcome> {
        let (patterns, timeout_secs, default_port) = match &step.mode {
            StepMode::Background {
                ready_patterns,
                ready_timeout_secs,
                default_port,
            } => (ready_patterns.as_slice(), *ready_timeout_secs, *default_port),
            _ => {
                return Err(Error::internal_unexpected(format!(
                    "step '{}' is not a background step",
                    step.id
                )))
            }
        };

        let server = start_background(
            &step.id,
            &step.command,
            log,
            patterns,
            Duration::from_secs(timeout_secs),
            default_port,
        )?;

        Ok(BackgroundOutcome {
            ready: server.ready,
            port: server.port,
            exit_code: server.exit_code,
            server: Some(server),
        })
    }

    fn probe(&self, program: &str, args: &[&str]) -> Option<String> {
        let output = command_for(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> StepCommand {
        StepCommand::new("sh", vec!["-c".to_string(), script.to_string()], ".")
    }

    #[test]
    fn streams_stdout_and_stderr_into_log() {
        let mut log = RunLog::silent();
        let out = run_streaming("build", &sh("echo compiled; echo warn >&2"), &mut log, &[]).unwrap();

        assert!(out.success);
        let output = log.step_output("build");
        assert!(output.contains("compiled"));
        assert!(output.contains("warn"));
    }

    #[test]
    fn reports_non_zero_exit() {
        let mut log = RunLog::silent();
        let out = run_streaming("build", &sh("echo nope; exit 3"), &mut log, &[]).unwrap();
        assert_eq!(out.exit_code, 3);
        assert!(!out.success);
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let mut log = RunLog::silent();
        let cmd = StepCommand::new("next-express-no-such-binary", vec![], ".");
        let err = run_streaming("scaffold", &cmd, &mut log, &[]).unwrap_err();
        assert_eq!(err.code.as_str(), "process.spawn_failed");
        assert_eq!(err.details["stepId"], "scaffold");
    }

    #[test]
    fn env_is_passed_to_child() {
        let mut log = RunLog::silent();
        let mut cmd = sh("echo \"ci=$CI\"");
        cmd.env.insert("CI".to_string(), "true".to_string());
        run_streaming("scaffold", &cmd, &mut log, &[]).unwrap();
        assert_eq!(log.step_output("scaffold"), "ci=true");
    }

    #[test]
    fn answers_prompt_without_trailing_newline() {
        let mut log = RunLog::silent();
        let responses = vec![PromptResponse {
            prompt: "Which color would you like to use as the base color?".to_string(),
            answer: "zinc".to_string(),
        }];
        let cmd = sh(
            "printf 'Which color would you like to use as the base color? '; read c; echo \"picked $c\"",
        );

        let out = run_streaming("ui-setup", &cmd, &mut log, &responses).unwrap();
        assert!(out.success);
        assert!(log.step_output("ui-setup").contains("picked zinc"));
    }

    #[test]
    fn background_becomes_ready_and_reads_port() {
        let mut log = RunLog::silent();
        let cmd = sh("echo starting; echo '  - Local:        http://localhost:4123'; sleep 5");
        let mut server = start_background(
            "dev-server",
            &cmd,
            &mut log,
            &["Local:".to_string()],
            Duration::from_secs(5),
            3000,
        )
        .unwrap();

        assert!(server.ready);
        assert_eq!(server.port, 4123);
        assert_eq!(server.url(), "http://localhost:4123");
        server.stop().unwrap();
    }

    #[test]
    fn background_times_out_with_default_port() {
        let mut log = RunLog::silent();
        let mut server = start_background(
            "dev-server",
            &sh("echo compiling; sleep 5"),
            &mut log,
            &["Local:".to_string()],
            Duration::from_millis(300),
            3000,
        )
        .unwrap();

        assert!(!server.ready);
        assert_eq!(server.port, 3000);
        assert_eq!(server.exit_code, None);
        server.stop().unwrap();
    }

    /// Running, sleeping or stopped; zombies and missing pids count as dead.
    #[cfg(target_os = "linux")]
    fn process_alive(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|state| state != "Z" && state != "X"),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn stop_takes_down_forked_children() {
        let tmp = tempfile::TempDir::new().unwrap();
        let pid_file = tmp.path().join("pid");
        let script = format!(
            "sleep 300 & echo $! > '{}'; echo 'Local: http://localhost:4555'; wait",
            pid_file.display()
        );
        let mut log = RunLog::silent();
        let mut server = start_background(
            "dev-server",
            &sh(&script),
            &mut log,
            &["Local:".to_string()],
            Duration::from_secs(5),
            3000,
        )
        .unwrap();
        assert!(server.ready);

        let forked = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        assert!(process_alive(&forked));

        server.stop().unwrap();

        let deadline = Instant::now() + Duration::from_secs(3);
        while process_alive(&forked) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        assert!(!process_alive(&forked), "forked child {} outlived stop", forked);
    }

    #[test]
    fn stop_handle_on_finished_server_is_ok() {
        let mut log = RunLog::silent();
        let mut server = start_background(
            "dev-server",
            &sh("echo 'Local: http://localhost:4556'"),
            &mut log,
            &["Local:".to_string()],
            Duration::from_secs(5),
            3000,
        )
        .unwrap();
        assert_eq!(server.follow(&mut log).unwrap(), 0);
        assert!(server.stop_handle().stop().is_ok());
        assert!(server.stop().is_ok());
    }

    #[test]
    fn background_reports_early_exit() {
        let mut log = RunLog::silent();
        let server = start_background(
            "dev-server",
            &sh("echo 'missing script: dev'; exit 1"),
            &mut log,
            &["Local:".to_string()],
            Duration::from_secs(5),
            3000,
        )
        .unwrap();

        assert!(!server.ready);
        assert_eq!(server.exit_code, Some(1));
        assert!(log.step_output("dev-server").contains("missing script"));
    }

    #[test]
    fn follow_drains_until_exit() {
        let mut log = RunLog::silent();
        let mut server = start_background(
            "dev-server",
            &sh("echo 'Local: http://localhost:3001'; echo compiled; exit 0"),
            &mut log,
            &["Local:".to_string()],
            Duration::from_secs(5),
            3000,
        )
        .unwrap();

        assert!(server.ready);
        assert_eq!(server.follow(&mut log).unwrap(), 0);
        assert!(log.step_output("dev-server").contains("compiled"));
    }

    #[test]
    fn probe_returns_stdout() {
        assert_eq!(ProcessExecutor.probe("echo", &["v20.11.1"]), Some("v20.11.1".to_string()));
        assert_eq!(ProcessExecutor.probe("next-express-no-such-binary", &["--version"]), None);
    }
}
