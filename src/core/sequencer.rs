//! Runs a step plan one step at a time, stopping at the first failure.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

use crate::defaults::Defaults;
use crate::error::{Error, ProcessExitFailedDetails, Result};
use crate::log::RunLog;
use crate::preflight;
use crate::process::{DevServer, ProcessOutput};
use crate::project::ProjectConfig;
use crate::steps::{self, Step, StepKind};
use crate::utils::template::{self, TemplateVars};

/// Result of starting a background step.
#[derive(Debug)]
pub struct BackgroundOutcome {
    pub ready: bool,
    pub port: u16,
    /// Exit code if the process ended before becoming ready.
    pub exit_code: Option<i32>,
    pub server: Option<DevServer>,
}

/// Runs the external side of a step.
pub trait StepExecutor: Send + Sync {
    /// Run to completion.
    fn run(&self, step: &Step, log: &mut RunLog) -> Result<ProcessOutput>;
    /// Start and wait for readiness only.
    fn start(&self, step: &Step, log: &mut RunLog) -> Result<BackgroundOutcome>;
    /// `program args...` stdout if it ran successfully.
    fn probe(&self, program: &str, args: &[&str]) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RunState {
    Pending,
    Running { step: String },
    Succeeded,
    Failed { step: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    Succeeded,
    Failed,
    /// Background step left running.
    Running,
    /// Background step did not report ready in time.
    NotReady,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub id: String,
    pub label: String,
    pub command: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: Uuid,
    pub project_dir: PathBuf,
    #[serde(flatten)]
    pub state: RunState,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server_url: Option<String>,
    #[serde(skip)]
    pub dev_server: Option<DevServer>,
}

impl RunReport {
    pub fn completed_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|s| s.status != StepStatus::Failed && s.status != StepStatus::Skipped)
            .map(|s| s.id.clone())
            .collect()
    }
}

struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Sequencer<E: StepExecutor> {
    executor: E,
    defaults: Defaults,
    skip_preflight: bool,
    in_flight: AtomicBool,
    state: Mutex<RunState>,
}

impl<E: StepExecutor> Sequencer<E> {
    pub fn new(executor: E, defaults: Defaults) -> Self {
        Self {
            executor,
            defaults,
            skip_preflight: false,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(RunState::Pending),
        }
    }

    pub fn skip_preflight(mut self, skip: bool) -> Self {
        self.skip_preflight = skip;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// State of the current or most recent run.
    pub fn state(&self) -> RunState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_state(&self, next: RunState) {
        match self.state.lock() {
            Ok(mut state) => *state = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Validate, check the target, preflight, then run every planned step.
    ///
    /// Nothing is spawned until validation and the target check pass. A
    /// failing step ends the run; steps after it never start.
    pub fn run(&self, config: &ProjectConfig, log: &mut RunLog) -> Result<RunReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::sequence_in_flight());
        }
        let _guard = FlightGuard(&self.in_flight);

        self.set_state(RunState::Pending);
        config.validate()?;
        config.check_target()?;

        let plan = steps::plan(config, &self.defaults);
        for warning in &plan.warnings {
            log.warn(warning);
        }

        if self.defaults.preflight.enabled && !self.skip_preflight {
            log.info("Checking required tools");
            preflight::check(&self.executor, config, &self.defaults)?;
        }

        let mut report = RunReport {
            run_id: Uuid::new_v4(),
            project_dir: config.project_dir().to_path_buf(),
            state: RunState::Pending,
            steps: Vec::new(),
            warnings: plan.warnings.clone(),
            dev_server_url: None,
            dev_server: None,
        };

        for step in &plan.steps {
            self.set_state(RunState::Running {
                step: step.id.clone(),
            });
            log.info(format!("Running: {}", step.label));
            log.info(format!("$ {}", step.command.display()));

            let result = match step.kind {
                StepKind::DevServer => self.start_dev_server(step, log, &mut report),
                StepKind::OpenBrowser => self.open_browser(step, log, &mut report),
                _ => self.run_to_exit(step, log, &mut report),
            };

            if let Err(err) = result {
                log.error(&err.message);
                self.set_state(RunState::Failed {
                    step: step.id.clone(),
                });
                if let Some(mut server) = report.dev_server.take() {
                    if let Err(stop_err) = server.stop() {
                        log.warn(format!(
                            "Could not stop dev server (pid {}): {}",
                            server.pid(),
                            stop_err.message
                        ));
                    }
                }
                return Err(err);
            }
        }

        log.info(format!("Project ready at {}", report.project_dir.display()));
        report.state = RunState::Succeeded;
        self.set_state(RunState::Succeeded);
        Ok(report)
    }

    fn run_to_exit(&self, step: &Step, log: &mut RunLog, report: &mut RunReport) -> Result<()> {
        let started = Instant::now();
        let output = self.executor.run(step, log)?;
        let status = if output.success {
            StepStatus::Succeeded
        } else {
            StepStatus::Failed
        };
        push_record(report, step, status, Some(output.exit_code), started);

        if !output.success {
            return Err(exit_failure(step, output.exit_code, log, report));
        }
        Ok(())
    }

    fn start_dev_server(&self, step: &Step, log: &mut RunLog, report: &mut RunReport) -> Result<()> {
        let started = Instant::now();
        let outcome = self.executor.start(step, log)?;
        report.dev_server = outcome.server;

        if let Some(code) = outcome.exit_code {
            if code != 0 {
                push_record(report, step, StepStatus::Failed, Some(code), started);
                return Err(exit_failure(step, code, log, report));
            }
            log.warn("Dev server exited before it was ready");
            push_record(report, step, StepStatus::NotReady, Some(code), started);
            return Ok(());
        }

        if outcome.ready {
            let url = format!("http://localhost:{}", outcome.port);
            log.info(format!("Dev server ready at {}", url));
            report.dev_server_url = Some(url);
            push_record(report, step, StepStatus::Running, None, started);
        } else {
            let warning = format!(
                "Dev server did not report ready within {}s; it is still starting",
                self.defaults.dev_server.ready_timeout_secs
            );
            log.warn(&warning);
            report.warnings.push(warning);
            push_record(report, step, StepStatus::NotReady, None, started);
        }
        Ok(())
    }

    fn open_browser(&self, step: &Step, log: &mut RunLog, report: &mut RunReport) -> Result<()> {
        let Some(url) = report.dev_server_url.clone() else {
            let warning = "Browser not opened: dev server is not ready".to_string();
            log.warn(&warning);
            report.warnings.push(warning);
            push_record(report, step, StepStatus::Skipped, None, Instant::now());
            return Ok(());
        };

        let mut rendered = step.clone();
        rendered.command.args =
            template::render_all(&step.command.args, &[(TemplateVars::URL, url.as_str())]);
        self.run_to_exit(&rendered, log, report)
    }
}

fn push_record(
    report: &mut RunReport,
    step: &Step,
    status: StepStatus,
    exit_code: Option<i32>,
    started: Instant,
) {
    report.steps.push(StepRecord {
        id: step.id.clone(),
        label: step.label.clone(),
        command: step.command.display(),
        status,
        exit_code,
        duration_ms: started.elapsed().as_millis() as u64,
    });
}

fn exit_failure(step: &Step, exit_code: i32, log: &RunLog, report: &RunReport) -> Error {
    Error::process_exit_failed(ProcessExitFailedDetails {
        step_id: step.id.clone(),
        command: step.command.display(),
        exit_code,
        output: log.step_output(&step.id),
        completed_steps: report.completed_steps(),
    })
}
