// Public modules
pub mod defaults;
pub mod error;
pub mod log;
pub mod paths;
pub mod preflight;
pub mod process;
pub mod project;
pub mod scaffold;
pub mod sequencer;
pub mod steps;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use project::{BuildSteps, FeatureFlags, PackageManager, ProjectConfig, UiOptions};
pub use sequencer::{RunReport, RunState, Sequencer, StepExecutor, StepRecord};
