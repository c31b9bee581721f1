use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, create, doctor, plan};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "next-express")]
#[command(version = VERSION)]
#[command(about = "Scaffold Next.js projects and run the setup steps around create-next-app")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project: scaffold, install libraries, then the selected steps
    Create(create::CreateArgs),
    /// Show the steps `create` would run, without running anything
    Plan(plan::PlanArgs),
    /// Check that node, the package manager and git are installed
    Doctor(doctor::DoctorArgs),
    /// Manage next-express defaults
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    if matches!(cli.command, Commands::Create(_)) {
        tty::status("next-express is working...");
    }

    let (json_result, exit_code, dev_server) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    if let Some(server) = dev_server {
        create::follow(server);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
