use clap::{Args, Parser, Subcommand};
use scorecard::error::AppError;

use crate::demo::{run_demo, run_yearly_report, DemoArgs, YearlyReportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Scorecard",
    about = "Run and demonstrate the performance scoring service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Produce yearly performance reports from a legacy submissions export
    Report(YearlyReportArgs),
    /// Run an end-to-end CLI demo covering scoring and appraisal workflows
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_yearly_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
