use crate::commands::{run_estimate, run_import, run_rate, EstimateArgs, ImportArgs, RateArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use care_quality::config::AppConfig;
use care_quality::error::AppError;
use care_quality::telemetry;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Childcare Quality Engine",
    about = "Rate childcare facilities and estimate monthly tuition from the command line",
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
    /// Rate a facility profile stored as JSON
    Rate(RateArgs),
    /// Estimate the monthly price for a facility profile stored as JSON
    Estimate(EstimateArgs),
    /// Rate every facility in a licensing-registry CSV export
    Import(ImportArgs),
    /// Print a rating explanation and price breakdown for a sample facility
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

    let config = startup()?;
    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Rate(args) => run_rate(args, config.engine),
        Command::Estimate(args) => run_estimate(args, config.engine),
        Command::Import(args) => run_import(args, config.engine),
        Command::Demo(args) => run_demo(args, config.engine),
    }
}

/// Loads configuration and installs the subscriber shared by every subcommand.
fn startup() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}
