use clap::{Args, Parser, Subcommand};

use union_portal::error::AppError;

use crate::demo::{run_demo, run_eligibility, DemoArgs, EligibilityArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Union Registration Portal",
    about = "Run the union registration and audit-eligibility portal from the command line",
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
    /// Evaluate the audit-requirement criteria for a set of figures
    Eligibility(EligibilityArgs),
    /// Run an end-to-end demo covering login, registration, review, and assessment
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
        Command::Eligibility(args) => run_eligibility(args),
        Command::Demo(args) => run_demo(args),
    }
}
