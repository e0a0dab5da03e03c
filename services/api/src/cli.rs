use crate::demo::{run_demo, run_quote, run_slots, DemoArgs, QuoteArgs, SlotsArgs};
use crate::server;
use arriendo::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Arriendo Marketplace",
    about = "Run the rental-marketplace service or exercise it from the command line",
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
    /// Print the bookable visit slots for a date
    Slots(SlotsArgs),
    /// Print a first-payment breakdown for a lease start date and rent
    Quote(QuoteArgs),
    /// Run an end-to-end CLI demo covering listings, visits, and billing
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
        Command::Slots(args) => run_slots(args),
        Command::Quote(args) => run_quote(args),
        Command::Demo(args) => run_demo(args),
    }
}
