use clap::{Args, Parser, Subcommand};
use propstack::directory::seed_cities;
use propstack::error::AppError;

use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Propstack API",
    about = "Run the propstack listing platform API from the command line",
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
    /// Print the city directory a fresh deployment is seeded with
    SeedCities,
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
        Command::SeedCities => run_seed_cities(),
    }
}

fn run_seed_cities() -> Result<(), AppError> {
    let cities = seed_cities();
    println!("Seeded city directory ({} cities)", cities.len());
    println!("  {:<12} {:<12} {:>9} {:>9}", "id", "name", "lat", "long");
    for city in cities {
        println!(
            "  {:<12} {:<12} {:>9} {:>9}",
            city.id.0,
            city.name,
            city.latitude.as_deref().unwrap_or("-"),
            city.longitude.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
