use clap::Parser;
use tracing_subscriber::EnvFilter;

mod accounts;
mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() {
    // Logs go to stderr so JSON output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tessera=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = OutputFormat::from(cli.format);
    let directory = accounts::open_directory(&cli.accounts)?;

    match &cli.command {
        Commands::Create(args) => commands::account::create(&directory, args, format),
        Commands::Show(args) => commands::account::show(&directory, args, format),
        Commands::List => commands::account::list(&directory, format),
        Commands::Find(args) => commands::account::find(&directory, args, format),
        Commands::Passwd(args) => commands::account::passwd(&directory, args, format),
        Commands::Set(args) => commands::account::set(&directory, args, format),
        Commands::Login(args) => commands::access::login(&directory, args, format),
        Commands::Authorize(args) => commands::access::authorize(&directory, args, format),
        Commands::Remove(args) => commands::account::remove(&directory, args, format),
        Commands::Info => commands::info::run(&directory, &cli.accounts, format),
    }
}
