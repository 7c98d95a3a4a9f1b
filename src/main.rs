//! dirq CLI - companion for querying your organization's directory service

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::{Cli, Commands, GlobalOptions, GroupCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("dirq version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GetUser(args) => cli::user::get(&args, &opts).await,
        Commands::GetGroup(group_cmd) => match group_cmd {
            GroupCommands::Search { name } => cli::group::search(&name, &opts).await,
            GroupCommands::Members { group, csv } => {
                cli::group::members(&group, csv.as_deref(), &opts).await
            }
        },
        Commands::HttpRequest(args) => cli::http::run(&args).await,
        Commands::Completion { shell } => cli::completions::run(shell),
    }
}
