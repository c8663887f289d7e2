use clap::Parser;
use sellwatch::cli::{check, run, scan, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Scan(args) => scan::execute(args).await,
        Commands::Check(command) => match command {
            CheckCommand::Config(args) => check::execute_config(&args.config),
            CheckCommand::Api(args) => check::execute_api(&args.config).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
