// src/main.rs — chatqa entry point

use clap::Parser;

use chatqa::cli::{Cli, Commands};
use chatqa::infra::config::Config;
use chatqa::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flag
    logger::init_logging(if cli.verbose { "debug" } else { "warn" });

    let config = match cli.config {
        Some(ref path) => {
            let mut config = Config::load_from(std::path::Path::new(path))?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    match cli.command {
        Commands::Run(args) => {
            chatqa::cli::run::run_batch(&config, args).await?;
        }
        Commands::Status {
            input,
            output,
            probe,
        } => {
            chatqa::cli::status::show_status(&config, input.as_deref(), output.as_deref(), probe)
                .await?;
        }
        Commands::Export { output, format, to } => {
            chatqa::cli::export::run_export(&config, output.as_deref(), &format, to.as_deref())?;
        }
        Commands::Reset {
            output,
            errors,
            sessions,
        } => {
            chatqa::cli::reset::run_reset(&config, output.as_deref(), errors, &sessions)?;
        }
        Commands::Clean { input, output } => {
            chatqa::cli::clean::run_clean(&input, &output)?;
        }
        Commands::Search {
            query,
            catalog,
            limit,
        } => {
            chatqa::cli::lookup::run_search(&query, &catalog, limit).await?;
        }
        Commands::Reply { query, input } => {
            chatqa::cli::lookup::run_reply(&config, &query, input.as_deref()).await?;
        }
    }
    Ok(())
}
