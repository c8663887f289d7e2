//! Handler for the `run` command.

#[cfg(feature = "telegram")]
use crate::app::App;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
#[cfg(feature = "telegram")]
use tokio::signal;
#[cfg(feature = "telegram")]
use tracing::{error, info};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();

    #[cfg(feature = "telegram")]
    return run_bot(config).await;

    #[cfg(not(feature = "telegram"))]
    {
        let _ = config;
        Err(crate::error::Error::Runtime(
            "built without the `telegram` feature; rebuild with it or use `scan`".into(),
        ))
    }
}

#[cfg(feature = "telegram")]
async fn run_bot(config: Config) -> Result<()> {
    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("sellwatch stopped");
    Ok(())
}
