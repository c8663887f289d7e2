//! Configuration and API-access validation commands.

use std::path::Path;

use crate::adapter::ggsel::GgselClient;
use crate::config::Config;
use crate::error::Result;

/// Validate configuration file without starting the bot.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    // Check file exists
    if !path.exists() {
        eprintln!("Error: Configuration file not found: {}", path.display());
        eprintln!();
        eprintln!("Create one by copying the example:");
        eprintln!("  cp config.toml.example config.toml");
        std::process::exit(1);
    }

    let config = Config::load(path)?;

    println!("✓ Configuration file is valid");
    println!();
    println!("Summary:");
    println!("  Seller ID: {}", config.ggsel.seller_id);
    println!("  API base: {}", config.ggsel.api_base);
    println!("  Scheduler: {:?}", config.checks.scheduler);
    println!(
        "  Message check: every {}s (first after {}s)",
        config.checks.message_interval_secs, config.checks.message_first_delay_secs
    );
    println!(
        "  Order check: every {}s (first after {}s)",
        config.checks.order_interval_secs, config.checks.order_first_delay_secs
    );
    println!();

    // Secrets are only reported as present, never echoed.
    println!("✓ GGSel API key present");
    println!("✓ Telegram bot token present");

    if config.telegram.allowed_chats.is_empty() {
        println!("⚠ No chat allowlist configured: any chat can control the watcher");
        println!("  Set telegram.allowed_chats to restrict access");
    } else {
        println!(
            "✓ Allowed chats: {:?}",
            config.telegram.allowed_chats
        );
    }

    println!();
    println!("Configuration is ready to use.");

    Ok(())
}

/// Probe seller-API access: login plus the two listing endpoints.
pub async fn execute_api<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    let client = GgselClient::from_config(&config.ggsel)?;

    println!("Probing seller API: {}", config.ggsel.api_base);
    println!("  Seller ID: {}", config.ggsel.seller_id);
    println!();

    let probe = client.probe().await;
    println!("  apilogin:   {}", status_label(probe.login));
    println!("  chats:      {}", status_label(probe.chats));
    println!("  last-sales: {}", status_label(probe.sales));
    println!();

    if probe.ok() {
        println!("✓ API access is configured correctly.");
    } else {
        eprintln!("✗ API access is misconfigured (no answer means no HTTP response at all).");
        std::process::exit(1);
    }

    Ok(())
}

fn status_label(status: u16) -> String {
    if status == 0 {
        "no answer".into()
    } else {
        status.to_string()
    }
}
