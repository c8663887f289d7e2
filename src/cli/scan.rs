//! Handler for the `scan` command: one-shot checks without Telegram.

use std::sync::Arc;

use crate::app::{build_scheduler, build_watcher};
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::port::{NullSink, WatchControl};

/// Local chat id for the scan's throwaway session. The process exits after
/// one pass, so its dedup state never meets another chat's.
const SCAN_CHAT: i64 = 0;

/// Execute the scan command.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    let scheduler = build_scheduler(config.checks.scheduler);
    let watcher = build_watcher(&config, scheduler, Arc::new(NullSink))?;

    let both = !args.messages && !args.orders;

    if args.messages || both {
        let alerts = watcher.check_messages_now(SCAN_CHAT).await?;
        print_section("Unread conversations", &alerts);
    }
    if args.orders || both {
        let alerts = watcher.check_orders_now(SCAN_CHAT).await?;
        print_section("New paid orders", &alerts);
    }

    Ok(())
}

fn print_section(title: &str, alerts: &[String]) {
    println!("{title}: {}", alerts.len());
    for alert in alerts {
        println!();
        println!("{alert}");
    }
}
