//! Demo 3: Account Overview
//!
//! Showcases: Signed endpoints, balances, order history
//!
//! Requires BITNUT_API_KEY and BITNUT_SECRET_KEY.
//!
//! Run: cargo run --bin account_overview -- BTCUSDT

use bitnut_rest::{BitnutClient, ClientConfig, OrderListQuery, RequestOption};
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "BTCUSDT".to_string());

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  ACCOUNT OVERVIEW".cyan().bold());
    println!("{}", "  Bitnut SDK Demo - Signed Requests".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitnutClient::with_config(ClientConfig::from_env()?)?;
    if !client.has_credentials() {
        println!(
            "{} Set {} and {} to run this demo",
            "✗".red(),
            bitnut_auth::API_KEY_ENV,
            bitnut_auth::SECRET_KEY_ENV
        );
        return Ok(());
    }

    let offset = client.sync_clock_offset().await?;
    println!("{} Clock offset {}ms", "✓".green(), offset);

    let (capture, last_url) = RequestOption::capture_full_url();
    let account = client.account()?.with_option(capture);

    let base = symbol.trim_end_matches("USDT");
    for coin in [base, "USDT"] {
        let balance = account.balance(coin).await?;
        println!(
            "  {:<6} {} {:>16}  {} {:>16}",
            balance.coin.bold(),
            "free".dimmed(),
            balance.free,
            "frozen".dimmed(),
            balance.freeze
        );
    }
    if let Some(url) = last_url.borrow().as_deref() {
        println!("  {} {}", "Last URL:".dimmed(), url);
    }
    println!();

    let orders = client
        .trading()?
        .list_orders(&OrderListQuery::new(&symbol).limit(10))
        .await?;

    println!("{} {} recent orders on {}", "▸".cyan(), orders.len(), symbol);
    for order in &orders {
        let status = if order.status.is_terminal() {
            format!("{:?}", order.status).dimmed()
        } else {
            format!("{:?}", order.status).yellow()
        };
        println!(
            "  {:<14} {:<5} {:>14} @ {:<14} {}",
            order.order_id, order.side, order.orig_quantity, order.price, status
        );
    }

    Ok(())
}
