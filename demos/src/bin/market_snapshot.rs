//! Demo 2: Market Snapshot
//!
//! Showcases: Order book depth, 24h tickers, per-call cancellation
//!
//! Run: cargo run --bin market_snapshot -- BTCUSDT ETHUSDT

use bitnut_rest::{BitnutClient, CancellationToken, TickerQuery};
use colored::*;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut symbols: Vec<String> = std::env::args().skip(1).collect();
    if symbols.is_empty() {
        symbols = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];
    }

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", "  Bitnut SDK Demo - Depth and Tickers".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitnutClient::new()?;

    // Give up on slow answers after five seconds
    let token = CancellationToken::new();
    let deadline = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        deadline.cancel();
    });
    let market = client.market().with_cancellation(token);

    for symbol in &symbols {
        let depth = market.depth(symbol, Some(5)).await?;
        println!("{} {}", "▸".cyan(), symbol.bold());

        for [price, qty] in depth.asks.iter().take(5).rev() {
            println!("    {} {:>14} {:>14}", "ASK".red(), price, qty);
        }
        for [price, qty] in depth.bids.iter().take(5) {
            println!("    {} {:>14} {:>14}", "BID".green(), price, qty);
        }

        match (depth.best_bid(), depth.best_ask()) {
            (Some(bid), Some(ask)) => {
                let spread = ask - bid;
                let mid = (bid + ask) / Decimal::TWO;
                let bps = spread
                    .checked_div(mid)
                    .map(|ratio| (ratio * Decimal::from(10_000)).round_dp(2));
                match bps {
                    Some(bps) => println!("    {} {} ({} bps)", "SPREAD:".yellow(), spread, bps),
                    None => println!("    {} {}", "SPREAD:".yellow(), spread),
                }
            }
            _ => println!("    {}", "Empty book".dimmed()),
        }
        println!();
    }

    let tickers = market.tickers(TickerQuery::Symbols(symbols)).await?;
    println!("{}", "24h Tickers".bold());
    for ticker in &tickers {
        let change = if ticker.price_change.starts_with('-') {
            format!("{}%", ticker.price_change_percent).red()
        } else {
            format!("+{}%", ticker.price_change_percent).green()
        };
        println!(
            "  {:<10} {:>14} {:>10}  {} {}",
            ticker.symbol,
            ticker.last_price,
            change,
            "vol".dimmed(),
            ticker.volume
        );
    }

    Ok(())
}
