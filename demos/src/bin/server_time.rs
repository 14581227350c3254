//! Demo 1: Server Time and Clock Offset
//!
//! Showcases: Public endpoints, clock offset synchronization
//!
//! Run: cargo run --bin server_time

use bitnut_rest::BitnutClient;
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  SERVER TIME".cyan().bold());
    println!("{}", "  Bitnut SDK Demo - Clock Offset".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitnutClient::new()?;
    println!("{} Using {}", "✓".green(), client.base_url());

    let server_time = client.server_time().await?;
    println!("  {} {}", "Server time:".yellow(), server_time);
    println!("  {} {}", "Local time: ".yellow(), client.local_time());

    let offset = client.sync_clock_offset().await?;
    let label = if offset >= 0 { "ahead of" } else { "behind" };
    println!(
        "\n{} Local clock is {}ms {} the server",
        "✓".green(),
        offset.abs(),
        label
    );
    println!(
        "  {} {}",
        "Next signed timestamp:".dimmed(),
        client.local_time() - client.time_offset()
    );

    Ok(())
}
