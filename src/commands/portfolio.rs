use anyhow::Result;
use colored::Colorize;

use super::Session;
use crate::format;

pub async fn summary(session: &mut Session) -> Result<()> {
    let summary = session.client.summary().await?;
    println!("  Balance:    {}", format::currency(summary.base_currency_balance));
    println!("  Coin value: {}", format::currency(summary.coin_value));
    println!("  Total:      {}", format::currency(summary.total_value));
    Ok(())
}

/// Two independent calls; both must succeed before anything is printed.
pub async fn portfolio(session: &mut Session) -> Result<()> {
    let total = session.client.portfolio_total().await?;
    let history = session.client.transactions().await?;

    println!(
        "  Balance: {}  Total: {}",
        format::currency(total.base_currency_balance),
        format::currency(total.total_value)
    );

    if total.coin_holdings.is_empty() {
        println!("  no holdings");
    } else {
        println!(
            "  {:<8} {:<20} {:>12} {:>12} {:>12} {:>10}",
            "SYMBOL".bold(),
            "NAME".bold(),
            "QUANTITY".bold(),
            "PRICE".bold(),
            "VALUE".bold(),
            "24H".bold()
        );
        for holding in &total.coin_holdings {
            println!(
                "  {:<8} {:<20} {:>12} {:>12} {:>12} {:>10}",
                holding.symbol,
                holding.name,
                holding.quantity,
                format::currency(holding.current_price),
                format::currency(holding.value),
                format::change(holding.change_24h)
            );
        }
    }

    if history.transactions.is_empty() {
        println!("  no transactions");
    } else {
        println!("  Transactions:");
        for tx in &history.transactions {
            println!(
                "    {} {:<4} {:<8} {}",
                tx.timestamp.format("%Y-%m-%d %H:%M"),
                tx.kind,
                tx.coin_symbol,
                format::currency(tx.total_value.unwrap_or(0.0))
            );
        }
    }
    Ok(())
}
