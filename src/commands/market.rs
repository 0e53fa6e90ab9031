use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use super::{Args, Session};
use crate::client::{ClientError, TradeResponse, TradeSide};
use crate::format;

const MARKET_PAGE_SIZE: u32 = 6;

pub async fn market(session: &mut Session, args: &mut Args) -> Result<()> {
    let (page, search) = market_params(args)?;
    let listing = session
        .client
        .market(&page, &search, MARKET_PAGE_SIZE)
        .await?;

    if listing.coins.is_empty() {
        println!("  no coins found");
        return Ok(());
    }

    println!(
        "  {:<8} {:<20} {:>12} {:>10} {:>14}",
        "SYMBOL".bold(),
        "NAME".bold(),
        "PRICE".bold(),
        "24H".bold(),
        "MARKET CAP".bold()
    );
    for coin in &listing.coins {
        println!(
            "  {:<8} {:<20} {:>12} {:>10} {:>14}",
            coin.symbol,
            coin.name,
            format::currency(coin.current_price),
            format::change(coin.change_24h),
            format::currency(coin.market_cap)
        );
    }
    if let Some(total) = listing.total {
        println!("  ({} coins total, page {})", total, page);
    }
    Ok(())
}

/// Page defaults to "1", search term to empty; the search term is greedy.
fn market_params(args: &mut Args) -> Result<(String, String)> {
    let page = args.page()?;
    let search = args.opt_rest().unwrap_or_default();
    Ok((page, search))
}

pub async fn buy_coin(session: &mut Session, args: &mut Args) -> Result<()> {
    trade(session, args, TradeSide::Buy).await
}

pub async fn sell_coin(session: &mut Session, args: &mut Args) -> Result<()> {
    trade(session, args, TradeSide::Sell).await
}

async fn trade(session: &mut Session, args: &mut Args, side: TradeSide) -> Result<()> {
    let symbol = args.next("symbol")?.to_uppercase();
    let amount = args.number("amount")?;
    if amount <= 0.0 {
        bail!("amount must be positive");
    }

    let result = session.client.trade(&symbol, side, amount).await?;
    let verb = match side {
        TradeSide::Buy => "bought",
        TradeSide::Sell => "sold",
    };
    println!(
        "{} {} {} of {}",
        "✓".green(),
        verb,
        format::currency(amount),
        symbol
    );
    if let Some(coin_amount) = result.coin_amount {
        println!("  Coins: {}", coin_amount);
    }
    if let Some(message) = &result.message {
        println!("  {}", message);
    }
    println!("  Balance: {}", format::currency(result.new_balance));
    Ok(())
}

pub async fn new_coin(session: &mut Session, args: &mut Args) -> Result<()> {
    let name = args.next("name")?;
    let symbol = args.next("symbol")?.to_uppercase();
    let icon_path = args.next("icon-path")?;

    // Local I/O failures abort before anything touches the network.
    let icon = std::fs::read(&icon_path)
        .with_context(|| format!("Failed to read icon file '{}'", icon_path))?;
    let filename = Path::new(&icon_path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("icon.png");

    let result = session
        .client
        .create_coin(&name, &symbol, icon, filename)
        .await?;
    println!("{} created {} ({})", "✓".green(), name, symbol);
    if let Some(message) = &result.message {
        println!("  {}", message);
    }
    println!("  Creation fee: {}", format::currency(result.creation_fee));
    Ok(())
}

pub async fn invest(session: &mut Session, args: &mut Args) -> Result<()> {
    let budget = args.number("budget")?;
    let per_coin = args.number("amount-per-coin")?;
    let page = args.page()?;

    let Some(count) = purchase_count(budget, per_coin) else {
        bail!("budget must cover at least one purchase of amount-per-coin");
    };

    let listing = session.client.market(&page, "", count).await?;
    if listing.coins.is_empty() {
        println!("  no coins listed on page {}", page);
        return Ok(());
    }

    let symbols: Vec<String> = listing.coins.iter().map(|c| c.symbol.clone()).collect();
    let client = &session.client;
    let completed = buy_each(&symbols, per_coin, |symbol, amount| async move {
        client.trade(&symbol, TradeSide::Buy, amount).await
    })
    .await?;

    println!(
        "{} invested {} across {} coins",
        "✓".green(),
        format::currency(per_coin * completed as f64),
        completed
    );
    Ok(())
}

/// Issue one buy per symbol, strictly sequentially, aborting on the first
/// failure. Completed buys stand; there is no rollback.
async fn buy_each<F, Fut>(symbols: &[String], per_coin: f64, mut buy: F) -> Result<usize>
where
    F: FnMut(String, f64) -> Fut,
    Fut: std::future::Future<Output = Result<TradeResponse, ClientError>>,
{
    let mut completed = 0usize;
    for symbol in symbols {
        let result = buy(symbol.clone(), per_coin).await.with_context(|| {
            format!(
                "buy of {} failed; {} of {} purchases already executed and stand",
                symbol,
                completed,
                symbols.len()
            )
        })?;
        completed += 1;
        println!(
            "{} bought {} of {} ({}/{}), balance {}",
            "✓".green(),
            format::currency(per_coin),
            symbol,
            completed,
            symbols.len(),
            format::currency(result.new_balance)
        );
    }
    Ok(completed)
}

/// How many whole purchases of `per_coin` fit in `budget`.
fn purchase_count(budget: f64, per_coin: f64) -> Option<u32> {
    if budget <= 0.0 || per_coin <= 0.0 {
        return None;
    }
    let count = (budget / per_coin).floor();
    if count < 1.0 {
        return None;
    }
    Some(count as u32)
}

pub async fn view_user(session: &mut Session, args: &mut Args) -> Result<()> {
    let username = args.next("username")?;
    let user = session.client.user(&username).await?;

    let display = user.profile.name.as_deref().unwrap_or(&user.profile.username);
    println!("  {} (@{})", display.bold(), user.profile.username);
    if let Some(bio) = &user.profile.bio {
        println!("  {}", bio.dimmed());
    }
    println!(
        "  Balance: {}  Holdings: {}  Total: {}  P&L: {}",
        format::currency(user.stats.base_currency_balance),
        format::currency(user.stats.holdings_value),
        format::currency(user.stats.total_portfolio_value),
        format::change(user.stats.profit_loss_percent)
    );

    if !user.created_coins.is_empty() {
        println!("  Created coins:");
        for coin in &user.created_coins {
            println!(
                "    {:<8} {:<20} {:>12} {:>10}",
                coin.symbol,
                coin.name,
                format::currency(coin.current_price),
                format::change(coin.change_24h)
            );
        }
    }

    if !user.recent_transactions.is_empty() {
        println!("  Recent transactions:");
        for tx in &user.recent_transactions {
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
