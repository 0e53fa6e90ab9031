use anyhow::{bail, Result};
use colored::Colorize;

use super::{Args, Session};
use crate::client::CoinflipSide;
use crate::format;

pub async fn coinflip(session: &mut Session, args: &mut Args) -> Result<()> {
    let side: CoinflipSide = args
        .next("side")?
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let amount = args.number("amount")?;
    if amount <= 0.0 {
        bail!("amount must be positive");
    }

    let result = session.client.coinflip(side, amount).await?;
    if result.won {
        println!(
            "{} it landed {}, you won {}",
            "✓".green(),
            result.result,
            format::currency(result.payout)
        );
    } else {
        println!(
            "{} it landed {}, you lost {}",
            "✗".red(),
            result.result,
            format::currency(amount)
        );
    }
    println!("  Balance: {}", format::currency(result.new_balance));
    Ok(())
}

pub async fn slots(session: &mut Session, args: &mut Args) -> Result<()> {
    let amount = args.number("amount")?;
    if amount <= 0.0 {
        bail!("amount must be positive");
    }

    let result = session.client.slots(amount).await?;
    let reel = result
        .symbols
        .iter()
        .map(|id| format::slot_symbol(id))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("  [ {} ]", reel);

    if result.won {
        println!("{} you won {}", "✓".green(), format::currency(result.payout));
    } else {
        println!("{} you lost {}", "✗".red(), format::currency(amount));
    }
    println!("  Balance: {}", format::currency(result.new_balance));
    Ok(())
}
