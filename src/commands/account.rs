use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::{Args, Session};
use crate::client::SettingsUpdate;
use crate::format;

/// Fields set to this literal are left untouched by `settings`.
const SKIP: &str = "none";

pub fn set_cookie(session: &mut Session, args: &mut Args) -> Result<()> {
    let value = args.rest("value")?;
    session.config.cookie = value.clone();
    session.config.save().context("Failed to persist config")?;
    session.client.set_cookie(&value);
    println!("{} cookie saved", "✓".green());
    Ok(())
}

pub async fn redeem(session: &mut Session, args: &mut Args) -> Result<()> {
    let code = args.next("code")?;
    let result = session.client.redeem(&code).await?;
    println!("{} {}", "✓".green(), result.message);
    Ok(())
}

pub async fn daily_reward(session: &mut Session) -> Result<()> {
    let result = session.client.claim_daily().await?;
    println!(
        "{} claimed {}",
        "✓".green(),
        format::currency(result.reward_amount)
    );
    println!("  Balance: {}", format::currency(result.new_balance));
    Ok(())
}

pub async fn me(session: &mut Session) -> Result<()> {
    let profile = session.client.my_profile().await?;
    let name = profile.name.as_deref().unwrap_or("(no display name)");
    let handle = profile.username.as_deref().unwrap_or("?");
    println!("  {} (@{})", name.bold(), handle);
    if let Some(bio) = &profile.bio {
        println!("  {}", bio.dimmed());
    }
    Ok(())
}

pub async fn notifications(session: &mut Session) -> Result<()> {
    let result = session.client.notifications().await?;
    if result.notifications.is_empty() {
        println!("  no notifications");
        return Ok(());
    }

    let (unread, read): (Vec<_>, Vec<_>) =
        result.notifications.iter().partition(|n| !n.read);

    if !unread.is_empty() {
        println!("  {}", "Unread".bold());
        for n in &unread {
            println!("    {} {}", n.created_at.format("%Y-%m-%d %H:%M"), n.message);
        }
    }
    if !read.is_empty() {
        println!("  {}", "Read".dimmed());
        for n in &read {
            println!(
                "    {} {}",
                n.created_at.format("%Y-%m-%d %H:%M"),
                n.message.as_str().dimmed()
            );
        }
    }
    Ok(())
}

pub async fn settings(session: &mut Session, args: &mut Args) -> Result<()> {
    let name = args.next("name|none")?;
    let username = args.next("username|none")?;
    let avatar_path = args.next("avatar-path|none")?;
    let bio = args.rest("bio|none")?;

    // Read the avatar before any network call so a bad path aborts cleanly.
    let avatar = if avatar_path != SKIP {
        let bytes = std::fs::read(&avatar_path)
            .with_context(|| format!("Failed to read avatar file '{}'", avatar_path))?;
        let filename = Path::new(&avatar_path)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("avatar.png")
            .to_string();
        Some((bytes, filename))
    } else {
        None
    };

    // The server wants a display name on every settings post; when the user
    // skips it we carry the current one over from the profile page data.
    let name = if name != SKIP {
        Some(name)
    } else {
        session.client.my_profile().await?.name
    };

    let update = SettingsUpdate {
        name,
        username: (username != SKIP).then_some(username),
        bio: (bio != SKIP).then_some(bio),
        avatar,
    };

    let result = session.client.update_settings(update).await?;
    match result.message {
        Some(message) => println!("{} {}", "✓".green(), message),
        None => println!("{} settings updated", "✓".green()),
    }
    Ok(())
}
