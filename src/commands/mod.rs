use anyhow::{bail, Result};
use colored::Colorize;

use crate::client::ApiClient;
use crate::config::Config;

mod account;
mod gambling;
mod market;
mod portfolio;

/// Shared state for one interactive session: the loaded config and the API
/// client built from it. `set-cookie` mutates both.
pub struct Session {
    pub config: Config,
    pub client: ApiClient,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }
}

pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub description: &'static str,
}

/// Declaration order is listing order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "commands",
        params: &[],
        description: "List every command with its parameters",
    },
    CommandSpec {
        name: "set-cookie",
        params: &["value..."],
        description: "Store the session cookie used for API calls",
    },
    CommandSpec {
        name: "coinflip",
        params: &["side", "amount"],
        description: "Wager on a coin flip (heads or tails)",
    },
    CommandSpec {
        name: "slots",
        params: &["amount"],
        description: "Spin the slot machine",
    },
    CommandSpec {
        name: "summary",
        params: &[],
        description: "Show your portfolio summary",
    },
    CommandSpec {
        name: "redeem",
        params: &["code"],
        description: "Redeem a promo code",
    },
    CommandSpec {
        name: "new-coin",
        params: &["name", "symbol", "icon-path"],
        description: "Create a coin with an icon image",
    },
    CommandSpec {
        name: "settings",
        params: &["name|none", "username|none", "avatar-path|none", "bio...|none"],
        description: "Update profile fields (pass none to leave one alone)",
    },
    CommandSpec {
        name: "me",
        params: &[],
        description: "Show your display name, handle and bio",
    },
    CommandSpec {
        name: "daily-reward",
        params: &[],
        description: "Claim the daily reward",
    },
    CommandSpec {
        name: "notifications",
        params: &[],
        description: "List unread and read notifications",
    },
    CommandSpec {
        name: "invest",
        params: &["budget", "amount-per-coin", "[page]"],
        description: "Buy each coin on the top market page for amount-per-coin",
    },
    CommandSpec {
        name: "view-user",
        params: &["username"],
        description: "Show a user's profile, stats, coins and recent trades",
    },
    CommandSpec {
        name: "market",
        params: &["[page]", "[search...]"],
        description: "List coins sorted by market cap",
    },
    CommandSpec {
        name: "buy-coin",
        params: &["symbol", "amount"],
        description: "Buy the given dollar amount of a coin",
    },
    CommandSpec {
        name: "sell-coin",
        params: &["symbol", "amount"],
        description: "Sell the given dollar amount of a coin",
    },
    CommandSpec {
        name: "portfolio",
        params: &[],
        description: "Show holdings and transaction history",
    },
];

/// Look up the command by name and run its handler. Unknown names are
/// reported here; handler failures bubble up for the REPL to print.
pub async fn dispatch(name: &str, tokens: Vec<String>, session: &mut Session) -> Result<()> {
    let mut args = Args::new(tokens);
    match name {
        "commands" => {
            list_commands();
            Ok(())
        }
        "set-cookie" => account::set_cookie(session, &mut args),
        "coinflip" => gambling::coinflip(session, &mut args).await,
        "slots" => gambling::slots(session, &mut args).await,
        "summary" => portfolio::summary(session).await,
        "redeem" => account::redeem(session, &mut args).await,
        "new-coin" => market::new_coin(session, &mut args).await,
        "settings" => account::settings(session, &mut args).await,
        "me" => account::me(session).await,
        "daily-reward" => account::daily_reward(session).await,
        "notifications" => account::notifications(session).await,
        "invest" => market::invest(session, &mut args).await,
        "view-user" => market::view_user(session, &mut args).await,
        "market" => market::market(session, &mut args).await,
        "buy-coin" => market::buy_coin(session, &mut args).await,
        "sell-coin" => market::sell_coin(session, &mut args).await,
        "portfolio" => portfolio::portfolio(session).await,
        _ => {
            println!("{} unknown command: {}", "✗".red(), name);
            Ok(())
        }
    }
}

pub fn list_commands() {
    for spec in COMMANDS {
        let params = spec
            .params
            .iter()
            .map(|p| format!("<{}>", p))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {} {}\n      {}",
            spec.name.bold(),
            params.dimmed(),
            spec.description
        );
    }
}

/// Positional argument cursor. The last declared parameter of a command may
/// be greedy: `rest` joins every remaining token with single spaces.
pub struct Args {
    tokens: Vec<String>,
    pos: usize,
}

impl Args {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn next(&mut self, param: &str) -> Result<String> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => bail!("missing argument <{}>", param),
        }
    }

    pub fn opt_next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Greedy: consume every remaining token as one free-text value.
    pub fn rest(&mut self, param: &str) -> Result<String> {
        let joined = self.opt_rest();
        match joined {
            Some(value) => Ok(value),
            None => bail!("missing argument <{}>", param),
        }
    }

    pub fn opt_rest(&mut self) -> Option<String> {
        if self.pos >= self.tokens.len() {
            return None;
        }
        let joined = self.tokens[self.pos..].join(" ");
        self.pos = self.tokens.len();
        Some(joined)
    }

    /// A numeric argument must parse cleanly; there is no NaN fallthrough.
    pub fn number(&mut self, param: &str) -> Result<f64> {
        let token = self.next(param)?;
        let value: f64 = token
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid number for <{}>: '{}'", param, token))?;
        if !value.is_finite() {
            bail!("invalid number for <{}>: '{}'", param, token);
        }
        Ok(value)
    }

    pub fn page(&mut self) -> Result<String> {
        match self.opt_next() {
            Some(token) => {
                let page: u32 = token
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid page number '{}'", token))?;
                Ok(page.to_string())
            }
            None => Ok("1".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Args {
        Args::new(tokens.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn next_yields_tokens_in_order() {
        let mut a = args(&["heads", "5"]);
        assert_eq!(a.next("side").unwrap(), "heads");
        assert_eq!(a.next("amount").unwrap(), "5");
        assert!(a.next("more").is_err());
    }

    #[test]
    fn rest_joins_remaining_tokens_with_spaces() {
        let mut a = args(&["my", "new", "bio", "text"]);
        assert_eq!(a.rest("bio").unwrap(), "my new bio text");
        assert!(a.rest("bio").is_err());
    }

    #[test]
    fn rest_after_positional_args() {
        let mut a = args(&["2", "dog", "coin"]);
        assert_eq!(a.next("page").unwrap(), "2");
        assert_eq!(a.opt_rest().as_deref(), Some("dog coin"));
    }

    #[test]
    fn number_rejects_garbage() {
        assert!(args(&["abc"]).number("amount").is_err());
        assert!(args(&["NaN"]).number("amount").is_err());
        assert!(args(&["inf"]).number("amount").is_err());
        assert_eq!(args(&["12.5"]).number("amount").unwrap(), 12.5);
    }

    #[test]
    fn missing_number_is_reported_by_name() {
        let err = args(&[]).number("amount").unwrap_err();
        assert!(err.to_string().contains("<amount>"));
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(args(&[]).page().unwrap(), "1");
        assert_eq!(args(&["3"]).page().unwrap(), "3");
        assert!(args(&["three"]).page().is_err());
    }

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[tokio::test]
    async fn unknown_command_is_reported_without_side_effects() {
        let mut session = Session::new(Config::default()).unwrap();
        dispatch("foobar", vec![], &mut session).await.unwrap();
        assert_eq!(session.config.cookie, crate::config::UNSET_COOKIE);
    }
}
