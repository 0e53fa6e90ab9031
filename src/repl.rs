use anyhow::Result;
use colored::Colorize;
use inquire::{InquireError, Text};

use crate::commands::{self, Session};

/// Read-eval-print loop: print the command list once, then prompt until the
/// input stream ends. A failing command is reported and the loop continues;
/// nothing a command does can end the session.
pub async fn run(mut session: Session) -> Result<()> {
    println!("{}", "Available commands:".bold());
    commands::list_commands();

    loop {
        let line = match Text::new(">").prompt() {
            Ok(line) => line,
            Err(
                InquireError::OperationCanceled
                | InquireError::OperationInterrupted
                | InquireError::NotTTY,
            ) => break,
            Err(e) => return Err(e.into()),
        };

        let mut tokens = tokenize(&line).into_iter();
        let Some(name) = tokens.next() else {
            continue;
        };

        if let Err(e) = commands::dispatch(&name, tokens.collect(), &mut session).await {
            println!("{} {:#}", "✗".red(), e);
        }
    }
    Ok(())
}

fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_any_whitespace() {
        assert_eq!(tokenize("coinflip heads 5"), ["coinflip", "heads", "5"]);
        assert_eq!(tokenize("  set-cookie   a b  "), ["set-cookie", "a", "b"]);
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }
}
