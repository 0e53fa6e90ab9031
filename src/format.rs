use colored::{ColoredString, Colorize};

/// Render a currency amount rounded to 3 decimal places with the `$` glyph.
/// No locale handling, no thousands separators.
pub fn currency(x: f64) -> String {
    format!("${}", round3(x))
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Zero,
    Negative,
}

impl Direction {
    pub fn of(v: f64) -> Self {
        if v > 0.0 {
            Direction::Positive
        } else if v < 0.0 {
            Direction::Negative
        } else {
            Direction::Zero
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Direction::Positive => "^",
            Direction::Zero => "-",
            Direction::Negative => "v",
        }
    }
}

/// Render a directional value (24h change, P&L%) as `^ 5.20%`, `- 0.00%` or
/// `v 3.10%`, green / dimmed / red respectively.
pub fn change(v: f64) -> ColoredString {
    let text = format!("{} {:.2}%", Direction::of(v).marker(), v.abs());
    match Direction::of(v) {
        Direction::Positive => text.green(),
        Direction::Zero => text.dimmed(),
        Direction::Negative => text.red(),
    }
}

/// Glyph for a slot reel symbol. Unrecognized identifiers render a visible
/// placeholder rather than disappearing from the reel.
pub fn slot_symbol(id: &str) -> &'static str {
    match id {
        "wattesigma" => "Σ",
        "webx" => "🌐",
        "twoblade" => "⚔",
        "lyntr" => "🐦",
        "bussin" => "🚌",
        "subterfuge" => "🕵",
        _ => "?",
    }
}
