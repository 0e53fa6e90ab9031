use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ApiClient, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinflipSide {
    Heads,
    Tails,
}

impl FromStr for CoinflipSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heads" => Ok(CoinflipSide::Heads),
            "tails" => Ok(CoinflipSide::Tails),
            other => Err(format!("invalid side '{}', expected heads or tails", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct CoinflipRequest {
    side: CoinflipSide,
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinflipResponse {
    pub won: bool,
    pub result: String,
    pub payout: f64,
    pub new_balance: f64,
}

#[derive(Debug, Serialize)]
struct SlotsRequest {
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub won: bool,
    pub symbols: Vec<String>,
    pub payout: f64,
    pub new_balance: f64,
}

impl ApiClient {
    pub async fn coinflip(
        &self,
        side: CoinflipSide,
        amount: f64,
    ) -> Result<CoinflipResponse, ClientError> {
        self.post("gambling/coinflip", &CoinflipRequest { side, amount })
            .await
    }

    pub async fn slots(&self, amount: f64) -> Result<SlotsResponse, ClientError> {
        self.post("gambling/slots", &SlotsRequest { amount }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("heads".parse::<CoinflipSide>().unwrap(), CoinflipSide::Heads);
        assert_eq!("TAILS".parse::<CoinflipSide>().unwrap(), CoinflipSide::Tails);
        assert!("edge".parse::<CoinflipSide>().is_err());
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CoinflipSide::Heads).unwrap(),
            r#""heads""#
        );
    }
}
