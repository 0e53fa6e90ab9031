use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{deserialize_datetime, ApiClient, ClientError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub base_currency_balance: f64,
    pub coin_value: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub current_price: f64,
    pub value: f64,
    pub change_24h: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotalResponse {
    pub base_currency_balance: f64,
    pub total_value: f64,
    pub coin_holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub coin_symbol: String,
    pub quantity: f64,
    pub price_per_coin: Option<f64>,
    pub total_value: Option<f64>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

impl ApiClient {
    pub async fn summary(&self) -> Result<SummaryResponse, ClientError> {
        self.get("portfolio/summary").await
    }

    pub async fn portfolio_total(&self) -> Result<PortfolioTotalResponse, ClientError> {
        self.get("portfolio/total").await
    }

    pub async fn transactions(&self) -> Result<TransactionsResponse, ClientError> {
        self.get("transactions").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_decodes_server_shape() {
        let tx: Transaction = serde_json::from_str(
            r#"{"type":"BUY","coinSymbol":"TEST","quantity":10.0,
                "pricePerCoin":0.5,"totalValue":5.0,
                "timestamp":"2025-11-20T05:28:45.444128"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, "BUY");
        assert_eq!(tx.coin_symbol, "TEST");
        assert_eq!(tx.total_value, Some(5.0));
    }

    #[test]
    fn holding_decodes_camel_case() {
        let holding: Holding = serde_json::from_str(
            r#"{"symbol":"TEST","name":"Test Coin","quantity":3.0,
                "currentPrice":2.0,"value":6.0,"change24h":0.0}"#,
        )
        .unwrap();
        assert_eq!(holding.value, 6.0);
    }
}
