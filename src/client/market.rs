use std::str::FromStr;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::portfolio::Transaction;
use super::{ApiClient, ClientError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCoin {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub coins: Vec<MarketCoin>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            other => Err(format!("invalid trade side '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TradeRequest {
    #[serde(rename = "type")]
    side: TradeSide,
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub message: Option<String>,
    pub new_balance: f64,
    pub coin_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoinResponse {
    pub message: Option<String>,
    pub creation_fee: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub name: Option<String>,
    pub username: String,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub base_currency_balance: f64,
    pub holdings_value: f64,
    pub total_portfolio_value: f64,
    pub profit_loss_percent: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub profile: PublicProfile,
    pub stats: UserStats,
    pub created_coins: Vec<MarketCoin>,
    pub recent_transactions: Vec<Transaction>,
}

impl ApiClient {
    /// Paginated coin listing, sorted by market cap descending server-side.
    pub async fn market(
        &self,
        page: &str,
        search: &str,
        limit: u32,
    ) -> Result<MarketResponse, ClientError> {
        let request = self.build_request(Method::GET, "market")?.query(&[
            ("page", page),
            ("search", search),
            ("limit", &limit.to_string()),
            ("sortBy", "marketCap"),
            ("sortOrder", "desc"),
        ]);
        self.send(request).await
    }

    pub async fn trade(
        &self,
        symbol: &str,
        side: TradeSide,
        amount: f64,
    ) -> Result<TradeResponse, ClientError> {
        self.post(
            &format!("coin/{}/trade", symbol),
            &TradeRequest { side, amount },
        )
        .await
    }

    /// Create a coin, uploading its icon as multipart form data.
    pub async fn create_coin(
        &self,
        name: &str,
        symbol: &str,
        icon: Vec<u8>,
        icon_filename: &str,
    ) -> Result<CreateCoinResponse, ClientError> {
        let part = Part::bytes(icon)
            .file_name(icon_filename.to_string())
            .mime_str(image_mime(icon_filename))
            .map_err(|e| ClientError::Malformed(format!("invalid icon mime type: {}", e)))?;
        let form = Form::new()
            .text("name", name.to_string())
            .text("symbol", symbol.to_string())
            .part("icon", part);

        let request = self.build_request(Method::POST, "coin/create")?.multipart(form);
        self.send(request).await
    }

    pub async fn user(&self, username: &str) -> Result<UserResponse, ClientError> {
        self.get(&format!("user/{}", username)).await
    }
}

pub(crate) fn image_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), r#""BUY""#);
        assert_eq!(serde_json::to_string(&TradeSide::Sell).unwrap(), r#""SELL""#);
    }

    #[test]
    fn trade_request_uses_type_key() {
        let body = serde_json::to_string(&TradeRequest {
            side: TradeSide::Buy,
            amount: 2.5,
        })
        .unwrap();
        assert_eq!(body, r#"{"type":"BUY","amount":2.5}"#);
    }

    #[test]
    fn image_mime_from_extension() {
        assert_eq!(image_mime("icon.png"), "image/png");
        assert_eq!(image_mime("photo.JPEG"), "image/jpeg");
        assert_eq!(image_mime("noext"), "application/octet-stream");
    }

    #[test]
    fn market_coin_decodes_camel_case() {
        let coin: MarketCoin = serde_json::from_str(
            r#"{"symbol":"TEST","name":"Test Coin","currentPrice":1.5,
                "change24h":-2.25,"marketCap":1000.0,"volume24h":42.0}"#,
        )
        .unwrap();
        assert_eq!(coin.symbol, "TEST");
        assert_eq!(coin.change_24h, -2.25);
    }
}
