use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::{Config, UNSET_COOKIE};

mod account;
mod gambling;
mod market;
mod portfolio;

pub use account::SettingsUpdate;
pub use gambling::CoinflipSide;
pub use market::{TradeResponse, TradeSide};

const BASE_URL: &str = "https://rugplay.com/api";
const SITE_URL: &str = "https://rugplay.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Everything that can go wrong talking to the service. Handlers report these
/// and return to the prompt; none of them should ever crash the session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated: set a session cookie with `set-cookie` first")]
    NotAuthenticated,
    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub struct ApiClient {
    http: Client,
    cookie: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            cookie: config.cookie.clone(),
        })
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        self.cookie = cookie.to_string();
    }

    /// Build a request against the REST API. The sentinel-cookie check lives
    /// here so no endpoint can reach the network unauthenticated.
    fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        self.build_url_request(method, &format!("{}/{}", BASE_URL, path))
    }

    /// Build a request against the site itself (the page-data side channel
    /// lives outside the REST base path).
    fn build_site_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        self.build_url_request(method, &format!("{}/{}", SITE_URL, path))
    }

    fn build_url_request(&self, method: Method, url: &str) -> Result<RequestBuilder, ClientError> {
        if self.cookie == UNSET_COOKIE {
            return Err(ClientError::NotAuthenticated);
        }

        Ok(self
            .http
            .request(method, url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &self.cookie)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(header::ORIGIN, SITE_URL))
    }

    /// Send a built request and decode the JSON body into `T`. Non-2xx
    /// responses surface as `Api` with the body text; decode failures are
    /// `Malformed` rather than a crash.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api { status, body });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Malformed(format!("{} (body: {})", e, truncate(&body))))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.build_request(Method::GET, path)?).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.build_request(Method::POST, path)?.json(body))
            .await
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

pub(crate) fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    // The server emits ISO 8601, sometimes without timezone info.
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",    // Without
    ];

    for format in &formats {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(&s, format) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    Err(serde::de::Error::custom(format!(
        "Failed to parse datetime: {}",
        s
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unauthenticated_client() -> ApiClient {
        ApiClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn sentinel_cookie_blocks_request_construction() {
        let client = unauthenticated_client();
        assert!(matches!(
            client.build_request(Method::GET, "market"),
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.build_site_request(Method::GET, "settings/__data.json"),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn sentinel_cookie_fails_endpoints_before_any_network_io() {
        let client = unauthenticated_client();
        assert!(matches!(
            client.summary().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.coinflip(CoinflipSide::Heads, 1.0).await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.market("1", "", 6).await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[test]
    fn real_cookie_passes_the_guard() {
        let mut client = unauthenticated_client();
        client.set_cookie("session=abc123");
        assert!(client.build_request(Method::GET, "market").is_ok());
    }

    #[test]
    fn datetime_parses_with_and_without_timezone() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_datetime")]
            at: DateTime<Utc>,
        }

        let with_tz: Wrapper = serde_json::from_str(r#"{"at":"2025-11-20T05:28:45Z"}"#).unwrap();
        let naive: Wrapper =
            serde_json::from_str(r#"{"at":"2025-11-20T05:28:45.444128"}"#).unwrap();
        assert_eq!(with_tz.at.timestamp(), naive.at.timestamp());

        assert!(serde_json::from_str::<Wrapper>(r#"{"at":"yesterday"}"#).is_err());
    }
}
