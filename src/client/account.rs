use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::market::image_mime;
use super::{deserialize_datetime, ApiClient, ClientError};

#[derive(Debug, Serialize)]
struct RedeemRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRewardResponse {
    pub reward_amount: f64,
    pub new_balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub read: bool,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub message: Option<String>,
}

/// Profile fields not set stay untouched server-side.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<(Vec<u8>, String)>,
}

/// The current user's profile as served by the page-data side channel.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
}

impl ApiClient {
    pub async fn redeem(&self, code: &str) -> Result<RedeemResponse, ClientError> {
        self.post("promo/verify", &RedeemRequest { code }).await
    }

    pub async fn claim_daily(&self) -> Result<DailyRewardResponse, ClientError> {
        self.send(self.build_request(Method::POST, "rewards/claim")?)
            .await
    }

    pub async fn notifications(&self) -> Result<NotificationsResponse, ClientError> {
        self.get("notifications").await
    }

    pub async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<SettingsResponse, ClientError> {
        let mut form = Form::new();
        if let Some(name) = update.name {
            form = form.text("name", name);
        }
        if let Some(username) = update.username {
            form = form.text("username", username);
        }
        if let Some(bio) = update.bio {
            form = form.text("bio", bio);
        }
        if let Some((bytes, filename)) = update.avatar {
            let part = Part::bytes(bytes)
                .file_name(filename.clone())
                .mime_str(image_mime(&filename))
                .map_err(|e| ClientError::Malformed(format!("invalid avatar mime type: {}", e)))?;
            form = form.part("avatar", part);
        }

        let request = self.build_request(Method::POST, "settings")?.multipart(form);
        self.send(request).await
    }

    /// Fetch the current user's profile from the page-data side channel.
    /// This endpoint lives outside the REST base path and serves the page's
    /// hydration payload rather than a plain JSON document.
    pub async fn my_profile(&self) -> Result<Profile, ClientError> {
        let payload: Value = self
            .send(self.build_site_request(Method::GET, "settings/__data.json")?)
            .await?;
        extract_profile(&payload)
    }
}

/// Resolve the user object out of a page-data payload.
///
/// The payload is a `nodes` array; each data node carries a flat value pool
/// where objects map field names to pool indices. We look for the node whose
/// root object has a `user` key and chase the indices down to strings.
fn extract_profile(payload: &Value) -> Result<Profile, ClientError> {
    let nodes = payload
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::Malformed("page data has no nodes array".into()))?;

    for node in nodes {
        let Some(pool) = node.get("data").and_then(Value::as_array) else {
            continue;
        };
        let Some(root) = pool.first().and_then(Value::as_object) else {
            continue;
        };
        let Some(user_idx) = root.get("user").and_then(Value::as_u64) else {
            continue;
        };
        let user = pool
            .get(user_idx as usize)
            .and_then(Value::as_object)
            .ok_or_else(|| ClientError::Malformed("user index points outside the pool".into()))?;

        let field = |key: &str| {
            user.get(key)
                .and_then(Value::as_u64)
                .and_then(|i| pool.get(i as usize))
                .and_then(Value::as_str)
                .map(String::from)
        };

        return Ok(Profile {
            name: field("name"),
            username: field("username"),
            bio: field("bio"),
        });
    }

    Err(ClientError::Malformed(
        "no user object in page data".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_profile_from_page_data() {
        let payload = json!({
            "type": "data",
            "nodes": [
                null,
                {
                    "type": "data",
                    "data": [
                        { "user": 1 },
                        { "name": 2, "username": 3, "bio": 4 },
                        "Face Dev",
                        "facedev",
                        "I make coins"
                    ]
                }
            ]
        });

        let profile = extract_profile(&payload).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Face Dev"));
        assert_eq!(profile.username.as_deref(), Some("facedev"));
        assert_eq!(profile.bio.as_deref(), Some("I make coins"));
    }

    #[test]
    fn missing_fields_become_none() {
        let payload = json!({
            "nodes": [
                { "type": "data", "data": [ { "user": 1 }, { "username": 2 }, "facedev" ] }
            ]
        });

        let profile = extract_profile(&payload).unwrap();
        assert_eq!(profile.username.as_deref(), Some("facedev"));
        assert!(profile.name.is_none());
        assert!(profile.bio.is_none());
    }

    #[test]
    fn payload_without_user_is_malformed() {
        let payload = json!({ "nodes": [ { "type": "data", "data": [ {} ] } ] });
        assert!(matches!(
            extract_profile(&payload),
            Err(ClientError::Malformed(_))
        ));
    }

    #[test]
    fn payload_without_nodes_is_malformed() {
        assert!(matches!(
            extract_profile(&json!({})),
            Err(ClientError::Malformed(_))
        ));
    }
}
