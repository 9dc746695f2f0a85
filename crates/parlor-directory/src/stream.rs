use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header::AUTHORIZATION};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::{ChatDirectory, DirectoryError, DirectoryUser, token};

pub const DEFAULT_BASE_URL: &str = "https://chat.stream-io-api.com";

/// Stream Chat server-side REST client.
pub struct StreamDirectory {
    client: Client,
    base_url: String,
    api_key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<DirectoryUser>,
}

impl StreamDirectory {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Self, DirectoryError> {
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: token::server_token(api_secret)?,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .header(AUTHORIZATION, &self.token)
            .header("Stream-Auth-Type", "jwt")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, DirectoryError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| DirectoryError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ChatDirectory for StreamDirectory {
    async fn find_user(&self, id: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
        let payload = user_query_payload(id).to_string();
        let request = self
            .request(Method::GET, "/users")
            .query(&[("payload", payload.as_str())]);

        let data = self.send(request).await?;
        let users: UsersResponse =
            serde_json::from_value(data).map_err(|e| DirectoryError::Parse(e.to_string()))?;

        debug!("Directory query for {} returned {} users", id, users.users.len());
        Ok(users.users.into_iter().find(|u| u.id == id))
    }

    async fn upsert_user(&self, user: &DirectoryUser) -> Result<(), DirectoryError> {
        let request = self.request(Method::POST, "/users").json(&upsert_body(user));
        self.send(request).await?;
        debug!("Directory user {} upserted", user.id);
        Ok(())
    }

    async fn ensure_channel(
        &self,
        channel_type: &str,
        channel_id: &str,
        created_by: &str,
        members: &[&str],
    ) -> Result<(), DirectoryError> {
        // The query endpoint is get-or-create, so an existing channel succeeds.
        let path = format!("/channels/{}/{}/query", channel_type, channel_id);
        let request = self
            .request(Method::POST, &path)
            .json(&channel_body(created_by, members));
        self.send(request).await?;
        Ok(())
    }

    async fn send_message(
        &self,
        channel_type: &str,
        channel_id: &str,
        author_id: &str,
        text: &str,
    ) -> Result<(), DirectoryError> {
        let path = format!("/channels/{}/{}/message", channel_type, channel_id);
        let request = self
            .request(Method::POST, &path)
            .json(&message_body(author_id, text));
        self.send(request).await?;
        Ok(())
    }
}

fn user_query_payload(id: &str) -> Value {
    json!({
        "filter_conditions": { "id": { "$eq": id } },
        "limit": 1,
    })
}

fn upsert_body(user: &DirectoryUser) -> Value {
    let mut users = serde_json::Map::new();
    users.insert(user.id.clone(), json!(user));
    json!({ "users": users })
}

fn channel_body(created_by: &str, members: &[&str]) -> Value {
    json!({
        "data": {
            "created_by_id": created_by,
            "members": members,
        },
        "state": false,
    })
}

fn message_body(author_id: &str, text: &str) -> Value {
    json!({
        "message": {
            "text": text,
            "user": { "id": author_id },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_query_filters_on_exact_id() {
        let payload = user_query_payload("ann_x_com");
        assert_eq!(payload["filter_conditions"]["id"]["$eq"], "ann_x_com");
    }

    #[test]
    fn upsert_body_is_keyed_by_id() {
        let body = upsert_body(&DirectoryUser::new("ann_x_com", "Ann", "ann@x.com"));
        assert_eq!(body["users"]["ann_x_com"]["name"], "Ann");
        assert_eq!(body["users"]["ann_x_com"]["email"], "ann@x.com");
    }

    #[test]
    fn channel_body_lists_members() {
        let body = channel_body("ai_bot", &["ann_x_com", "ai_bot"]);
        assert_eq!(body["data"]["created_by_id"], "ai_bot");
        assert_eq!(body["data"]["members"], json!(["ann_x_com", "ai_bot"]));
    }

    #[test]
    fn message_body_names_author_as_user() {
        let body = message_body("ai_bot", "hello");
        assert_eq!(body["message"]["text"], "hello");
        assert_eq!(body["message"]["user"]["id"], "ai_bot");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let dir = StreamDirectory::new(Client::new(), "http://localhost:1/", "key", "secret").unwrap();
        assert_eq!(dir.base_url, "http://localhost:1");
    }
}
