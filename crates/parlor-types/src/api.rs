use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Request fields are optional on the wire so an absent field surfaces as a
// validation error with a readable message instead of a deserializer rejection.

// -- Registration --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

// -- Chat --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

// -- History --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_use_camel_case_and_tolerate_missing_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"userId":"ann_x_com"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("ann_x_com"));
        assert!(req.message.is_none());
    }

    #[test]
    fn register_response_serializes_user_id_camel_case() {
        let body = serde_json::to_value(RegisterResponse {
            user_id: "ann_x_com".into(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
        })
        .unwrap();
        assert_eq!(body["userId"], "ann_x_com");
        assert!(body.get("user_id").is_none());
    }
}
