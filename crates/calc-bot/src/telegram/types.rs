//! Bot API wire types
//!
//! Only the fields the bot reads are modelled; serde ignores the rest.

use crate::error::{BotError, Result};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the result, mapping `ok: false` to [`BotError::ApiError`]
    pub fn into_result(self) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(BotError::ApiError {
                code: 0,
                description: "response without result".to_string(),
            }),
            (false, _) => Err(BotError::ApiError {
                code: self.error_code.unwrap_or(0),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }
}

/// One incoming update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat a message belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A Telegram user or bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// `@username` if set, otherwise the first name
    pub fn handle(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None => self.first_name.clone(),
        }
    }
}

/// Reply target of an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    /// Still send if the original was deleted meanwhile
    pub allow_sending_without_reply: bool,
}

/// `sendMessage` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,
}

impl OutgoingMessage {
    /// Plain message to a chat
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_parameters: None,
        }
    }

    /// Reply quoting `message` in its chat
    pub fn reply_to(message: &Message, text: impl Into<String>) -> Self {
        Self {
            chat_id: message.chat.id,
            text: text.into(),
            reply_parameters: Some(ReplyParameters {
                message_id: message.message_id,
                allow_sending_without_reply: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATES: &str = r#"{
        "ok": true,
        "result": [
            {
                "update_id": 100,
                "message": {
                    "message_id": 7,
                    "from": {"id": 42, "is_bot": false, "first_name": "Ann", "language_code": "en"},
                    "chat": {"id": 42, "type": "private", "first_name": "Ann"},
                    "date": 1700000000,
                    "text": "2 + 3"
                }
            },
            {
                "update_id": 101,
                "edited_message": {"message_id": 7}
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_updates() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(UPDATES).unwrap();
        let updates = response.into_result().unwrap();

        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.text.as_deref(), Some("2 + 3"));
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.chat.kind, "private");
        assert_eq!(message.from.as_ref().unwrap().first_name, "Ann");
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<User> = serde_json::from_str(json).unwrap();

        match response.into_result() {
            Err(BotError::ApiError { code, description }) => {
                assert_eq!(code, 401);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_serialization() {
        let message = Message {
            message_id: 7,
            chat: Chat {
                id: -100,
                kind: "group".to_string(),
                username: None,
            },
            from: None,
            date: 0,
            text: Some("1+1".to_string()),
        };

        let json = serde_json::to_value(OutgoingMessage::reply_to(&message, "✅ Result: 2")).unwrap();
        assert_eq!(json["chat_id"], -100);
        assert_eq!(json["text"], "✅ Result: 2");
        assert_eq!(json["reply_parameters"]["message_id"], 7);
        assert_eq!(json["reply_parameters"]["allow_sending_without_reply"], true);

        let json = serde_json::to_value(OutgoingMessage::new(1, "hi")).unwrap();
        assert!(json.get("reply_parameters").is_none());
    }

    #[test]
    fn test_user_handle() {
        let mut user = User {
            id: 1,
            is_bot: true,
            first_name: "Calc".to_string(),
            username: Some("calc_bot".to_string()),
        };
        assert_eq!(user.handle(), "@calc_bot");
        user.username = None;
        assert_eq!(user.handle(), "Calc");
    }
}
