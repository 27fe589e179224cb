//! Message log of the chat view.
//!
//! User turns are recorded when a send succeeds; bot turns are appended from
//! inbound chat messages (see [`crate::ws::use_conversation`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::ws::ChatClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(Role::User, text.into())
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(Role::Bot, text.into())
    }

    fn push(&mut self, role: Role, text: String) -> &ChatTurn {
        self.turns.push(ChatTurn {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text,
            at: Utc::now(),
        });
        &self.turns[self.turns.len() - 1]
    }

    /// Publish `text` through `client` and record it as a user turn.
    ///
    /// Blank input is rejected. Nothing is recorded when the client refuses the
    /// message, so the view can keep the draft and show it as not sent.
    pub fn send(&mut self, client: &ChatClient, text: &str) -> Result<&ChatTurn, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        client.send_chat_message(text)?;
        Ok(self.push_user(text))
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_keep_order_and_roles() {
        let mut conversation = Conversation::new();
        conversation.push_user("How many sales last month?");
        conversation.push_bot("Thought: I need to fetch the schema...");

        let roles: Vec<_> = conversation.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot]);
        assert_eq!(
            conversation.last().map(|t| t.text.as_str()),
            Some("Thought: I need to fetch the schema...")
        );
        assert_ne!(conversation.turns()[0].id, conversation.turns()[1].id);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut conversation = Conversation::new();
        conversation.push_bot("hi");
        assert_eq!(conversation.len(), 1);
        conversation.clear();
        assert!(conversation.is_empty());
        assert!(conversation.last().is_none());
    }

    #[test]
    fn role_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
    }
}
