//! Query context passed into one reasoning session
//!
//! The hosting UI owns the chat history; the core only reads it. Nothing in
//! this module is retained across queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role of a prior conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Turn authored by the user
    User,
    /// Turn authored by the assistant
    Assistant,
}

/// One prior conversation turn, owned by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored the turn
    pub role: ChatRole,
    /// Turn text, reproduced verbatim in the prompt
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Input for one reasoning session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentQuery {
    /// Free-text company reference or question, any language
    pub input: String,

    /// Reference date for time-windowed data fetches
    pub today: NaiveDate,

    /// Prior turns, read-only context (never mutated by the core)
    pub chat_history: Vec<ChatTurn>,
}

impl AgentQuery {
    /// Create a query with no prior history
    pub fn new(input: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            input: input.into(),
            today,
            chat_history: Vec::new(),
        }
    }

    /// Attach prior conversation turns
    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.chat_history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_construction() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let query = AgentQuery::new("Analyze Amazon", today)
            .with_history(vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")]);

        assert_eq!(query.input, "Analyze Amazon");
        assert_eq!(query.chat_history.len(), 2);
        assert_eq!(query.chat_history[0].role, ChatRole::User);
    }

    #[test]
    fn test_query_serialization() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let query = AgentQuery::new("삼성전자 주가 분석해줘", today);
        let json = serde_json::to_string(&query).unwrap();
        let back: AgentQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back.input, query.input);
        assert_eq!(back.today, today);
    }
}
