use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One conversational turn. Immutable once appended to a session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub web_results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_used: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
            web_results: Vec::new(),
            processing_time: None,
            provider_used: None,
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<String>,
        web_results: Vec<SearchResult>,
        processing_time: f64,
        provider_used: String,
    ) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            sources,
            web_results,
            processing_time: Some(processing_time),
            provider_used: Some(provider_used),
        }
    }
}

/// Bounded per-session conversation history. Oldest messages are evicted
/// first once the bound is reached; the bound is never exceeded.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
}

impl Session {
    pub fn new(id: impl Into<String>, max_messages: usize) -> Self {
        Self {
            id: id.into(),
            messages: VecDeque::with_capacity(max_messages.min(64)),
            max_messages: max_messages.max(1),
        }
    }

    pub fn append(&mut self, message: ChatMessage) {
        while self.messages.len() >= self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// The last `n` messages in conversation order.
    pub fn recent(&self, n: usize) -> Vec<&ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).collect()
    }

    pub fn recent_questions(&self, n: usize) -> Vec<String> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.role == ChatRole::User)
            .take(n)
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }
}
