use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::filter::MessageFilter;
use super::guard::SendGuard;
use crate::config::ChatLimits;
use crate::errors::{AppError, AppResult};
use crate::util::{char_len, Clock};

/// A retained chat message as readers see it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub is_from_operator: bool,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Unvalidated input to [`ChatStore::append`].
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub author: String,
    pub body: String,
    pub is_from_operator: bool,
    pub owner_id: Option<String>,
}

impl NewMessage {
    pub fn participant(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn operator(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            is_from_operator: true,
            ..Self::default()
        }
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner_id = Some(owner.into());
        self
    }

    /// Key the send guard throttles on.  Operators are keyed apart from
    /// participants so an operator reply never trips a participant's window.
    fn sender_key(&self, author: &str) -> String {
        if self.is_from_operator {
            format!("operator:{}", author)
        } else {
            match self.owner_id.as_deref() {
                Some(owner) => owner.to_owned(),
                None => author.to_owned(),
            }
        }
    }
}

/// Bounded, process-local message log.
///
/// Appends are validated, moderated and throttled before they reach the
/// log.  Insert and eviction happen under a single lock, so readers never
/// observe more than `cap` messages.
pub struct ChatStore {
    name: &'static str,
    limits: ChatLimits,
    filter: Arc<MessageFilter>,
    guard: SendGuard,
    clock: Arc<dyn Clock>,
    messages: Mutex<VecDeque<Message>>,
}

impl ChatStore {
    pub fn new(
        name: &'static str,
        limits: ChatLimits,
        filter: Arc<MessageFilter>,
        guard: SendGuard,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            limits,
            filter,
            guard,
            clock,
            messages: Mutex::new(VecDeque::with_capacity(limits.cap)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limits(&self) -> ChatLimits {
        self.limits
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate(&self, msg: &NewMessage) -> AppResult<(String, String)> {
        let author = msg.author.trim();
        let body = msg.body.trim();
        if author.is_empty() {
            return Err(AppError::validation("author is required"));
        }
        if body.is_empty() {
            return Err(AppError::validation("body is required"));
        }
        if char_len(author) > self.limits.max_author_chars {
            return Err(AppError::validation(format!(
                "author must be at most {} characters",
                self.limits.max_author_chars
            )));
        }
        if char_len(body) > self.limits.max_body_chars {
            return Err(AppError::validation(format!(
                "body must be at most {} characters",
                self.limits.max_body_chars
            )));
        }
        if let Some(owner) = msg.owner_id.as_deref() {
            if owner.trim().is_empty() {
                return Err(AppError::validation("owner id must not be blank"));
            }
        }
        Ok((author.to_owned(), body.to_owned()))
    }

    /// Validate, moderate, throttle and store a message.  Returns the stored
    /// record.
    pub fn append(&self, msg: NewMessage) -> AppResult<Message> {
        let (author, body) = self.validate(&msg)?;
        let body = self.filter.filter(&body);
        let now = self.clock.now();
        let sender = msg.sender_key(&author);
        if let Err(retry_after_ms) = self.guard.try_acquire(&sender, now) {
            tracing::debug!(store = self.name, sender = %sender, retry_after_ms, "send throttled");
            return Err(AppError::RateLimited { retry_after_ms });
        }

        let mut messages = self.lock();
        let created_at = match messages.back() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };
        let stored = Message {
            id: Uuid::new_v4().to_string(),
            author,
            body,
            created_at,
            is_from_operator: msg.is_from_operator,
            is_read: false,
            owner_id: msg.owner_id.map(|o| o.trim().to_owned()),
        };
        messages.push_back(stored.clone());
        let mut evicted = 0usize;
        while messages.len() > self.limits.cap {
            messages.pop_front();
            evicted += 1;
        }
        drop(messages);
        if evicted > 0 {
            tracing::trace!(store = self.name, evicted, "evicted oldest messages");
        }
        Ok(stored)
    }

    pub fn list_all(&self) -> Vec<Message> {
        self.lock().iter().cloned().collect()
    }

    /// A participant's own thread plus every operator message.  Operator
    /// messages are not partitioned per participant.
    pub fn list_for(&self, participant: &str) -> Vec<Message> {
        self.lock()
            .iter()
            .filter(|m| m.is_from_operator || m.owner_id.as_deref() == Some(participant))
            .cloned()
            .collect()
    }

    /// Mark every unread message matching `predicate` as read.  Returns how
    /// many flipped; already-read messages are never touched.
    pub fn mark_all_read<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Message) -> bool,
    {
        let mut flipped = 0;
        for m in self.lock().iter_mut() {
            if !m.is_read && predicate(m) {
                m.is_read = true;
                flipped += 1;
            }
        }
        flipped
    }

    /// Unread participant messages, i.e. what the operator has yet to see.
    pub fn unread_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|m| !m.is_from_operator && !m.is_read)
            .count()
    }

    /// Distinct non-operator authors among retained messages.
    pub fn participant_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|m| !m.is_from_operator)
            .map(|m| m.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Predicate used by the operator "mark read" action.
pub fn unread_from_participant(m: &Message) -> bool {
    !m.is_from_operator && !m.is_read
}
