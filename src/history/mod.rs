use chrono::{ DateTime, Local, NaiveDate, TimeZone };
use log::error;
use std::error::Error;
use crate::models::chat::{ HistoryEntry, Message, Sender };
use crate::storage::KeyValueStore;

/// Owns the visible message sequence shown on screen and the history log of
/// completed exchanges. The two sequences have distinct lifecycles: the
/// visible one always starts from a greeting, the history log is what gets
/// persisted and exported.
pub struct ConversationStore {
    messages: Vec<Message>,
    history: Vec<HistoryEntry>,
}

impl ConversationStore {
    pub fn new(greeting: &str) -> Self {
        Self {
            messages: vec![Message::now(Sender::Assistant, greeting)],
            history: Vec::new(),
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn record_exchange(&mut self, user_text: &str, assistant_text: &str, timestamp: i64) {
        self.history.push(HistoryEntry {
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
            timestamp,
        });
    }

    /// Starts a new session: a single fresh greeting and an empty history
    /// log, regardless of prior state.
    pub fn reset(&mut self, greeting: &str) {
        self.messages = vec![Message::now(Sender::Assistant, greeting)];
        self.history.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Loads the persisted history log from `store`. Malformed stored data
    /// must not prevent the session from starting: it is logged and treated
    /// as no prior history.
    pub async fn load(
        &mut self,
        store: &dyn KeyValueStore,
        key: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(raw) = store.get(key).await? {
            match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(history) => {
                    self.history = history;
                }
                Err(e) => {
                    error!("Error loading conversation history: {}", e);
                    self.history = Vec::new();
                }
            }
        }
        Ok(())
    }

    /// Rewrites the persisted history log in full.
    pub async fn save(
        &self,
        store: &dyn KeyValueStore,
        key: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let serialized = serde_json::to_string(&self.history)?;
        store.set(key, &serialized).await
    }
}

/// Renders the history log as a plain-text transcript, one block per
/// exchange followed by a separator line.
pub fn format_transcript(history: &[HistoryEntry]) -> String {
    history
        .iter()
        .map(|entry| {
            format!(
                "المستخدم ({}): {}\nBoAI: {}\n{}",
                format_local_timestamp(entry.timestamp),
                entry.user_text,
                entry.assistant_text,
                "-".repeat(50)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name for an exported transcript, dated with the current day.
pub fn transcript_filename(date: NaiveDate) -> String {
    format!("boai_conversation_{}.txt", date.format("%Y-%m-%d"))
}

fn format_local_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(local) => format_datetime(local),
        None => timestamp.to_string(),
    }
}

fn format_datetime(dt: DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
