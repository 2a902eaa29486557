use log::{ error, warn };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use crate::config::responses::ResponseConfig;
use crate::history::{ self, ConversationStore };
use crate::models::chat::{ Exchange, Message, Sender };
use crate::responder::Responder;
use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The exchange completed; both messages were appended.
    Completed(Exchange),
    /// Input was empty after trimming; nothing changed.
    IgnoredEmpty,
    /// A reply is already pending; the submission was dropped.
    RejectedBusy,
}

struct SessionInner {
    store: ConversationStore,
    state: SessionState,
}

/// Composition root for one chat session. Owns the state machine
/// (`Idle` ⇄ `AwaitingResponse`), drives the responder after the simulated
/// latency, and persists the history log after every completed exchange.
///
/// The inner state sits behind a mutex that is released for the duration of
/// the latency window, so submissions arriving while a reply is pending can
/// be observed and rejected, and a reset during that window takes effect
/// immediately while the in-flight reply still lands afterwards.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Mutex<SessionInner>>,
    responder: Arc<dyn Responder>,
    storage: Arc<dyn KeyValueStore>,
    config: Arc<ResponseConfig>,
    history_key: String,
    reply_delay: Duration,
}

impl ChatSession {
    /// Builds a session seeded with the initial greeting and any history log
    /// previously persisted under `history_key`.
    pub async fn new(
        responder: Arc<dyn Responder>,
        storage: Arc<dyn KeyValueStore>,
        config: Arc<ResponseConfig>,
        history_key: impl Into<String>,
        reply_delay: Duration
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let history_key = history_key.into();
        let mut store = ConversationStore::new(&config.greeting);
        store.load(storage.as_ref(), &history_key).await?;

        Ok(Self {
            inner: Arc::new(Mutex::new(SessionInner { store, state: SessionState::Idle })),
            responder,
            storage,
            config,
            history_key,
            reply_delay,
        })
    }

    /// Submits one user utterance and resolves its reply.
    ///
    /// Empty input (after trimming) is ignored with no state change. A
    /// submission while another reply is pending is rejected. Otherwise the
    /// user message is appended, the session awaits the simulated latency,
    /// and the assistant message is appended together with one history
    /// entry. A resolver fault substitutes the apology reply and is not
    /// recorded in the history log; either way the session returns to Idle.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        let user_message = Message::now(Sender::User, trimmed);
        {
            let mut inner = self.inner.lock().await;
            if inner.state == SessionState::AwaitingResponse {
                return SubmitOutcome::RejectedBusy;
            }
            inner.state = SessionState::AwaitingResponse;
            inner.store.append(user_message.clone());
        }

        tokio::time::sleep(self.reply_delay).await;

        let (reply, faulted) = match self.responder.resolve(trimmed) {
            Ok(reply) => (reply, false),
            Err(e) => {
                error!("Error resolving reply: {}", e);
                (self.config.apology_reply.clone(), true)
            }
        };

        let assistant_message = Message::now(Sender::Assistant, &reply);
        let mut inner = self.inner.lock().await;
        inner.store.append(assistant_message.clone());
        if !faulted {
            inner.store.record_exchange(trimmed, &reply, assistant_message.timestamp);
        }
        inner.state = SessionState::Idle;
        if let Err(e) = inner.store.save(self.storage.as_ref(), &self.history_key).await {
            warn!("History write failed: {}", e);
        }

        SubmitOutcome::Completed(Exchange { user: user_message, assistant: assistant_message })
    }

    /// Starts a new session: the visible sequence becomes a single fresh
    /// greeting and the persisted history log is emptied. The awaiting flag
    /// is deliberately left alone; a reply already in flight lands in the
    /// fresh session, matching the reference behavior.
    pub async fn reset(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut inner = self.inner.lock().await;
        inner.store.reset(&self.config.reset_greeting);
        inner.store.save(self.storage.as_ref(), &self.history_key).await
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.store.messages().to_vec()
    }

    pub async fn history(&self) -> Vec<crate::models::chat::HistoryEntry> {
        self.inner.lock().await.store.history().to_vec()
    }

    /// Renders the current history log as a plain-text transcript.
    pub async fn transcript(&self) -> String {
        let inner = self.inner.lock().await;
        history::format_transcript(inner.store.history())
    }
}
