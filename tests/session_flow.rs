#[cfg(test)]
mod tests {
    use boai_chat::config::responses::{ ResponseConfig, APOLOGY_REPLY, FALLBACK_REPLY };
    use boai_chat::models::chat::Sender;
    use boai_chat::responder::{ KeywordResponder, Responder };
    use boai_chat::session::{ ChatSession, SessionState, SubmitOutcome };
    use boai_chat::storage::{ KeyValueStore, MemoryStore };
    use std::error::Error;
    use std::sync::Arc;
    use std::time::Duration;

    struct FaultyResponder;

    impl Responder for FaultyResponder {
        fn resolve(&self, _input: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
            Err("resolver blew up".into())
        }
    }

    async fn session_with(
        responder: Arc<dyn Responder>,
        delay_ms: u64
    ) -> ChatSession {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let config = Arc::new(ResponseConfig::builtin());
        ChatSession::new(
            responder,
            storage,
            config,
            "boai_conversation_history",
            Duration::from_millis(delay_ms)
        ).await.unwrap()
    }

    async fn keyword_session(delay_ms: u64) -> ChatSession {
        let responder = Arc::new(KeywordResponder::new(Arc::new(ResponseConfig::builtin())));
        session_with(responder, delay_ms).await
    }

    #[tokio::test]
    async fn python_submission_gets_the_python_reply() {
        let session = keyword_session(0).await;

        let outcome = session.submit("python").await;
        let exchange = match outcome {
            SubmitOutcome::Completed(exchange) => exchange,
            other => panic!("expected completion, got {:?}", other),
        };

        assert!(exchange.assistant.text.contains("بايثون"));
        // greeting + user + assistant
        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].sender, Sender::Assistant);
        assert_eq!(session.history().await.len(), 1);
        assert_eq!(session.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn unmatched_submission_gets_the_fallback_reply() {
        let session = keyword_session(0).await;

        match session.submit("xyzzy").await {
            SubmitOutcome::Completed(exchange) => {
                assert_eq!(exchange.assistant.text, FALLBACK_REPLY);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_submissions_are_silently_ignored() {
        let session = keyword_session(0).await;
        let before = session.messages().await.len();

        assert!(matches!(session.submit("").await, SubmitOutcome::IgnoredEmpty));
        assert!(matches!(session.submit("   \t ").await, SubmitOutcome::IgnoredEmpty));

        assert_eq!(session.messages().await.len(), before);
        assert_eq!(session.state().await, SessionState::Idle);
        assert!(session.history().await.is_empty());
    }

    #[tokio::test]
    async fn sequential_submissions_alternate_strictly() {
        let session = keyword_session(0).await;

        session.submit("ما هي python؟").await;
        session.submit("شكراً").await;

        let messages = session.messages().await;
        assert_eq!(messages.len(), 5);
        let senders: Vec<Sender> = messages.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                Sender::Assistant,
                Sender::User,
                Sender::Assistant,
                Sender::User,
                Sender::Assistant
            ]
        );
        assert_eq!(session.history().await.len(), 2);
    }

    #[tokio::test]
    async fn resolver_fault_substitutes_the_apology_and_returns_to_idle() {
        let session = session_with(Arc::new(FaultyResponder), 0).await;

        match session.submit("anything").await {
            SubmitOutcome::Completed(exchange) => {
                assert_eq!(exchange.assistant.text, APOLOGY_REPLY);
            }
            other => panic!("expected completion, got {:?}", other),
        }

        assert_eq!(session.state().await, SessionState::Idle);
        // Faulted exchanges are not recorded in the history log.
        assert!(session.history().await.is_empty());
        assert_eq!(session.messages().await.len(), 3);
    }

    #[tokio::test]
    async fn reset_yields_a_fresh_greeting_and_empty_history() {
        let session = keyword_session(0).await;
        session.submit("python").await;
        session.submit("html").await;

        session.reset().await.unwrap();

        let messages = session.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Assistant);
        assert!(session.history().await.is_empty());
    }

    #[tokio::test]
    async fn submissions_during_the_latency_window_are_rejected() {
        let session = keyword_session(200).await;

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("python").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(session.state().await, SessionState::AwaitingResponse);
        assert!(matches!(session.submit("html").await, SubmitOutcome::RejectedBusy));

        let outcome = pending.await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(session.state().await, SessionState::Idle);
        assert_eq!(session.history().await.len(), 1);
    }

    #[tokio::test]
    async fn reply_pending_across_a_reset_lands_in_the_fresh_session() {
        let session = keyword_session(200).await;

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("python").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        session.reset().await.unwrap();
        assert_eq!(session.messages().await.len(), 1);

        pending.await.unwrap();

        // The in-flight reply is appended to the session that replaced the
        // one it was submitted to.
        let messages = session.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert!(messages[1].text.contains("بايثون"));
        assert_eq!(session.state().await, SessionState::Idle);
    }
}
