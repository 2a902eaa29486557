use std::error::Error;
use std::sync::{ Arc, RwLock };
use crate::config::responses::ResponseConfig;

/// Maps a raw user utterance to a reply string. The trait seam lets the
/// session substitute its apology reply when resolution fails.
pub trait Responder: Send + Sync {
    fn resolve(&self, input: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// Deterministic resolver over an ordered keyword table: the input is
/// case-folded and each keyword is tested for substring containment in
/// table order. First match wins; no match yields the fallback reply.
pub struct KeywordResponder {
    config: RwLock<Arc<ResponseConfig>>,
}

impl KeywordResponder {
    pub fn new(config: Arc<ResponseConfig>) -> Self {
        Self { config: RwLock::new(config) }
    }

    /// Swaps in a freshly loaded table, e.g. after the responses file
    /// changed on disk.
    pub fn update(&self, config: Arc<ResponseConfig>) {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
        *guard = config;
    }

    pub fn config(&self) -> Arc<ResponseConfig> {
        let guard = self.config.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }
}

impl Responder for KeywordResponder {
    fn resolve(&self, input: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        let config = self.config();
        let normalized = input.to_lowercase();
        for rule in &config.rules {
            if normalized.contains(&rule.keyword) {
                return Ok(rule.reply.clone());
            }
        }
        Ok(config.fallback_reply.clone())
    }
}
