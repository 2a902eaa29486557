use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Storage Args ---
    /// Key-value storage backend (file, memory)
    #[arg(long, env = "STORAGE_TYPE", default_value = "file")]
    pub storage_type: String,

    /// Path of the JSON file backing the file storage backend.
    #[arg(long, env = "STORAGE_PATH", default_value = "boai_storage.json")]
    pub storage_path: String,

    /// Storage key under which the conversation history is persisted.
    #[arg(long, env = "HISTORY_KEY", default_value = "boai_conversation_history")]
    pub history_key: String,

    /// Storage key under which the dark-mode preference is persisted.
    #[arg(long, env = "THEME_KEY", default_value = "darkMode")]
    pub theme_key: String,

    // --- Responder Args ---
    /// Path to the keyword response table file. The built-in table is used
    /// when the file does not exist.
    #[arg(long, env = "RESPONSES_PATH", default_value = "json/responses.json")]
    pub responses_path: String,

    // --- Session Args ---
    /// Simulated reply latency in milliseconds.
    #[arg(long, env = "REPLY_DELAY_MS", default_value = "1500")]
    pub reply_delay_ms: u64,

    /// Directory where exported transcripts are written.
    #[arg(long, env = "EXPORT_DIR", default_value = ".")]
    pub export_dir: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
