pub mod cli;
pub mod config;
pub mod history;
pub mod models;
pub mod prefs;
pub mod responder;
pub mod session;
pub mod storage;

use chrono::Local;
use cli::Args;
use config::responses;
use log::{ info, warn };
use responder::KeywordResponder;
use session::{ ChatSession, SubmitOutcome };
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{ self, AsyncBufReadExt, AsyncWriteExt, BufReader };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Storage Type: {}", args.storage_type);
    info!("Storage Path: {}", args.storage_path);
    info!("History Key: {}", args.history_key);
    info!("Theme Key: {}", args.theme_key);
    info!("Responses Path: {}", args.responses_path);
    info!("Reply Delay: {} ms", args.reply_delay_ms);
    info!("Export Dir: {}", args.export_dir);
    info!("Debug: {}", args.debug);
    info!("-------------------------");

    let storage = storage::initialize_storage(&args)?;
    let response_config = responses::load_responses_or_builtin(&args.responses_path)?;
    let keyword_responder = Arc::new(KeywordResponder::new(Arc::clone(&response_config)));
    let session = ChatSession::new(
        Arc::clone(&keyword_responder) as Arc<dyn responder::Responder>,
        Arc::clone(&storage),
        Arc::clone(&response_config),
        args.history_key.clone(),
        Duration::from_millis(args.reply_delay_ms)
    ).await?;

    let dark_mode = prefs::load_dark_mode(storage.as_ref(), &args.theme_key).await;
    info!("Dark mode: {}", dark_mode);

    run_repl(&args, &session, &keyword_responder, storage.as_ref()).await
}

async fn run_repl(
    args: &Args,
    session: &ChatSession,
    keyword_responder: &Arc<KeywordResponder>,
    storage: &dyn storage::KeyValueStore
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut stdout = io::stdout();
    for message in session.messages().await {
        print_message(&mut stdout, &message).await?;
    }
    print_prompt(&mut stdout).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => {
                break;
            }
            "/new" => {
                session.reset().await?;
                for message in session.messages().await {
                    print_message(&mut stdout, &message).await?;
                }
            }
            "/export" => {
                export_transcript(args, session, &mut stdout).await?;
            }
            "/theme" => {
                let enabled = !prefs::load_dark_mode(storage, &args.theme_key).await;
                prefs::save_dark_mode(storage, &args.theme_key, enabled).await?;
                stdout.write_all(
                    format!("dark mode: {}\n", enabled).as_bytes()
                ).await?;
            }
            "/reload" => {
                match
                    responses::reload_responses_if_changed(
                        &args.responses_path,
                        &keyword_responder.config()
                    )
                {
                    Ok(Some(new_config)) => keyword_responder.update(new_config),
                    Ok(None) => info!("Responses unchanged"),
                    Err(e) => warn!("Responses reload failed: {}", e),
                }
            }
            text => {
                match session.submit(text).await {
                    SubmitOutcome::Completed(exchange) => {
                        print_message(&mut stdout, &exchange.assistant).await?;
                    }
                    SubmitOutcome::IgnoredEmpty => {}
                    SubmitOutcome::RejectedBusy => {
                        stdout.write_all("...\n".as_bytes()).await?;
                    }
                }
            }
        }
        print_prompt(&mut stdout).await?;
    }

    Ok(())
}

async fn export_transcript(
    args: &Args,
    session: &ChatSession,
    stdout: &mut io::Stdout
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filename = history::transcript_filename(Local::now().date_naive());
    let path = Path::new(&args.export_dir).join(filename);
    let transcript = session.transcript().await;
    tokio::fs::write(&path, transcript).await?;
    info!("Transcript exported to {}", path.display());
    stdout.write_all(format!("exported: {}\n", path.display()).as_bytes()).await?;
    Ok(())
}

async fn print_message(
    stdout: &mut io::Stdout,
    message: &models::chat::Message
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let label = match message.sender {
        models::chat::Sender::User => "you",
        models::chat::Sender::Assistant => "BoAI",
    };
    stdout.write_all(format!("{}: {}\n", label, message.text).as_bytes()).await?;
    Ok(())
}

async fn print_prompt(stdout: &mut io::Stdout) -> Result<(), Box<dyn Error + Send + Sync>> {
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}
