// Telegram transport and dialog controller

pub mod delivery;
pub mod dialog;
pub mod session;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{Document, MaybeInaccessibleMessage};
use teloxide::utils::command::BotCommands;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::downloader::{DownloadMode, Fetcher, YtDlpFetcher};
use crate::extract::{extract_links_from_lines, extract_youtube_links};

use dialog::{advance, format_keyboard, quality_keyboard, Action, Step};
use session::{InMemorySessionStore, PendingRequest, SessionStore, Stage};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const USAGE: &str = "🎉 YouTube Downloader Bot\n\n\
    Send a YouTube link (watch, Shorts or youtu.be — or a .txt file with links).\n\
    I'll ask for Audio/Video and, for video, the quality (360p/480p/1080p).\n\
    Files up to 4GB supported.";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show usage")]
    Start,
    #[command(description = "show usage")]
    Help,
}

/// Build the dispatcher and run until shutdown. All session state is
/// process-local and lost on restart.
pub async fn run(bot: Bot, config: Config) {
    let config = Arc::new(config);
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let fetcher: Arc<dyn Fetcher> = Arc::new(YtDlpFetcher::new(config.download_dir.clone()));

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    info!("starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![store, fetcher, config])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(bot: Bot, msg: Message, _cmd: Command) -> HandlerResult {
    bot.send_message(msg.chat.id, USAGE).await?;
    Ok(())
}

/// Inbound text or document: extract links and open a session. A new
/// link-bearing message replaces any prior session for that user.
async fn handle_message(
    bot: Bot,
    msg: Message,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };

    let links = if let Some(doc) = msg.document().filter(|d| is_plain_text(d)) {
        match links_from_document(&bot, &config, doc).await {
            Ok(links) => links,
            Err(e) => {
                warn!(error = %e, "failed to read attachment");
                bot.send_message(msg.chat.id, format!("❌ Failed to read the attachment:\n{e}"))
                    .await?;
                return Ok(());
            }
        }
    } else if let Some(text) = msg.text() {
        extract_youtube_links(text)
    } else {
        Vec::new()
    };

    if links.is_empty() {
        bot.send_message(msg.chat.id, "No YouTube links found.").await?;
        return Ok(());
    }

    info!(user = user.id.0, count = links.len(), "session opened");
    store.put(user.id, PendingRequest::new(links));
    bot.send_message(msg.chat.id, "Choose format:")
        .reply_markup(format_keyboard())
        .await?;
    Ok(())
}

/// Button press: advance the state machine and act on the outcome.
async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<dyn SessionStore>,
    fetcher: Arc<dyn Fetcher>,
    config: Arc<Config>,
) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let (Some(data), Some(MaybeInaccessibleMessage::Regular(message))) = (q.data, q.message)
    else {
        return Ok(());
    };
    let user = q.from.id;
    let chat = message.chat.id;
    let msg_id = message.id;

    let Some(action) = Action::parse(&data) else {
        bot.edit_message_text(chat, msg_id, "Unknown action.").await?;
        return Ok(());
    };

    let stage = store.get(user).map(|r| r.stage);
    match advance(stage, action) {
        Step::AskQuality => {
            if let Some(mut request) = store.get(user) {
                request.stage = Stage::AwaitingQuality;
                store.put(user, request);
            }
            bot.edit_message_text(chat, msg_id, "Choose video quality:")
                .reply_markup(quality_keyboard())
                .await?;
        }
        Step::StartBatch(mode) => {
            // Remove at kickoff so a replacement session created while
            // the batch is still downloading is not clobbered later.
            let Some(request) = store.remove(user) else {
                return Ok(());
            };
            let text = match mode {
                DownloadMode::Audio => "Downloading audio...".to_string(),
                video => format!("Downloading {} ...", video.label()),
            };
            bot.edit_message_text(chat, msg_id, text).await?;

            let cookies = config.cookies_if_present();
            delivery::process_batch(
                &bot,
                chat,
                fetcher.as_ref(),
                &request.links,
                mode,
                cookies.as_deref(),
            )
            .await;
        }
        Step::Cancel => {
            store.remove(user);
            bot.edit_message_text(chat, msg_id, "Cancelled.").await?;
        }
        Step::Rejected => {
            bot.edit_message_text(chat, msg_id, "Unknown action.").await?;
        }
    }
    Ok(())
}

fn is_plain_text(doc: &Document) -> bool {
    doc.mime_type
        .as_ref()
        .is_some_and(|m| m.essence_str() == "text/plain")
}

/// Fetch a `.txt` attachment to a local temporary copy, extract links
/// line by line, and delete the copy whether or not reading worked.
async fn links_from_document(
    bot: &Bot,
    config: &Config,
    doc: &Document,
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let file = bot.get_file(doc.file.id.clone()).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        config.bot_token, file.path
    );
    let bytes = reqwest::get(&url).await?.error_for_status()?.bytes().await?;

    let local = config
        .download_dir
        .join(format!("links-{}.txt", doc.file.unique_id));
    fs::write(&local, &bytes).await?;

    let contents = fs::read_to_string(&local).await;
    let _ = fs::remove_file(&local).await;

    Ok(extract_links_from_lines(&contents?))
}
