//! Dispatcher schema: commands, URL messages, and keyboard callbacks.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use url::Url;

use crate::telegram::bot::Command;
use crate::telegram::downloads::handle_selection;
use crate::telegram::keyboard;
use crate::telegram::HandlerDeps;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub const GREETING: &str = "Отправьте мне ссылку на видео YouTube или TikTok, и я скачаю его для вас.";
pub const CHOOSE_FORMAT: &str = "Выберите формат загрузки:";

/// Creates the dispatcher handler tree.
///
/// The same schema is used in production and can be driven directly in
/// tests. Commands are matched before plain text so `/start` never reaches
/// the URL handler.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Handler for /start and /help. Both answer the same greeting.
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            let user_id = msg.from.as_ref().map(|u| u.id.0).unwrap_or(0);
            log::info!("Received command {:?} from user {}", cmd, user_id);
            bot.send_message(msg.chat.id, GREETING).await?;
            Ok(())
        },
    ))
}

/// Handler for plain text messages. A message that parses as a URL gets the
/// format-selection keyboard; anything else gets the usage hint.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let Some(text) = msg.text() else {
                return Ok(());
            };
            let user_id = msg.from.as_ref().map(|u| u.id.0).unwrap_or(0);

            match Url::parse(text.trim()) {
                Ok(url) => {
                    log::info!("Received URL {} from user {}", url, user_id);

                    if let Some(notice) = keyboard::missing_feature_notice(&deps.features) {
                        bot.send_message(msg.chat.id, notice).await?;
                    }

                    bot.send_message(msg.chat.id, CHOOSE_FORMAT)
                        .reply_markup(keyboard::format_keyboard(&url, &deps.features))
                        .await?;
                }
                Err(_) => {
                    log::info!("Ignoring non-URL text from user {}", user_id);
                    bot.send_message(msg.chat.id, GREETING).await?;
                }
            }
            Ok(())
        }
    })
}

/// Handler for keyboard callbacks carrying a profile selection.
///
/// The download itself runs in its own task so the dispatcher keeps serving
/// other chats while a file is being fetched.
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Stop the client-side spinner straight away.
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
            }

            let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
                log::warn!("Callback query {:?} has no originating message", q.id);
                return Ok(());
            };
            let Some(data) = q.data.as_deref() else {
                return Ok(());
            };

            match keyboard::decode_selection(data) {
                Some((profile, raw_url)) => match Url::parse(raw_url) {
                    Ok(url) => {
                        tokio::spawn(handle_selection(deps, chat_id, profile, url));
                    }
                    Err(e) => {
                        log::warn!("Callback payload carries an invalid URL '{}': {}", raw_url, e);
                    }
                },
                None => {
                    log::warn!("Unrecognized callback payload from chat {}: {}", chat_id, data);
                }
            }
            Ok(())
        }
    })
}
