//! Bot initialization and command definitions.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "приветствие и инструкция")]
    Start,
    #[command(description = "приветствие и инструкция")]
    Help,
}

/// Creates a Bot instance reading the token from TELOXIDE_TOKEN.
///
/// The underlying HTTP client gets a long request timeout because video
/// uploads can run for minutes.
pub fn create_bot() -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::from_env_with_client(client))
}

/// Registers the command list in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "приветствие и инструкция"),
        BotCommand::new("help", "приветствие и инструкция"),
    ])
    .await?;

    Ok(())
}
