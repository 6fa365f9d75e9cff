use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{keyboard::action_keyboard, state::BuilderState, HandlerResult, UserDialogue};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "start the bot.")]
    Start,
    #[command(description = "drop the current form and go back to the start.")]
    Cancel,
}

const EDITOR_HINTS: &str = "Inside the editor:\n/back - return to the previous menu\n/skip - keep the current value";

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        format!("{}\n\n{}", Command::descriptions(), EDITOR_HINTS),
    )
    .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn cancel(bot: Bot, dialogue: UserDialogue, msg: Message) -> HandlerResult {
    tracing::info!("dialogue cancelled");
    bot.send_message(msg.chat.id, "Cancelling dialogue. Nothing was saved.")
        .reply_markup(action_keyboard())
        .await?;
    dialogue.update(BuilderState::Start).await?;
    Ok(())
}

pub(crate) async fn start(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    bot.send_message(msg.chat.id, "Please choose what to do:")
        .reply_markup(action_keyboard())
        .await?;
    dialogue.update(BuilderState::Start).await?;
    Ok(())
}
