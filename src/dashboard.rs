use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{ChatId, Message, ReplyMarkup},
    Bot,
};
use tracing::instrument;

use crate::{
    classroom::{ClassroomSelection, SelectionError, BRANCHES, SEMESTERS},
    form::document::DEFAULT_FORM_TITLE,
    keyboard::{self, CHANGE_BRANCH, CHANGE_SEMESTER, SUBMIT_CLASSROOM},
    state::{BuilderState, FormSession},
    HandlerResult, UserDialogue,
};

/// Asks for whatever `state` waits on and moves the dialogue there.
pub(crate) async fn prompt(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &UserDialogue,
    state: BuilderState,
) -> HandlerResult {
    match &state {
        BuilderState::ChooseSemester { .. } => {
            bot.send_message(chat_id, "Select semester:")
                .reply_markup(keyboard::choices_keyboard(&SEMESTERS))
                .await?;
        }
        BuilderState::ChooseBranch { .. } => {
            bot.send_message(chat_id, "Select branch:")
                .reply_markup(keyboard::choices_keyboard(&BRANCHES))
                .await?;
        }
        BuilderState::ChooseSection { selection } => {
            let sections = selection.available_sections().unwrap_or_default();
            bot.send_message(chat_id, "Select section:")
                .reply_markup(keyboard::choices_keyboard(sections))
                .await?;
        }
        BuilderState::ChooseClassroom { selection } => {
            let classrooms = selection.available_classrooms().unwrap_or_default();
            bot.send_message(chat_id, "Select classroom:")
                .reply_markup(keyboard::choices_keyboard(classrooms))
                .await?;
        }
        BuilderState::ConfirmClassroom { selection } => {
            let summary = match selection.validate() {
                Ok(classroom) => classroom.to_string(),
                Err(e) => e.to_string(),
            };
            bot.send_message(chat_id, format!("{}\nSubmit this classroom?", summary))
                .reply_markup(keyboard::confirm_classroom_keyboard())
                .await?;
        }
        _ => {}
    }
    dialogue.update(state).await?;
    Ok(())
}

async fn retry(
    bot: &Bot,
    msg: &Message,
    dialogue: &UserDialogue,
    error: SelectionError,
    state: BuilderState,
) -> HandlerResult {
    tracing::info!("rejected dashboard input {:?}: {}", msg.text(), error);
    bot.send_message(msg.chat.id, format!("{}. Try again.", error)).await?;
    prompt(bot, msg.chat.id, dialogue, state).await
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn choose_semester(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut selection: ClassroomSelection,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match selection.choose_semester(text) {
        Ok(()) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::next_dashboard_step(selection)).await
        }
        Err(e) => retry(&bot, &msg, &dialogue, e, BuilderState::ChooseSemester { selection }).await,
    }
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn choose_branch(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut selection: ClassroomSelection,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match selection.choose_branch(text) {
        Ok(()) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::next_dashboard_step(selection)).await
        }
        Err(e) => retry(&bot, &msg, &dialogue, e, BuilderState::ChooseBranch { selection }).await,
    }
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn choose_section(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut selection: ClassroomSelection,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match selection.choose_section(text) {
        Ok(()) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::next_dashboard_step(selection)).await
        }
        Err(e @ SelectionError::UnknownChoice { .. }) => {
            retry(&bot, &msg, &dialogue, e, BuilderState::ChooseSection { selection }).await
        }
        Err(e) => {
            retry(&bot, &msg, &dialogue, e, BuilderState::next_dashboard_step(selection)).await
        }
    }
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn choose_classroom(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut selection: ClassroomSelection,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match selection.choose_classroom(text) {
        Ok(()) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::next_dashboard_step(selection)).await
        }
        Err(e @ SelectionError::UnknownChoice { .. }) => {
            retry(&bot, &msg, &dialogue, e, BuilderState::ChooseClassroom { selection }).await
        }
        Err(e) => {
            retry(&bot, &msg, &dialogue, e, BuilderState::next_dashboard_step(selection)).await
        }
    }
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn confirm_classroom(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    selection: ClassroomSelection,
) -> HandlerResult {
    match msg.text() {
        Some(SUBMIT_CLASSROOM) => match selection.validate() {
            Ok(classroom) => {
                tracing::info!(%classroom, "classroom submitted");
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "Classroom selected: {}.\nLet's build a form for it! What's its title? (/skip keeps '{}')",
                        classroom, DEFAULT_FORM_TITLE
                    ),
                )
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
                dialogue
                    .update(BuilderState::ReceiveFormTitle {
                        form: FormSession::new(classroom),
                    })
                    .await?;
            }
            Err(e) => {
                retry(&bot, &msg, &dialogue, e, BuilderState::next_dashboard_step(selection)).await?;
            }
        },
        Some(CHANGE_SEMESTER) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::ChooseSemester { selection }).await?;
        }
        Some(CHANGE_BRANCH) => {
            prompt(&bot, msg.chat.id, &dialogue, BuilderState::ChooseBranch { selection }).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .reply_markup(keyboard::confirm_classroom_keyboard())
                .await?;
        }
    }

    Ok(())
}
