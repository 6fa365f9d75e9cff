use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{ChatId, Message, ReplyMarkup},
    Bot,
};
use tracing::instrument;

use crate::{
    form::{QuestionType, SubmissionSink},
    keyboard::{self, *},
    state::{BuilderState, FormSession},
    HandlerResult, UserDialogue,
};

const SKIP: &str = "/skip";
const GO_BACK: &str = "/back";

async fn show_form(bot: &Bot, chat_id: ChatId, form: &FormSession) -> HandlerResult {
    bot.send_message(
        chat_id,
        format!("{}\n\n{}", form.classroom, form.editor.snapshot()),
    )
    .reply_markup(keyboard::edit_form_keyboard())
    .await?;
    Ok(())
}

async fn show_question(
    bot: &Bot,
    chat_id: ChatId,
    form: &FormSession,
    question_idx: usize,
) -> HandlerResult {
    let question = form.editor.question(question_idx)?;
    bot.send_message(
        chat_id,
        format!("Question #{}\n{}", question_idx + 1, question),
    )
    .reply_markup(keyboard::edit_question_keyboard(
        question,
        form.editor.can_delete_question(),
    ))
    .await?;
    Ok(())
}

async fn back_to_form(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &UserDialogue,
    form: FormSession,
) -> HandlerResult {
    show_form(bot, chat_id, &form).await?;
    dialogue.update(BuilderState::HandleForm { form }).await?;
    Ok(())
}

async fn back_to_question(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &UserDialogue,
    form: FormSession,
    question_idx: usize,
) -> HandlerResult {
    show_question(bot, chat_id, &form, question_idx).await?;
    dialogue
        .update(BuilderState::HandleQuestion { form, question_idx })
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn receive_form_title(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut form: FormSession,
) -> HandlerResult {
    match msg.text() {
        Some(SKIP) => {}
        Some(title) => form.editor.set_title(title),
        None => {
            bot.send_message(msg.chat.id, "Please, send a title of the new form.")
                .await?;
            return Ok(());
        }
    }
    tracing::info!("form title set to '{}'", form.editor.title());
    bot.send_message(msg.chat.id, "OK. What is the form about? (/skip leaves it empty)")
        .await?;
    dialogue
        .update(BuilderState::ReceiveFormDescription { form })
        .await?;

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn receive_form_description(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut form: FormSession,
) -> HandlerResult {
    match msg.text() {
        Some(SKIP) => {}
        Some(description) => form.editor.set_description(description),
        None => {
            bot.send_message(msg.chat.id, "Please, send a description of the new form.")
                .await?;
            return Ok(());
        }
    }
    bot.send_message(
        msg.chat.id,
        "Great. The form starts with one blank multiple choice question. What do you want to do next?",
    )
    .await?;
    back_to_form(&bot, msg.chat.id, &dialogue, form).await
}

#[instrument(level = "info", skip(bot, dialogue, msg, form, sink), fields(chat = %msg.chat.id))]
pub(crate) async fn handle_form<Sink: SubmissionSink>(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut form: FormSession,
    sink: Arc<Sink>,
) -> HandlerResult {
    match msg.text() {
        Some(ADD_QUESTION) => {
            let question_idx = form.editor.add_question();
            tracing::info!("question #{} added", question_idx + 1);
            back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await?;
        }
        Some(EDIT_QUESTION) => {
            let len = form.editor.len();
            bot.send_message(msg.chat.id, "Choose a question to edit:")
                .reply_markup(keyboard::numbers_keyboard(len))
                .await?;
            dialogue.update(BuilderState::SelectQuestion { form }).await?;
        }
        Some(EDIT_TITLE) => {
            bot.send_message(msg.chat.id, "What's the new form title?")
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
            dialogue.update(BuilderState::EditFormTitle { form }).await?;
        }
        Some(EDIT_DESCRIPTION) => {
            bot.send_message(msg.chat.id, "What's the new form description?")
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
            dialogue
                .update(BuilderState::EditFormDescription { form })
                .await?;
        }
        Some(SHOW_FORM) => {
            show_form(&bot, msg.chat.id, &form).await?;
        }
        Some(SAVE_FORM) => {
            tracing::info!(classroom = %form.classroom, "saving form");
            form.editor.finalize(sink.as_ref());
            bot.send_message(
                msg.chat.id,
                format!("Form '{}' saved. What do you want to do next?", form.editor.title()),
            )
            .reply_markup(keyboard::action_keyboard())
            .await?;
            dialogue.update(BuilderState::Start).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .reply_markup(keyboard::edit_form_keyboard())
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn edit_form_title(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut form: FormSession,
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) | Some(SKIP) => {}
        Some(title) => {
            tracing::info!("form title edited: '{}' -> '{}'", form.editor.title(), title);
            form.editor.set_title(title);
        }
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
            return Ok(());
        }
    }
    back_to_form(&bot, msg.chat.id, &dialogue, form).await
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn edit_form_description(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    mut form: FormSession,
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) | Some(SKIP) => {}
        Some(description) => form.editor.set_description(description),
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
            return Ok(());
        }
    }
    back_to_form(&bot, msg.chat.id, &dialogue, form).await
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn select_question(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    form: FormSession,
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) => back_to_form(&bot, msg.chat.id, &dialogue, form).await?,
        Some(text) => match parse_position(text, form.editor.len()) {
            Some(question_idx) => {
                back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await?
            }
            None => {
                bot.send_message(msg.chat.id, "Question not found. Try again.")
                    .reply_markup(keyboard::numbers_keyboard(form.editor.len()))
                    .await?;
            }
        },
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn handle_question(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    (mut form, question_idx): (FormSession, usize),
) -> HandlerResult {
    match msg.text() {
        Some(EDIT_TITLE) => {
            bot.send_message(msg.chat.id, "What's the question?")
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
            dialogue
                .update(BuilderState::EditQuestionTitle { form, question_idx })
                .await?;
        }
        Some(CHANGE_TYPE) => {
            bot.send_message(msg.chat.id, "Choose a question type:")
                .reply_markup(keyboard::question_type_keyboard())
                .await?;
            dialogue
                .update(BuilderState::SelectQuestionType { form, question_idx })
                .await?;
        }
        Some(TOGGLE_REQUIRED) => {
            let required = form.editor.toggle_required(question_idx)?;
            bot.send_message(
                msg.chat.id,
                if required {
                    "The question is now required."
                } else {
                    "The question is now optional."
                },
            )
            .await?;
            back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await?;
        }
        Some(ADD_OPTION) => {
            let option_idx = form.editor.add_option(question_idx)?;
            bot.send_message(
                msg.chat.id,
                format!("Option {} added. What's its text? (/skip leaves it blank)", option_idx + 1),
            )
            .reply_markup(ReplyMarkup::kb_remove())
            .await?;
            dialogue
                .update(BuilderState::EditOptionText {
                    form,
                    question_idx,
                    option_idx,
                })
                .await?;
        }
        Some(EDIT_OPTION) => {
            let count = form.editor.question(question_idx)?.options().len();
            if count == 0 {
                bot.send_message(msg.chat.id, "The question has no options yet.")
                    .await?;
            } else {
                bot.send_message(msg.chat.id, "Choose an option to edit:")
                    .reply_markup(keyboard::numbers_keyboard(count))
                    .await?;
                dialogue
                    .update(BuilderState::SelectOption { form, question_idx })
                    .await?;
            }
        }
        Some(DUPLICATE) => {
            let copy_idx = form.editor.duplicate_question(question_idx)?;
            tracing::info!("question #{} duplicated", question_idx + 1);
            bot.send_message(msg.chat.id, format!("Question duplicated as #{}.", copy_idx + 1))
                .await?;
            back_to_question(&bot, msg.chat.id, &dialogue, form, copy_idx).await?;
        }
        Some(DELETE_QUESTION) => {
            if form.editor.delete_question(question_idx)? {
                tracing::info!("question #{} deleted", question_idx + 1);
                bot.send_message(msg.chat.id, "Question deleted.").await?;
                back_to_form(&bot, msg.chat.id, &dialogue, form).await?;
            } else {
                bot.send_message(msg.chat.id, "A form needs at least one question.")
                    .await?;
            }
        }
        Some(MOVE_UP) | Some(MOVE_DOWN) => {
            let target = if msg.text() == Some(MOVE_UP) {
                question_idx.checked_sub(1)
            } else {
                Some(question_idx + 1).filter(|idx| *idx < form.editor.len())
            };
            match target {
                Some(target) => {
                    form.editor.move_question(question_idx, target)?;
                    back_to_question(&bot, msg.chat.id, &dialogue, form, target).await?;
                }
                None => {
                    bot.send_message(msg.chat.id, "The question can't move further.")
                        .await?;
                }
            }
        }
        Some(BACK) | Some(GO_BACK) => {
            back_to_form(&bot, msg.chat.id, &dialogue, form).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn edit_question_title(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    (mut form, question_idx): (FormSession, usize),
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) | Some(SKIP) => {}
        Some(title) => form.editor.update_question_title(question_idx, title)?,
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
            return Ok(());
        }
    }
    back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn select_question_type(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    (mut form, question_idx): (FormSession, usize),
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) => {}
        Some(text) => match text.parse::<QuestionType>() {
            Ok(kind) => {
                tracing::info!("question #{} is now {}", question_idx + 1, kind);
                form.editor.update_question_type(question_idx, kind)?;
            }
            Err(e) => {
                bot.send_message(msg.chat.id, format!("{}. Try again.", e))
                    .reply_markup(keyboard::question_type_keyboard())
                    .await?;
                return Ok(());
            }
        },
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
            return Ok(());
        }
    }
    back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn select_option(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    (form, question_idx): (FormSession, usize),
) -> HandlerResult {
    let count = form.editor.question(question_idx)?.options().len();
    match msg.text() {
        Some(GO_BACK) => back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await?,
        Some(text) => match parse_position(text, count) {
            Some(option_idx) => {
                let current = form.editor.question(question_idx)?.options()[option_idx]
                    .text()
                    .to_owned();
                bot.send_message(
                    msg.chat.id,
                    format!("Current text: '{}'. What's the new text?", current),
                )
                .reply_markup(ReplyMarkup::kb_remove())
                .await?;
                dialogue
                    .update(BuilderState::EditOptionText {
                        form,
                        question_idx,
                        option_idx,
                    })
                    .await?;
            }
            None => {
                bot.send_message(msg.chat.id, "Option not found. Try again.")
                    .reply_markup(keyboard::numbers_keyboard(count))
                    .await?;
            }
        },
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg, form), fields(chat = %msg.chat.id))]
pub(crate) async fn edit_option_text(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    (mut form, question_idx, option_idx): (FormSession, usize, usize),
) -> HandlerResult {
    match msg.text() {
        Some(GO_BACK) | Some(SKIP) => {}
        Some(text) => {
            form.editor
                .update_option_text(question_idx, option_idx, text)?;
        }
        None => {
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .await?;
            return Ok(());
        }
    }
    back_to_question(&bot, msg.chat.id, &dialogue, form, question_idx).await
}
