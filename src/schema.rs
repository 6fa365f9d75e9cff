use std::error::Error;

use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        DpHandlerDescription, UpdateFilterExt, UpdateHandler,
    },
    dptree::{self, Handler},
    payloads::SendMessageSetters,
    prelude::{DependencyMap, Requester},
    types::{Message, Update},
    Bot,
};
use tracing::instrument;

use crate::{
    builder,
    classroom::ClassroomSelection,
    commands::{cancel, help, start, Command},
    dashboard,
    form::LogSink,
    keyboard::{action_keyboard, OPEN_DASHBOARD},
    state::BuilderState,
    HandlerResult, UserDialogue,
};

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Cancel].endpoint(cancel));

    let handler = Update::filter_message()
        .branch(command_handler)
        .branch(case![BuilderState::Start].endpoint(choose_what_to_do))
        .branch(dashboard_scheme())
        .branch(builder_scheme())
        .endpoint(invalid_state);

    dialogue::enter::<Update, InMemStorage<BuilderState>, BuilderState, _>().branch(handler)
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat = %msg.chat.id))]
async fn choose_what_to_do(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    match msg.text() {
        Some(OPEN_DASHBOARD) => {
            tracing::info!("opening classroom dashboard");
            dashboard::prompt(
                &bot,
                msg.chat.id,
                &dialogue,
                BuilderState::next_dashboard_step(ClassroomSelection::new()),
            )
            .await?;
        }
        other => {
            tracing::warn!("invalid message {:?}", other);
            bot.send_message(msg.chat.id, "Invalid input. Please try again.")
                .reply_markup(action_keyboard())
                .await?;
        }
    }

    Ok(())
}

fn dashboard_scheme() -> Handler<
    'static,
    DependencyMap,
    Result<(), Box<(dyn Error + Send + Sync + 'static)>>,
    DpHandlerDescription,
> {
    use dptree::case;
    Update::filter_message()
        .branch(case![BuilderState::ChooseSemester { selection }].endpoint(dashboard::choose_semester))
        .branch(case![BuilderState::ChooseBranch { selection }].endpoint(dashboard::choose_branch))
        .branch(case![BuilderState::ChooseSection { selection }].endpoint(dashboard::choose_section))
        .branch(
            case![BuilderState::ChooseClassroom { selection }]
                .endpoint(dashboard::choose_classroom),
        )
        .branch(
            case![BuilderState::ConfirmClassroom { selection }]
                .endpoint(dashboard::confirm_classroom),
        )
}

fn builder_scheme() -> Handler<
    'static,
    DependencyMap,
    Result<(), Box<(dyn Error + Send + Sync + 'static)>>,
    DpHandlerDescription,
> {
    use dptree::case;
    Update::filter_message()
        .branch(case![BuilderState::ReceiveFormTitle { form }].endpoint(builder::receive_form_title))
        .branch(
            case![BuilderState::ReceiveFormDescription { form }]
                .endpoint(builder::receive_form_description),
        )
        .branch(case![BuilderState::HandleForm { form }].endpoint(builder::handle_form::<LogSink>))
        .branch(case![BuilderState::EditFormTitle { form }].endpoint(builder::edit_form_title))
        .branch(
            case![BuilderState::EditFormDescription { form }]
                .endpoint(builder::edit_form_description),
        )
        .branch(case![BuilderState::SelectQuestion { form }].endpoint(builder::select_question))
        .branch(
            case![BuilderState::HandleQuestion { form, question_idx }]
                .endpoint(builder::handle_question),
        )
        .branch(
            case![BuilderState::EditQuestionTitle { form, question_idx }]
                .endpoint(builder::edit_question_title),
        )
        .branch(
            case![BuilderState::SelectQuestionType { form, question_idx }]
                .endpoint(builder::select_question_type),
        )
        .branch(
            case![BuilderState::SelectOption { form, question_idx }]
                .endpoint(builder::select_option),
        )
        .branch(
            case![BuilderState::EditOptionText {
                form,
                question_idx,
                option_idx
            }]
            .endpoint(builder::edit_option_text),
        )
}

#[instrument(level = "info", skip(bot, msg), fields(chat = %msg.chat.id))]
async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!("invalid input '{:?}'", msg.text());
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Enter /help to see usages.",
    )
    .await?;
    Ok(())
}
