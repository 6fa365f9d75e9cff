use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::form::{Question, QuestionType};

pub(crate) const OPEN_DASHBOARD: &str = "Open classroom dashboard📋";

pub(crate) const SUBMIT_CLASSROOM: &str = "Submit✔️";
pub(crate) const CHANGE_SEMESTER: &str = "Change semester";
pub(crate) const CHANGE_BRANCH: &str = "Change branch";

pub(crate) const ADD_QUESTION: &str = "Add question";
pub(crate) const EDIT_QUESTION: &str = "Edit question";
pub(crate) const EDIT_TITLE: &str = "Edit title";
pub(crate) const EDIT_DESCRIPTION: &str = "Edit description";
pub(crate) const SHOW_FORM: &str = "Show form";
pub(crate) const SAVE_FORM: &str = "Save form💾";

pub(crate) const CHANGE_TYPE: &str = "Change type";
pub(crate) const TOGGLE_REQUIRED: &str = "Toggle required";
pub(crate) const ADD_OPTION: &str = "Add option";
pub(crate) const EDIT_OPTION: &str = "Edit option";
pub(crate) const DUPLICATE: &str = "Duplicate";
pub(crate) const DELETE_QUESTION: &str = "Delete question🗑️";
pub(crate) const MOVE_UP: &str = "Move up";
pub(crate) const MOVE_DOWN: &str = "Move down";
pub(crate) const BACK: &str = "Back";

pub(crate) fn action_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(OPEN_DASHBOARD)]])
}

pub(crate) fn choices_keyboard(choices: &[&str]) -> KeyboardMarkup {
    let keyboard = choices
        .chunks(4)
        .map(|row| row.iter().map(|choice| KeyboardButton::new(*choice)).collect::<Vec<_>>());

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn confirm_classroom_keyboard() -> KeyboardMarkup {
    let keyboard = vec![
        vec![KeyboardButton::new(SUBMIT_CLASSROOM)],
        vec![
            KeyboardButton::new(CHANGE_SEMESTER),
            KeyboardButton::new(CHANGE_BRANCH),
        ],
    ];

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn edit_form_keyboard() -> KeyboardMarkup {
    let keyboard = vec![
        vec![
            KeyboardButton::new(ADD_QUESTION),
            KeyboardButton::new(EDIT_QUESTION),
        ],
        vec![
            KeyboardButton::new(EDIT_TITLE),
            KeyboardButton::new(EDIT_DESCRIPTION),
        ],
        vec![KeyboardButton::new(SHOW_FORM), KeyboardButton::new(SAVE_FORM)],
    ];

    KeyboardMarkup::new(keyboard)
}

/// Option editing only shows up for option-bearing types and deletion only
/// when another question would remain.
pub(crate) fn edit_question_keyboard(question: &Question, can_delete: bool) -> KeyboardMarkup {
    let mut keyboard = vec![vec![
        KeyboardButton::new(EDIT_TITLE),
        KeyboardButton::new(CHANGE_TYPE),
    ]];

    if question.kind().has_options() {
        keyboard.push(vec![
            KeyboardButton::new(ADD_OPTION),
            KeyboardButton::new(EDIT_OPTION),
        ]);
    }

    keyboard.push(vec![
        KeyboardButton::new(TOGGLE_REQUIRED),
        KeyboardButton::new(DUPLICATE),
    ]);
    keyboard.push(vec![KeyboardButton::new(MOVE_UP), KeyboardButton::new(MOVE_DOWN)]);

    let mut last = vec![KeyboardButton::new(BACK)];
    if can_delete {
        last.insert(0, KeyboardButton::new(DELETE_QUESTION));
    }
    keyboard.push(last);

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn question_type_keyboard() -> KeyboardMarkup {
    let keyboard: Vec<Vec<KeyboardButton>> = QuestionType::ALL
        .chunks(2)
        .map(|row| row.iter().map(|kind| KeyboardButton::new(kind.label())).collect())
        .collect();

    KeyboardMarkup::new(keyboard)
}

/// Buttons "1".."=count", used to pick a question or an option by position.
pub(crate) fn numbers_keyboard(count: usize) -> KeyboardMarkup {
    let numbers: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
    let keyboard = numbers
        .chunks(5)
        .map(|row| row.iter().map(|n| KeyboardButton::new(n.as_str())).collect::<Vec<_>>());

    KeyboardMarkup::new(keyboard)
}

/// Parses a 1-based position typed or pressed by the user into an index below `count`.
pub(crate) fn parse_position(text: &str, count: usize) -> Option<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}
