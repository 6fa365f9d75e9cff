use crate::{
    classroom::{Classroom, ClassroomSelection},
    form::QuestionSetEditor,
};

/// A form being built for a classroom.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub(crate) classroom: Classroom,
    pub(crate) editor: QuestionSetEditor,
}

impl FormSession {
    pub fn new(classroom: Classroom) -> Self {
        Self {
            classroom,
            editor: QuestionSetEditor::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum BuilderState {
    #[default]
    Start,

    // PART FOR --- CLASSROOM DASHBOARD ---
    ChooseSemester {
        selection: ClassroomSelection,
    },
    ChooseBranch {
        selection: ClassroomSelection,
    },
    ChooseSection {
        selection: ClassroomSelection,
    },
    ChooseClassroom {
        selection: ClassroomSelection,
    },
    ConfirmClassroom {
        selection: ClassroomSelection,
    },

    // PART FOR --- FORM HEADER ---
    ReceiveFormTitle {
        form: FormSession,
    },
    ReceiveFormDescription {
        form: FormSession,
    },

    // PART FOR --- EDITING ---
    HandleForm {
        form: FormSession,
    },
    EditFormTitle {
        form: FormSession,
    },
    EditFormDescription {
        form: FormSession,
    },
    SelectQuestion {
        form: FormSession,
    },
    HandleQuestion {
        form: FormSession,
        question_idx: usize,
    },
    EditQuestionTitle {
        form: FormSession,
        question_idx: usize,
    },
    SelectQuestionType {
        form: FormSession,
        question_idx: usize,
    },
    SelectOption {
        form: FormSession,
        question_idx: usize,
    },
    EditOptionText {
        form: FormSession,
        question_idx: usize,
        option_idx: usize,
    },
}

impl BuilderState {
    /// Next dashboard prompt: the first field still missing, or confirmation.
    pub fn next_dashboard_step(selection: ClassroomSelection) -> Self {
        if selection.semester().is_none() {
            BuilderState::ChooseSemester { selection }
        } else if selection.branch().is_none() {
            BuilderState::ChooseBranch { selection }
        } else if selection.section().is_none() {
            BuilderState::ChooseSection { selection }
        } else if selection.classroom().is_none() {
            BuilderState::ChooseClassroom { selection }
        } else {
            BuilderState::ConfirmClassroom { selection }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_walks_fields_in_order() {
        let mut selection = ClassroomSelection::new();
        assert!(matches!(
            BuilderState::next_dashboard_step(selection.clone()),
            BuilderState::ChooseSemester { .. }
        ));

        selection.choose_semester("2").unwrap();
        assert!(matches!(
            BuilderState::next_dashboard_step(selection.clone()),
            BuilderState::ChooseBranch { .. }
        ));

        selection.choose_branch("CE").unwrap();
        selection.choose_section("C").unwrap();
        assert!(matches!(
            BuilderState::next_dashboard_step(selection.clone()),
            BuilderState::ChooseClassroom { .. }
        ));

        selection.choose_classroom("105").unwrap();
        assert!(matches!(
            BuilderState::next_dashboard_step(selection),
            BuilderState::ConfirmClassroom { .. }
        ));
    }

    #[test]
    fn changed_semester_goes_back_to_classroom() {
        let mut selection = ClassroomSelection::new();
        selection.choose_semester("2").unwrap();
        selection.choose_branch("CE").unwrap();
        selection.choose_section("C").unwrap();
        selection.choose_classroom("105").unwrap();
        selection.choose_semester("5").unwrap();

        assert!(matches!(
            BuilderState::next_dashboard_step(selection),
            BuilderState::ChooseClassroom { .. }
        ));
    }
}
