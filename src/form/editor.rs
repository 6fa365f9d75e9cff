use thiserror::Error;
use tracing::{debug, error, info, instrument};

use super::{
    document::{FormDocument, Question, QuestionOption, QuestionType, Questions, DEFAULT_FORM_TITLE},
    sink::SubmissionSink,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("question #{index} does not exist (form has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("option #{option_index} of question #{question_index} does not exist (question has {len} options)")]
    OptionOutOfRange {
        question_index: usize,
        option_index: usize,
        len: usize,
    },
}

/// In-memory editor over a single form. Every mutation addresses questions
/// and options by their current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSetEditor {
    title: String,
    description: String,
    questions: Questions,
}

impl QuestionSetEditor {
    /// Opens an editor on a fresh form seeded with one blank question.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_FORM_TITLE.to_owned(),
            description: String::new(),
            questions: Questions::new(Question::new()),
        }
    }

    pub fn from_document(document: FormDocument) -> Self {
        Self {
            title: document.title,
            description: document.description,
            questions: document.questions,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &[Question] {
        self.questions.as_slice()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Result<&Question, EditorError> {
        let len = self.questions.len();
        self.questions
            .get(index)
            .ok_or(EditorError::QuestionOutOfRange { index, len })
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut Question, EditorError> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(EditorError::QuestionOutOfRange { index, len })
    }

    fn option_mut(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<&mut QuestionOption, EditorError> {
        let question = self.question_mut(question_index)?;
        let len = question.options.len();
        question
            .options
            .get_mut(option_index)
            .ok_or(EditorError::OptionOutOfRange {
                question_index,
                option_index,
                len,
            })
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Appends a blank multiple-choice question and returns its position.
    pub fn add_question(&mut self) -> usize {
        self.questions.push(Question::new());
        debug!(len = self.questions.len(), "question added");
        self.questions.len() - 1
    }

    /// Inserts a copy of the question right after it and returns the copy's position.
    pub fn duplicate_question(&mut self, index: usize) -> Result<usize, EditorError> {
        let copy = self.question(index)?.duplicate();
        self.questions.insert(index + 1, copy);
        debug!(index, "question duplicated");
        Ok(index + 1)
    }

    /// Removes the question at `index`. Returns `Ok(false)` without touching
    /// the form when it is the only question left.
    pub fn delete_question(&mut self, index: usize) -> Result<bool, EditorError> {
        self.question(index)?;
        let removed = self.questions.remove(index).is_some();
        if !removed {
            debug!(index, "refusing to delete the last question");
        }
        Ok(removed)
    }

    pub fn can_delete_question(&self) -> bool {
        self.questions.len() > 1
    }

    pub fn move_question(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.question(from)?;
        self.question(to)?;
        self.questions.relocate(from, to);
        Ok(())
    }

    /// Appends a blank option regardless of the question's type and returns its position.
    pub fn add_option(&mut self, question_index: usize) -> Result<usize, EditorError> {
        let question = self.question_mut(question_index)?;
        question.options.push(QuestionOption::blank());
        Ok(question.options.len() - 1)
    }

    pub fn remove_option(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<QuestionOption, EditorError> {
        self.option_mut(question_index, option_index)?;
        let question = self.question_mut(question_index)?;
        Ok(question.options.remove(option_index))
    }

    pub fn update_question_type(
        &mut self,
        question_index: usize,
        kind: QuestionType,
    ) -> Result<(), EditorError> {
        self.question_mut(question_index)?.kind = kind;
        Ok(())
    }

    pub fn update_question_title(
        &mut self,
        question_index: usize,
        title: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.question_mut(question_index)?.title = title.into();
        Ok(())
    }

    pub fn update_option_text(
        &mut self,
        question_index: usize,
        option_index: usize,
        text: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.option_mut(question_index, option_index)?.text = text.into();
        Ok(())
    }

    /// Flips the required flag and returns the new value.
    pub fn toggle_required(&mut self, question_index: usize) -> Result<bool, EditorError> {
        let question = self.question_mut(question_index)?;
        question.required = !question.required;
        Ok(question.required)
    }

    pub fn snapshot(&self) -> FormDocument {
        FormDocument {
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.clone(),
        }
    }

    /// Hands the current snapshot to `sink`. Nothing is validated and a sink
    /// failure is only logged.
    #[instrument(level = "info", skip_all, fields(title = %self.title, questions = self.questions.len()))]
    pub fn finalize<Sink: SubmissionSink + ?Sized>(&self, sink: &Sink) {
        match sink.submit(self.snapshot()) {
            Ok(()) => info!("form submitted"),
            Err(e) => error!("form submission failed: {e}"),
        }
    }
}

impl Default for QuestionSetEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::form::{
        id::{OptionId, QuestionId},
        sink::{MockSubmissionSink, SubmissionError},
    };

    fn all_ids(editor: &QuestionSetEditor) -> HashSet<Uuid> {
        editor
            .questions()
            .iter()
            .flat_map(|q| {
                std::iter::once(*q.id().uuid()).chain(q.options().iter().map(|o| *o.id().uuid()))
            })
            .collect()
    }

    fn two_questions() -> QuestionSetEditor {
        let mut editor = QuestionSetEditor::new();
        editor.update_question_title(0, "First").unwrap();
        editor.add_question();
        editor.update_question_title(1, "Second").unwrap();
        editor
    }

    #[test]
    fn add_question_appends_a_blank_multiple_choice() {
        let mut editor = QuestionSetEditor::new();
        let index = editor.add_question();

        assert_eq!(index, 1);
        assert_eq!(editor.len(), 2);
        let added = editor.question(1).unwrap();
        assert_eq!(added.kind(), QuestionType::MultipleChoice);
        assert_eq!(added.title(), "");
        assert!(!added.required());
        assert_eq!(added.options().len(), 2);
        assert!(added.options().iter().all(|o| o.text().is_empty()));
        assert_ne!(added.id(), editor.question(0).unwrap().id());
    }

    #[test]
    fn delete_first_of_two_leaves_the_second() {
        let mut editor = two_questions();
        let second = editor.question(1).unwrap().clone();

        assert_eq!(editor.delete_question(0), Ok(true));
        assert_eq!(editor.questions(), &[second]);
    }

    #[test]
    fn delete_last_question_is_a_no_op() {
        let mut editor = QuestionSetEditor::new();
        let before = editor.clone();

        assert_eq!(editor.delete_question(0), Ok(false));
        assert_eq!(editor, before);
        assert!(!editor.can_delete_question());
    }

    #[test]
    fn delete_out_of_range_is_an_error() {
        let mut editor = two_questions();
        assert_eq!(
            editor.delete_question(2),
            Err(EditorError::QuestionOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn form_never_becomes_empty() {
        let mut editor = two_questions();
        editor.duplicate_question(1).unwrap();
        for _ in 0..5 {
            editor.delete_question(0).unwrap();
            assert!(editor.len() >= 1);
        }
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn duplicate_inserts_after_the_original_with_fresh_ids() {
        let original = Question::retreive(
            QuestionId::retreive(Uuid::from_u128(100)),
            QuestionType::MultipleChoice,
            "Colour?",
            true,
            vec![
                QuestionOption::retreive(OptionId::retreive(Uuid::from_u128(1)), "A"),
                QuestionOption::retreive(OptionId::retreive(Uuid::from_u128(2)), "B"),
            ],
        );
        let mut editor = QuestionSetEditor::from_document(FormDocument {
            title: "Quiz".to_owned(),
            description: String::new(),
            questions: Questions::new(original.clone()),
        });
        editor.add_question();
        let before = all_ids(&editor);

        assert_eq!(editor.duplicate_question(0), Ok(1));
        assert_eq!(editor.len(), 3);
        assert_eq!(editor.question(0).unwrap(), &original);

        let copy = editor.question(1).unwrap();
        assert_eq!(copy.title(), "Colour?");
        assert!(copy.required());
        let texts: Vec<&str> = copy.options().iter().map(|o| o.text()).collect();
        assert_eq!(texts, vec!["A", "B"]);
        assert!(!before.contains(copy.id().uuid()));
        for option in copy.options() {
            assert!(!before.contains(option.id().uuid()));
        }
        assert_eq!(all_ids(&editor).len(), before.len() + 3);
    }

    #[test]
    fn duplicate_out_of_range_is_an_error() {
        let mut editor = QuestionSetEditor::new();
        assert_eq!(
            editor.duplicate_question(1),
            Err(EditorError::QuestionOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn add_option_touches_only_its_question() {
        let mut editor = two_questions();
        let other = editor.question(0).unwrap().clone();

        assert_eq!(editor.add_option(1), Ok(2));
        assert_eq!(editor.question(1).unwrap().options().len(), 3);
        assert_eq!(editor.question(1).unwrap().options()[2].text(), "");
        assert_eq!(editor.question(0).unwrap(), &other);
    }

    #[test]
    fn add_option_ignores_question_type() {
        let mut editor = QuestionSetEditor::new();
        editor.update_question_type(0, QuestionType::Paragraph).unwrap();
        editor.add_option(0).unwrap();
        assert_eq!(editor.question(0).unwrap().options().len(), 3);
        assert!(editor.question(0).unwrap().visible_options().is_empty());
    }

    #[test]
    fn retyping_keeps_options() {
        let mut editor = QuestionSetEditor::new();
        editor.update_option_text(0, 0, "Yes").unwrap();
        let options = editor.question(0).unwrap().options().to_vec();

        editor.update_question_type(0, QuestionType::ShortAnswer).unwrap();
        assert_eq!(editor.question(0).unwrap().kind(), QuestionType::ShortAnswer);
        assert_eq!(editor.question(0).unwrap().options(), options.as_slice());

        editor.update_question_type(0, QuestionType::Checkbox).unwrap();
        assert_eq!(editor.question(0).unwrap().visible_options(), options.as_slice());
    }

    #[test]
    fn titles_and_option_texts_are_set_verbatim() {
        let mut editor = QuestionSetEditor::new();
        editor.update_question_title(0, "  spaced  ").unwrap();
        editor.update_option_text(0, 1, "B").unwrap();
        editor.update_question_title(0, "").unwrap();

        let question = editor.question(0).unwrap();
        assert_eq!(question.title(), "");
        assert_eq!(question.options()[1].text(), "B");
    }

    #[test]
    fn option_index_is_checked() {
        let mut editor = QuestionSetEditor::new();
        assert_eq!(
            editor.update_option_text(0, 2, "C"),
            Err(EditorError::OptionOutOfRange {
                question_index: 0,
                option_index: 2,
                len: 2
            })
        );
        assert_eq!(
            editor.update_option_text(3, 0, "C"),
            Err(EditorError::QuestionOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn toggle_required_flips_back_and_forth() {
        let mut editor = QuestionSetEditor::new();
        assert_eq!(editor.toggle_required(0), Ok(true));
        assert_eq!(editor.toggle_required(0), Ok(false));
    }

    #[test]
    fn move_question_reorders() {
        let mut editor = two_questions();
        editor.add_question();
        editor.update_question_title(2, "Third").unwrap();

        editor.move_question(2, 0).unwrap();
        let titles: Vec<&str> = editor.questions().iter().map(|q| q.title()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second"]);

        assert!(editor.move_question(0, 3).is_err());
    }

    #[test]
    fn remove_option_returns_the_removed_one() {
        let mut editor = QuestionSetEditor::new();
        editor.update_option_text(0, 0, "gone").unwrap();
        let removed = editor.remove_option(0, 0).unwrap();
        assert_eq!(removed.text(), "gone");
        assert_eq!(editor.question(0).unwrap().options().len(), 1);
        assert!(editor.remove_option(0, 1).is_err());
    }

    #[test]
    fn finalize_hands_over_the_snapshot_unchanged() {
        let mut editor = QuestionSetEditor::new();
        editor.set_title("Midterm");
        editor.set_description("Chapter 1-3");
        let expected = editor.snapshot();

        let mut sink = MockSubmissionSink::new();
        sink.expect_submit()
            .withf(move |document| document == &expected)
            .times(1)
            .returning(|_| Ok(()));

        let before = editor.clone();
        editor.finalize(&sink);
        assert_eq!(editor, before);
    }

    #[test]
    fn finalize_swallows_sink_failures() {
        let editor = QuestionSetEditor::new();
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit()
            .times(1)
            .returning(|_| Err(SubmissionError::Rejected("offline".to_owned())));

        editor.finalize(&sink);
    }
}
