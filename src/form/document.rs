use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{OptionId, QuestionId};

pub const DEFAULT_FORM_TITLE: &str = "Untitled Form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Checkbox,
    ShortAnswer,
    Paragraph,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::Checkbox,
        QuestionType::ShortAnswer,
        QuestionType::Paragraph,
    ];

    /// Option-bearing types. Options of other types are kept but never shown.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Checkbox)
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::Checkbox => "Checkbox",
            QuestionType::ShortAnswer => "Short Answer",
            QuestionType::Paragraph => "Paragraph",
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "( )",
            QuestionType::Checkbox => "[ ]",
            QuestionType::ShortAnswer | QuestionType::Paragraph => "",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown question type '{0}'")]
pub struct UnknownQuestionType(String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    /// Accepts both keyboard labels ("Short Answer") and wire names ("short-answer").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(' ', "-");
        match normalized.as_str() {
            "multiple-choice" => Ok(QuestionType::MultipleChoice),
            "checkbox" => Ok(QuestionType::Checkbox),
            "short-answer" => Ok(QuestionType::ShortAnswer),
            "paragraph" => Ok(QuestionType::Paragraph),
            _ => Err(UnknownQuestionType(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub(crate) id: OptionId,
    pub(crate) text: String,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: OptionId::generate(),
            text: text.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new())
    }

    pub fn retreive(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    pub fn id(&self) -> &OptionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub(crate) id: QuestionId,
    #[serde(rename = "type")]
    pub(crate) kind: QuestionType,
    pub(crate) title: String,
    pub(crate) required: bool,
    pub(crate) options: Vec<QuestionOption>,
}

impl Question {
    /// A blank multiple-choice question with two empty options.
    pub fn new() -> Self {
        Self {
            id: QuestionId::generate(),
            kind: QuestionType::MultipleChoice,
            title: String::new(),
            required: false,
            options: vec![QuestionOption::blank(), QuestionOption::blank()],
        }
    }

    pub fn retreive(
        id: QuestionId,
        kind: QuestionType,
        title: impl Into<String>,
        required: bool,
        options: Vec<QuestionOption>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            required,
            options,
        }
    }

    /// Copy of this question under fresh question and option ids.
    pub fn duplicate(&self) -> Self {
        Self {
            id: QuestionId::generate(),
            kind: self.kind,
            title: self.title.clone(),
            required: self.required,
            options: self
                .options
                .iter()
                .map(|option| QuestionOption::new(option.text.clone()))
                .collect(),
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// Options as presented to the user: empty unless the type is option-bearing.
    pub fn visible_options(&self) -> &[QuestionOption] {
        if self.kind.has_options() {
            &self.options
        } else {
            &[]
        }
    }
}

impl Default for Question {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.title.is_empty() {
            "(untitled question)"
        } else {
            self.title.as_str()
        };
        write!(f, "{}{} [{}]", title, if self.required { " *" } else { "" }, self.kind)?;
        for (i, option) in self.visible_options().iter().enumerate() {
            let text = if option.text.is_empty() {
                format!("Option {}", i + 1)
            } else {
                option.text.clone()
            };
            write!(f, "\n   {} {}", self.kind.marker(), text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("a form must contain at least one question")]
pub struct EmptyQuestions;

/// Ordered questions of a form. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct Questions(Vec<Question>);

impl Questions {
    pub fn new(first: Question) -> Self {
        Self(vec![first])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.0
    }

    pub(crate) fn push(&mut self, question: Question) {
        self.0.push(question);
    }

    pub(crate) fn insert(&mut self, index: usize, question: Question) {
        self.0.insert(index, question);
    }

    /// Removes the question at `index` unless it is the last one left.
    /// `index` must be in range.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Question> {
        if self.0.len() > 1 {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        let question = self.0.remove(from);
        self.0.insert(to, question);
    }
}

impl TryFrom<Vec<Question>> for Questions {
    type Error = EmptyQuestions;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        if questions.is_empty() {
            Err(EmptyQuestions)
        } else {
            Ok(Self(questions))
        }
    }
}

impl From<Questions> for Vec<Question> {
    fn from(questions: Questions) -> Self {
        questions.0
    }
}

impl<'a> IntoIterator for &'a Questions {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Snapshot of a whole form as handed to a submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDocument {
    pub title: String,
    pub description: String,
    pub questions: Questions,
}

impl Default for FormDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_FORM_TITLE.to_owned(),
            description: String::new(),
            questions: Questions::new(Question::new()),
        }
    }
}

impl fmt::Display for FormDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if !self.description.is_empty() {
            write!(f, "\n{}", self.description)?;
        }
        writeln!(f)?;
        for (i, question) in self.questions.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, question)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn default_document_is_seeded() {
        let document = FormDocument::default();
        assert_eq!(document.title, DEFAULT_FORM_TITLE);
        assert_eq!(document.description, "");
        assert_eq!(document.questions.len(), 1);

        let seeded = &document.questions.as_slice()[0];
        assert_eq!(seeded.kind(), QuestionType::MultipleChoice);
        assert_eq!(seeded.title(), "");
        assert!(!seeded.required());
        assert_eq!(seeded.options().len(), 2);
        assert!(seeded.options().iter().all(|o| o.text().is_empty()));
        assert_ne!(seeded.options()[0].id(), seeded.options()[1].id());
    }

    #[test]
    fn question_type_parses_labels_and_wire_names() {
        for kind in QuestionType::ALL {
            assert_eq!(kind.label().parse::<QuestionType>(), Ok(kind));
        }
        assert_eq!("short-answer".parse::<QuestionType>(), Ok(QuestionType::ShortAnswer));
        assert!("dropdown".parse::<QuestionType>().is_err());
    }

    #[test]
    fn only_choice_types_bear_options() {
        assert!(QuestionType::MultipleChoice.has_options());
        assert!(QuestionType::Checkbox.has_options());
        assert!(!QuestionType::ShortAnswer.has_options());
        assert!(!QuestionType::Paragraph.has_options());
    }

    #[test]
    fn hidden_options_are_kept() {
        let mut question = Question::new();
        question.kind = QuestionType::Paragraph;
        assert!(question.visible_options().is_empty());
        assert_eq!(question.options().len(), 2);
    }

    #[test]
    fn duplicate_copies_content_under_new_ids() {
        let original = Question::retreive(
            QuestionId::retreive(Uuid::from_u128(10)),
            QuestionType::Checkbox,
            "Pick",
            true,
            vec![
                QuestionOption::retreive(OptionId::retreive(Uuid::from_u128(1)), "A"),
                QuestionOption::retreive(OptionId::retreive(Uuid::from_u128(2)), "B"),
            ],
        );
        let copy = original.duplicate();

        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.kind(), original.kind());
        assert_eq!(copy.title(), original.title());
        assert_eq!(copy.required(), original.required());
        let texts: Vec<&str> = copy.options().iter().map(|o| o.text()).collect();
        assert_eq!(texts, vec!["A", "B"]);
        for option in copy.options() {
            assert!(original.options().iter().all(|o| o.id() != option.id()));
        }
        assert_ne!(copy.options()[0].id(), copy.options()[1].id());
    }

    #[test]
    fn questions_refuse_to_drop_the_last_one() {
        let mut questions = Questions::new(Question::new());
        assert_eq!(questions.remove(0), None);
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn empty_question_list_does_not_deserialize() {
        let json = r#"{"title":"t","description":"","questions":[]}"#;
        assert!(serde_json::from_str::<FormDocument>(json).is_err());
    }

    #[test]
    fn serialized_question_uses_kebab_case_type() {
        let question = Question::new();
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "multiple-choice");
        assert_eq!(value["options"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn display_hides_options_of_text_questions() {
        let mut document = FormDocument::default();
        document.questions.get_mut(0).unwrap().title = "Name".to_owned();
        document.questions.get_mut(0).unwrap().kind = QuestionType::ShortAnswer;
        assert_eq!(document.to_string(), "Untitled Form\n\n1. Name [Short Answer]");
    }
}
