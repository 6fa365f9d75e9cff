pub mod document;
pub mod editor;
pub mod id;
pub mod sink;

pub use document::{FormDocument, Question, QuestionOption, QuestionType, Questions};
pub use editor::{EditorError, QuestionSetEditor};
pub use id::{OptionId, QuestionId};
pub use sink::{LogSink, SubmissionError, SubmissionSink};
