use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a question, stable for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

/// Identifier of an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(Uuid);

impl QuestionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn retreive(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn uuid(&self) -> &Uuid {
        &self.0
    }
}

impl OptionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn retreive(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
