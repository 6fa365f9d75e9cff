use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SEMESTERS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];
pub const BRANCHES: [&str; 5] = ["CSE", "ECE", "ME", "CE", "EE"];

pub fn sections(_branch: &str) -> &'static [&'static str] {
    &["A", "B", "C"]
}

pub fn classrooms(_semester: &str) -> &'static [&'static str] {
    &["101", "102", "103", "104", "105"]
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select a semester")]
    MissingSemester,
    #[error("Please select a branch")]
    MissingBranch,
    #[error("Please select a section")]
    MissingSection,
    #[error("Please select a classroom")]
    MissingClassroom,
    #[error("'{value}' is not a valid {field}")]
    UnknownChoice { field: &'static str, value: String },
}

/// Classroom picker state. Section depends on branch and classroom depends on
/// both branch and semester, so changing either clears what depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomSelection {
    semester: Option<String>,
    branch: Option<String>,
    section: Option<String>,
    classroom: Option<String>,
}

fn pick(field: &'static str, allowed: &[&str], value: &str) -> Result<String, SelectionError> {
    allowed
        .iter()
        .find(|candidate| **candidate == value)
        .map(|candidate| (*candidate).to_owned())
        .ok_or_else(|| SelectionError::UnknownChoice {
            field,
            value: value.to_owned(),
        })
}

impl ClassroomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semester(&self) -> Option<&str> {
        self.semester.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn classroom(&self) -> Option<&str> {
        self.classroom.as_deref()
    }

    pub fn choose_semester(&mut self, semester: &str) -> Result<(), SelectionError> {
        let semester = pick("semester", &SEMESTERS, semester)?;
        if self.semester.as_ref() != Some(&semester) {
            self.classroom = None;
        }
        self.semester = Some(semester);
        Ok(())
    }

    pub fn choose_branch(&mut self, branch: &str) -> Result<(), SelectionError> {
        let branch = pick("branch", &BRANCHES, branch)?;
        if self.branch.as_ref() != Some(&branch) {
            self.section = None;
            self.classroom = None;
        }
        self.branch = Some(branch);
        Ok(())
    }

    pub fn choose_section(&mut self, section: &str) -> Result<(), SelectionError> {
        let branch = self.branch.as_deref().ok_or(SelectionError::MissingBranch)?;
        self.section = Some(pick("section", sections(branch), section)?);
        Ok(())
    }

    pub fn choose_classroom(&mut self, classroom: &str) -> Result<(), SelectionError> {
        self.branch.as_deref().ok_or(SelectionError::MissingBranch)?;
        let semester = self.semester.as_deref().ok_or(SelectionError::MissingSemester)?;
        self.classroom = Some(pick("classroom", classrooms(semester), classroom)?);
        Ok(())
    }

    /// Sections on offer, once a branch is chosen.
    pub fn available_sections(&self) -> Option<&'static [&'static str]> {
        self.branch.as_deref().map(sections)
    }

    /// Classrooms on offer, once both branch and semester are chosen.
    pub fn available_classrooms(&self) -> Option<&'static [&'static str]> {
        self.branch.as_ref()?;
        self.semester.as_deref().map(classrooms)
    }

    pub fn validate(&self) -> Result<Classroom, SelectionError> {
        Ok(Classroom {
            semester: self.semester.clone().ok_or(SelectionError::MissingSemester)?,
            branch: self.branch.clone().ok_or(SelectionError::MissingBranch)?,
            section: self.section.clone().ok_or(SelectionError::MissingSection)?,
            classroom: self.classroom.clone().ok_or(SelectionError::MissingClassroom)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub semester: String,
    pub branch: String,
    pub section: String,
    pub classroom: String,
}

impl fmt::Display for Classroom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Semester {}, {}, Section {}, Room {}",
            self.semester, self.branch, self.section, self.classroom
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete() -> ClassroomSelection {
        let mut selection = ClassroomSelection::new();
        selection.choose_semester("3").unwrap();
        selection.choose_branch("CSE").unwrap();
        selection.choose_section("B").unwrap();
        selection.choose_classroom("104").unwrap();
        selection
    }

    #[test]
    fn complete_selection_validates() {
        let classroom = complete().validate().unwrap();
        assert_eq!(classroom.to_string(), "Semester 3, CSE, Section B, Room 104");
    }

    #[test]
    fn validation_reports_first_missing_field() {
        let mut selection = ClassroomSelection::new();
        assert_eq!(selection.validate(), Err(SelectionError::MissingSemester));
        selection.choose_semester("1").unwrap();
        assert_eq!(selection.validate(), Err(SelectionError::MissingBranch));
        selection.choose_branch("EE").unwrap();
        assert_eq!(
            selection.validate().unwrap_err().to_string(),
            "Please select a section"
        );
    }

    #[test]
    fn changing_branch_clears_section_and_classroom() {
        let mut selection = complete();
        selection.choose_branch("ME").unwrap();
        assert_eq!(selection.section(), None);
        assert_eq!(selection.classroom(), None);
        assert_eq!(selection.semester(), Some("3"));
    }

    #[test]
    fn reselecting_same_branch_keeps_dependents() {
        let mut selection = complete();
        selection.choose_branch("CSE").unwrap();
        assert_eq!(selection.section(), Some("B"));
        assert_eq!(selection.classroom(), Some("104"));
    }

    #[test]
    fn changing_semester_clears_only_classroom() {
        let mut selection = complete();
        selection.choose_semester("4").unwrap();
        assert_eq!(selection.classroom(), None);
        assert_eq!(selection.section(), Some("B"));
    }

    #[test]
    fn dependent_fields_need_their_parents() {
        let mut selection = ClassroomSelection::new();
        assert_eq!(selection.available_sections(), None);
        assert_eq!(selection.choose_section("A"), Err(SelectionError::MissingBranch));

        selection.choose_branch("ECE").unwrap();
        assert_eq!(selection.available_classrooms(), None);
        assert_eq!(
            selection.choose_classroom("101"),
            Err(SelectionError::MissingSemester)
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        let mut selection = ClassroomSelection::new();
        assert!(matches!(
            selection.choose_semester("9"),
            Err(SelectionError::UnknownChoice { field: "semester", .. })
        ));
        assert_eq!(selection, ClassroomSelection::new());
    }
}
