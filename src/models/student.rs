use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "20230001")]
    pub control_number: String,
    #[schema(example = "Juan")]
    pub first_name: String,
    #[schema(example = "Perez")]
    pub paternal_last_name: String,
    #[schema(example = "Lopez")]
    pub maternal_last_name: String,
    #[schema(example = "Computer Science")]
    pub program: String,
    /// Path or URL of an uploaded photo.
    pub photo_reference: Option<String>,
}

/// A validated student that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub control_number: String,
    pub first_name: String,
    pub paternal_last_name: String,
    pub maternal_last_name: String,
    pub program: String,
    pub photo_reference: Option<String>,
}

impl NewStudent {
    pub fn with_id(self, id: i64) -> Student {
        Student {
            id,
            control_number: self.control_number,
            first_name: self.first_name,
            paternal_last_name: self.paternal_last_name,
            maternal_last_name: self.maternal_last_name,
            program: self.program,
            photo_reference: self.photo_reference,
        }
    }
}

/// Columns a client may change. Update statements only ever name these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentColumn {
    ControlNumber,
    FirstName,
    PaternalLastName,
    MaternalLastName,
    Program,
    PhotoReference,
}

impl StudentColumn {
    #[cfg(test)]
    pub const ALL: [StudentColumn; 6] = [
        StudentColumn::ControlNumber,
        StudentColumn::FirstName,
        StudentColumn::PaternalLastName,
        StudentColumn::MaternalLastName,
        StudentColumn::Program,
        StudentColumn::PhotoReference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StudentColumn::ControlNumber => "control_number",
            StudentColumn::FirstName => "first_name",
            StudentColumn::PaternalLastName => "paternal_last_name",
            StudentColumn::MaternalLastName => "maternal_last_name",
            StudentColumn::Program => "program",
            StudentColumn::PhotoReference => "photo_reference",
        }
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, StudentColumn::PhotoReference)
    }
}

/// A non-empty set of column assignments for a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentChanges {
    assignments: Vec<(StudentColumn, Option<String>)>,
}

impl StudentChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, replacing any earlier assignment to it.
    pub fn set(&mut self, column: StudentColumn, value: Option<String>) {
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
    }

    pub fn assignments(&self) -> &[(StudentColumn, Option<String>)] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Applies the changes to an in-memory record.
    #[cfg(test)]
    pub fn apply_to(&self, student: &mut Student) {
        for (column, value) in &self.assignments {
            let value = value.clone();
            match column {
                StudentColumn::ControlNumber => student.control_number = value.unwrap_or_default(),
                StudentColumn::FirstName => student.first_name = value.unwrap_or_default(),
                StudentColumn::PaternalLastName => {
                    student.paternal_last_name = value.unwrap_or_default()
                }
                StudentColumn::MaternalLastName => {
                    student.maternal_last_name = value.unwrap_or_default()
                }
                StudentColumn::Program => student.program = value.unwrap_or_default(),
                StudentColumn::PhotoReference => student.photo_reference = value,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { affected: u64, student: Student },
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}
