//! Request payloads and the checks they must pass before reaching the store.
//!
//! Create requires every business field. Update requires at least one known
//! field, and each field it carries must be non-blank; only `photo_reference`
//! may be set to `null`.

use crate::models::{NewStudent, StudentChanges, StudentColumn};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("fields cannot be empty or null: {}", .0.join(", "))]
    BlankFields(Vec<&'static str>),
    #[error("request contains no updatable fields")]
    NoFields,
    #[error("malformed request body: {0}")]
    Body(String),
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "20230001")]
    pub control_number: Option<String>,
    #[schema(example = "Juan")]
    pub first_name: Option<String>,
    #[schema(example = "Perez")]
    pub paternal_last_name: Option<String>,
    #[schema(example = "Lopez")]
    pub maternal_last_name: Option<String>,
    #[schema(example = "Computer Science")]
    pub program: Option<String>,
    pub photo_reference: Option<String>,
}

/// Partial update. A field left out is unchanged; `null` is only meaningful for
/// `photo_reference`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "20230001")]
    pub control_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "Ana")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub paternal_last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub maternal_last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "EE")]
    pub program: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub photo_reference: Option<Option<String>>,
}

// Distinguishes an explicit `null` (Some(None)) from an absent key (None).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_create(request: CreateStudentRequest) -> Result<NewStudent, ValidationError> {
    let mut missing = Vec::new();
    let mut take = |column: StudentColumn, value: Option<String>| match value {
        Some(v) if !is_blank(&v) => v,
        _ => {
            missing.push(column.as_str());
            String::new()
        }
    };

    let control_number = take(StudentColumn::ControlNumber, request.control_number);
    let first_name = take(StudentColumn::FirstName, request.first_name);
    let paternal_last_name = take(StudentColumn::PaternalLastName, request.paternal_last_name);
    let maternal_last_name = take(StudentColumn::MaternalLastName, request.maternal_last_name);
    let program = take(StudentColumn::Program, request.program);

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    Ok(NewStudent {
        control_number,
        first_name,
        paternal_last_name,
        maternal_last_name,
        program,
        photo_reference: request.photo_reference.filter(|p| !is_blank(p)),
    })
}

pub fn validate_update(request: UpdateStudentRequest) -> Result<StudentChanges, ValidationError> {
    let fields = [
        (StudentColumn::ControlNumber, request.control_number),
        (StudentColumn::FirstName, request.first_name),
        (StudentColumn::PaternalLastName, request.paternal_last_name),
        (StudentColumn::MaternalLastName, request.maternal_last_name),
        (StudentColumn::Program, request.program),
        (StudentColumn::PhotoReference, request.photo_reference),
    ];

    let mut changes = StudentChanges::new();
    let mut blank = Vec::new();

    for (column, value) in fields {
        let Some(value) = value else { continue };
        match value {
            Some(v) if column.is_nullable() && is_blank(&v) => changes.set(column, None),
            Some(v) if is_blank(&v) => blank.push(column.as_str()),
            Some(v) => changes.set(column, Some(v)),
            None if column.is_nullable() => changes.set(column, None),
            None => blank.push(column.as_str()),
        }
    }

    if !blank.is_empty() {
        return Err(ValidationError::BlankFields(blank));
    }
    if changes.is_empty() {
        return Err(ValidationError::NoFields);
    }
    Ok(changes)
}

/// Parses a path id. Only plain decimal digits naming a positive `i64` are accepted.
pub fn parse_student_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
