use crate::db::StoreError;
use crate::error::{AppError, ErrorBody};
use crate::models::{DeleteOutcome, Student, UpdateOutcome};
use crate::validation::{
    parse_student_id, validate_create, validate_update, CreateStudentRequest, UpdateStudentRequest,
    ValidationError,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use utoipa::ToSchema;

/// Tag for grouping student endpoints in OpenAPI documentation
pub static STUDENTS_TAG: &str = "students";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "student 1 deleted")]
    pub message: String,
}

fn student_id(raw: &str) -> Result<i64, AppError> {
    parse_student_id(raw).ok_or_else(|| AppError::MalformedId(raw.to_string()))
}

fn body_error(rejection: JsonRejection) -> AppError {
    ValidationError::Body(rejection.body_text()).into()
}

/// Runs a write on its own task so a dropped request cannot abandon it mid-flight.
async fn run_to_completion<T, F>(action: &'static str, write: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, StoreError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(write).await {
        Ok(result) => result.map_err(AppError::store(action)),
        Err(e) => {
            tracing::error!("Store task to {} did not complete: {}", action, e);
            Err(AppError::Task { action })
        }
    }
}

/// List every student.
#[utoipa::path(
    get,
    path = "/students",
    tag = STUDENTS_TAG,
    responses(
        (status = 200, description = "All students, possibly empty", body = [Student]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
)]
pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state
        .students
        .list_all()
        .await
        .map_err(AppError::store("list students"))?;

    tracing::debug!("Listed {} student(s)", students.len());
    Ok(Json(students))
}

/// Get a student by id.
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = STUDENTS_TAG,
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "The student", body = Student),
        (status = 400, description = "Id is not a positive integer", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
)]
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = student_id(&raw_id)?;

    state
        .students
        .find_by_id(id)
        .await
        .map_err(AppError::store("fetch student"))?
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

/// Create a student. The store assigns the id.
#[utoipa::path(
    post,
    path = "/students",
    tag = STUDENTS_TAG,
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Missing or empty required fields", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
)]
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let Json(request) = payload.map_err(body_error)?;
    let new_student = validate_create(request)?;

    let store = state.students.clone();
    let student =
        run_to_completion("create student", async move { store.insert(new_student).await }).await?;

    tracing::info!("Created student {} ({})", student.id, student.control_number);
    Ok((StatusCode::CREATED, Json(student)))
}

/// Update some or all fields of a student.
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = STUDENTS_TAG,
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "The updated student", body = Student),
        (status = 400, description = "Invalid id or no valid fields to update", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
)]
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let id = student_id(&raw_id)?;
    let Json(request) = payload.map_err(body_error)?;
    let changes = validate_update(request)?;

    let store = state.students.clone();
    let outcome =
        run_to_completion("update student", async move { store.update(id, changes).await }).await?;

    match outcome {
        UpdateOutcome::Updated { affected, student } => {
            tracing::info!("Updated student {} ({} row(s))", id, affected);
            Ok(Json(student))
        }
        UpdateOutcome::NotFound => Err(AppError::NotFound(id)),
    }
}

/// Delete a student permanently.
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = STUDENTS_TAG,
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageBody),
        (status = 400, description = "Id is not a positive integer", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
)]
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = student_id(&raw_id)?;

    let store = state.students.clone();
    let outcome =
        run_to_completion("delete student", async move { store.delete_by_id(id).await }).await?;

    match outcome {
        DeleteOutcome::Deleted => {
            tracing::info!("Deleted student {}", id);
            Ok(Json(MessageBody {
                message: format!("student {} deleted", id),
            }))
        }
        DeleteOutcome::NotFound => Err(AppError::NotFound(id)),
    }
}
