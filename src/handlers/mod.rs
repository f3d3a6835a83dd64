pub mod students;

use crate::error::ErrorBody;
use crate::models::Student;
use crate::validation::{CreateStudentRequest, UpdateStudentRequest};
use crate::AppState;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Students API", description = "CRUD operations over student records"),
    paths(
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
    ),
    components(schemas(
        Student,
        CreateStudentRequest,
        UpdateStudentRequest,
        students::MessageBody,
        ErrorBody,
    )),
    tags((name = "students", description = "Student records"))
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
