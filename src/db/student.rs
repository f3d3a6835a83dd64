use super::StoreError;
use crate::models::{DeleteOutcome, NewStudent, Student, StudentChanges, UpdateOutcome};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const SELECT_COLUMNS: &str =
    "id, control_number, first_name, paternal_last_name, maternal_last_name, program, photo_reference";

/// Persistence operations the HTTP layer relies on.
///
/// Lookups report absence as `None`/`NotFound`, never as an error; a `StoreError`
/// always means the store itself failed.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Student>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, StoreError>;

    /// Stores a new student and returns it with the id assigned by the store.
    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError>;

    async fn update(&self, id: i64, changes: StudentChanges) -> Result<UpdateOutcome, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<DeleteOutcome, StoreError>;
}

pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for StudentRepository {
    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {SELECT_COLUMNS} FROM students ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {SELECT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO students (
                control_number, first_name, paternal_last_name, maternal_last_name,
                program, photo_reference
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(&student.control_number)
        .bind(&student.first_name)
        .bind(&student.paternal_last_name)
        .bind(&student.maternal_last_name)
        .bind(&student.program)
        .bind(&student.photo_reference)
        .fetch_one(&self.pool)
        .await?;
        Ok(student.with_id(id))
    }

    async fn update(&self, id: i64, changes: StudentChanges) -> Result<UpdateOutcome, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut query = build_update(id, &changes);
        let rows = query
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await?;

        let affected = rows.len() as u64;
        Ok(match rows.into_iter().next() {
            Some(student) => UpdateOutcome::Updated { affected, student },
            None => UpdateOutcome::NotFound,
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<DeleteOutcome, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(if result.rows_affected() == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }
}

/// Builds `UPDATE students SET ... WHERE id = $n RETURNING ...`.
///
/// Column names come from `StudentColumn`; every value is a bind parameter.
fn build_update(id: i64, changes: &StudentChanges) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE students SET ");

    let mut assignments = query.separated(", ");
    for (column, value) in changes.assignments() {
        assignments.push(column.as_str());
        assignments.push_unseparated(" = ");
        assignments.push_bind_unseparated(value.clone());
    }

    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(" RETURNING ");
    query.push(SELECT_COLUMNS);
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentColumn;

    #[test]
    fn test_update_binds_single_column() {
        let mut changes = StudentChanges::new();
        changes.set(StudentColumn::Program, Some("EE".to_string()));

        let query = build_update(1, &changes);
        assert_eq!(
            query.sql(),
            format!("UPDATE students SET program = $1 WHERE id = $2 RETURNING {SELECT_COLUMNS}")
        );
    }

    #[test]
    fn test_update_binds_every_value() {
        let mut changes = StudentChanges::new();
        changes.set(StudentColumn::FirstName, Some("Ana'; DROP TABLE students; --".to_string()));
        changes.set(StudentColumn::PhotoReference, None);

        let query = build_update(42, &changes);
        let sql = query.sql();
        assert!(sql.starts_with("UPDATE students SET first_name = $1, photo_reference = $2 WHERE id = $3"));
        assert!(!sql.contains("DROP TABLE"));
    }
}
