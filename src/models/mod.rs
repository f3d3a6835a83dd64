pub mod student;

pub use student::{DeleteOutcome, NewStudent, Student, StudentChanges, StudentColumn, UpdateOutcome};
