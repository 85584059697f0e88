//! Admission repository — one-to-one with students, whole-row upsert.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone, Default)]
pub struct AdmissionRow {
    pub student_id: i64,
    pub admission_type: Option<String>,
    pub year: Option<String>,
    /// Computed overall average, stored as text (see `record::apply_grade_sheet`).
    pub avg: Option<String>,
    pub notes: Option<String>,
    pub graduation_date: Option<String>,
}

impl AdmissionRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            admission_type: row.get("admission_type")?,
            year: row.get("year")?,
            avg: row.get("avg")?,
            notes: row.get("notes")?,
            graduation_date: row.get("graduation_date")?,
        })
    }
}

/// Inserts or replaces the admission row for a student.
pub fn upsert(db: &Database, admission: &AdmissionRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO admission
             (student_id, admission_type, year, avg, notes, graduation_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                admission.student_id,
                admission.admission_type,
                admission.year,
                admission.avg,
                admission.notes,
                admission.graduation_date,
            ],
        )?;
        Ok(())
    })
}

/// Fetches the admission row for a student, if any.
pub fn find(db: &Database, student_id: i64) -> Result<Option<AdmissionRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM admission WHERE student_id = ?1")?;
        let mut rows = stmt.query_map(params![student_id], AdmissionRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}
