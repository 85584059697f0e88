//! Course repository — the one-to-many grade rows per student.
//!
//! Numeric columns are coerced leniently at the row-mapping boundary: a
//! corrupted value reads as 0 (or `'0'` for the grade text) instead of
//! failing the whole listing. This is the single place where loose stored
//! data becomes strongly typed.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone)]
pub struct CourseRow {
    pub id: i64,
    pub student_id: i64,
    pub course_name: String,
    /// Free-text semester label, expected to contain a first/second token.
    pub semester: String,
    pub credits: i64,
    pub coursework_total: f64,
    /// JSON array of component scores, e.g. `[10, 8, 12, 0, 0]`.
    pub coursework_breakdown: String,
    pub final_exam: f64,
    /// Stored as text; parse-or-skip when averaging.
    pub grade: String,
}

impl CourseRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            student_id: row.get("student_id")?,
            course_name: row
                .get::<_, Option<String>>("course_name")?
                .unwrap_or_default(),
            semester: row.get::<_, Option<String>>("semester")?.unwrap_or_default(),
            credits: row.get("credits").unwrap_or(0),
            coursework_total: row.get("coursework_total").unwrap_or(0.0),
            coursework_breakdown: row
                .get::<_, Option<String>>("coursework_breakdown")
                .unwrap_or(None)
                .unwrap_or_else(|| "[]".to_string()),
            final_exam: row.get("final_exam").unwrap_or(0.0),
            grade: row
                .get::<_, Option<String>>("grade")
                .unwrap_or(None)
                .unwrap_or_else(|| "0".to_string()),
        })
    }
}

/// Inserts a course registration (grades start at their defaults) and
/// returns the new course id.
pub fn insert(
    db: &Database,
    student_id: i64,
    course_name: &str,
    semester: &str,
    credits: i64,
) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO courses (student_id, course_name, semester, credits)
             VALUES (?1, ?2, ?3, ?4)",
            params![student_id, course_name, semester, credits],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Lists all course rows for a student in insertion order.
pub fn list_for_student(db: &Database, student_id: i64) -> Result<Vec<CourseRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM courses WHERE student_id = ?1 ORDER BY id")?;
        let rows: Vec<CourseRow> = stmt
            .query_map(params![student_id], CourseRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Writes the derived grade columns for one course.
pub fn update_grades(
    db: &Database,
    course_id: i64,
    coursework_total: f64,
    coursework_breakdown: &str,
    final_exam: f64,
    grade: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE courses SET coursework_total=?2, coursework_breakdown=?3,
             final_exam=?4, grade=?5 WHERE id=?1",
            params![
                course_id,
                coursework_total,
                coursework_breakdown,
                final_exam,
                grade
            ],
        )?;
        Ok(())
    })
}

/// Deletes one course, scoped to its owning student so a stale or forged
/// course id cannot touch another record. Returns whether a row was removed.
pub fn delete(db: &Database, course_id: i64, student_id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let n = conn.execute(
            "DELETE FROM courses WHERE id = ?1 AND student_id = ?2",
            params![course_id, student_id],
        )?;
        Ok(n > 0)
    })
}
