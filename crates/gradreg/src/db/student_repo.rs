//! Student repository — CRUD and listing queries for the `students` table.
//!
//! The external `student_code` carries a UNIQUE constraint; violations
//! surface as `DatabaseError::Conflict` so callers can re-prompt instead
//! of failing hard.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A student identity row.
#[derive(Debug, Clone, Default)]
pub struct StudentRow {
    pub id: i64,
    pub full_name: String,
    pub full_name_en: Option<String>,
    /// External human-readable code, globally unique.
    pub student_code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub department_en: Option<String>,
    pub level: Option<String>,
    pub level_en: Option<String>,
    pub study_type: Option<String>,
    /// Stored credential; `None` means "secret equals student_code".
    pub password: Option<String>,
    pub image_filename: Option<String>,
}

impl StudentRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            full_name_en: row.get("full_name_en")?,
            student_code: row.get("student_code")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            college: row.get("college")?,
            department: row.get("department")?,
            department_en: row.get("department_en")?,
            level: row.get("level")?,
            level_en: row.get("level_en")?,
            study_type: row.get("study_type")?,
            password: row.get("password")?,
            image_filename: row.get("image_filename")?,
        })
    }
}

/// Query filter parameters for the student listing.
#[derive(Debug, Default, Clone)]
pub struct StudentFilter {
    /// Substring match on name or student code.
    pub q: Option<String>,
    pub level: Option<String>,
    pub study_type: Option<String>,
}

/// One row of the administrative listing (students joined with admission).
#[derive(Debug, Clone)]
pub struct ListingRow {
    pub id: i64,
    pub full_name: String,
    pub student_code: String,
    pub level: Option<String>,
    pub study_type: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub avg: Option<String>,
    pub admission_type: Option<String>,
}

/// Headcount statistics for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentStats {
    pub total: u64,
    pub masters: u64,
    pub doctorate: u64,
    pub morning: u64,
    pub evening: u64,
}

const LEVEL_MASTERS: &str = "ماجستير";
const LEVEL_DOCTORATE: &str = "دكتوراه";
const STUDY_MORNING: &str = "صباحي";
const STUDY_EVENING: &str = "مسائي";

/// Inserts a new student and returns the generated internal id.
/// A duplicate `student_code` yields `DatabaseError::Conflict`.
pub fn insert(db: &Database, student: &StudentRow) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO students (full_name, full_name_en, student_code, email, phone,
             college, department, department_en, level, level_en, study_type, image_filename)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                student.full_name,
                student.full_name_en,
                student.student_code,
                student.email,
                student.phone,
                student.college,
                student.department,
                student.department_en,
                student.level,
                student.level_en,
                student.study_type,
                student.image_filename,
            ],
        )
        .map_err(DatabaseError::from_student_write)?;
        Ok(conn.last_insert_rowid())
    })
}

/// Updates an existing student row keyed by `student.id`.
///
/// The portrait reference is coalesced: passing `None` keeps whatever is
/// already stored. The credential column is never touched here (see
/// `set_password`). A duplicate `student_code` yields `Conflict`.
pub fn update(db: &Database, student: &StudentRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE students SET full_name=?2, full_name_en=?3, student_code=?4, email=?5,
             phone=?6, college=?7, department=?8, department_en=?9, level=?10, level_en=?11,
             study_type=?12, image_filename=COALESCE(?13, image_filename)
             WHERE id=?1",
            params![
                student.id,
                student.full_name,
                student.full_name_en,
                student.student_code,
                student.email,
                student.phone,
                student.college,
                student.department,
                student.department_en,
                student.level,
                student.level_en,
                student.study_type,
                student.image_filename,
            ],
        )
        .map_err(DatabaseError::from_student_write)?;
        Ok(())
    })
}

/// Finds a student by internal id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<StudentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM students WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], StudentRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Finds a student by external student code (login lookup).
pub fn find_by_code(db: &Database, code: &str) -> Result<Option<StudentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM students WHERE student_code = ?1")?;
        let mut rows = stmt.query_map(params![code], StudentRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Stores a new (hashed) credential for the student.
pub fn set_password(db: &Database, id: i64, stored: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE students SET password = ?2 WHERE id = ?1",
            params![id, stored],
        )?;
        Ok(())
    })
}

/// Queries the administrative listing with optional filters, joined against
/// admission for average and admission type. Newest students first.
pub fn query_listing(
    db: &Database,
    filter: &StudentFilter,
) -> Result<Vec<ListingRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref q) = filter.q {
            let pattern = format!("%{}%", q);
            conditions.push(format!(
                "(s.full_name LIKE ?{} OR s.student_code LIKE ?{})",
                param_values.len() + 1,
                param_values.len() + 2
            ));
            param_values.push(Box::new(pattern.clone()));
            param_values.push(Box::new(pattern));
        }
        if let Some(ref level) = filter.level {
            conditions.push(format!("s.level = ?{}", param_values.len() + 1));
            param_values.push(Box::new(level.clone()));
        }
        if let Some(ref study_type) = filter.study_type {
            conditions.push(format!("s.study_type = ?{}", param_values.len() + 1));
            param_values.push(Box::new(study_type.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT s.id, s.full_name, s.student_code, s.level, s.study_type,
             s.department, s.college, a.avg, a.admission_type
             FROM students s LEFT JOIN admission a ON s.id = a.student_id
             {} ORDER BY s.id DESC",
            where_clause
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows: Vec<ListingRow> = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok(ListingRow {
                    id: row.get(0)?,
                    full_name: row.get(1)?,
                    student_code: row.get(2)?,
                    level: row.get(3)?,
                    study_type: row.get(4)?,
                    department: row.get(5)?,
                    college: row.get(6)?,
                    avg: row.get(7)?,
                    admission_type: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    })
}

/// Dashboard headcounts: total, by level token, by study type.
pub fn stats(db: &Database) -> Result<StudentStats, DatabaseError> {
    db.with_conn(|conn| {
        let total: u64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
        let masters: u64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE level LIKE ?1",
            params![format!("%{}%", LEVEL_MASTERS)],
            |r| r.get(0),
        )?;
        let doctorate: u64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE level LIKE ?1",
            params![format!("%{}%", LEVEL_DOCTORATE)],
            |r| r.get(0),
        )?;
        let morning: u64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE study_type = ?1",
            params![STUDY_MORNING],
            |r| r.get(0),
        )?;
        let evening: u64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE study_type = ?1",
            params![STUDY_EVENING],
            |r| r.get(0),
        )?;
        Ok(StudentStats {
            total,
            masters,
            doctorate,
            morning,
            evening,
        })
    })
}
