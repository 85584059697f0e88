//! Competency-exam repository — one-to-one with students, whole-row upsert.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone, Default)]
pub struct CompetencyRow {
    pub student_id: i64,
    pub exam_result: Option<String>,
    pub exam_date: Option<String>,
    /// Secondary (english/qualifying) result.
    pub english_result: Option<String>,
    pub notes: Option<String>,
}

impl CompetencyRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            exam_result: row.get("exam_result")?,
            exam_date: row.get("exam_date")?,
            english_result: row.get("english_result")?,
            notes: row.get("notes")?,
        })
    }
}

pub fn upsert(db: &Database, competency: &CompetencyRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO competency
             (student_id, exam_result, exam_date, english_result, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                competency.student_id,
                competency.exam_result,
                competency.exam_date,
                competency.english_result,
                competency.notes,
            ],
        )?;
        Ok(())
    })
}

pub fn find(db: &Database, student_id: i64) -> Result<Option<CompetencyRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM competency WHERE student_id = ?1")?;
        let mut rows = stmt.query_map(params![student_id], CompetencyRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::student_repo::{self, StudentRow};

    #[test]
    fn test_upsert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let sid = student_repo::insert(
            &db,
            &StudentRow {
                full_name: "x".to_string(),
                student_code: "S1".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        upsert(
            &db,
            &CompetencyRow {
                student_id: sid,
                exam_result: Some("ناجح".to_string()),
                exam_date: Some("2026-05-01".to_string()),
                english_result: Some("85".to_string()),
                notes: None,
            },
        )
        .unwrap();

        let found = find(&db, sid).unwrap().unwrap();
        assert_eq!(found.exam_result.as_deref(), Some("ناجح"));
        assert_eq!(found.english_result.as_deref(), Some("85"));
    }
}
