//! Defense-committee plan repository — one-to-one with students.
//!
//! The member set lives in a comma-joined `members` column; list semantics
//! (append-if-absent, remove-by-value) are in `crate::committee`, composed
//! by `crate::record`.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone, Default)]
pub struct PlanRow {
    pub student_id: i64,
    pub committee_name: Option<String>,
    pub supervisor: Option<String>,
    /// Comma-joined, duplicate-free member list.
    pub members: String,
    pub discussion_date: Option<String>,
    pub notes: Option<String>,
}

impl PlanRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            committee_name: row.get("committee_name")?,
            supervisor: row.get("supervisor")?,
            members: row.get::<_, Option<String>>("members")?.unwrap_or_default(),
            discussion_date: row.get("discussion_date")?,
            notes: row.get("notes")?,
        })
    }
}

pub fn upsert(db: &Database, plan: &PlanRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO plan
             (student_id, committee_name, supervisor, members, discussion_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plan.student_id,
                plan.committee_name,
                plan.supervisor,
                plan.members,
                plan.discussion_date,
                plan.notes,
            ],
        )?;
        Ok(())
    })
}

pub fn find(db: &Database, student_id: i64) -> Result<Option<PlanRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM plan WHERE student_id = ?1")?;
        let mut rows = stmt.query_map(params![student_id], PlanRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}
