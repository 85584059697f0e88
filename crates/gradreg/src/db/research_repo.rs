//! Research/thesis repository — one-to-one with students.
//!
//! Upsert replaces the whole row except the uploaded-document reference,
//! which is coalesced: a NULL incoming filename keeps whatever is stored,
//! so re-saving the form without a new upload never drops the document.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone, Default)]
pub struct ResearchRow {
    pub student_id: i64,
    pub title: Option<String>,
    pub supervisor: Option<String>,
    pub start_date: Option<String>,
    /// Comma-joined keyword list (see `crate::committee` for the same
    /// delimited-list convention).
    pub keywords: Option<String>,
    pub abstract_text: Option<String>,
    pub research_filename: Option<String>,
    pub credits: i64,
    pub grade: Option<String>,
}

impl ResearchRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            title: row.get("title")?,
            supervisor: row.get("supervisor")?,
            start_date: row.get("start_date")?,
            keywords: row.get("keywords")?,
            abstract_text: row.get("abstract")?,
            research_filename: row.get("research_filename")?,
            credits: row.get("credits").unwrap_or(0),
            grade: row.get("grade")?,
        })
    }
}

/// Inserts or replaces the research row. `research_filename = None`
/// preserves the previously stored reference.
pub fn upsert(db: &Database, research: &ResearchRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO research
             (student_id, title, supervisor, start_date, keywords, abstract,
              research_filename, credits, grade)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6,
                     COALESCE(?7, (SELECT research_filename FROM research WHERE student_id = ?1)),
                     ?8, ?9)",
            params![
                research.student_id,
                research.title,
                research.supervisor,
                research.start_date,
                research.keywords,
                research.abstract_text,
                research.research_filename,
                research.credits,
                research.grade,
            ],
        )?;
        Ok(())
    })
}

pub fn find(db: &Database, student_id: i64) -> Result<Option<ResearchRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM research WHERE student_id = ?1")?;
        let mut rows = stmt.query_map(params![student_id], ResearchRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Which column a registry search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryField {
    Title,
    Supervisor,
    StudentName,
    StartDate,
    StudentCode,
}

/// One row of the research registry listing.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub full_name: String,
    pub student_code: String,
    pub title: Option<String>,
    pub supervisor: Option<String>,
    pub start_date: Option<String>,
    pub research_filename: Option<String>,
}

/// Searches the research registry (research joined with students) with an
/// optional substring filter on the chosen field.
pub fn registry(
    db: &Database,
    q: Option<&str>,
    field: RegistryField,
) -> Result<Vec<RegistryEntry>, DatabaseError> {
    db.with_conn(|conn| {
        let mut sql = String::from(
            "SELECT s.full_name, s.student_code, r.title, r.supervisor,
             r.start_date, r.research_filename
             FROM research r JOIN students s ON r.student_id = s.id",
        );
        let pattern = q.map(|q| format!("%{}%", q));
        if pattern.is_some() {
            let column = match field {
                RegistryField::Title => "r.title",
                RegistryField::Supervisor => "r.supervisor",
                RegistryField::StudentName => "s.full_name",
                RegistryField::StartDate => "r.start_date",
                RegistryField::StudentCode => "s.student_code",
            };
            sql.push_str(&format!(" WHERE {} LIKE ?1", column));
        }

        let map = |row: &Row<'_>| {
            Ok(RegistryEntry {
                full_name: row.get(0)?,
                student_code: row.get(1)?,
                title: row.get(2)?,
                supervisor: row.get(3)?,
                start_date: row.get(4)?,
                research_filename: row.get(5)?,
            })
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows: Vec<RegistryEntry> = match pattern {
            Some(p) => stmt
                .query_map(params![p], map)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::student_repo::{self, StudentRow};

    fn db_with_student(code: &str, name: &str) -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let id = student_repo::insert(
            &db,
            &StudentRow {
                full_name: name.to_string(),
                student_code: code.to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        (db, id)
    }

    fn sample_research(sid: i64) -> ResearchRow {
        ResearchRow {
            student_id: sid,
            title: Some("تمييز الوجوه بالشبكات العصبية".to_string()),
            supervisor: Some("د. كريم".to_string()),
            start_date: Some("2026-03-01".to_string()),
            keywords: Some("شبكات عصبية, رؤية حاسوبية".to_string()),
            abstract_text: Some("ملخص".to_string()),
            research_filename: Some("research_1_20260301_thesis.pdf".to_string()),
            credits: 10,
            grade: Some("90".to_string()),
        }
    }

    #[test]
    fn test_upsert_and_find() {
        let (db, sid) = db_with_student("S1", "علي");
        upsert(&db, &sample_research(sid)).unwrap();

        let found = find(&db, sid).unwrap().unwrap();
        assert_eq!(found.credits, 10);
        assert_eq!(
            found.research_filename.as_deref(),
            Some("research_1_20260301_thesis.pdf")
        );
    }

    #[test]
    fn test_upsert_preserves_file_reference_on_none() {
        let (db, sid) = db_with_student("S1", "علي");
        upsert(&db, &sample_research(sid)).unwrap();

        let mut resubmit = sample_research(sid);
        resubmit.title = Some("عنوان معدل".to_string());
        resubmit.research_filename = None;
        upsert(&db, &resubmit).unwrap();

        let found = find(&db, sid).unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("عنوان معدل"));
        assert_eq!(
            found.research_filename.as_deref(),
            Some("research_1_20260301_thesis.pdf")
        );
    }

    #[test]
    fn test_registry_search_by_supervisor() {
        let (db, sid) = db_with_student("S1", "علي");
        upsert(&db, &sample_research(sid)).unwrap();

        let hits = registry(&db, Some("كريم"), RegistryField::Supervisor).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].student_code, "S1");

        let misses = registry(&db, Some("كريم"), RegistryField::Title).unwrap();
        assert!(misses.is_empty());

        let all = registry(&db, None, RegistryField::Title).unwrap();
        assert_eq!(all.len(), 1);
    }
}
