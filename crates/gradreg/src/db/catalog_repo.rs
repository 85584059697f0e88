//! Course-catalog repository.
//!
//! The catalog is seeded by migration and learns new course names as
//! intake saves them, so the course picker grows with real usage.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub course_name: String,
    pub default_credits: i64,
}

impl CatalogEntry {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            course_name: row.get("course_name")?,
            default_credits: row.get("default_credits").unwrap_or(3),
        })
    }
}

/// Lists the catalog alphabetically.
pub fn list(db: &Database) -> Result<Vec<CatalogEntry>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT course_name, default_credits FROM course_catalog ORDER BY course_name",
        )?;
        let rows: Vec<CatalogEntry> = stmt
            .query_map([], CatalogEntry::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Records a course name in the catalog if it is not already known.
pub fn remember(db: &Database, course_name: &str, default_credits: i64) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO course_catalog (course_name, default_credits) VALUES (?1, ?2)",
            params![course_name, default_credits],
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let db = Database::open_in_memory().unwrap();
        let entries = list(&db).unwrap();
        assert_eq!(entries.len(), 9);
        assert!(entries.iter().any(|e| e.course_name == "ذكاء اصطناعي"));
    }

    #[test]
    fn test_remember_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        remember(&db, "طرق بحث", 2).unwrap();
        remember(&db, "طرق بحث", 3).unwrap();

        let entries = list(&db).unwrap();
        let hits: Vec<_> = entries
            .iter()
            .filter(|e| e.course_name == "طرق بحث")
            .collect();
        assert_eq!(hits.len(), 1);
        // First write wins.
        assert_eq!(hits[0].default_credits, 2);
    }
}
