//! Shared helpers for the integration tests.

use gradreg::db::Database;
use gradreg::record::{self, CourseEntry, StudentDraft};
use gradreg::storage::UploadStore;
use tempfile::TempDir;

/// A fresh in-memory database plus an upload store in a temp directory.
pub struct Harness {
    pub db: Database,
    pub uploads: UploadStore,
    _dir: TempDir,
}

pub fn harness() -> Harness {
    let dir = TempDir::new().expect("tempdir");
    let uploads = UploadStore::new(dir.path());
    Harness {
        db: Database::open_in_memory().expect("open db"),
        uploads,
        _dir: dir,
    }
}

pub fn draft(name: &str, code: &str) -> StudentDraft {
    StudentDraft {
        full_name: name.to_string(),
        student_code: code.to_string(),
        college: Some("كلية العلوم".to_string()),
        department: Some("علوم الحاسوب".to_string()),
        level: Some("ماجستير".to_string()),
        study_type: Some("صباحي".to_string()),
        ..Default::default()
    }
}

pub fn course(name: &str, semester: &str, credits: &str) -> CourseEntry {
    CourseEntry {
        course_name: name.to_string(),
        semester: semester.to_string(),
        credits: credits.to_string(),
    }
}

/// Registers a student with two courses and returns the internal key.
pub fn enrolled_student(h: &Harness, code: &str) -> i64 {
    let id = record::save_identity(&h.db, &h.uploads, None, &draft("علي حسين", code), None)
        .expect("save identity");
    record::add_courses(
        &h.db,
        id,
        &[
            course("ذكاء اصطناعي", "الفصل الأول", "3"),
            course("نظم تشغيل", "الفصل الثاني", "3"),
        ],
    )
    .expect("add courses");
    id
}
