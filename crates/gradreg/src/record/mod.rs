//! Student record aggregation.
//!
//! Assembles the six per-student entities into one consistent view,
//! composes the intake saves that touch both the database and the upload
//! store, applies the administrative grade sheet, and performs the
//! cascade delete. Field-level redaction for the student portal is a
//! presentation concern; this module exposes the full record plus the
//! portal subset the original views read.

use thiserror::Error;

use crate::committee;
use crate::credentials::{self, CredentialError};
use crate::db::admission_repo::{self, AdmissionRow};
use crate::db::competency_repo::{self, CompetencyRow};
use crate::db::course_repo::{self, CourseRow};
use crate::db::plan_repo::{self, PlanRow};
use crate::db::research_repo::{self, ResearchRow};
use crate::db::student_repo::{self, StudentRow};
use crate::db::{catalog_repo, Database, DatabaseError};
use crate::grades;
use crate::storage::UploadStore;

pub mod transcript;

pub use transcript::{listing_csv, transcript_summary, TranscriptSummary};

#[derive(Error, Debug)]
pub enum RecordError {
    /// The referenced student does not exist. Callers redirect to intake.
    #[error("Student {student_id} not found")]
    NotFound { student_id: i64 },

    /// Duplicate external student code. Callers re-prompt with the
    /// submitted values preserved.
    #[error("Student code already registered")]
    Conflict,

    /// A required identity field was blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for RecordError {
    fn from(e: DatabaseError) -> Self {
        if e.is_conflict() {
            RecordError::Conflict
        } else {
            RecordError::Database(e)
        }
    }
}

/// A course row plus its parsed breakdown, as the views consume it.
#[derive(Debug, Clone)]
pub struct CourseView {
    pub id: i64,
    pub course_name: String,
    pub semester: String,
    pub credits: i64,
    pub breakdown: Vec<f64>,
    pub coursework_total: f64,
    pub final_exam: f64,
    pub grade: String,
}

impl CourseView {
    pub fn from_row(row: CourseRow) -> Self {
        let breakdown = grades::parse_breakdown(&row.coursework_breakdown);
        Self {
            id: row.id,
            course_name: row.course_name,
            semester: row.semester,
            credits: row.credits,
            breakdown,
            coursework_total: row.coursework_total,
            final_exam: row.final_exam,
            grade: row.grade,
        }
    }

    /// Breakdown entries formatted for display (integral scores without
    /// the trailing `.0`).
    pub fn breakdown_display(&self) -> Vec<String> {
        self.breakdown.iter().map(|v| grades::format_score(*v)).collect()
    }
}

/// The consolidated per-student view for review, printing and the portal.
/// Dependent absence is valid and renders as empty, never an error.
#[derive(Debug, Clone)]
pub struct FullRecord {
    pub student: StudentRow,
    pub admission: Option<AdmissionRow>,
    pub courses: Vec<CourseView>,
    pub research: Option<ResearchRow>,
    pub competency: Option<CompetencyRow>,
    pub plan: Option<PlanRow>,
}

/// Loads the full record for a student, or `NotFound` if the student row
/// is absent.
pub fn load_full_record(db: &Database, student_id: i64) -> Result<FullRecord, RecordError> {
    let student =
        student_repo::find_by_id(db, student_id)?.ok_or(RecordError::NotFound { student_id })?;
    let admission = admission_repo::find(db, student_id)?;
    let courses = course_repo::list_for_student(db, student_id)?
        .into_iter()
        .map(CourseView::from_row)
        .collect();
    let research = research_repo::find(db, student_id)?;
    let competency = competency_repo::find(db, student_id)?;
    let plan = plan_repo::find(db, student_id)?;

    Ok(FullRecord {
        student,
        admission,
        courses,
        research,
        competency,
        plan,
    })
}

/// An uploaded file as received from the form layer.
#[derive(Debug, Clone, Copy)]
pub struct FileUpload<'a> {
    pub original_name: &'a str,
    pub content: &'a [u8],
}

/// Identity-step form fields.
#[derive(Debug, Clone, Default)]
pub struct StudentDraft {
    pub full_name: String,
    pub full_name_en: Option<String>,
    pub student_code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub department_en: Option<String>,
    pub level: Option<String>,
    pub level_en: Option<String>,
    pub study_type: Option<String>,
}

/// Saves the Identity step: creates the student (or updates the selected
/// one) and stores the portrait if one was uploaded. A portrait save
/// failure is logged and the record is saved without the reference — the
/// file store and the record store are independent failure domains.
/// Returns the student's internal key.
pub fn save_identity(
    db: &Database,
    uploads: &UploadStore,
    existing: Option<i64>,
    draft: &StudentDraft,
    portrait: Option<FileUpload<'_>>,
) -> Result<i64, RecordError> {
    if draft.full_name.trim().is_empty() {
        return Err(RecordError::MissingField("full_name"));
    }
    if draft.student_code.trim().is_empty() {
        return Err(RecordError::MissingField("student_code"));
    }

    let image_filename = portrait.and_then(|f| {
        match uploads.save_portrait(f.original_name, f.content) {
            Ok(stored) => Some(stored),
            Err(e) => {
                log::warn!("Portrait upload failed, saving record without it: {}", e);
                None
            }
        }
    });

    let row = StudentRow {
        id: existing.unwrap_or(0),
        full_name: draft.full_name.trim().to_string(),
        full_name_en: draft.full_name_en.clone(),
        student_code: draft.student_code.trim().to_string(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        college: draft.college.clone(),
        department: draft.department.clone(),
        department_en: draft.department_en.clone(),
        level: draft.level.clone(),
        level_en: draft.level_en.clone(),
        study_type: draft.study_type.clone(),
        password: None,
        image_filename,
    };

    match existing {
        Some(id) => {
            student_repo::update(db, &row)?;
            Ok(id)
        }
        None => Ok(student_repo::insert(db, &row)?),
    }
}

/// One submitted row of the Courses step. Credits arrive as form text and
/// coerce via parse-or-zero.
#[derive(Debug, Clone)]
pub struct CourseEntry {
    pub course_name: String,
    pub semester: String,
    pub credits: String,
}

/// Saves the Courses step: registers each non-blank entry and teaches the
/// course catalog any new names.
pub fn add_courses(
    db: &Database,
    student_id: i64,
    entries: &[CourseEntry],
) -> Result<(), RecordError> {
    for entry in entries {
        let name = entry.course_name.trim();
        if name.is_empty() {
            continue;
        }
        let credits = grades::lenient_int(&entry.credits);
        course_repo::insert(db, student_id, name, entry.semester.trim(), credits)?;
        catalog_repo::remember(db, name, credits)?;
    }
    Ok(())
}

/// Removes one course registration, scoped to its owning student. Returns
/// whether a row was removed.
pub fn delete_course(db: &Database, course_id: i64, student_id: i64) -> Result<bool, RecordError> {
    Ok(course_repo::delete(db, course_id, student_id)?)
}

/// Saves the Admission step (whole-row replace).
pub fn save_admission(
    db: &Database,
    student_id: i64,
    draft: &AdmissionDraft,
    avg: Option<String>,
) -> Result<(), RecordError> {
    admission_repo::upsert(
        db,
        &AdmissionRow {
            student_id,
            admission_type: draft.admission_type.clone(),
            year: draft.year.clone(),
            avg,
            notes: draft.notes.clone(),
            graduation_date: draft.graduation_date.clone(),
        },
    )?;
    Ok(())
}

/// Saves the Competency step (whole-row replace).
pub fn save_competency(db: &Database, row: &CompetencyRow) -> Result<(), RecordError> {
    competency_repo::upsert(db, row)?;
    Ok(())
}

/// Research-step form fields. Keywords arrive as the individual entries
/// and are flattened to the stored comma-joined form.
#[derive(Debug, Clone, Default)]
pub struct ResearchDraft {
    pub title: Option<String>,
    pub supervisor: Option<String>,
    pub start_date: Option<String>,
    pub keywords: Vec<String>,
    pub abstract_text: Option<String>,
    pub credits: String,
    pub grade: Option<String>,
}

/// Saves the Research step. A document save failure is logged and the row
/// is upserted without a new reference (the previously stored one is
/// preserved by the coalescing upsert).
pub fn save_research(
    db: &Database,
    uploads: &UploadStore,
    student_id: i64,
    draft: &ResearchDraft,
    document: Option<FileUpload<'_>>,
) -> Result<(), RecordError> {
    let research_filename = document.and_then(|f| {
        match uploads.save_research(student_id, f.original_name, f.content) {
            Ok(stored) => Some(stored),
            Err(e) => {
                log::warn!("Research upload failed, saving record without it: {}", e);
                None
            }
        }
    });

    let keywords: Vec<String> = draft
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    research_repo::upsert(
        db,
        &ResearchRow {
            student_id,
            title: draft.title.clone(),
            supervisor: draft.supervisor.clone(),
            start_date: draft.start_date.clone(),
            keywords: Some(keywords.join(", ")),
            abstract_text: draft.abstract_text.clone(),
            research_filename,
            credits: grades::lenient_int(&draft.credits),
            grade: draft.grade.clone(),
        },
    )?;
    Ok(())
}

/// Adds committee members to the plan, preserving the other plan fields.
/// Duplicate and blank names are dropped.
pub fn add_committee_members(
    db: &Database,
    student_id: i64,
    names: &[String],
) -> Result<(), RecordError> {
    let mut plan = plan_repo::find(db, student_id)?.unwrap_or(PlanRow {
        student_id,
        ..Default::default()
    });
    let mut members = committee::parse_members(&plan.members);
    for name in names {
        committee::add_member(&mut members, name);
    }
    plan.members = committee::join_members(&members);
    plan_repo::upsert(db, &plan)?;
    Ok(())
}

/// Removes one committee member by value; no-op if absent.
pub fn remove_committee_member(
    db: &Database,
    student_id: i64,
    name: &str,
) -> Result<(), RecordError> {
    let Some(mut plan) = plan_repo::find(db, student_id)? else {
        return Ok(());
    };
    let mut members = committee::parse_members(&plan.members);
    committee::remove_member(&mut members, name);
    plan.members = committee::join_members(&members);
    plan_repo::upsert(db, &plan)?;
    Ok(())
}

/// One course's entries on the administrative grade sheet. Scores arrive
/// as form text and coerce via parse-or-zero.
#[derive(Debug, Clone)]
pub struct CourseGradeEntry {
    pub course_id: i64,
    pub coursework: Vec<String>,
    pub final_exam: String,
}

/// Admission fields echoed by the grading form. The admission row is
/// replaced wholesale with these plus the recomputed average.
#[derive(Debug, Clone, Default)]
pub struct AdmissionDraft {
    pub admission_type: Option<String>,
    pub year: Option<String>,
    pub notes: Option<String>,
    pub graduation_date: Option<String>,
}

/// Applies the administrative grade sheet: for each of the student's
/// courses, stores the coursework breakdown, its total, the final exam
/// score and the derived grade, then recomputes the overall average and
/// replaces the admission row with it. Entries whose course id does not
/// belong to the student are ignored. Returns the new overall average.
pub fn apply_grade_sheet(
    db: &Database,
    student_id: i64,
    entries: &[CourseGradeEntry],
    admission: &AdmissionDraft,
) -> Result<f64, RecordError> {
    let courses = course_repo::list_for_student(db, student_id)?;
    let mut graded = Vec::new();

    for course in &courses {
        let Some(entry) = entries.iter().find(|e| e.course_id == course.id) else {
            continue;
        };
        let breakdown: Vec<i64> = entry.coursework.iter().map(|s| grades::lenient_int(s)).collect();
        let coursework_total: i64 = breakdown.iter().sum();
        let final_exam = grades::lenient_int(&entry.final_exam);
        let grade = coursework_total + final_exam;

        course_repo::update_grades(
            db,
            course.id,
            coursework_total as f64,
            &grades::serialize_breakdown(&breakdown),
            final_exam as f64,
            &grade.to_string(),
        )?;
        graded.push(grade as f64);
    }

    let avg = grades::compute_overall_average(&graded);
    admission_repo::upsert(
        db,
        &AdmissionRow {
            student_id,
            admission_type: admission.admission_type.clone(),
            year: admission.year.clone(),
            avg: Some(grades::format_score(avg)),
            notes: admission.notes.clone(),
            graduation_date: admission.graduation_date.clone(),
        },
    )?;
    Ok(avg)
}

/// Deletes a student and all five dependent row sets atomically, after
/// best-effort deletion of the portrait and research files. A file-delete
/// failure is logged and never blocks the row cascade; the orphaned file
/// is an accepted leak.
pub fn delete_student(
    db: &Database,
    uploads: &UploadStore,
    student_id: i64,
) -> Result<(), RecordError> {
    let student =
        student_repo::find_by_id(db, student_id)?.ok_or(RecordError::NotFound { student_id })?;
    let research = research_repo::find(db, student_id)?;

    if let Some(ref portrait) = student.image_filename {
        if !uploads.delete(portrait) {
            log::warn!("Leaving orphaned portrait for deleted student {}", student_id);
        }
    }
    if let Some(document) = research.and_then(|r| r.research_filename) {
        if !uploads.delete(&document) {
            log::warn!("Leaving orphaned research file for deleted student {}", student_id);
        }
    }

    db.with_tx(|tx| {
        tx.execute("DELETE FROM courses WHERE student_id = ?1", [student_id])?;
        tx.execute("DELETE FROM admission WHERE student_id = ?1", [student_id])?;
        tx.execute("DELETE FROM research WHERE student_id = ?1", [student_id])?;
        tx.execute("DELETE FROM competency WHERE student_id = ?1", [student_id])?;
        tx.execute("DELETE FROM plan WHERE student_id = ?1", [student_id])?;
        tx.execute("DELETE FROM students WHERE id = ?1", [student_id])?;
        Ok(())
    })?;

    log::info!("Deleted student {} and dependents", student_id);
    Ok(())
}

/// The student-facing portal read model: identity subset plus courses.
#[derive(Debug, Clone)]
pub struct PortalView {
    pub full_name: String,
    pub student_code: String,
    pub college: Option<String>,
    pub department: Option<String>,
    pub courses: Vec<CourseView>,
}

pub fn load_portal_view(db: &Database, student_id: i64) -> Result<PortalView, RecordError> {
    let record = load_full_record(db, student_id)?;
    Ok(PortalView {
        full_name: record.student.full_name,
        student_code: record.student.student_code,
        college: record.student.college,
        department: record.student.department,
        courses: record.courses,
    })
}

/// Verifies a portal login by external student code. Unset credentials
/// fall back to "secret equals student code".
pub fn verify_portal_login(
    db: &Database,
    student_code: &str,
    attempt: &str,
) -> Result<Option<StudentRow>, RecordError> {
    let Some(student) = student_repo::find_by_code(db, student_code)? else {
        return Ok(None);
    };
    let ok = credentials::verify_student_secret(
        student.password.as_deref(),
        &student.student_code,
        attempt,
    );
    Ok(ok.then_some(student))
}

/// Portal password change: validates against the current credential and
/// stores the new hash.
pub fn change_student_secret(
    db: &Database,
    student_id: i64,
    current: &str,
    new: &str,
) -> Result<(), RecordError> {
    let student =
        student_repo::find_by_id(db, student_id)?.ok_or(RecordError::NotFound { student_id })?;
    let stored = credentials::change_secret(
        student.password.as_deref(),
        &student.student_code,
        current,
        new,
    )?;
    student_repo::set_password(db, student_id, &stored)?;
    Ok(())
}
