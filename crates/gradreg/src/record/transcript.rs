//! Transcript derivation and the listing CSV export.

use chrono::Local;

use crate::db::student_repo::ListingRow;
use crate::grades::{self, Semester, SemesterAverage};
use crate::record::FullRecord;

/// The derived fields the printable transcript shows alongside the record.
#[derive(Debug, Clone)]
pub struct TranscriptSummary {
    /// Internal key zero-padded to five digits, e.g. `00042`.
    pub transcript_number: String,
    /// Issue date in `YYYY-MM-DD`, taken at derivation time.
    pub issue_date: String,
    pub first_semester_avg: SemesterAverage,
    pub second_semester_avg: SemesterAverage,
    /// Credits across registered courses only.
    pub course_credits: i64,
    /// Course credits plus research credits.
    pub total_credits: i64,
    pub thesis_grade: Option<String>,
}

/// Derives the transcript summary from a loaded record.
pub fn transcript_summary(record: &FullRecord) -> TranscriptSummary {
    let pairs: Vec<(&str, &str)> = record
        .courses
        .iter()
        .map(|c| (c.semester.as_str(), c.grade.as_str()))
        .collect();

    let course_credits = grades::sum_credits(record.courses.iter().map(|c| c.credits));
    let research_credits = record.research.as_ref().map(|r| r.credits).unwrap_or(0);

    TranscriptSummary {
        transcript_number: format!("{:05}", record.student.id),
        issue_date: Local::now().format("%Y-%m-%d").to_string(),
        first_semester_avg: grades::compute_semester_average(
            pairs.iter().copied(),
            Semester::First,
        ),
        second_semester_avg: grades::compute_semester_average(
            pairs.iter().copied(),
            Semester::Second,
        ),
        course_credits,
        total_credits: course_credits + research_credits,
        thesis_grade: record.research.as_ref().and_then(|r| r.grade.clone()),
    }
}

/// Renders the student listing as CSV. Starts with a BOM so spreadsheet
/// tools detect UTF-8 and render the Arabic headers correctly.
pub fn listing_csv(rows: &[ListingRow]) -> String {
    let mut out = String::from("\u{feff}ID,الاسم,الرقم الجامعي,المرحلة,الدراسة,القسم,الكلية,المعدل,القبول\n");
    for row in rows {
        let fields = [
            row.id.to_string(),
            row.full_name.clone(),
            row.student_code.clone(),
            row.level.clone().unwrap_or_default(),
            row.study_type.clone().unwrap_or_default(),
            row.department.clone().unwrap_or_default(),
            row.college.clone().unwrap_or_default(),
            row.avg.clone().unwrap_or_default(),
            row.admission_type.clone().unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::research_repo::ResearchRow;
    use crate::db::student_repo::StudentRow;
    use crate::record::CourseView;

    fn course(semester: &str, credits: i64, grade: &str) -> CourseView {
        CourseView {
            id: 0,
            course_name: "م".to_string(),
            semester: semester.to_string(),
            credits,
            breakdown: Vec::new(),
            coursework_total: 0.0,
            final_exam: 0.0,
            grade: grade.to_string(),
        }
    }

    fn record_with(courses: Vec<CourseView>, research: Option<ResearchRow>) -> FullRecord {
        FullRecord {
            student: StudentRow {
                id: 42,
                full_name: "x".to_string(),
                student_code: "S1".to_string(),
                ..Default::default()
            },
            admission: None,
            courses,
            research,
            competency: None,
            plan: None,
        }
    }

    #[test]
    fn test_summary_partitions_and_credits() {
        let record = record_with(
            vec![
                course("الفصل الأول", 3, "80"),
                course("الفصل الأول", 2, "70"),
                course("الفصل الثاني", 3, "90"),
            ],
            Some(ResearchRow {
                student_id: 42,
                credits: 6,
                grade: Some("امتياز".to_string()),
                ..Default::default()
            }),
        );

        let summary = transcript_summary(&record);
        assert_eq!(summary.transcript_number, "00042");
        assert_eq!(summary.first_semester_avg, SemesterAverage::Computed(75.0));
        assert_eq!(summary.second_semester_avg, SemesterAverage::Computed(90.0));
        assert_eq!(summary.course_credits, 8);
        assert_eq!(summary.total_credits, 14);
        assert_eq!(summary.thesis_grade.as_deref(), Some("امتياز"));
    }

    #[test]
    fn test_summary_empty_record() {
        let summary = transcript_summary(&record_with(Vec::new(), None));
        assert_eq!(summary.first_semester_avg, SemesterAverage::NotComputed);
        assert_eq!(summary.second_semester_avg, SemesterAverage::NotComputed);
        assert_eq!(summary.course_credits, 0);
        assert_eq!(summary.total_credits, 0);
        assert!(summary.thesis_grade.is_none());
    }

    #[test]
    fn test_listing_csv_bom_and_quoting() {
        let rows = vec![ListingRow {
            id: 7,
            full_name: "علي، حسين".replace('،', ","), // a name containing a comma
            student_code: "M2026001".to_string(),
            level: Some("ماجستير".to_string()),
            study_type: None,
            department: Some("علوم الحاسوب".to_string()),
            college: None,
            avg: Some("78.33".to_string()),
            admission_type: None,
        }];

        let csv = listing_csv(&rows);
        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("الاسم"));
        let line = lines.next().unwrap();
        // Comma-bearing field is quoted, absent optionals are empty.
        assert!(line.contains("\"علي, حسين\""));
        assert!(line.ends_with("78.33,"));
    }
}
