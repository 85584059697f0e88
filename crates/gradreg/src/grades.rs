//! Grade and credit computation.
//!
//! Everything here follows the parse-or-default-0 policy: malformed numeric
//! input never raises, it contributes 0. A single corrupted course row must
//! not block rendering or saving the rest of the record. No upper bound is
//! enforced on any score.

/// Lenient integer parse: trimmed, defaulting to 0 on anything malformed.
pub fn lenient_int(v: &str) -> i64 {
    v.trim().parse().unwrap_or(0)
}

/// Lenient float parse: trimmed, defaulting to 0 on anything malformed.
pub fn lenient_float(v: &str) -> f64 {
    v.trim().parse().unwrap_or(0.0)
}

/// Parses a stored coursework-breakdown JSON array. Non-numeric entries
/// (strings that don't parse, nulls, objects) coerce to 0; text that is not
/// a JSON array at all yields an empty breakdown.
pub fn parse_breakdown(text: &str) -> Vec<f64> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    values
        .iter()
        .map(|v| match v {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        })
        .collect()
}

/// Serializes a breakdown back to its stored JSON form.
pub fn serialize_breakdown(breakdown: &[i64]) -> String {
    serde_json::to_string(breakdown).unwrap_or_else(|_| "[]".to_string())
}

/// Derives a course's coursework total and overall grade:
/// `coursework_total = sum(breakdown)`, `grade = coursework_total + final_exam`.
pub fn compute_course_grade(breakdown: &[f64], final_exam: f64) -> (f64, f64) {
    let coursework_total: f64 = breakdown.iter().sum();
    (coursework_total, coursework_total + final_exam)
}

/// Arithmetic mean rounded to 2 decimal places; 0 for an empty sequence
/// (an empty record is not an error).
pub fn compute_overall_average(grades: &[f64]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    round2(grades.iter().sum::<f64>() / grades.len() as f64)
}

/// Total credits across courses.
pub fn sum_credits<I: IntoIterator<Item = i64>>(credits: I) -> i64 {
    credits.into_iter().sum()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Formats a score the way the views show it: integral values without the
/// trailing `.0`.
pub fn format_score(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Semester partition, matched as a substring token in the free-text
/// semester label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    /// The token the stored labels actually contain (e.g. "الفصل الأول").
    pub fn token(self) -> &'static str {
        match self {
            Semester::First => "أول",
            Semester::Second => "ثاني",
        }
    }

    pub fn matches(self, semester_label: &str) -> bool {
        semester_label.contains(self.token())
    }
}

/// A semester average that distinguishes "no courses in this partition"
/// from a genuine average of 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SemesterAverage {
    Computed(f64),
    NotComputed,
}

impl SemesterAverage {
    pub fn is_computed(&self) -> bool {
        matches!(self, SemesterAverage::Computed(_))
    }
}

impl std::fmt::Display for SemesterAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemesterAverage::Computed(v) => write!(f, "{}", format_score(*v)),
            SemesterAverage::NotComputed => write!(f, "---"),
        }
    }
}

/// Averages the grades of the courses whose semester label matches the
/// given partition. Takes `(semester_label, grade_text)` pairs; entries
/// whose grade text does not parse as a number are skipped. An empty
/// partition yields the sentinel.
pub fn compute_semester_average<'a, I>(courses: I, semester: Semester) -> SemesterAverage
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    for (label, grade) in courses {
        if !semester.matches(label) {
            continue;
        }
        if let Ok(grade) = grade.trim().parse::<f64>() {
            sum += grade;
            count += 1;
        }
    }
    if count == 0 {
        SemesterAverage::NotComputed
    } else {
        SemesterAverage::Computed(round2(sum / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_grade_is_sum_plus_final() {
        let (cw, grade) = compute_course_grade(&[10.0, 8.0, 12.0], 50.0);
        assert_eq!(cw, 30.0);
        assert_eq!(grade, 80.0);

        let (cw, grade) = compute_course_grade(&[], 42.0);
        assert_eq!(cw, 0.0);
        assert_eq!(grade, 42.0);
    }

    #[test]
    fn test_no_bounds_enforced() {
        // Garbage-in-garbage-out is deliberate: scores above 100 and
        // negative scores pass through.
        let (cw, grade) = compute_course_grade(&[90.0, 90.0], 90.0);
        assert_eq!((cw, grade), (180.0, 270.0));
        let (cw, grade) = compute_course_grade(&[-5.0], 10.0);
        assert_eq!((cw, grade), (-5.0, 5.0));
    }

    #[test]
    fn test_parse_breakdown_coerces_non_numeric_to_zero() {
        assert_eq!(parse_breakdown("[10, 8, 12]"), vec![10.0, 8.0, 12.0]);
        assert_eq!(parse_breakdown(r#"[10, "x", null, "7.5"]"#), vec![10.0, 0.0, 0.0, 7.5]);
        assert_eq!(parse_breakdown("not json"), Vec::<f64>::new());
        assert_eq!(parse_breakdown(""), Vec::<f64>::new());
    }

    #[test]
    fn test_serialize_breakdown_round_trip() {
        let stored = serialize_breakdown(&[10, 8, 12, 0, 0]);
        assert_eq!(stored, "[10,8,12,0,0]");
        assert_eq!(parse_breakdown(&stored), vec![10.0, 8.0, 12.0, 0.0, 0.0]);
    }

    #[test]
    fn test_overall_average() {
        assert_eq!(compute_overall_average(&[]), 0.0);
        assert_eq!(compute_overall_average(&[70.0, 80.0, 90.0]), 80.0);
        assert_eq!(compute_overall_average(&[70.0, 81.0]), 75.5);
        // Rounded to 2 decimals.
        assert_eq!(compute_overall_average(&[70.0, 80.0, 85.0]), 78.33);
    }

    #[test]
    fn test_semester_average_partitions() {
        let courses = [("الفصل الأول", "80"), ("الفصل الثاني", "60")];
        assert_eq!(
            compute_semester_average(courses, Semester::First),
            SemesterAverage::Computed(80.0)
        );
        assert_eq!(
            compute_semester_average(courses, Semester::Second),
            SemesterAverage::Computed(60.0)
        );
    }

    #[test]
    fn test_semester_average_empty_partition_is_sentinel() {
        let courses = [("الفصل الأول", "80")];
        let second = compute_semester_average(courses, Semester::Second);
        assert_eq!(second, SemesterAverage::NotComputed);
        // The sentinel renders distinctly from a real zero average.
        assert_eq!(second.to_string(), "---");
        assert_eq!(SemesterAverage::Computed(0.0).to_string(), "0");
    }

    #[test]
    fn test_semester_average_skips_unparsable_grades() {
        let courses = [("الفصل الأول", "80"), ("الفصل الأول", "غير مكتمل")];
        assert_eq!(
            compute_semester_average(courses, Semester::First),
            SemesterAverage::Computed(80.0)
        );
    }

    #[test]
    fn test_sum_credits() {
        assert_eq!(sum_credits([3, 2, 3]), 8);
        assert_eq!(sum_credits([]), 0);
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(lenient_int("12"), 12);
        assert_eq!(lenient_int(" 12 "), 12);
        assert_eq!(lenient_int("abc"), 0);
        assert_eq!(lenient_int(""), 0);
        assert_eq!(lenient_float("12.5"), 12.5);
        assert_eq!(lenient_float("x"), 0.0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(12.0), "12");
        assert_eq!(format_score(12.5), "12.5");
        assert_eq!(format_score(0.0), "0");
    }
}
