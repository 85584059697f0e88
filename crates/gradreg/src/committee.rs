//! Committee-member list editing.
//!
//! The member set is stored as one comma-joined string and edited as an
//! ordered, duplicate-free list: append-if-absent and remove-by-value.
//! Matching is case-sensitive exact match on the trimmed name.

/// Splits a stored member string into the member list. Segments are
/// trimmed; empty/blank segments are dropped.
pub fn parse_members(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a member list back into its stored form.
pub fn join_members(members: &[String]) -> String {
    members.join(", ")
}

/// Appends `name` (trimmed) if not already present; no-op otherwise or
/// when the trimmed name is empty.
pub fn add_member(members: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    if !members.iter().any(|m| m == name) {
        members.push(name.to_string());
    }
}

/// Removes the first exact match of `name` (trimmed); no-op if absent.
pub fn remove_member(members: &mut Vec<String>, name: &str) {
    let name = name.trim();
    if let Some(pos) = members.iter().position(|m| m == name) {
        members.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_member_if_absent() {
        let mut members = list(&["A", "B"]);
        add_member(&mut members, "C");
        assert_eq!(members, list(&["A", "B", "C"]));
    }

    #[test]
    fn test_add_existing_member_is_noop() {
        let mut members = list(&["A", "B"]);
        add_member(&mut members, "A");
        assert_eq!(members, list(&["A", "B"]));
    }

    #[test]
    fn test_add_trims_and_skips_blank() {
        let mut members = list(&["A"]);
        add_member(&mut members, "  B  ");
        add_member(&mut members, "   ");
        assert_eq!(members, list(&["A", "B"]));
    }

    #[test]
    fn test_remove_member() {
        let mut members = list(&["A", "B"]);
        remove_member(&mut members, "B");
        assert_eq!(members, list(&["A"]));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut members = list(&["A"]);
        remove_member(&mut members, "Z");
        assert_eq!(members, list(&["A"]));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let mut members = list(&["Ali"]);
        add_member(&mut members, "ali");
        assert_eq!(members, list(&["Ali", "ali"]));
        remove_member(&mut members, "ALI");
        assert_eq!(members, list(&["Ali", "ali"]));
    }

    #[test]
    fn test_round_trip() {
        let members = list(&["Ali", "Omar"]);
        let stored = join_members(&members);
        assert_eq!(stored, "Ali, Omar");
        assert_eq!(parse_members(&stored), members);
    }

    #[test]
    fn test_parse_drops_blank_segments() {
        assert_eq!(parse_members(""), Vec::<String>::new());
        assert_eq!(parse_members(" , ,A,, B ,"), list(&["A", "B"]));
    }
}
