//! Field-level parsing helpers shared by the yw7 and novx readers.

use chrono::{NaiveDate, NaiveTime};

/// Splits a semicolon-separated field into trimmed, deduplicated elements.
///
/// Empty elements are dropped. yw7 and novx both use this encoding for
/// tag lists; novx reference lists use a space divider instead.
pub fn string_to_list(text: &str, divider: char) -> Vec<String> {
    let mut elements: Vec<String> = Vec::new();
    for element in text.split(divider) {
        let element = element.trim();
        if !element.is_empty() && !elements.iter().any(|e| e == element) {
            elements.push(element.to_string());
        }
    }
    elements
}

/// Joins elements with the given divider, the inverse of [`string_to_list`].
pub fn list_to_string(elements: &[String], divider: &str) -> String {
    elements.join(divider)
}

/// Keeps only the elements of `elems` that occur in `reference`.
pub fn intersection(elems: &[String], reference: &[String]) -> Vec<String> {
    elems
        .iter()
        .filter(|e| reference.contains(e))
        .cloned()
        .collect()
}

/// Validates an ISO date string (YYYY-MM-DD), returning it unchanged.
pub fn verified_date(date_str: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: '{date_str}'"))?;
    Ok(date_str.to_string())
}

/// Validates a decimal integer string, returning it unchanged.
pub fn verified_int_string(int_str: &str) -> Result<String, String> {
    int_str
        .parse::<i64>()
        .map_err(|_| format!("invalid number: '{int_str}'"))?;
    Ok(int_str.to_string())
}

/// Validates an ISO time string, padding it to HH:MM:SS.
pub fn verified_time(time_str: &str) -> Result<String, String> {
    let parsed = NaiveTime::parse_from_str(time_str, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M"));
    parsed.map_err(|_| format!("invalid time: '{time_str}'"))?;
    let mut time_str = time_str.to_string();
    while time_str.matches(':').count() < 2 {
        time_str.push_str(":00");
    }
    Ok(time_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_list_trims_and_dedups() {
        let tags = string_to_list(" alpha; beta ;alpha;;gamma", ';');
        assert_eq!(tags, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_string_to_list_space_divider() {
        assert_eq!(string_to_list("sc1 sc2  sc3", ' '), vec!["sc1", "sc2", "sc3"]);
    }

    #[test]
    fn test_list_to_string_roundtrip() {
        let elements = vec!["one".to_string(), "two".to_string()];
        assert_eq!(list_to_string(&elements, ";"), "one;two");
    }

    #[test]
    fn test_intersection_keeps_order() {
        let elems = vec!["cr2".to_string(), "cr9".to_string(), "cr1".to_string()];
        let reference = vec!["cr1".to_string(), "cr2".to_string()];
        assert_eq!(intersection(&elems, &reference), vec!["cr2", "cr1"]);
    }

    #[test]
    fn test_verified_date() {
        assert_eq!(verified_date("2024-02-29").unwrap(), "2024-02-29");
        assert!(verified_date("2023-02-29").is_err());
        assert!(verified_date("tomorrow").is_err());
    }

    #[test]
    fn test_verified_time_pads() {
        assert_eq!(verified_time("10:30").unwrap(), "10:30:00");
        assert_eq!(verified_time("10:30:15").unwrap(), "10:30:15");
        assert!(verified_time("25:00").is_err());
    }

    #[test]
    fn test_verified_int_string() {
        assert_eq!(verified_int_string("42").unwrap(), "42");
        assert!(verified_int_string("4x2").is_err());
    }
}
