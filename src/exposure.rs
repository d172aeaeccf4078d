use crate::breach::BreachRecord;
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Letter grade shown on the profile, derived from the breach count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrivacyGrade {
    pub grade: &'static str,
    pub description: &'static str,
}

pub fn privacy_grade(breach_count: usize) -> PrivacyGrade {
    let (grade, description) = match breach_count {
        0 => ("A+", "Excellent. No breaches on record. Keep up the great work!"),
        1 => ("A", "Very Good. Your exposure is minimal."),
        2 => ("B", "Good. A few minor breaches detected. Stay vigilant."),
        3..=4 => (
            "C",
            "Fair. Your data has appeared in several breaches. Action is recommended.",
        ),
        5..=6 => (
            "D",
            "Poor. Significant exposure detected. Take immediate steps to secure your accounts.",
        ),
        _ => (
            "F",
            "Critical. Your data is widely exposed. Urgent action is required.",
        ),
    };
    PrivacyGrade { grade, description }
}

/// Number of breaches per calendar year of the breach date, oldest first.
pub fn breaches_by_year(breaches: &[BreachRecord]) -> Vec<(i32, usize)> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for breach in breaches {
        *by_year.entry(breach.breach_date.year()).or_insert(0) += 1;
    }
    by_year.into_iter().collect()
}

/// How many breaches exposed each data class, most frequent first.
pub fn data_class_counts(breaches: &[BreachRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for breach in breaches {
        // A label listed twice in one breach still counts once
        let labels: HashSet<&str> = breach.data_classes.iter().map(String::as_str).collect();
        for label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposureSummary {
    pub total_breaches: usize,
    pub exposed_accounts: u64,
    pub grade: PrivacyGrade,
    pub by_year: Vec<(i32, usize)>,
    pub by_data_class: Vec<(String, usize)>,
}

impl ExposureSummary {
    pub fn from_breaches(breaches: &[BreachRecord]) -> Self {
        Self {
            total_breaches: breaches.len(),
            exposed_accounts: breaches.iter().map(|b| b.pwn_count).sum(),
            grade: privacy_grade(breaches.len()),
            by_year: breaches_by_year(breaches),
            by_data_class: data_class_counts(breaches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::breaches_from_json;
    use crate::breaches_db::BREACHES;

    #[test]
    fn test_privacy_grades() {
        let grades: Vec<&str> = (0..=8).map(|n| privacy_grade(n).grade).collect();
        assert_eq!(grades, vec!["A+", "A", "B", "C", "C", "D", "D", "F", "F"]);
    }

    #[test]
    fn test_summary_of_catalog() {
        let breaches = breaches_from_json(BREACHES).unwrap();
        let summary = ExposureSummary::from_breaches(&breaches);
        assert_eq!(summary.total_breaches, 5);
        assert_eq!(summary.exposed_accounts, 278_700_000);
        assert_eq!(summary.grade.grade, "D");
        assert_eq!(
            summary.by_year,
            vec![(2020, 1), (2021, 1), (2022, 1), (2023, 2)]
        );
        assert_eq!(summary.by_data_class[0], ("Email addresses".to_string(), 5));
        assert_eq!(summary.by_data_class[1], ("Passwords".to_string(), 4));
    }

    #[test]
    fn test_duplicate_labels_in_one_breach_count_once() {
        let mut breaches = breaches_from_json(BREACHES).unwrap();
        breaches.truncate(1);
        let first = breaches[0].data_classes[0].clone();
        breaches[0].data_classes.push(first.clone());
        let counts = data_class_counts(&breaches);
        assert!(counts.iter().all(|(_, count)| *count == 1));
        assert!(counts.iter().any(|(label, _)| *label == first));
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExposureSummary::from_breaches(&[]);
        assert_eq!(summary.total_breaches, 0);
        assert!(summary.by_year.is_empty());
        assert!(summary.by_data_class.is_empty());
        assert_eq!(summary.grade.grade, "A+");
    }
}
