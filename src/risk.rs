use crate::breach::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use tracing::trace;

// Every breach counts, whatever it exposed
const BASE_BREACH_POINTS: u64 = 10;

// Bonus per exposed data class, a breach can trigger several of them
const DATA_CLASS_POINTS: [(&str, u64); 5] = [
    (DATA_CLASS_PASSWORDS, 20),
    (DATA_CLASS_NATIONAL_IDS, 30),
    (DATA_CLASS_FINANCIAL, 25),
    (DATA_CLASS_PHONE_NUMBERS, 5),
    (DATA_CLASS_PHYSICAL_ADDRESSES, 10),
];

const MAX_SCORE: u64 = 100;

const NO_BREACH_DETAILS: &str = "No breaches found. Your exposure appears low.";

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a normalized score, highest band first.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 90 => RiskLevel::Critical,
            s if s >= 70 => RiskLevel::High,
            s if s >= 40 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn details(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical risk detected. Highly sensitive data like passwords and financial info has been exposed in multiple breaches. Urgent action is required.",
            RiskLevel::High => "High risk. Sensitive data such as passwords have been exposed. Immediate action is recommended.",
            RiskLevel::Medium => "Medium risk. Personal information has been exposed in several breaches.",
            RiskLevel::Low => "Low risk. Some of your information has appeared in minor breaches.",
        }
    }
}

/// Risk derived from a set of breach records.
///
/// Only [`assess_risk`] builds one, so `score` and `level` can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    score: u8,
    level: RiskLevel,
    details: String,
}

impl RiskAssessment {
    fn no_exposure() -> Self {
        RiskAssessment {
            score: 0,
            level: RiskLevel::Low,
            details: NO_BREACH_DETAILS.to_string(),
        }
    }

    fn from_score(score: u8) -> Self {
        let level = RiskLevel::from_score(score);
        RiskAssessment {
            score,
            level,
            details: level.details().to_string(),
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

/// Points contributed by a single breach: the base weight plus one bonus per weighted data class present.
pub fn breach_risk_points(breach: &BreachRecord) -> u64 {
    DATA_CLASS_POINTS
        .iter()
        .filter(|(data_class, _)| breach.has_data_class(data_class))
        .fold(BASE_BREACH_POINTS, |acc, (_, points)| acc + points)
}

/// Raw accumulated total before normalization.
pub fn raw_risk_points(breaches: &[BreachRecord]) -> u64 {
    breaches.iter().map(breach_risk_points).sum()
}

/// Compute the privacy risk of a set of breaches.
///
/// The raw total is divided by `2 * breach_count` and rounded half up, so the score tracks
/// the average severity of a breach rather than the number of breaches.
pub fn assess_risk(breaches: &[BreachRecord]) -> RiskAssessment {
    if breaches.is_empty() {
        return RiskAssessment::no_exposure();
    }

    let raw = raw_risk_points(breaches);
    let breach_count = breaches.len() as u64;
    // round(raw / 2n) with halves going up, in integer arithmetic
    let score = ((raw + breach_count) / (2 * breach_count)).min(MAX_SCORE);

    trace!(
        "Risk assessment: {} breaches, {} raw points, score {}",
        breach_count,
        raw,
        score
    );

    RiskAssessment::from_score(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use strum::IntoEnumIterator;

    fn breach(name: &str, data_classes: &[&str]) -> BreachRecord {
        BreachRecord {
            name: name.to_string(),
            domain: format!("{}.com", name.to_lowercase()),
            breach_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            added_date: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            pwn_count: 1000,
            data_classes: data_classes.iter().map(|c| c.to_string()).collect(),
            description: String::new(),
        }
    }

    // Every combination of the weighted data classes, plus an unweighted one
    fn all_class_combinations() -> Vec<BreachRecord> {
        let classes: Vec<&str> = DATA_CLASS_POINTS.iter().map(|(c, _)| *c).collect();
        (0..(1u32 << classes.len()))
            .map(|mask| {
                let mut selected: Vec<&str> = classes
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1u32 << *i) != 0)
                    .map(|(_, c)| *c)
                    .collect();
                selected.push("Email addresses");
                breach(&format!("Breach{}", mask), &selected)
            })
            .collect()
    }

    #[test]
    fn test_empty_is_low() {
        let assessment = assess_risk(&[]);
        assert_eq!(assessment.score(), 0);
        assert_eq!(assessment.level(), RiskLevel::Low);
        assert_eq!(assessment.details(), NO_BREACH_DETAILS);
    }

    #[test]
    fn test_single_password_breach() {
        let breaches = vec![breach("Social", &["Passwords"])];
        assert_eq!(raw_risk_points(&breaches), 30);
        let assessment = assess_risk(&breaches);
        assert_eq!(assessment.score(), 15);
        assert_eq!(assessment.level(), RiskLevel::Low);
    }

    #[test]
    fn test_two_breaches_rounding() {
        let breaches = vec![
            breach("Shop", &["Passwords", "Financial information"]),
            breach("Gov", &["National ID numbers"]),
        ];
        assert_eq!(raw_risk_points(&breaches), 95);
        let assessment = assess_risk(&breaches);
        assert_eq!(assessment.score(), 24);
        assert_eq!(assessment.level(), RiskLevel::Low);
    }

    #[test]
    fn test_half_rounds_up() {
        // 10 + 20 + 30 + 25 = 85 -> 42.5 -> 43
        let breaches = vec![breach(
            "Big",
            &["Passwords", "National ID numbers", "Financial information"],
        )];
        assert_eq!(assess_risk(&breaches).score(), 43);
    }

    #[test]
    fn test_medium_boundary() {
        // 10 + 30 + 25 + 5 + 10 = 80 -> exactly 40
        let breaches = vec![breach(
            "Edge",
            &[
                "National ID numbers",
                "Financial information",
                "Phone numbers",
                "Physical addresses",
            ],
        )];
        let assessment = assess_risk(&breaches);
        assert_eq!(assessment.score(), 40);
        assert_eq!(assessment.level(), RiskLevel::Medium);
        assert_eq!(assessment.details(), RiskLevel::Medium.details());
    }

    #[test]
    fn test_duplicate_labels_count_once() {
        let breaches = vec![breach("Dup", &["Passwords", "Passwords"])];
        assert_eq!(raw_risk_points(&breaches), 30);
    }

    #[test]
    fn test_unweighted_labels_contribute_nothing() {
        let breaches = vec![breach("Plain", &["Email addresses", "Health data"])];
        assert_eq!(raw_risk_points(&breaches), 10);
        assert_eq!(assess_risk(&breaches).score(), 5);
    }

    #[test]
    fn test_score_bounds_and_level_agree() {
        let combinations = all_class_combinations();
        for window in 1..=combinations.len() {
            for start in 0..=(combinations.len() - window) {
                let assessment = assess_risk(&combinations[start..start + window]);
                assert!(assessment.score() <= 100);
                assert_eq!(assessment.level(), RiskLevel::from_score(assessment.score()));
                assert_eq!(assessment.details(), assessment.level().details());
            }
        }
    }

    #[test]
    fn test_order_independent() {
        let mut breaches = all_class_combinations();
        let expected = assess_risk(&breaches);
        breaches.reverse();
        assert_eq!(assess_risk(&breaches), expected);
        for _ in 0..breaches.len() {
            breaches.rotate_left(3);
            assert_eq!(assess_risk(&breaches), expected);
        }
    }

    #[test]
    fn test_sensitive_breach_never_decreases_raw_total() {
        let mut breaches = Vec::new();
        for base in all_class_combinations() {
            breaches.push(base);
            for sensitive in [
                breach("Pw", &["Passwords"]),
                breach("Id", &["National ID numbers"]),
            ] {
                let before = raw_risk_points(&breaches);
                let mut extended = breaches.clone();
                extended.push(sensitive);
                assert!(raw_risk_points(&extended) >= before);
            }
        }
    }

    #[test]
    fn test_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(89), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(90), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }

    #[test]
    fn test_levels_are_ordered() {
        let levels: Vec<RiskLevel> = RiskLevel::iter().collect();
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(RiskLevel::Critical.to_string(), "Critical");
    }
}
