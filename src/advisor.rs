use crate::breach::BreachRecord;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::debug;

// How many actions a scan report carries
pub const MAX_ACTIONS: usize = 3;

// Priority levels for a recommended action
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Display)]
pub enum ActionPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    ChangePassword,
    EnableTwoFactor,
    ReviewFinancialStatements,
    RevokeSessions,
    RequestDataTakedown,
}

/// A remediation step suggested after a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub id: String,
    pub kind: ActionKind,
    pub title: String,
    pub description: String,
    pub priority: ActionPriority,
}

impl ActionKind {
    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::ChangePassword => "change-pass",
            ActionKind::EnableTwoFactor => "enable-2fa",
            ActionKind::ReviewFinancialStatements => "review-accounts",
            ActionKind::RevokeSessions => "revoke-sessions",
            ActionKind::RequestDataTakedown => "remove-data",
        }
    }

    pub fn priority(&self) -> ActionPriority {
        match self {
            ActionKind::ChangePassword | ActionKind::EnableTwoFactor => ActionPriority::High,
            ActionKind::ReviewFinancialStatements | ActionKind::RevokeSessions => {
                ActionPriority::Medium
            }
            ActionKind::RequestDataTakedown => ActionPriority::Low,
        }
    }

    pub fn action(&self) -> RecommendedAction {
        let (title, description) = match self {
            ActionKind::ChangePassword => (
                "Change Your Password Immediately",
                "Your password was found in a breach. Create a new, strong, and unique password for this account.",
            ),
            ActionKind::EnableTwoFactor => (
                "Enable Two-Factor Authentication (2FA)",
                "Add an extra layer of security to your account. Even if your password is stolen, 2FA can prevent unauthorized access.",
            ),
            ActionKind::ReviewFinancialStatements => (
                "Review Your Financial Statements",
                "Since financial information may have been exposed, carefully check your bank and credit card statements for any suspicious activity.",
            ),
            ActionKind::RevokeSessions => (
                "Revoke Old Sessions",
                "Log out of all devices and sessions for the affected account to ensure any unauthorized access is cut off.",
            ),
            ActionKind::RequestDataTakedown => (
                "Request Data Takedown",
                "Use GDPR/CCPA rights to request the breached company to delete your personal data from their systems.",
            ),
        };
        RecommendedAction {
            id: self.id().to_string(),
            kind: *self,
            title: title.to_string(),
            description: description.to_string(),
            priority: self.priority(),
        }
    }
}

/// Full catalog, in display order.
pub fn action_catalog() -> Vec<RecommendedAction> {
    [
        ActionKind::ChangePassword,
        ActionKind::EnableTwoFactor,
        ActionKind::ReviewFinancialStatements,
        ActionKind::RevokeSessions,
        ActionKind::RequestDataTakedown,
    ]
    .iter()
    .map(|k| k.action())
    .collect()
}

/// Pick the actions that fit what the breaches exposed, highest priority first.
pub fn recommend_actions(breaches: &[BreachRecord]) -> Vec<RecommendedAction> {
    if breaches.is_empty() {
        return Vec::new();
    }

    let mut kinds = Vec::new();
    if breaches.iter().any(|b| b.exposes_passwords()) {
        kinds.push(ActionKind::ChangePassword);
        kinds.push(ActionKind::EnableTwoFactor);
    }
    if breaches.iter().any(|b| b.exposes_financial_information()) {
        kinds.push(ActionKind::ReviewFinancialStatements);
    }
    kinds.push(ActionKind::RevokeSessions);
    kinds.push(ActionKind::RequestDataTakedown);

    let mut actions: Vec<RecommendedAction> = kinds.iter().map(|k| k.action()).collect();
    // Stable sort keeps catalog order within a priority
    actions.sort_by(|a, b| b.priority.cmp(&a.priority));
    actions.truncate(MAX_ACTIONS);

    debug!(
        "Recommended actions: {}",
        actions
            .iter()
            .map(|a| a.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn breach(data_classes: &[&str]) -> BreachRecord {
        BreachRecord {
            name: "Test".to_string(),
            domain: "test.com".to_string(),
            breach_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            added_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            pwn_count: 10,
            data_classes: data_classes.iter().map(|c| c.to_string()).collect(),
            description: String::new(),
        }
    }

    fn ids(actions: &[RecommendedAction]) -> Vec<&str> {
        actions.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_no_breaches_no_actions() {
        assert!(recommend_actions(&[]).is_empty());
    }

    #[test]
    fn test_password_breach() {
        let actions = recommend_actions(&[breach(&["Email addresses", "Passwords"])]);
        assert_eq!(ids(&actions), vec!["change-pass", "enable-2fa", "revoke-sessions"]);
    }

    #[test]
    fn test_financial_breach_without_passwords() {
        let actions = recommend_actions(&[breach(&["Financial information"])]);
        assert_eq!(
            ids(&actions),
            vec!["review-accounts", "revoke-sessions", "remove-data"]
        );
    }

    #[test]
    fn test_minor_breach() {
        let actions = recommend_actions(&[breach(&["Email addresses"])]);
        assert_eq!(ids(&actions), vec!["revoke-sessions", "remove-data"]);
        assert_eq!(actions[0].priority, ActionPriority::Medium);
    }

    #[test]
    fn test_sorted_by_priority() {
        let actions = recommend_actions(&[
            breach(&["Financial information"]),
            breach(&["Passwords"]),
        ]);
        assert_eq!(actions.len(), MAX_ACTIONS);
        assert!(actions.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn test_catalog() {
        let catalog = action_catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[0].id, "change-pass");
        assert_eq!(catalog[4].priority, ActionPriority::Low);
    }
}
