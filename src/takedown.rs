use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

pub const PLACEHOLDER_COMPANY: &str = "[Company Name]";
pub const PLACEHOLDER_NAME: &str = "[Your Name]";
pub const PLACEHOLDER_EMAIL: &str = "[Your Email]";
pub const PLACEHOLDER_USERNAME: &str = "[Your Username, if applicable]";
pub const PLACEHOLDER_ADDRESS: &str = "[Your Address]";

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Option<Regex> = Regex::new(r"\[[^\]]+\]").ok();
}

const GDPR_TEMPLATE: &str = "Subject: Data Deletion Request under GDPR Article 17

Dear [Company Name] Data Protection Officer,

I am writing to request the immediate and complete erasure of my personal data from your systems, in accordance with my right to erasure under Article 17 of the General Data Protection Regulation (GDPR).

My personal details associated with your service are:
- Name: [Your Name]
- Email: [Your Email]
- Username: [Your Username, if applicable]

Please confirm once my data has been permanently deleted.

Sincerely,
[Your Name]";

const CCPA_TEMPLATE: &str = "Subject: Request to Delete My Personal Information under CCPA

Dear [Company Name],

As a California resident, I am exercising my right to request the deletion of my personal information under the California Consumer Privacy Act (CCPA).

Please delete all personal information you have collected about me. My identifying information is:
- Name: [Your Name]
- Email: [Your Email]
- Address: [Your Address]

Please confirm in writing that you have complied with this request.

Thank you,
[Your Name]";

/// Legal basis of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TakedownTemplate {
    #[strum(serialize = "GDPR (Europe)")]
    Gdpr,
    #[strum(serialize = "CCPA (California)")]
    Ccpa,
}

/// Values substituted into a template. Unset values keep their placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakedownDetails {
    pub company: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub address: Option<String>,
}

impl TakedownTemplate {
    /// Raw letter text with placeholders.
    pub fn text(&self) -> &'static str {
        match self {
            TakedownTemplate::Gdpr => GDPR_TEMPLATE,
            TakedownTemplate::Ccpa => CCPA_TEMPLATE,
        }
    }

    pub fn render(&self, details: &TakedownDetails) -> String {
        let text = self.text();
        let Some(re) = PLACEHOLDER_PATTERN.as_ref() else {
            return text.to_string();
        };
        // Single pass over the template, substituted values are never rescanned
        re.replace_all(text, |caps: &regex::Captures| {
            let placeholder = &caps[0];
            let value = match placeholder {
                PLACEHOLDER_COMPANY => details.company.as_deref(),
                PLACEHOLDER_NAME => details.name.as_deref(),
                PLACEHOLDER_EMAIL => details.email.as_deref(),
                PLACEHOLDER_USERNAME => details.username.as_deref(),
                PLACEHOLDER_ADDRESS => details.address.as_deref(),
                _ => None,
            };
            match value.map(str::trim).filter(|v| !v.is_empty()) {
                Some(value) => value.to_string(),
                None => placeholder.to_string(),
            }
        })
        .into_owned()
    }
}
