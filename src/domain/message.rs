use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{DocumentId, MessageId, TypeConstraintError};

/// Progress of a lead through the sales follow-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    #[serde(rename = "lead created")]
    LeadCreated,
    #[serde(rename = "viewed")]
    Viewed,
    #[serde(rename = "contacted")]
    Contacted,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [Self::LeadCreated, Self::Viewed, Self::Contacted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeadCreated => "lead created",
            Self::Viewed => "viewed",
            Self::Contacted => "contacted",
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lead created" => Ok(Self::LeadCreated),
            "viewed" => Ok(Self::Viewed),
            "contacted" => Ok(Self::Contacted),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Stored enquiry as seen from the admin console.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub document_id: DocumentId,
    pub name: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub destination: Option<String>,
    /// Travel date as entered by the visitor.
    pub date: Option<String>,
    /// Raw status label; `None` when the record never had one.
    pub status_label: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Parsed status, falling back to [`LeadStatus::LeadCreated`].
    pub fn status(&self) -> LeadStatus {
        self.status_label
            .as_deref()
            .and_then(|label| label.parse().ok())
            .unwrap_or_default()
    }
}
