use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::lead::LeadSubmission;
use crate::domain::message::{LeadStatus, Message};
use crate::domain::types::{DocumentId, MessageId, TypeConstraintError};

/// Lead record from the `messages` collection.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: i64,
    pub document_id: String,
    pub name: Option<String>,
    /// Stored as a number by the submission endpoint.
    pub phone_number: Option<Value>,
    pub message: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub lead_status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<MessageRecord> for Message {
    type Error = TypeConstraintError;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let phone = match record.phone_number {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(Message {
            id: MessageId::new(record.id)?,
            document_id: DocumentId::new(record.document_id)?,
            name: non_blank(record.name).unwrap_or_else(|| "Unknown".to_string()),
            phone: non_blank(phone),
            message: non_blank(record.message),
            destination: non_blank(record.destination),
            date: non_blank(record.date),
            status_label: non_blank(record.lead_status),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Body posted by the enquiry widget.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub name: String,
    pub phone_number: u64,
    pub message: String,
    pub destination: String,
    /// `YYYY-MM-DD`, `null` when no date was picked.
    pub date: Option<String>,
}

impl From<&LeadSubmission> for LeadPayload {
    fn from(lead: &LeadSubmission) -> Self {
        Self {
            name: lead.name.as_str().to_string(),
            phone_number: lead.phone.as_number(),
            message: lead
                .message
                .as_ref()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            destination: lead.destination.clone().unwrap_or_default(),
            date: lead.date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Body of a status change.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub lead_status: LeadStatus,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::types::{LeadName, PhoneDigits};
    use crate::models::envelope::DataEnvelope;

    #[test]
    fn lead_payload_sends_phone_as_number() {
        let lead = LeadSubmission {
            name: LeadName::new("Asha").unwrap(),
            phone: PhoneDigits::new("9876543210").unwrap(),
            destination: None,
            date: NaiveDate::from_ymd_opt(2026, 1, 5),
            message: None,
        };

        let body = serde_json::to_value(DataEnvelope::new(LeadPayload::from(&lead))).unwrap();

        assert_eq!(
            body,
            json!({"data": {
                "name": "Asha",
                "phoneNumber": 9876543210u64,
                "message": "",
                "destination": "",
                "date": "2026-01-05"
            }})
        );
    }

    #[test]
    fn record_falls_back_for_missing_fields() {
        let record: MessageRecord = serde_json::from_value(json!({
            "id": 9,
            "documentId": "m9",
            "name": null,
            "phoneNumber": 9876543210u64,
            "leadStatus": null
        }))
        .unwrap();

        let message = Message::try_from(record).unwrap();

        assert_eq!(message.name, "Unknown");
        assert_eq!(message.phone.as_deref(), Some("9876543210"));
        assert_eq!(message.status(), LeadStatus::LeadCreated);
        assert!(message.status_label.is_none());
    }

    #[test]
    fn status_payload_uses_wire_label() {
        let body = serde_json::to_value(DataEnvelope::new(StatusPayload {
            lead_status: LeadStatus::Contacted,
        }))
        .unwrap();

        assert_eq!(body, json!({"data": {"leadStatus": "contacted"}}));
    }
}
