use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::document::{CoercedDocument, DocumentError};
use crate::domain::types::{CommunicationId, CommunicationSubject, ContactId, HubId};

/// Logged interaction with a contact.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Communication {
    #[serde(rename = "name")]
    pub id: CommunicationId,
    #[serde(skip)]
    pub hub_id: HubId,
    #[serde(rename = "reference_name")]
    pub contact_id: ContactId,
    pub subject: String,
    pub content: Option<String>,
    pub communication_type: String,
    pub communication_medium: Option<String>,
    pub sent_or_received: String,
    pub sender: Option<String>,
    pub recipients: Option<String>,
    pub communication_date: Option<NaiveDateTime>,
    pub owner: String,
    pub modified_by: String,
    #[serde(rename = "creation")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified")]
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCommunication {
    pub hub_id: HubId,
    pub contact_id: ContactId,
    pub subject: CommunicationSubject,
    pub content: Option<String>,
    pub communication_type: String,
    pub communication_medium: Option<String>,
    pub sent_or_received: String,
    pub sender: Option<String>,
    pub recipients: Option<String>,
    pub communication_date: Option<NaiveDateTime>,
    pub owner: String,
}

impl NewCommunication {
    /// Builds a communication from coerced values that already passed
    /// the required-field check.
    pub fn from_document(
        hub_id: HubId,
        owner: &str,
        document: &CoercedDocument,
    ) -> Result<Self, DocumentError> {
        let contact_id = document
            .text("reference_name")
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .and_then(|raw| ContactId::new(raw).ok())
            .ok_or_else(|| DocumentError::invalid("reference_name", "must reference a contact id"))?;

        let subject = CommunicationSubject::new(document.text("subject").unwrap_or_default())
            .map_err(|err| DocumentError::invalid("subject", err.to_string()))?;

        Ok(Self {
            hub_id,
            contact_id,
            subject,
            content: document.text("content").map(str::to_string),
            communication_type: document
                .text("communication_type")
                .unwrap_or("Communication")
                .to_string(),
            communication_medium: document.text("communication_medium").map(str::to_string),
            sent_or_received: document
                .text("sent_or_received")
                .unwrap_or("Sent")
                .to_string(),
            sender: document.text("sender").map(str::to_string),
            recipients: document.text("recipients").map(str::to_string),
            communication_date: document.datetime("communication_date"),
            owner: owner.to_string(),
        })
    }
}
