use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::communication::{
    Communication as DomainCommunication, NewCommunication as DomainNewCommunication,
};
use crate::domain::types::{CommunicationId, ContactId, HubId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::communications)]
pub struct Communication {
    pub id: i32,
    pub hub_id: i32,
    pub contact_id: i32,
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::communications)]
pub struct NewCommunication<'a> {
    pub hub_id: i32,
    pub contact_id: i32,
    pub subject: &'a str,
    pub content: Option<&'a str>,
    pub communication_type: &'a str,
    pub communication_medium: Option<&'a str>,
    pub sent_or_received: &'a str,
    pub sender: Option<&'a str>,
    pub recipients: Option<&'a str>,
    pub communication_date: Option<NaiveDateTime>,
    pub owner: &'a str,
    pub modified_by: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Communication> for DomainCommunication {
    type Error = TypeConstraintError;

    fn try_from(row: Communication) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommunicationId::new(row.id)?,
            hub_id: HubId::new(row.hub_id)?,
            contact_id: ContactId::new(row.contact_id)?,
            subject: row.subject,
            content: row.content,
            communication_type: row.communication_type,
            communication_medium: row.communication_medium,
            sent_or_received: row.sent_or_received,
            sender: row.sender,
            recipients: row.recipients,
            communication_date: row.communication_date,
            owner: row.owner,
            modified_by: row.modified_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> NewCommunication<'a> {
    pub fn from_domain(communication: &'a DomainNewCommunication, now: NaiveDateTime) -> Self {
        Self {
            hub_id: communication.hub_id.get(),
            contact_id: communication.contact_id.get(),
            subject: communication.subject.as_str(),
            content: communication.content.as_deref(),
            communication_type: communication.communication_type.as_str(),
            communication_medium: communication.communication_medium.as_deref(),
            sent_or_received: communication.sent_or_received.as_str(),
            sender: communication.sender.as_deref(),
            recipients: communication.recipients.as_deref(),
            communication_date: communication.communication_date.or(Some(now)),
            owner: communication.owner.as_str(),
            modified_by: communication.owner.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}
