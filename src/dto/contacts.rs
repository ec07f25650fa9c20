//! Contact read models.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::communication::Communication;
use crate::domain::contact::{Contact, ContactRef, ContactType};
use crate::domain::types::ContactId;
use crate::dto::meta::FieldInfo;

/// Another document pointing at a contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedEntity {
    pub doctype: String,
    pub name: String,
    pub title: Option<String>,
}

/// Full contact with computed fields and recent activity.
#[derive(Debug, Serialize)]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,
    pub age: Option<i32>,
    pub years_of_service: Option<i32>,
    pub primary_contact_methods: BTreeMap<&'static str, String>,
    pub linked_entities: Vec<LinkedEntity>,
    pub linked_documents: Vec<LinkedEntity>,
    pub recent_communications: Vec<Communication>,
}

/// Card-sized projection of a contact.
#[derive(Debug, Serialize)]
pub struct ContactSummary {
    pub name: ContactId,
    pub full_name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email_id: Option<String>,
    pub mobile_no: Option<String>,
    pub contact_type: Option<ContactType>,
    pub contact_category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub age: Option<i32>,
    pub years_of_service: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HierarchyContact {
    pub name: ContactId,
    pub full_name: String,
    pub designation: Option<String>,
    pub employee_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactHierarchy {
    pub contact: HierarchyContact,
    /// Nearest manager first.
    pub manager_chain: Vec<ContactRef>,
    pub direct_reports: Vec<ContactRef>,
    /// Direct and indirect reports.
    pub team_size: usize,
}

/// Why a contact cannot be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DependencyKind {
    #[serde(rename = "Dynamic Link")]
    DynamicLink,
    #[serde(rename = "Manager Reference")]
    ManagerReference,
    #[serde(rename = "Representative Reference")]
    RepresentativeReference,
    #[serde(rename = "Communication History")]
    CommunicationHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedDocument {
    pub doctype: String,
    pub name: String,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
}

#[derive(Debug, Serialize)]
pub struct DeletionCheck {
    pub can_delete: bool,
    pub linked_documents: Vec<LinkedDocument>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMeta {
    pub fields: Vec<FieldInfo>,
    pub title_field: &'static str,
    pub search_fields: &'static [&'static str],
    pub sort_field: &'static str,
    pub sort_order: &'static str,
    pub contact_types: &'static [&'static str],
    pub contact_categories: Vec<&'static str>,
}
