//! Fixtures shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Map;

use crate::auth::AuthenticatedUser;
use crate::domain::communication::Communication;
use crate::domain::contact::{Contact, ContactType};
use crate::domain::saved_view::SavedView;
use crate::domain::types::{CommunicationId, ContactId, HubId, SavedViewId};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "1".to_string(),
        email: "admin@example.com".to_string(),
        hub_id: 42,
        name: "Admin".to_string(),
        roles: vec![
            SERVICE_ACCESS_ROLE.to_string(),
            SERVICE_ADMIN_ROLE.to_string(),
        ],
        exp: 0,
    }
}

pub fn viewer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "2".to_string(),
        email: "viewer@example.com".to_string(),
        hub_id: 42,
        name: "Viewer".to_string(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

pub fn outsider() -> AuthenticatedUser {
    AuthenticatedUser {
        roles: vec!["other".to_string()],
        ..viewer_user()
    }
}

pub fn hub() -> HubId {
    HubId::new(42).expect("hub")
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid timestamp")
}

pub fn stored_contact(raw: i32) -> Contact {
    Contact {
        id: ContactId::new(raw).expect("valid contact id"),
        hub_id: hub(),
        full_name: "Asha Rao".to_string(),
        salutation: None,
        first_name: "Asha".to_string(),
        middle_name: None,
        last_name: Some("Rao".to_string()),
        gender: None,
        contact_type: Some(ContactType::Customer),
        contact_category: Some("Individual".to_string()),
        status: "Passive".to_string(),
        email_id: Some("asha@example.com".to_string()),
        mobile_no: None,
        phone: None,
        dob: None,
        notes: None,
        company_name: None,
        address_line1: None,
        address_line2: None,
        city: Some("Pune".to_string()),
        state: None,
        country: None,
        pincode: None,
        designation: None,
        employee_code: None,
        date_of_joining: None,
        employee_status: None,
        manager_id: None,
        department: None,
        work_email: None,
        instagram: None,
        website: None,
        gstin: None,
        vendor_type: None,
        owner: "admin@example.com".to_string(),
        modified_by: "admin@example.com".to_string(),
        created_at: timestamp(),
        updated_at: timestamp(),
        email_ids: Vec::new(),
        phone_nos: Vec::new(),
        representatives: Vec::new(),
        links: Vec::new(),
    }
}

pub fn stored_communication(raw: i32, contact: i32) -> Communication {
    Communication {
        id: CommunicationId::new(raw).expect("id"),
        hub_id: hub(),
        contact_id: ContactId::new(contact).expect("contact id"),
        subject: format!("Call {raw}"),
        content: None,
        communication_type: "Communication".to_string(),
        communication_medium: Some("Phone".to_string()),
        sent_or_received: "Sent".to_string(),
        sender: None,
        recipients: None,
        communication_date: None,
        owner: "admin@example.com".to_string(),
        modified_by: "admin@example.com".to_string(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn saved_view(raw: i32, owner: &str, is_public: bool) -> SavedView {
    SavedView {
        id: SavedViewId::new(raw).expect("view id"),
        hub_id: hub(),
        doctype: "Contact".to_string(),
        label: format!("View {raw}"),
        owner: owner.to_string(),
        filters: Map::new(),
        sorts: Vec::new(),
        columns: Vec::new(),
        fields: Vec::new(),
        page_size: None,
        is_default: false,
        is_public,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}
