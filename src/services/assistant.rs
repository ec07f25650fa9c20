//! Keyword driven helpers behind the assistant endpoints.

use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::meta::CONTACT;
use crate::dto::assistant::{AiDeleteResult, AiSearchResult};
use crate::dto::bulk::ParsedDocument;
use crate::forms::documents::DataKind;
use crate::forms::list::ListPayload;
use crate::repository::{
    CommunicationReader, ContactReader, ContactWriter, DocumentReader, SavedViewReader,
};
use crate::services::{ServiceError, ServiceResult};
use crate::services::bulk::bulk_delete_contacts;
use crate::services::documents::{LineKind, classify_line};
use crate::services::list::get_contacts;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const KNOWN_CITIES: &[&str] = &["mumbai", "delhi", "bangalore", "chennai", "kolkata", "pune"];
/// Matches considered by a query deletion; equal to the bulk delete limit.
const DELETE_PAGE_SIZE: usize = 100;

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reads city, contact type and status filters out of a free-form query.
pub(crate) fn interpret_query(query: &str) -> Map<String, Value> {
    let query = query.to_lowercase();
    let mut filters = Map::new();

    if let Some(city) = KNOWN_CITIES.iter().find(|city| query.contains(*city)) {
        filters.insert("city".to_string(), Value::String(capitalize(city)));
    }

    let contact_type = if query.contains("vendor") || query.contains("supplier") {
        Some("Vendor")
    } else if query.contains("customer") || query.contains("client") {
        Some("Customer")
    } else if query.contains("employee") {
        Some("Employee")
    } else {
        None
    };
    if let Some(contact_type) = contact_type {
        filters.insert("contact_type".to_string(), Value::from(contact_type));
    }

    if query.contains("inactive") || query.contains("passive") {
        filters.insert("status".to_string(), Value::from("Passive"));
    } else if query.contains("active") {
        filters.insert("status".to_string(), Value::from("Active"));
    }

    filters
}

fn search<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &str,
    page_size: Option<usize>,
) -> ServiceResult<AiSearchResult>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    let interpreted_filters = interpret_query(query);
    log::debug!("Interpreted '{query}' as {interpreted_filters:?}");

    let list = get_contacts(
        repo,
        user,
        ListPayload {
            filters: Value::Object(interpreted_filters.clone()),
            fields: None,
            order_by: None,
            page: None,
            page_size,
            view: None,
            search_text: None,
        },
    )?;

    Ok(AiSearchResult {
        contacts: list.contacts,
        pagination: list.pagination,
        interpreted_filters,
    })
}

pub fn search_contacts_ai<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &str,
) -> ServiceResult<AiSearchResult>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    search(repo, user, query, None)
}

/// Extracts contact fields from pasted text; nothing is saved.
pub fn create_contact_from_ai(
    user: &AuthenticatedUser,
    text: &str,
    data_type: DataKind,
) -> ServiceResult<ParsedDocument> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut data = Map::new();
    data.insert("doctype".to_string(), Value::from(CONTACT));

    match data_type {
        DataKind::Json => {
            if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(text) {
                data.extend(parsed);
            }
        }
        DataKind::Text => {
            let mut name_line = None;
            for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
                match classify_line(line) {
                    LineKind::Email => {
                        data.insert("email_id".to_string(), Value::from(line));
                    }
                    LineKind::Phone => {
                        data.insert("mobile_no".to_string(), Value::from(line));
                    }
                    LineKind::Other => {
                        name_line.get_or_insert(line);
                    }
                }
            }

            if let Some(line) = name_line {
                let mut words = line.split_whitespace();
                if let Some(first) = words.next() {
                    data.insert("first_name".to_string(), Value::from(first));
                }
                let rest: Vec<&str> = words.collect();
                if !rest.is_empty() {
                    data.insert("last_name".to_string(), Value::from(rest.join(" ")));
                }
            }
        }
    }

    Ok(ParsedDocument {
        data,
        require_confirmation: true,
    })
}

/// Previews or deletes the contacts a query matches.
pub fn delete_contacts_ai<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &str,
    dry_run: bool,
) -> ServiceResult<AiDeleteResult>
where
    R: DocumentReader
        + ContactReader
        + ContactWriter
        + CommunicationReader
        + SavedViewReader
        + ?Sized,
{
    if !dry_run {
        ensure_role(user, SERVICE_ADMIN_ROLE)?;
        if interpret_query(query).is_empty() {
            return Err(ServiceError::Validation(
                "Query did not match any known filter; refusing to delete".to_string(),
            ));
        }
    }
    let found = search(repo, user, query, Some(DELETE_PAGE_SIZE))?;

    if dry_run {
        return Ok(AiDeleteResult::Preview {
            would_delete: found.contacts.len(),
            contacts: found.contacts,
            dry_run: true,
        });
    }

    let names = found
        .contacts
        .iter()
        .filter_map(|contact| contact.get("name").cloned())
        .collect();
    log::info!("Deleting contacts matching '{query}'");
    Ok(AiDeleteResult::Deleted(bulk_delete_contacts(
        repo, user, names, false,
    )?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "viewer@example.com".to_string(),
            hub_id: 42,
            name: "Viewer".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    #[test]
    fn query_keywords_become_filters() {
        let filters = interpret_query("All inactive suppliers in MUMBAI");

        assert_eq!(filters.get("city"), Some(&json!("Mumbai")));
        assert_eq!(filters.get("contact_type"), Some(&json!("Vendor")));
        assert_eq!(filters.get("status"), Some(&json!("Passive")));
    }

    #[test]
    fn active_clients_are_customers() {
        let filters = interpret_query("active clients");

        assert_eq!(filters.get("contact_type"), Some(&json!("Customer")));
        assert_eq!(filters.get("status"), Some(&json!("Active")));
        assert!(!filters.contains_key("city"));
    }

    #[test]
    fn pasted_card_is_parsed() {
        let parsed = create_contact_from_ai(
            &user(),
            "Priya Nair Menon\npriya@example.com\n+91 98450 12345\nBangalore",
            DataKind::Text,
        )
        .expect("parsed");

        assert!(parsed.require_confirmation);
        assert_eq!(parsed.data.get("first_name"), Some(&json!("Priya")));
        assert_eq!(parsed.data.get("last_name"), Some(&json!("Nair Menon")));
        assert_eq!(parsed.data.get("email_id"), Some(&json!("priya@example.com")));
        assert_eq!(parsed.data.get("mobile_no"), Some(&json!("+91 98450 12345")));
    }
}
