//! Contact CRUD, detail reads and deletion guards.

use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::communication::{Communication, NewCommunication};
use crate::domain::contact::{Contact, ContactDraft, ContactType, ORGANIZATION_CATEGORY};
use crate::domain::document::{DocumentError, apply_defaults, check_required, coerce_document};
use crate::domain::list::DEFAULT_ORDER_BY;
use crate::domain::meta::{
    COMMUNICATION, CONTACT, CONTACT_TYPES, communication_meta, contact_meta,
};
use crate::domain::types::{ContactId, HubId};
use crate::dto::contacts::{
    ContactDetail, ContactHierarchy, ContactMeta, ContactSummary, DeletionCheck, DependencyKind,
    HierarchyContact, LinkedDocument, LinkedEntity,
};
use crate::dto::meta::FieldInfo;
use crate::repository::{
    CommunicationReader, CommunicationWriter, ContactDependents, ContactReader, ContactWriter,
};
use crate::services::validation::validate_contact;
use crate::services::{ServiceError, ServiceResult, WithWarnings};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const RECENT_COMMUNICATIONS: usize = 10;
/// Communications listed in a deletion check.
const DELETION_CHECK_COMMUNICATIONS: usize = 5;
/// References spelled out in a blocked deletion message.
const DELETE_GUARD_LINES: usize = 10;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn contact_not_found(id: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("Contact {id} not found"))
}

pub(crate) fn parse_contact_id(raw: i32) -> ServiceResult<ContactId> {
    ContactId::new(raw).map_err(|_| contact_not_found(raw))
}

fn load_contact<R>(repo: &R, id: ContactId, hub_id: HubId) -> ServiceResult<Contact>
where
    R: ContactReader + ?Sized,
{
    repo.get_contact_by_id(id, hub_id)
        .map_err(|err| {
            log::error!("Failed to load contact {id}: {err}");
            err
        })?
        .ok_or_else(|| contact_not_found(id))
}

/// Coerces a payload against the Contact registry and builds a draft.
pub(crate) fn prepare_contact_draft(payload: &Value) -> ServiceResult<ContactDraft> {
    let meta = contact_meta();
    let mut document = coerce_document(meta, payload)?;
    for field in document.ignored_fields() {
        log::debug!("Ignoring unknown Contact field {field}");
    }
    apply_defaults(meta, &mut document);
    check_required(meta, &document)?;
    Ok(ContactDraft::from_document(&document)?)
}

/// Validates and stores a new contact built from an untyped payload.
pub(crate) fn insert_contact<R>(
    repo: &R,
    hub_id: HubId,
    user_email: &str,
    payload: &Value,
) -> ServiceResult<WithWarnings<Contact>>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let mut draft = prepare_contact_draft(payload)?;
    let warnings = validate_contact(repo, hub_id, &mut draft, None)?;

    let contact = repo
        .create_contact(hub_id, &draft, user_email)
        .map_err(|err| {
            log::error!("Failed to create contact: {err}");
            err
        })?;

    Ok(WithWarnings::new(contact, warnings))
}

/// Applies `patch` over the stored contact and saves the result.
pub(crate) fn apply_contact_update<R>(
    repo: &R,
    hub_id: HubId,
    user_email: &str,
    id: ContactId,
    patch: &Value,
) -> ServiceResult<WithWarnings<Contact>>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let patch = patch.as_object().ok_or(DocumentError::NotAnObject)?;
    let existing = load_contact(repo, id, hub_id)?;

    let mut merged = match serde_json::to_value(&existing) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(err) => return Err(ServiceError::Internal(err.to_string())),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }

    let mut draft = prepare_contact_draft(&Value::Object(merged))?;
    draft.id = Some(id);
    let warnings = validate_contact(repo, hub_id, &mut draft, Some(&existing))?;

    let contact = repo
        .update_contact(id, hub_id, &draft, user_email)
        .map_err(|err| {
            log::error!("Failed to update contact {id}: {err}");
            err
        })?;

    Ok(WithWarnings::new(contact, warnings))
}

/// Stores a communication for an existing contact.
pub(crate) fn insert_communication<R>(
    repo: &R,
    hub_id: HubId,
    user_email: &str,
    payload: &Value,
) -> ServiceResult<Communication>
where
    R: ContactReader + CommunicationWriter + ?Sized,
{
    let meta = communication_meta();
    let mut document = coerce_document(meta, payload)?;
    apply_defaults(meta, &mut document);
    check_required(meta, &document)?;
    let communication = NewCommunication::from_document(hub_id, user_email, &document)?;

    load_contact(repo, communication.contact_id, hub_id)?;

    repo.create_communication(&communication).map_err(|err| {
        log::error!("Failed to create communication: {err}");
        err.into()
    })
}

pub fn create_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: &Value,
) -> ServiceResult<WithWarnings<Contact>>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;

    insert_contact(repo, hub_id, &user.email, payload)
}

/// Partial update: fields missing from `patch` keep their stored values.
pub fn update_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
    patch: &Value,
) -> ServiceResult<WithWarnings<Contact>>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    apply_contact_update(repo, hub_id, &user.email, id, patch)
}

fn linked_entities(contact: &Contact) -> Vec<LinkedEntity> {
    contact
        .links
        .iter()
        .map(|link| LinkedEntity {
            doctype: link.link_doctype.clone(),
            name: link.link_name.clone(),
            title: None,
        })
        .collect()
}

fn linked_documents(contact: &Contact) -> Vec<LinkedEntity> {
    contact
        .links
        .iter()
        .map(|link| LinkedEntity {
            doctype: link.link_doctype.clone(),
            name: link.link_name.clone(),
            title: Some(
                link.link_title
                    .clone()
                    .unwrap_or_else(|| link.link_name.clone()),
            ),
        })
        .collect()
}

pub fn get_contact_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<ContactDetail>
where
    R: ContactReader + CommunicationReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let contact = load_contact(repo, id, hub_id)?;
    let recent_communications = repo
        .list_contact_communications(id, hub_id, RECENT_COMMUNICATIONS)
        .map_err(|err| {
            log::error!("Failed to load communications of contact {id}: {err}");
            err
        })?;

    let today = today();
    Ok(ContactDetail {
        age: contact.age(today),
        years_of_service: contact.years_of_service(today),
        primary_contact_methods: contact.primary_contact_methods(),
        linked_entities: linked_entities(&contact),
        linked_documents: linked_documents(&contact),
        recent_communications,
        contact,
    })
}

pub fn get_contact_summary<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<ContactSummary>
where
    R: ContactReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let contact = load_contact(repo, id, hub_id)?;
    let today = today();

    Ok(ContactSummary {
        name: contact.id,
        age: contact.age(today),
        years_of_service: contact.years_of_service(today),
        full_name: contact.full_name,
        first_name: contact.first_name,
        last_name: contact.last_name,
        email_id: contact.email_id,
        mobile_no: contact.mobile_no,
        contact_type: contact.contact_type,
        contact_category: contact.contact_category,
        city: contact.city,
        state: contact.state,
        company_name: contact.company_name,
        designation: contact.designation,
    })
}

/// Counts direct and indirect employee reports. Contacts already visited
/// contribute nothing, so manager cycles terminate.
fn team_size<R>(
    repo: &R,
    hub_id: HubId,
    manager_id: ContactId,
    visited: &mut HashSet<ContactId>,
) -> ServiceResult<usize>
where
    R: ContactReader + ?Sized,
{
    if !visited.insert(manager_id) {
        return Ok(0);
    }

    let reports = repo.list_direct_reports(manager_id, hub_id)?;
    let mut size = 0;
    for report in reports
        .iter()
        .filter(|report| report.contact_type == Some(ContactType::Employee))
    {
        size += 1 + team_size(repo, hub_id, report.id, visited)?;
    }
    Ok(size)
}

pub fn get_contact_hierarchy<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<ContactHierarchy>
where
    R: ContactReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let contact = load_contact(repo, id, hub_id)?;
    if !contact.is_employee() {
        return Err(ServiceError::Validation(
            "Hierarchy is only available for Employee contacts".to_string(),
        ));
    }

    let mut manager_chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = contact.manager_id;
    while let Some(manager_id) = current {
        if !seen.insert(manager_id) {
            break;
        }
        let Some(manager) = repo.get_contact_ref(manager_id, hub_id)? else {
            break;
        };
        current = manager.manager_id;
        manager_chain.push(manager);
    }

    let direct_reports = repo
        .list_direct_reports(id, hub_id)?
        .into_iter()
        .filter(|report| report.contact_type == Some(ContactType::Employee))
        .collect();

    let team_size = team_size(repo, hub_id, id, &mut HashSet::new())?;

    Ok(ContactHierarchy {
        contact: HierarchyContact {
            name: contact.id,
            full_name: contact.full_name,
            designation: contact.designation,
            employee_code: contact.employee_code,
        },
        manager_chain,
        direct_reports,
        team_size,
    })
}

fn load_dependents<R>(repo: &R, id: ContactId, hub_id: HubId) -> ServiceResult<ContactDependents>
where
    R: ContactReader + ?Sized,
{
    repo.list_contact_dependents(id, hub_id).map_err(|err| {
        log::error!("Failed to load dependents of contact {id}: {err}");
        err.into()
    })
}

/// Dry run of a deletion: reports every reference to the contact.
pub fn validate_contact_deletion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
) -> ServiceResult<DeletionCheck>
where
    R: ContactReader + CommunicationReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    load_contact(repo, id, hub_id)?;
    let dependents = load_dependents(repo, id, hub_id)?;

    let mut linked_documents: Vec<LinkedDocument> = dependents
        .links
        .iter()
        .map(|link| LinkedDocument {
            doctype: link.link_doctype.clone(),
            name: link.link_name.clone(),
            title: link.link_title.clone(),
            kind: DependencyKind::DynamicLink,
        })
        .collect();

    let contact_reference = |contact: &crate::domain::contact::ContactRef, kind| LinkedDocument {
        doctype: CONTACT.to_string(),
        name: contact.id.to_string(),
        title: Some(contact.full_name.clone()),
        kind,
    };
    linked_documents.extend(
        dependents
            .managed
            .iter()
            .map(|contact| contact_reference(contact, DependencyKind::ManagerReference)),
    );
    linked_documents.extend(
        dependents
            .represented
            .iter()
            .map(|contact| contact_reference(contact, DependencyKind::RepresentativeReference)),
    );

    let communication_ids: Vec<_> = dependents
        .communications
        .iter()
        .take(DELETION_CHECK_COMMUNICATIONS)
        .copied()
        .collect();
    if !communication_ids.is_empty() {
        let communications = repo.get_communications_by_ids(&communication_ids, hub_id)?;
        linked_documents.extend(communications.into_iter().map(|communication| {
            LinkedDocument {
                doctype: COMMUNICATION.to_string(),
                name: communication.id.to_string(),
                title: Some(communication.subject),
                kind: DependencyKind::CommunicationHistory,
            }
        }));
    }

    let can_delete = linked_documents
        .iter()
        .all(|document| document.kind == DependencyKind::CommunicationHistory);
    let message = if can_delete {
        "Contact can be safely deleted"
    } else {
        "Contact has dependencies that must be resolved first"
    };

    Ok(DeletionCheck {
        can_delete,
        linked_documents,
        message: message.to_string(),
    })
}

/// Human readable references that block deleting `contact`.
pub(crate) fn deletion_blockers(dependents: &ContactDependents) -> Vec<String> {
    let mut lines: Vec<String> = dependents
        .links
        .iter()
        .map(|link| format!("{}: {}", link.link_doctype, link.link_name))
        .collect();
    lines.extend(
        dependents
            .managed
            .iter()
            .map(|contact| format!("Manager of: {} ({})", contact.full_name, contact.id)),
    );
    lines.extend(
        dependents
            .represented
            .iter()
            .map(|contact| format!("Representative of: {} ({})", contact.full_name, contact.id)),
    );
    lines.extend(
        dependents
            .communications
            .iter()
            .map(|id| format!("{COMMUNICATION}: {id}")),
    );
    lines
}

pub(crate) fn deletion_guard_message(contact: &Contact, blockers: &[String]) -> String {
    let mut summary: Vec<String> = blockers.iter().take(DELETE_GUARD_LINES).cloned().collect();
    if blockers.len() > DELETE_GUARD_LINES {
        summary.push(format!(
            "... and {} more",
            blockers.len() - DELETE_GUARD_LINES
        ));
    }
    let label = if contact.full_name.is_empty() {
        contact.id.to_string()
    } else {
        contact.full_name.clone()
    };
    format!(
        "Cannot delete Contact {label}. It is linked to:\n{}\n\nPlease remove these references first.",
        summary.join("\n")
    )
}

/// Deletes one contact. Without `force` any reference blocks the deletion.
pub(crate) fn remove_contact<R>(
    repo: &R,
    hub_id: HubId,
    contact: &Contact,
    force: bool,
) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    if !force {
        let dependents = load_dependents(repo, contact.id, hub_id)?;
        let blockers = deletion_blockers(&dependents);
        if !blockers.is_empty() {
            return Err(ServiceError::Conflict(deletion_guard_message(
                contact, &blockers,
            )));
        }
    }

    repo.delete_contact(contact.id, hub_id, force)
        .map_err(|err| {
            log::error!("Failed to delete contact {}: {err}", contact.id);
            err
        })?;
    log::info!("Deleted contact {} (force: {force})", contact.id);
    Ok(())
}

pub fn delete_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
    force: bool,
) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let contact = load_contact(repo, id, hub_id)?;
    remove_contact(repo, hub_id, &contact, force)
}

/// Creates a copy of a contact without its links, applying `overrides`.
pub fn duplicate_contact<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
    overrides: &Value,
) -> ServiceResult<WithWarnings<Contact>>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let source = load_contact(repo, id, hub_id)?;
    let mut payload = match serde_json::to_value(&source) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(err) => return Err(ServiceError::Internal(err.to_string())),
    };
    payload.remove("links");
    match overrides {
        Value::Null => {}
        Value::Object(overrides) => {
            for (key, value) in overrides {
                payload.insert(key.clone(), value.clone());
            }
        }
        _ => return Err(DocumentError::NotAnObject.into()),
    }

    insert_contact(repo, hub_id, &user.email, &Value::Object(payload))
}

pub fn get_contact_meta(user: &AuthenticatedUser) -> ServiceResult<ContactMeta> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let meta = contact_meta();
    let mut categories: BTreeSet<&'static str> = CONTACT_TYPES
        .iter()
        .filter_map(|name| name.parse::<ContactType>().ok())
        .flat_map(|contact_type| contact_type.typical_categories().iter().copied())
        .collect();
    categories.insert(ORGANIZATION_CATEGORY);

    let (sort_field, sort_order) = DEFAULT_ORDER_BY
        .split_once(' ')
        .unwrap_or((DEFAULT_ORDER_BY, "desc"));

    Ok(ContactMeta {
        fields: meta.value_fields().map(FieldInfo::from).collect(),
        title_field: meta.title_field,
        search_fields: meta.search_fields,
        sort_field,
        sort_order,
        contact_types: CONTACT_TYPES,
        contact_categories: categories.into_iter().collect(),
    })
}

/// Logs a communication against the contact.
pub fn add_communication<R>(
    repo: &R,
    user: &AuthenticatedUser,
    contact_id: i32,
    payload: &Value,
) -> ServiceResult<Communication>
where
    R: ContactReader + CommunicationWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_contact_id(contact_id)?;

    let mut payload = payload
        .as_object()
        .cloned()
        .ok_or(DocumentError::NotAnObject)?;
    payload.insert("reference_name".to_string(), Value::from(id.get()));

    insert_communication(repo, hub_id, &user.email, &Value::Object(payload))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::contact::{ContactRef, DynamicLink};
    use crate::domain::types::CommunicationId;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        admin_user, outsider, stored_contact, timestamp, viewer_user,
    };

    fn id(raw: i32) -> ContactId {
        ContactId::new(raw).expect("valid contact id")
    }

    fn employee(raw: i32, manager: Option<i32>) -> Contact {
        Contact {
            contact_type: Some(ContactType::Employee),
            employee_code: Some(format!("E-{raw}")),
            manager_id: manager.map(id),
            ..stored_contact(raw)
        }
    }

    fn employee_ref(raw: i32, manager: Option<i32>) -> ContactRef {
        ContactRef {
            id: id(raw),
            full_name: format!("Employee {raw}"),
            contact_type: Some(ContactType::Employee),
            designation: None,
            employee_status: Some("Active".to_string()),
            manager_id: manager.map(id),
        }
    }

    fn draft_to_contact(draft: &ContactDraft, raw: i32) -> Contact {
        Contact {
            full_name: draft.full_name.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email_id: draft.email_id.clone(),
            mobile_no: draft.mobile_no.clone(),
            contact_type: draft.contact_type,
            city: draft.city.clone(),
            links: draft.links.clone(),
            ..stored_contact(raw)
        }
    }

    /// Ensures users without the service role cannot create contacts.
    #[test]
    fn create_requires_access_role() {
        let repo = MockRepository::new();

        let result = create_contact(&repo, &outsider(), &json!({"first_name": "A"}));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Ensures missing required fields are reported before touching storage.
    #[test]
    fn create_reports_missing_fields() {
        let repo = MockRepository::new();

        let result = create_contact(&repo, &viewer_user(), &json!({"email_id": "a@example.com"}));

        match result {
            Err(ServiceError::Validation(message)) => {
                assert_eq!(message, "Missing required fields: first_name")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Ensures a valid payload is validated, named and persisted.
    #[test]
    fn create_persists_valid_contact() {
        let mut repo = MockRepository::new();
        repo.expect_find_contact_by_email()
            .returning(|_, _, _| Ok(None));
        repo.expect_create_contact()
            .withf(|_, draft, email| {
                draft.full_name == "Ravi Kumar"
                    && draft.mobile_no.as_deref() == Some("9876543210")
                    && email == "viewer@example.com"
            })
            .returning(|_, draft, _| Ok(draft_to_contact(draft, 11)));

        let result = create_contact(
            &repo,
            &viewer_user(),
            &json!({
                "first_name": "Ravi",
                "last_name": "Kumar",
                "email_id": "Ravi@Example.com",
                "mobile_no": "98765-43210",
                "contact_type": "Customer"
            }),
        )
        .expect("contact created");

        assert_eq!(result.value.id, id(11));
        assert!(result.warnings.is_empty());
    }

    /// Ensures partial updates keep stored values and pass the previous state.
    #[test]
    fn update_merges_patch_over_stored_contact() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));
        repo.expect_find_contact_by_email()
            .withf(|_, _, exclude| *exclude == Some(id(5)))
            .returning(|_, _, _| Ok(None));
        repo.expect_update_contact()
            .withf(|contact, _, draft, _| {
                *contact == id(5)
                    && draft.city.as_deref() == Some("Mumbai")
                    && draft.email_id.as_deref() == Some("asha@example.com")
            })
            .returning(|contact, _, draft, _| Ok(draft_to_contact(draft, contact.get())));

        let result = update_contact(&repo, &viewer_user(), 5, &json!({"city": "Mumbai"}))
            .expect("contact updated");

        assert_eq!(result.value.city.as_deref(), Some("Mumbai"));
    }

    /// Ensures updating an unknown contact reports it by id.
    #[test]
    fn update_unknown_contact_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id().returning(|_, _| Ok(None));

        let result = update_contact(&repo, &viewer_user(), 77, &json!({"city": "Pune"}));

        assert!(matches!(result, Err(ServiceError::NotFound(message)) if message == "Contact 77 not found"));
    }

    /// Ensures hierarchy is limited to employees.
    #[test]
    fn hierarchy_rejects_non_employees() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));

        let result = get_contact_hierarchy(&repo, &viewer_user(), 1);

        assert!(matches!(
            result,
            Err(ServiceError::Validation(message))
                if message == "Hierarchy is only available for Employee contacts"
        ));
    }

    /// Ensures manager chains and team sizes survive cyclic data.
    #[test]
    fn hierarchy_walks_chain_and_counts_team() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|_, _| Ok(Some(employee(1, Some(2)))));
        repo.expect_get_contact_ref()
            .returning(|contact, _| match contact.get() {
                2 => Ok(Some(employee_ref(2, Some(3)))),
                3 => Ok(Some(employee_ref(3, Some(2)))),
                _ => Ok(None),
            });
        repo.expect_list_direct_reports()
            .returning(|manager, _| match manager.get() {
                1 => Ok(vec![employee_ref(4, Some(1)), employee_ref(5, Some(1))]),
                4 => Ok(vec![employee_ref(6, Some(4))]),
                6 => Ok(vec![employee_ref(1, Some(6))]),
                _ => Ok(Vec::new()),
            });

        let hierarchy = get_contact_hierarchy(&repo, &viewer_user(), 1).expect("hierarchy");

        let chain: Vec<i32> = hierarchy.manager_chain.iter().map(|m| m.id.get()).collect();
        assert_eq!(chain, vec![2, 3]);
        assert_eq!(hierarchy.direct_reports.len(), 2);
        // 4, 5, 6 and the cyclic reference back to 1.
        assert_eq!(hierarchy.team_size, 4);
    }

    /// Ensures communication history alone does not block deletion.
    #[test]
    fn deletion_check_allows_communication_history() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));
        repo.expect_list_contact_dependents().returning(|_, _| {
            Ok(ContactDependents {
                communications: vec![CommunicationId::new(9).expect("id")],
                ..Default::default()
            })
        });
        repo.expect_get_communications_by_ids()
            .returning(|_, _| Ok(Vec::new()));

        let check = validate_contact_deletion(&repo, &viewer_user(), 3).expect("check");

        assert!(check.can_delete);
        assert_eq!(check.message, "Contact can be safely deleted");
    }

    /// Ensures references block deletion and are listed in the message.
    #[test]
    fn delete_is_blocked_by_references() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));
        repo.expect_list_contact_dependents().returning(|_, _| {
            Ok(ContactDependents {
                links: vec![DynamicLink {
                    link_doctype: "Customer".to_string(),
                    link_name: "CUST-1".to_string(),
                    link_title: None,
                }],
                managed: vec![employee_ref(8, Some(3))],
                ..Default::default()
            })
        });
        repo.expect_delete_contact().never();

        let result = delete_contact(&repo, &admin_user(), 3, false);

        match result {
            Err(ServiceError::Conflict(message)) => assert_eq!(
                message,
                "Cannot delete Contact Asha Rao. It is linked to:\nCustomer: CUST-1\nManager of: Employee 8 (8)\n\nPlease remove these references first."
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Ensures forced deletes skip the reference check.
    #[test]
    fn forced_delete_skips_guard() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));
        repo.expect_list_contact_dependents().never();
        repo.expect_delete_contact()
            .withf(|contact, _, force| *contact == id(3) && *force)
            .times(1)
            .returning(|_, _, _| Ok(()));

        delete_contact(&repo, &admin_user(), 3, true).expect("deleted");
    }

    /// Ensures deletion requires the admin role.
    #[test]
    fn delete_requires_admin_role() {
        let repo = MockRepository::new();

        let result = delete_contact(&repo, &viewer_user(), 3, false);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Ensures the guard message is truncated after ten references.
    #[test]
    fn guard_message_is_truncated() {
        let blockers: Vec<String> = (1..=12).map(|n| format!("Communication: {n}")).collect();

        let message = deletion_guard_message(&stored_contact(1), &blockers);

        assert!(message.contains("Communication: 10\n... and 2 more"));
        assert!(!message.contains("Communication: 11"));
    }

    /// Ensures duplicates drop links and apply overrides.
    #[test]
    fn duplicate_drops_links_and_applies_overrides() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id().returning(|contact, _| {
            Ok(Some(Contact {
                links: vec![DynamicLink {
                    link_doctype: "Customer".to_string(),
                    link_name: "CUST-1".to_string(),
                    link_title: None,
                }],
                ..stored_contact(contact.get())
            }))
        });
        repo.expect_find_contact_by_email()
            .returning(|_, _, _| Ok(None));
        repo.expect_create_contact()
            .withf(|_, draft, _| draft.links.is_empty() && draft.first_name == "Copy")
            .returning(|_, draft, _| Ok(draft_to_contact(draft, 12)));

        let result = duplicate_contact(&repo, &viewer_user(), 5, &json!({"first_name": "Copy"}))
            .expect("duplicated");

        assert_eq!(result.value.id, id(12));
        assert_eq!(result.value.full_name, "Copy Rao");
    }

    /// Ensures communications are stored against the contact from the path.
    #[test]
    fn add_communication_references_contact() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|contact, _| Ok(Some(stored_contact(contact.get()))));
        repo.expect_create_communication()
            .withf(|communication| {
                communication.contact_id == id(4) && communication.subject.as_str() == "Call back"
            })
            .returning(|communication| {
                Ok(Communication {
                    id: CommunicationId::new(1).expect("id"),
                    hub_id: communication.hub_id,
                    contact_id: communication.contact_id,
                    subject: communication.subject.to_string(),
                    content: None,
                    communication_type: communication.communication_type.clone(),
                    communication_medium: None,
                    sent_or_received: communication.sent_or_received.clone(),
                    sender: None,
                    recipients: None,
                    communication_date: None,
                    owner: communication.owner.clone(),
                    modified_by: communication.owner.clone(),
                    created_at: timestamp(),
                    updated_at: timestamp(),
                })
            });

        let communication = add_communication(
            &repo,
            &viewer_user(),
            4,
            &json!({"subject": "Call back", "reference_name": "99"}),
        )
        .expect("communication created");

        assert_eq!(communication.contact_id, id(4));
        assert_eq!(communication.sent_or_received, "Sent");
    }

    #[test]
    fn meta_lists_categories_and_types() {
        let meta = get_contact_meta(&viewer_user()).expect("meta");

        assert_eq!(meta.title_field, "full_name");
        assert_eq!(meta.sort_field, "modified");
        assert!(meta.contact_categories.contains(&"Organization"));
        assert!(meta.contact_categories.contains(&"Travel Agent"));
        assert!(meta.fields.iter().all(|field| field.fieldtype != "Section Break"));
    }
}
