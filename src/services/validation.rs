//! Contact validation that needs repository lookups.

use crate::domain::contact::{Contact, ContactDraft};
use crate::domain::types::{ContactId, HubId};
use crate::repository::ContactReader;
use crate::services::{ServiceError, ServiceResult};

/// Chain label for a contact that has no id yet.
const NEW_CONTACT_LABEL: &str = "New Contact";

fn chain_label(id: Option<ContactId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| NEW_CONTACT_LABEL.to_string())
}

/// Walks the manager chain upwards from `manager_id` and fails when it
/// returns to a contact already visited.
pub fn check_manager_hierarchy<R>(
    repo: &R,
    hub_id: HubId,
    contact_id: Option<ContactId>,
    manager_id: ContactId,
) -> ServiceResult<()>
where
    R: ContactReader + ?Sized,
{
    let mut visited: Vec<Option<ContactId>> = vec![contact_id];
    let mut current = Some(manager_id);

    while let Some(next) = current {
        if visited.contains(&Some(next)) {
            let chain = visited
                .iter()
                .map(|id| chain_label(*id))
                .chain(std::iter::once(next.to_string()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ServiceError::Validation(format!(
                "Circular manager hierarchy detected: {chain}"
            )));
        }
        visited.push(Some(next));

        let Some(manager) = repo.get_contact_ref(next, hub_id)? else {
            if next == manager_id {
                return Err(ServiceError::Validation(format!(
                    "Manager {manager_id} not found"
                )));
            }
            break;
        };
        current = manager.manager_id;
    }

    Ok(())
}

/// Runs every contact rule in order, normalizing `draft` in place.
///
/// Returns the collected warnings. `previous` is the stored state when the
/// draft updates an existing contact.
pub fn validate_contact<R>(
    repo: &R,
    hub_id: HubId,
    draft: &mut ContactDraft,
    previous: Option<&Contact>,
) -> ServiceResult<Vec<String>>
where
    R: ContactReader + ?Sized,
{
    let mut warnings = Vec::new();

    draft.sync_primary_email_and_phone();
    draft.validate_mandatory_contact_info()?;
    if let Some(warning) = draft.category_warning() {
        warnings.push(warning);
    }
    draft.validate_gstin()?;
    draft.validate_phone_numbers()?;
    draft.validate_emails()?;

    if let Some(email) = draft.email_id.as_deref()
        && let Some(existing) = repo.find_contact_by_email(email, hub_id, draft.id)?
    {
        warnings.push(format!(
            "Another contact ({}) already exists with email {email}",
            existing.id
        ));
    }

    warnings.extend(draft.validate_employee_fields(previous)?);
    if draft.is_employee()
        && let Some(code) = draft.employee_code.as_deref()
        && let Some(existing) = repo.find_contact_by_employee_code(code, hub_id, draft.id)?
    {
        return Err(ServiceError::Validation(format!(
            "Employee Code {code} already exists for contact {}",
            existing.id
        )));
    }

    draft.validate_manager_is_not_self()?;
    if let Some(manager_id) = draft.manager_id {
        check_manager_hierarchy(repo, hub_id, draft.id, manager_id)?;
    }

    warnings.extend(draft.validate_vendor_fields()?);
    if let Some(previous) = previous {
        warnings.extend(draft.validate_contact_type_change(previous)?);
    }
    draft.set_full_name();

    for warning in &warnings {
        log::warn!("Contact validation warning: {warning}");
    }

    Ok(warnings)
}
