//! Saved list views and per-doctype list settings.

use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::list::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, merge_filters, parse_order_by, resolve_fields,
    sorts_to_order_by,
};
use crate::domain::meta::{CONTACT, DocMeta, contact_meta};
use crate::domain::saved_view::{DEFAULT_SETTINGS_NAME, ListSettings, SavedView};
use crate::domain::types::{HubId, SavedViewId};
use crate::dto::views::{AppliedView, ContactsWithView, ListSettingsEntry, ViewData};
use crate::forms::list::ViewRef;
use crate::forms::views::{ContactsViewPayload, ListSettingsPayload, SaveViewPayload};
use crate::repository::{
    CommunicationReader, ContactReader, DocumentReader, ListSettingsReader, ListSettingsWriter,
    SavedViewReader, SavedViewWriter,
};
use crate::services::list::{CONTACT_LIST_FIELDS, ListPlan, resolve_doctype, run_list};
use crate::services::{ServiceError, ServiceResult};
use crate::SERVICE_ACCESS_ROLE;

fn view_not_found(reference: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("View '{reference}' not found"))
}

fn parse_view_id(raw: i32) -> ServiceResult<SavedViewId> {
    SavedViewId::new(raw).map_err(|_| view_not_found(raw))
}

/// Looks a view up by id or label; labels prefer the user's own view over a
/// public one. Visibility is left to the caller.
pub(crate) fn find_view<R>(
    repo: &R,
    hub_id: HubId,
    doctype: &str,
    user_email: &str,
    reference: &ViewRef,
) -> ServiceResult<Option<SavedView>>
where
    R: SavedViewReader + ?Sized,
{
    let view = match reference {
        ViewRef::Id(id) => repo.get_saved_view(*id, hub_id)?,
        ViewRef::Label(label) => {
            match repo.find_saved_view_by_label(hub_id, doctype, user_email, label)? {
                Some(view) => Some(view),
                None => repo
                    .list_saved_views(hub_id, doctype, user_email)?
                    .into_iter()
                    .find(|view| view.is_public && &view.label == label),
            }
        }
    };
    Ok(view.filter(|view| view.doctype == doctype))
}

/// Rejects sorts and fields that are not part of the DocType.
fn check_view_columns(meta: &'static DocMeta, payload: &SaveViewPayload) -> ServiceResult<()> {
    if let Some(order_by) = sorts_to_order_by(&payload.sorts) {
        parse_order_by(meta, &order_by)?;
    }
    if !payload.fields.is_empty() {
        resolve_fields(meta, Some(&payload.fields), &[])?;
    }
    Ok(())
}

/// Creates or updates a view. Without an id, a view of the same label and
/// owner is replaced.
pub fn save_list_view<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
    payload: SaveViewPayload,
) -> ServiceResult<ViewData>
where
    R: SavedViewReader + SavedViewWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;
    check_view_columns(meta, &payload)?;

    let existing = match payload.view_id {
        Some(id) => {
            let view = repo
                .get_saved_view(id, hub_id)?
                .filter(|view| view.doctype == meta.name)
                .ok_or_else(|| view_not_found(id))?;
            if !view.is_owned_by(&user.email) {
                return Err(ServiceError::Forbidden(
                    "You don't have permission to update this view".to_string(),
                ));
            }
            Some(view)
        }
        None => repo.find_saved_view_by_label(hub_id, meta.name, &user.email, &payload.label)?,
    };

    let new_view = payload.into_domain(hub_id, meta.name, &user.email);
    let view = match existing {
        Some(existing) => repo.update_saved_view(existing.id, &new_view),
        None => repo.create_saved_view(&new_view),
    }
    .map_err(|err| {
        log::error!("Failed to save view {}: {err}", new_view.label);
        err
    })?;

    Ok(ViewData::for_user(view, &user.email))
}

/// Own and public views of the doctype, defaults first.
pub fn get_list_views<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
) -> ServiceResult<Vec<ViewData>>
where
    R: SavedViewReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;

    let views = repo
        .list_saved_views(hub_id, meta.name, &user.email)
        .map_err(|err| {
            log::error!("Failed to list views: {err}");
            err
        })?;

    Ok(views
        .into_iter()
        .map(|view| ViewData::for_user(view, &user.email))
        .collect())
}

pub fn get_list_view<R>(repo: &R, user: &AuthenticatedUser, view_id: i32) -> ServiceResult<ViewData>
where
    R: SavedViewReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let id = parse_view_id(view_id)?;

    let view = repo
        .get_saved_view(id, hub_id)?
        .ok_or_else(|| view_not_found(id))?;
    if !view.is_visible_to(&user.email) {
        return Err(ServiceError::Forbidden(
            "You don't have permission to access this view".to_string(),
        ));
    }

    Ok(ViewData::for_user(view, &user.email))
}

/// Only the owner may delete a view.
pub fn delete_list_view<R>(repo: &R, user: &AuthenticatedUser, view_id: i32) -> ServiceResult<()>
where
    R: SavedViewReader + SavedViewWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let denied = || {
        ServiceError::NotFound(format!(
            "View '{view_id}' not found or you don't have permission to delete it"
        ))
    };
    let id = SavedViewId::new(view_id).map_err(|_| denied())?;

    let view = repo
        .get_saved_view(id, hub_id)?
        .filter(|view| view.is_owned_by(&user.email))
        .ok_or_else(denied)?;

    repo.delete_saved_view(view.id, hub_id).map_err(|err| {
        log::error!("Failed to delete view {id}: {err}");
        err
    })?;
    log::info!("Deleted view {id} of {}", user.email);
    Ok(())
}

/// Contact list shaped by a saved view (or the user's default view) with
/// ad hoc overrides on top.
pub fn get_contacts_with_view<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: ContactsViewPayload,
) -> ServiceResult<ContactsWithView>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;

    let view = match payload.view_id {
        Some(id) => Some(
            repo.get_saved_view(id, hub_id)?
                .filter(|view| view.doctype == CONTACT && view.is_visible_to(&user.email))
                .ok_or_else(|| view_not_found(id))?,
        ),
        None => repo.get_default_view(hub_id, CONTACT, &user.email)?,
    };

    let base_filters = view
        .as_ref()
        .map(|view| Value::Object(view.filters.clone()))
        .unwrap_or(Value::Null);
    let filters = merge_filters(&base_filters, &payload.override_filters);
    let sorts = match payload.override_sorts {
        Some(sorts) => sorts,
        None => view.as_ref().map(|view| view.sorts.clone()).unwrap_or_default(),
    };
    let page_size = payload
        .page_size
        .or_else(|| view.as_ref().and_then(|view| view.page_size))
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let fields: Vec<String> = match view.as_ref().filter(|view| !view.fields.is_empty()) {
        Some(view) => view.fields.clone(),
        None => CONTACT_LIST_FIELDS.iter().map(|f| f.to_string()).collect(),
    };

    let plan = ListPlan {
        filters: filters.clone(),
        fields: Some(fields.clone()),
        order_by: sorts_to_order_by(&sorts),
        search_text: payload.search_text,
        page: payload.page,
        page_size,
    };
    let (contacts, pagination) = run_list(repo, hub_id, contact_meta(), &plan)?;

    let applied_view = AppliedView {
        view_id: view.as_ref().map(|view| view.id),
        view_name: view.as_ref().map(|view| view.label.clone()),
        filters,
        sorts,
        columns: view.map(|view| view.columns).unwrap_or_default(),
        fields,
        page_size,
    };

    Ok(ContactsWithView {
        contacts,
        pagination,
        applied_view,
    })
}

/// Stored values of a named settings entry; empty when never saved.
pub fn get_list_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
    settings_name: Option<&str>,
) -> ServiceResult<Map<String, Value>>
where
    R: ListSettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;
    let settings_name = settings_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_SETTINGS_NAME);

    Ok(repo
        .get_list_settings(hub_id, meta.name, settings_name)?
        .map(|settings| settings.values)
        .unwrap_or_default())
}

/// Merges `values` into the stored settings.
pub fn set_list_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
    payload: ListSettingsPayload,
) -> ServiceResult<ListSettings>
where
    R: ListSettingsReader + ListSettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;

    let mut values = repo
        .get_list_settings(hub_id, meta.name, &payload.settings_name)?
        .map(|settings| settings.values)
        .unwrap_or_default();
    values.extend(payload.values);

    repo.save_list_settings(hub_id, meta.name, &payload.settings_name, &values)
        .map_err(|err| {
            log::error!("Failed to save list settings {}: {err}", payload.settings_name);
            err.into()
        })
}

pub fn get_all_list_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
) -> ServiceResult<Vec<ListSettingsEntry>>
where
    R: ListSettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;

    Ok(repo
        .list_list_settings(hub_id, meta.name)?
        .iter()
        .map(ListSettingsEntry::from)
        .collect())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::list::{SortDirection, SortSpec};
    use crate::domain::types::ViewLabel;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        hub, saved_view, stored_contact, timestamp, viewer_user,
    };

    fn save_payload(label: &str) -> SaveViewPayload {
        SaveViewPayload {
            view_id: None,
            label: ViewLabel::new(label).expect("label"),
            filters: Map::new(),
            sorts: vec![SortSpec {
                field: "city".to_string(),
                direction: SortDirection::Desc,
            }],
            columns: Vec::new(),
            fields: vec!["full_name".to_string()],
            page_size: Some(25),
            is_default: true,
            is_public: false,
        }
    }

    fn stored(view: &crate::domain::saved_view::NewSavedView, id: i32) -> SavedView {
        SavedView {
            label: view.label.to_string(),
            owner: view.owner.clone(),
            sorts: view.sorts.clone(),
            fields: view.fields.clone(),
            page_size: view.page_size,
            is_default: view.is_default,
            is_public: view.is_public,
            ..saved_view(id, &view.owner, view.is_public)
        }
    }

    /// Ensures a new label creates a view owned by the caller.
    #[test]
    fn save_creates_new_view() {
        let mut repo = MockRepository::new();
        repo.expect_find_saved_view_by_label()
            .returning(|_, _, _, _| Ok(None));
        repo.expect_create_saved_view()
            .withf(|view| view.owner == "viewer@example.com" && view.is_default)
            .returning(|view| Ok(stored(view, 9)));

        let data = save_list_view(&repo, &viewer_user(), CONTACT, save_payload("Mine"))
            .expect("saved");

        assert!(data.is_mine);
        assert_eq!(data.view_name, "Mine");
        assert_eq!(data.page_size, Some(25));
    }

    /// Ensures an existing label of the same owner is updated in place.
    #[test]
    fn save_replaces_view_with_same_label() {
        let mut repo = MockRepository::new();
        repo.expect_find_saved_view_by_label()
            .returning(|_, _, owner, _| Ok(Some(saved_view(3, owner, false))));
        repo.expect_create_saved_view().never();
        repo.expect_update_saved_view()
            .withf(|id, _| id.get() == 3)
            .returning(|id, view| Ok(stored(view, id.get())));

        let data = save_list_view(&repo, &viewer_user(), CONTACT, save_payload("View 3"))
            .expect("saved");

        assert_eq!(data.view_id.get(), 3);
    }

    /// Ensures other users' views cannot be overwritten by id.
    #[test]
    fn save_rejects_foreign_view() {
        let mut repo = MockRepository::new();
        repo.expect_get_saved_view()
            .returning(|id, _| Ok(Some(saved_view(id.get(), "owner@example.com", true))));
        repo.expect_update_saved_view().never();

        let payload = SaveViewPayload {
            view_id: Some(SavedViewId::new(3).expect("id")),
            ..save_payload("Shared")
        };
        let result = save_list_view(&repo, &viewer_user(), CONTACT, payload);

        assert!(matches!(result, Err(ServiceError::Forbidden(message)) if message == "You don't have permission to update this view"));
    }

    /// Ensures unknown sort fields are rejected.
    #[test]
    fn save_rejects_unknown_sort_field() {
        let repo = MockRepository::new();
        let payload = SaveViewPayload {
            sorts: vec![SortSpec {
                field: "nickname".to_string(),
                direction: SortDirection::Asc,
            }],
            ..save_payload("Broken")
        };

        let result = save_list_view(&repo, &viewer_user(), CONTACT, payload);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    /// Ensures foreign public views hide their owner.
    #[test]
    fn list_views_mark_ownership() {
        let mut repo = MockRepository::new();
        repo.expect_list_saved_views().returning(|_, _, email| {
            Ok(vec![
                saved_view(1, email, false),
                saved_view(2, "owner@example.com", true),
            ])
        });

        let views = get_list_views(&repo, &viewer_user(), CONTACT).expect("views");

        assert!(views[0].is_mine);
        assert_eq!(views[1].owner, "Public");
    }

    /// Ensures private views of others are forbidden.
    #[test]
    fn get_private_foreign_view_is_forbidden() {
        let mut repo = MockRepository::new();
        repo.expect_get_saved_view()
            .returning(|id, _| Ok(Some(saved_view(id.get(), "owner@example.com", false))));

        let result = get_list_view(&repo, &viewer_user(), 5);

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    /// Ensures a missing view is reported by id.
    #[test]
    fn get_missing_view_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_saved_view().returning(|_, _| Ok(None));

        let result = get_list_view(&repo, &viewer_user(), 5);

        assert!(matches!(result, Err(ServiceError::NotFound(message)) if message == "View '5' not found"));
    }

    /// Ensures only owners delete views, even public ones.
    #[test]
    fn delete_requires_ownership() {
        let mut repo = MockRepository::new();
        repo.expect_get_saved_view()
            .returning(|id, _| Ok(Some(saved_view(id.get(), "owner@example.com", true))));
        repo.expect_delete_saved_view().never();

        let result = delete_list_view(&repo, &viewer_user(), 5);

        assert!(matches!(
            result,
            Err(ServiceError::NotFound(message))
                if message == "View '5' not found or you don't have permission to delete it"
        ));
    }

    /// Ensures owners can delete their views.
    #[test]
    fn owner_deletes_view() {
        let mut repo = MockRepository::new();
        repo.expect_get_saved_view()
            .returning(|id, _| Ok(Some(saved_view(id.get(), "viewer@example.com", false))));
        repo.expect_delete_saved_view()
            .times(1)
            .returning(|_, _| Ok(()));

        delete_list_view(&repo, &viewer_user(), 5).expect("deleted");
    }

    /// Ensures the default view applies when no view is requested and
    /// overrides win.
    #[test]
    fn contacts_with_default_view() {
        let mut repo = MockRepository::new();
        repo.expect_get_default_view().returning(|_, _, owner| {
            let mut view = saved_view(7, owner, false);
            view.filters = json!({"city": "Pune"}).as_object().cloned().expect("map");
            view.sorts = vec![SortSpec {
                field: "full_name".to_string(),
                direction: SortDirection::Asc,
            }];
            view.fields = vec!["name".to_string(), "city".to_string()];
            view.page_size = Some(10);
            view.is_default = true;
            Ok(Some(view))
        });
        repo.expect_list_document_ids()
            .withf(|query| {
                query.order[0].field.fieldname == "modified"
                    && query.pagination.is_some_and(|p| p.per_page == 10)
                    && query.conditions.len() == 2
            })
            .returning(|_| Ok((1, vec![4])));
        repo.expect_get_contacts_by_ids()
            .returning(|ids, _| Ok(ids.iter().map(|id| stored_contact(id.get())).collect()));

        let payload = ContactsViewPayload {
            view_id: None,
            page: 1,
            page_size: None,
            override_filters: json!({"contact_type": "Customer"}),
            override_sorts: Some(vec![SortSpec {
                field: "modified".to_string(),
                direction: SortDirection::Desc,
            }]),
            search_text: None,
        };
        let result = get_contacts_with_view(&repo, &viewer_user(), payload).expect("contacts");

        assert_eq!(result.applied_view.view_id.map(SavedViewId::get), Some(7));
        assert_eq!(
            result.applied_view.filters,
            json!({"city": "Pune", "contact_type": "Customer"})
        );
        assert_eq!(result.applied_view.page_size, 10);
        assert_eq!(result.contacts[0].get("city"), Some(&json!("Pune")));
    }

    /// Ensures settings are merged into the stored values.
    #[test]
    fn set_list_settings_merges_values() {
        let mut repo = MockRepository::new();
        repo.expect_get_list_settings().returning(|hub_id, doctype, name| {
            Ok(Some(ListSettings {
                hub_id,
                doctype: doctype.to_string(),
                settings_name: name.to_string(),
                values: json!({"group_by": "city", "density": "compact"})
                    .as_object()
                    .cloned()
                    .expect("map"),
                updated_at: timestamp(),
            }))
        });
        repo.expect_save_list_settings()
            .withf(|_, _, name, values| {
                name == "default"
                    && Value::Object(values.clone())
                        == json!({"group_by": "state", "density": "compact"})
            })
            .returning(|hub_id, doctype, name, values| {
                Ok(ListSettings {
                    hub_id,
                    doctype: doctype.to_string(),
                    settings_name: name.to_string(),
                    values: values.clone(),
                    updated_at: timestamp(),
                })
            });

        let payload = ListSettingsPayload {
            settings_name: DEFAULT_SETTINGS_NAME.to_string(),
            values: json!({"group_by": "state"}).as_object().cloned().expect("map"),
        };
        let settings = set_list_settings(&repo, &viewer_user(), CONTACT, payload).expect("saved");

        assert_eq!(settings.values.get("density"), Some(&json!("compact")));
    }

    /// Ensures all settings are listed by qualified name.
    #[test]
    fn all_list_settings_are_named() {
        let mut repo = MockRepository::new();
        repo.expect_list_list_settings().returning(|_, doctype| {
            Ok(vec![ListSettings {
                hub_id: hub(),
                doctype: doctype.to_string(),
                settings_name: "default".to_string(),
                values: Map::new(),
                updated_at: timestamp(),
            }])
        });

        let entries = get_all_list_settings(&repo, &viewer_user(), CONTACT).expect("entries");

        assert_eq!(entries[0].name, "Contact-default");
    }
}
