//! Generic filtered listing of any registered DocType.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::document::DocumentError;
use crate::domain::list::{
    DEFAULT_ORDER_BY, is_default_order, merge_filters, normalize_paging, parse_filters, parse_order_by, project,
    resolve_fields, sorts_to_order_by,
};
use crate::domain::meta::{COMMUNICATION, CONTACT, DocMeta, contact_meta, document_doctype};
use crate::domain::types::{CommunicationId, ContactId, HubId};
use crate::dto::list::{ContactList, DocumentList, ViewInfo};
use crate::forms::list::ListPayload;
use crate::pagination::PageInfo;
use crate::repository::{
    CommunicationReader, ContactReader, DocumentReader, ListQuery, SavedViewReader,
};
use crate::services::views::find_view;
use crate::services::{ServiceError, ServiceResult};
use crate::SERVICE_ACCESS_ROLE;

/// Columns returned by the contact list when none are requested.
pub const CONTACT_LIST_FIELDS: &[&str] = &[
    "name",
    "full_name",
    "first_name",
    "last_name",
    "email_id",
    "mobile_no",
    "contact_type",
    "contact_category",
    "city",
    "state",
    "modified",
    "creation",
];

/// Fully resolved list request.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListPlan {
    pub filters: Value,
    pub fields: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub search_text: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

pub(crate) fn to_record<T: Serialize>(value: &T) -> ServiceResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(err) => {
            log::error!("Failed to serialize record: {err}");
            Err(ServiceError::Internal(err.to_string()))
        }
    }
}

pub(crate) fn unknown_doctype(doctype: &str) -> ServiceError {
    DocumentError::UnknownDocType(doctype.to_string()).into()
}

pub(crate) fn resolve_doctype(doctype: &str) -> ServiceResult<&'static DocMeta> {
    document_doctype(doctype).ok_or_else(|| unknown_doctype(doctype))
}

/// Loads and serializes the records behind `ids`, keeping their order.
pub(crate) fn load_records<R>(
    repo: &R,
    hub_id: HubId,
    meta: &'static DocMeta,
    ids: &[i32],
) -> ServiceResult<Vec<Map<String, Value>>>
where
    R: ContactReader + CommunicationReader + ?Sized,
{
    match meta.name {
        CONTACT => {
            let ids: Vec<ContactId> = ids.iter().filter_map(|id| ContactId::new(*id).ok()).collect();
            repo.get_contacts_by_ids(&ids, hub_id)
                .map_err(|err| {
                    log::error!("Failed to load contacts: {err}");
                    err
                })?
                .iter()
                .map(to_record)
                .collect()
        }
        COMMUNICATION => {
            let ids: Vec<CommunicationId> = ids
                .iter()
                .filter_map(|id| CommunicationId::new(*id).ok())
                .collect();
            repo.get_communications_by_ids(&ids, hub_id)
                .map_err(|err| {
                    log::error!("Failed to load communications: {err}");
                    err
                })?
                .iter()
                .map(to_record)
                .collect()
        }
        other => Err(unknown_doctype(other)),
    }
}

/// Runs a list request and returns the projected records of one page.
pub(crate) fn run_list<R>(
    repo: &R,
    hub_id: HubId,
    meta: &'static DocMeta,
    plan: &ListPlan,
) -> ServiceResult<(Vec<Map<String, Value>>, PageInfo)>
where
    R: DocumentReader + ContactReader + CommunicationReader + ?Sized,
{
    let order = parse_order_by(meta, plan.order_by.as_deref().unwrap_or(DEFAULT_ORDER_BY))?;
    let fields = resolve_fields(meta, plan.fields.as_deref(), &order)?;
    let conditions = parse_filters(meta, &plan.filters)?;

    let mut query = ListQuery::new(hub_id, meta)
        .filters(conditions)
        .order_by(order)
        .paginate(plan.page, plan.page_size);
    if let Some(search) = &plan.search_text {
        query = query.search(search.as_str());
    }

    let (total, ids) = repo.list_document_ids(&query).map_err(|err| {
        log::error!("Failed to list {}: {err}", meta.name);
        err
    })?;

    let documents = load_records(repo, hub_id, meta, &ids)?
        .iter()
        .map(|record| project(record, &fields))
        .collect();

    Ok((documents, PageInfo::new(total, plan.page, plan.page_size)))
}

fn list_documents<R>(
    repo: &R,
    user: &AuthenticatedUser,
    meta: &'static DocMeta,
    payload: ListPayload,
    default_fields: Option<&[&str]>,
) -> ServiceResult<(Vec<Map<String, Value>>, PageInfo, Option<ViewInfo>)>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;

    let view = match &payload.view {
        Some(reference) => Some(
            find_view(repo, hub_id, meta.name, &user.email, reference)?
                .filter(|view| view.is_visible_to(&user.email))
                .ok_or_else(|| ServiceError::NotFound(format!("View '{reference}' not found")))?,
        ),
        None => None,
    };

    let mut filters = payload.filters;
    let mut fields = payload.fields;
    let mut order_by = payload.order_by;
    let mut page_size = payload.page_size;
    if let Some(view) = &view {
        filters = merge_filters(&Value::Object(view.filters.clone()), &filters);
        if fields.is_none() && !view.fields.is_empty() {
            fields = Some(view.fields.clone());
        }
        if order_by.as_deref().is_none_or(is_default_order) {
            if let Some(view_order) = sorts_to_order_by(&view.sorts) {
                order_by = Some(view_order);
            }
        }
        if page_size.is_none() {
            page_size = view.page_size;
        }
    }
    if fields.is_none() {
        fields = default_fields.map(|names| names.iter().map(|name| name.to_string()).collect());
    }

    let (page, page_size) = normalize_paging(payload.page, page_size);
    let plan = ListPlan {
        filters,
        fields,
        order_by,
        search_text: payload.search_text,
        page,
        page_size,
    };
    let (documents, pagination) = run_list(repo, hub_id, meta, &plan)?;

    let view_info = view.map(|view| ViewInfo {
        is_owner: view.is_owned_by(&user.email),
        view_name: view.label,
        view_id: view.id,
        is_public: view.is_public,
    });

    Ok((documents, pagination, view_info))
}

pub fn get_list<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
    payload: ListPayload,
) -> ServiceResult<DocumentList>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    let meta = resolve_doctype(doctype)?;

    let (documents, pagination, view_info) = list_documents(repo, user, meta, payload, None)?;
    Ok(DocumentList {
        documents,
        pagination,
        view_info,
    })
}

/// Contact list with the contact card columns as default projection.
pub fn get_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: ListPayload,
) -> ServiceResult<ContactList>
where
    R: DocumentReader + ContactReader + CommunicationReader + SavedViewReader + ?Sized,
{
    let (contacts, pagination, _) =
        list_documents(repo, user, contact_meta(), payload, Some(CONTACT_LIST_FIELDS))?;
    Ok(ContactList {
        contacts,
        pagination,
    })
}
