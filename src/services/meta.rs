//! Field and column metadata for list builders and entry forms.

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::meta::{DocField, DocMeta, STANDARD_FIELDS};
use crate::dto::meta::{ColumnInfo, DefaultListData, FieldInfo, ListFields};
use crate::services::ServiceResult;
use crate::services::list::resolve_doctype;
use crate::SERVICE_ACCESS_ROLE;

const DEFAULT_COLUMN_WIDTH: &str = "10rem";

/// Declared fields a list can show.
fn visible_fields(meta: &DocMeta) -> impl Iterator<Item = &DocField> {
    meta.listable_fields().filter(|field| !field.hidden)
}

fn column(field: &DocField, width: &'static str) -> ColumnInfo {
    ColumnInfo {
        label: field.label,
        fieldtype: field.fieldtype.as_str(),
        key: field.fieldname,
        width,
    }
}

/// Standard fields followed by every visible declared field.
pub fn list_fields(user: &AuthenticatedUser, doctype: &str) -> ServiceResult<ListFields> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(doctype)?;

    let fields: Vec<FieldInfo> = STANDARD_FIELDS
        .iter()
        .chain(visible_fields(meta))
        .map(FieldInfo::from)
        .collect();

    Ok(ListFields {
        doctype: meta.name,
        total_fields: fields.len(),
        fields,
        title_field: meta.title_field,
    })
}

/// Fields offered by quick entry forms: flagged, required or list-view
/// fields the user can edit.
pub fn quick_entry_fields(
    user: &AuthenticatedUser,
    doctype: &str,
) -> ServiceResult<Vec<FieldInfo>> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(doctype)?;

    Ok(visible_fields(meta)
        .filter(|field| !field.read_only)
        .filter(|field| field.in_quick_entry || field.reqd || field.in_list_view)
        .map(FieldInfo::from)
        .collect())
}

pub fn default_list_columns(
    user: &AuthenticatedUser,
    doctype: &str,
) -> ServiceResult<DefaultListData> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(doctype)?;

    let columns = meta
        .default_columns
        .iter()
        .filter_map(|default| {
            meta.resolve(default.key)
                .map(|field| column(field, default.width))
        })
        .collect();

    Ok(DefaultListData {
        columns,
        rows: meta.default_rows.to_vec(),
    })
}

/// Every column the column picker may offer.
pub fn available_columns(
    user: &AuthenticatedUser,
    doctype: &str,
) -> ServiceResult<Vec<ColumnInfo>> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(doctype)?;

    Ok(visible_fields(meta)
        .chain(STANDARD_FIELDS.iter().filter(|field| field.fieldname != "name"))
        .map(|field| column(field, DEFAULT_COLUMN_WIDTH))
        .collect())
}
