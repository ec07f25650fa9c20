use serde_json::{Map, Value};

use crate::db::{DbConnection, DbPool};
use crate::domain::communication::{Communication, NewCommunication};
use crate::domain::contact::{Contact, ContactDraft, ContactRef, DynamicLink};
use crate::domain::list::{FilterCondition, OrderClause};
use crate::domain::meta::DocMeta;
use crate::domain::saved_view::{ListSettings, NewSavedView, SavedView};
use crate::domain::types::{CommunicationId, ContactId, HubId, SavedViewId};
use crate::repository::errors::RepositoryResult;

pub mod communication;
pub mod contact;
pub mod document;
pub mod errors;
pub mod list_settings;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod query;
pub mod saved_view;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows skipped before this page; saturates instead of wrapping.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }
}

/// Filtered, searched and ordered listing of any registered DocType.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub hub_id: HubId,
    pub meta: &'static DocMeta,
    pub conditions: Vec<FilterCondition>,
    pub search: Option<String>,
    pub order: Vec<OrderClause>,
    pub pagination: Option<Pagination>,
}

impl ListQuery {
    pub fn new(hub_id: HubId, meta: &'static DocMeta) -> Self {
        Self {
            hub_id,
            meta,
            conditions: Vec::new(),
            search: None,
            order: Vec::new(),
            pagination: None,
        }
    }

    pub fn filters(mut self, conditions: Vec<FilterCondition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    pub fn order_by(mut self, order: Vec<OrderClause>) -> Self {
        self.order = order;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Records that reference a contact and block its deletion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDependents {
    pub links: Vec<DynamicLink>,
    pub managed: Vec<ContactRef>,
    pub represented: Vec<ContactRef>,
    pub communications: Vec<CommunicationId>,
}

impl ContactDependents {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.managed.is_empty()
            && self.represented.is_empty()
            && self.communications.is_empty()
    }
}

pub trait ContactReader {
    fn get_contact_by_id(&self, id: ContactId, hub_id: HubId) -> RepositoryResult<Option<Contact>>;
    /// Loads contacts preserving the order of `ids`; unknown ids are skipped.
    fn get_contacts_by_ids(&self, ids: &[ContactId], hub_id: HubId)
    -> RepositoryResult<Vec<Contact>>;
    fn get_contact_ref(&self, id: ContactId, hub_id: HubId) -> RepositoryResult<Option<ContactRef>>;
    fn find_contact_by_email(
        &self,
        email: &str,
        hub_id: HubId,
        exclude: Option<ContactId>,
    ) -> RepositoryResult<Option<ContactRef>>;
    fn find_contact_by_employee_code(
        &self,
        employee_code: &str,
        hub_id: HubId,
        exclude: Option<ContactId>,
    ) -> RepositoryResult<Option<ContactRef>>;
    fn list_direct_reports(
        &self,
        manager_id: ContactId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<ContactRef>>;
    fn list_contact_dependents(
        &self,
        id: ContactId,
        hub_id: HubId,
    ) -> RepositoryResult<ContactDependents>;
}

pub trait ContactWriter {
    fn create_contact(
        &self,
        hub_id: HubId,
        draft: &ContactDraft,
        user_email: &str,
    ) -> RepositoryResult<Contact>;
    fn update_contact(
        &self,
        id: ContactId,
        hub_id: HubId,
        draft: &ContactDraft,
        user_email: &str,
    ) -> RepositoryResult<Contact>;
    /// Deletes the contact and its child rows. With `force`, communications
    /// and references from other contacts are removed as well.
    fn delete_contact(&self, id: ContactId, hub_id: HubId, force: bool) -> RepositoryResult<()>;
}

pub trait CommunicationReader {
    /// Newest first.
    fn list_contact_communications(
        &self,
        contact_id: ContactId,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Communication>>;
    fn get_communications_by_ids(
        &self,
        ids: &[CommunicationId],
        hub_id: HubId,
    ) -> RepositoryResult<Vec<Communication>>;
}

pub trait CommunicationWriter {
    fn create_communication(
        &self,
        communication: &NewCommunication,
    ) -> RepositoryResult<Communication>;
}

pub trait DocumentReader {
    /// Total matching rows and the ids of the requested page.
    fn list_document_ids(&self, query: &ListQuery) -> RepositoryResult<(usize, Vec<i32>)>;
}

pub trait SavedViewReader {
    fn get_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<Option<SavedView>>;
    fn find_saved_view_by_label(
        &self,
        hub_id: HubId,
        doctype: &str,
        owner: &str,
        label: &str,
    ) -> RepositoryResult<Option<SavedView>>;
    /// Own and public views, defaults first, then most recently modified.
    fn list_saved_views(
        &self,
        hub_id: HubId,
        doctype: &str,
        user_email: &str,
    ) -> RepositoryResult<Vec<SavedView>>;
    fn get_default_view(
        &self,
        hub_id: HubId,
        doctype: &str,
        owner: &str,
    ) -> RepositoryResult<Option<SavedView>>;
}

pub trait SavedViewWriter {
    fn create_saved_view(&self, view: &NewSavedView) -> RepositoryResult<SavedView>;
    fn update_saved_view(&self, id: SavedViewId, view: &NewSavedView) -> RepositoryResult<SavedView>;
    fn delete_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait ListSettingsReader {
    fn get_list_settings(
        &self,
        hub_id: HubId,
        doctype: &str,
        settings_name: &str,
    ) -> RepositoryResult<Option<ListSettings>>;
    fn list_list_settings(&self, hub_id: HubId, doctype: &str)
    -> RepositoryResult<Vec<ListSettings>>;
}

pub trait ListSettingsWriter {
    /// Inserts or replaces the stored values.
    fn save_list_settings(
        &self,
        hub_id: HubId,
        doctype: &str,
        settings_name: &str,
        values: &Map<String, Value>,
    ) -> RepositoryResult<ListSettings>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}
