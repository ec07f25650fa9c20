//! Mock repository for exercising services without a database.

use mockall::mock;
use serde_json::{Map, Value};

use crate::domain::communication::{Communication, NewCommunication};
use crate::domain::contact::{Contact, ContactDraft, ContactRef};
use crate::domain::saved_view::{ListSettings, NewSavedView, SavedView};
use crate::domain::types::{CommunicationId, ContactId, HubId, SavedViewId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CommunicationReader, CommunicationWriter, ContactDependents, ContactReader, ContactWriter,
    DocumentReader, ListQuery, ListSettingsReader, ListSettingsWriter, SavedViewReader,
    SavedViewWriter,
};

mock! {
    pub Repository {}

    impl ContactReader for Repository {
        fn get_contact_by_id(&self, id: ContactId, hub_id: HubId) -> RepositoryResult<Option<Contact>>;
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

    impl ContactWriter for Repository {
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
        fn delete_contact(&self, id: ContactId, hub_id: HubId, force: bool) -> RepositoryResult<()>;
    }

    impl CommunicationReader for Repository {
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

    impl CommunicationWriter for Repository {
        fn create_communication(
            &self,
            communication: &NewCommunication,
        ) -> RepositoryResult<Communication>;
    }

    impl DocumentReader for Repository {
        fn list_document_ids(&self, query: &ListQuery) -> RepositoryResult<(usize, Vec<i32>)>;
    }

    impl SavedViewReader for Repository {
        fn get_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<Option<SavedView>>;
        fn find_saved_view_by_label(
            &self,
            hub_id: HubId,
            doctype: &str,
            owner: &str,
            label: &str,
        ) -> RepositoryResult<Option<SavedView>>;
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

    impl SavedViewWriter for Repository {
        fn create_saved_view(&self, view: &NewSavedView) -> RepositoryResult<SavedView>;
        fn update_saved_view(&self, id: SavedViewId, view: &NewSavedView) -> RepositoryResult<SavedView>;
        fn delete_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl ListSettingsReader for Repository {
        fn get_list_settings(
            &self,
            hub_id: HubId,
            doctype: &str,
            settings_name: &str,
        ) -> RepositoryResult<Option<ListSettings>>;
        fn list_list_settings(&self, hub_id: HubId, doctype: &str)
            -> RepositoryResult<Vec<ListSettings>>;
    }

    impl ListSettingsWriter for Repository {
        fn save_list_settings(
            &self,
            hub_id: HubId,
            doctype: &str,
            settings_name: &str,
            values: &Map<String, Value>,
        ) -> RepositoryResult<ListSettings>;
    }
}
