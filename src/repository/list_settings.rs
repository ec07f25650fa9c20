use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use serde_json::{Map, Value};

use crate::domain::saved_view::ListSettings;
use crate::domain::types::HubId;
use crate::models::saved_view::{
    ListSettings as DbListSettings, NewListSettings as DbNewListSettings,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ListSettingsReader, ListSettingsWriter};

impl ListSettingsReader for DieselRepository {
    fn get_list_settings(
        &self,
        hub_id: HubId,
        doctype: &str,
        settings_name: &str,
    ) -> RepositoryResult<Option<ListSettings>> {
        use crate::schema::list_settings;

        let mut conn = self.conn()?;
        let row = list_settings::table
            .filter(list_settings::hub_id.eq(hub_id.get()))
            .filter(list_settings::doctype.eq(doctype))
            .filter(list_settings::settings_name.eq(settings_name))
            .select(DbListSettings::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| ListSettings::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_list_settings(
        &self,
        hub_id: HubId,
        doctype: &str,
    ) -> RepositoryResult<Vec<ListSettings>> {
        use crate::schema::list_settings;

        let mut conn = self.conn()?;
        let rows = list_settings::table
            .filter(list_settings::hub_id.eq(hub_id.get()))
            .filter(list_settings::doctype.eq(doctype))
            .order(list_settings::settings_name.asc())
            .select(DbListSettings::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| ListSettings::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl ListSettingsWriter for DieselRepository {
    fn save_list_settings(
        &self,
        hub_id: HubId,
        doctype: &str,
        settings_name: &str,
        values: &Map<String, Value>,
    ) -> RepositoryResult<ListSettings> {
        use crate::schema::list_settings;

        let mut conn = self.conn()?;
        let new_row = DbNewListSettings {
            hub_id: hub_id.get(),
            doctype,
            settings_name,
            settings_values: Value::Object(values.clone()).to_string(),
            updated_at: Utc::now().naive_utc(),
        };

        let row = diesel::insert_into(list_settings::table)
            .values(&new_row)
            .on_conflict((
                list_settings::hub_id,
                list_settings::doctype,
                list_settings::settings_name,
            ))
            .do_update()
            .set((
                list_settings::settings_values.eq(excluded(list_settings::settings_values)),
                list_settings::updated_at.eq(excluded(list_settings::updated_at)),
            ))
            .returning(DbListSettings::as_returning())
            .get_result(&mut conn)?;

        ListSettings::try_from(row).map_err(RepositoryError::from)
    }
}
