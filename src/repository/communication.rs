use chrono::Utc;
use diesel::prelude::*;

use crate::domain::communication::{Communication, NewCommunication};
use crate::domain::types::{CommunicationId, ContactId, HubId};
use crate::models::communication::{
    Communication as DbCommunication, NewCommunication as DbNewCommunication,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CommunicationReader, CommunicationWriter, DieselRepository};

impl CommunicationReader for DieselRepository {
    fn list_contact_communications(
        &self,
        contact_id: ContactId,
        hub_id: HubId,
        limit: usize,
    ) -> RepositoryResult<Vec<Communication>> {
        use crate::schema::communications;

        let mut conn = self.conn()?;
        let rows = communications::table
            .filter(communications::hub_id.eq(hub_id.get()))
            .filter(communications::contact_id.eq(contact_id.get()))
            .order((
                communications::communication_date.desc(),
                communications::id.desc(),
            ))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(DbCommunication::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| Communication::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn get_communications_by_ids(
        &self,
        ids: &[CommunicationId],
        hub_id: HubId,
    ) -> RepositoryResult<Vec<Communication>> {
        use crate::schema::communications;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let rows = communications::table
            .filter(communications::hub_id.eq(hub_id.get()))
            .filter(communications::id.eq_any(&raw_ids))
            .select(DbCommunication::as_select())
            .load(&mut conn)?;

        let mut communications = rows
            .into_iter()
            .map(|row| Communication::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;
        communications.sort_by_key(|item| {
            raw_ids
                .iter()
                .position(|id| *id == item.id.get())
                .unwrap_or(usize::MAX)
        });
        Ok(communications)
    }
}

impl CommunicationWriter for DieselRepository {
    fn create_communication(
        &self,
        communication: &NewCommunication,
    ) -> RepositoryResult<Communication> {
        use crate::schema::communications;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let new_row = DbNewCommunication::from_domain(communication, now);

        let row = diesel::insert_into(communications::table)
            .values(&new_row)
            .returning(DbCommunication::as_returning())
            .get_result(&mut conn)?;

        Communication::try_from(row).map_err(RepositoryError::from)
    }
}
