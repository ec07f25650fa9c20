use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::saved_view::{NewSavedView, SavedView};
use crate::domain::types::{HubId, SavedViewId};
use crate::models::saved_view::{
    NewSavedView as DbNewSavedView, SavedView as DbSavedView, SavedViewColumns,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SavedViewReader, SavedViewWriter};

/// Only one default view per owner and doctype.
fn clear_other_defaults(
    conn: &mut SqliteConnection,
    view: &NewSavedView,
    keep: Option<i32>,
) -> QueryResult<usize> {
    use crate::schema::saved_views;

    let targets = saved_views::table
        .filter(saved_views::hub_id.eq(view.hub_id.get()))
        .filter(saved_views::doctype.eq(&view.doctype))
        .filter(saved_views::owner.eq(&view.owner))
        .filter(saved_views::id.ne(keep.unwrap_or(0)));

    diesel::update(targets)
        .set(saved_views::is_default.eq(false))
        .execute(conn)
}

impl SavedViewReader for DieselRepository {
    fn get_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<Option<SavedView>> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let row = saved_views::table
            .filter(saved_views::id.eq(id.get()))
            .filter(saved_views::hub_id.eq(hub_id.get()))
            .select(DbSavedView::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| SavedView::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_saved_view_by_label(
        &self,
        hub_id: HubId,
        doctype: &str,
        owner: &str,
        label: &str,
    ) -> RepositoryResult<Option<SavedView>> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let row = saved_views::table
            .filter(saved_views::hub_id.eq(hub_id.get()))
            .filter(saved_views::doctype.eq(doctype))
            .filter(saved_views::owner.eq(owner))
            .filter(saved_views::label.eq(label))
            .select(DbSavedView::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| SavedView::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_saved_views(
        &self,
        hub_id: HubId,
        doctype: &str,
        user_email: &str,
    ) -> RepositoryResult<Vec<SavedView>> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let rows = saved_views::table
            .filter(saved_views::hub_id.eq(hub_id.get()))
            .filter(saved_views::doctype.eq(doctype))
            .filter(
                saved_views::owner
                    .eq(user_email)
                    .or(saved_views::is_public.eq(true)),
            )
            .order((
                saved_views::is_default.desc(),
                saved_views::updated_at.desc(),
                saved_views::id.desc(),
            ))
            .select(DbSavedView::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| SavedView::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn get_default_view(
        &self,
        hub_id: HubId,
        doctype: &str,
        owner: &str,
    ) -> RepositoryResult<Option<SavedView>> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let row = saved_views::table
            .filter(saved_views::hub_id.eq(hub_id.get()))
            .filter(saved_views::doctype.eq(doctype))
            .filter(saved_views::owner.eq(owner))
            .filter(saved_views::is_default.eq(true))
            .order(saved_views::updated_at.desc())
            .select(DbSavedView::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| SavedView::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl SavedViewWriter for DieselRepository {
    fn create_saved_view(&self, view: &NewSavedView) -> RepositoryResult<SavedView> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            if view.is_default {
                clear_other_defaults(conn, view, None)?;
            }
            diesel::insert_into(saved_views::table)
                .values(&DbNewSavedView::from_domain(view, now))
                .returning(DbSavedView::as_returning())
                .get_result(conn)
        })?;

        SavedView::try_from(row).map_err(RepositoryError::from)
    }

    fn update_saved_view(&self, id: SavedViewId, view: &NewSavedView) -> RepositoryResult<SavedView> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            if view.is_default {
                clear_other_defaults(conn, view, Some(id.get()))?;
            }
            diesel::update(
                saved_views::table
                    .filter(saved_views::id.eq(id.get()))
                    .filter(saved_views::hub_id.eq(view.hub_id.get())),
            )
            .set(&SavedViewColumns::from_domain(view, now))
            .returning(DbSavedView::as_returning())
            .get_result(conn)
        })?;

        SavedView::try_from(row).map_err(RepositoryError::from)
    }

    fn delete_saved_view(&self, id: SavedViewId, hub_id: HubId) -> RepositoryResult<()> {
        use crate::schema::saved_views;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            saved_views::table
                .filter(saved_views::id.eq(id.get()))
                .filter(saved_views::hub_id.eq(hub_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
