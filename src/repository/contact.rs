use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::contact::{Contact, ContactDraft, ContactRef, DynamicLink};
use crate::domain::types::{CommunicationId, ContactId, HubId};
use crate::models::contact::{
    Contact as DbContact, ContactChildren, ContactColumns, ContactEmail as DbContactEmail,
    ContactLink as DbContactLink, ContactPhone as DbContactPhone, ContactRefRow,
    ContactRepresentative as DbContactRepresentative, NewContact as DbNewContact, new_emails,
    new_links, new_phones, new_representatives,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactDependents, ContactReader, ContactWriter, DieselRepository};

const CONTACT_DOCTYPE: &str = "Contact";

/// Loads child rows for `contacts` and assembles domain contacts.
fn assemble(
    conn: &mut SqliteConnection,
    contacts: Vec<DbContact>,
) -> RepositoryResult<Vec<Contact>> {
    use crate::schema::{contact_emails, contact_links, contact_phones, contact_representatives};

    let ids: Vec<i32> = contacts.iter().map(|c| c.id).collect();

    let mut children: HashMap<i32, ContactChildren> = HashMap::new();

    for row in contact_emails::table
        .filter(contact_emails::contact_id.eq_any(&ids))
        .order((contact_emails::contact_id, contact_emails::idx))
        .select(DbContactEmail::as_select())
        .load(conn)?
    {
        children.entry(row.contact_id).or_default().emails.push(row);
    }

    for row in contact_phones::table
        .filter(contact_phones::contact_id.eq_any(&ids))
        .order((contact_phones::contact_id, contact_phones::idx))
        .select(DbContactPhone::as_select())
        .load(conn)?
    {
        children.entry(row.contact_id).or_default().phones.push(row);
    }

    for row in contact_representatives::table
        .filter(contact_representatives::contact_id.eq_any(&ids))
        .order((
            contact_representatives::contact_id,
            contact_representatives::idx,
        ))
        .select(DbContactRepresentative::as_select())
        .load(conn)?
    {
        children
            .entry(row.contact_id)
            .or_default()
            .representatives
            .push(row);
    }

    for row in contact_links::table
        .filter(contact_links::contact_id.eq_any(&ids))
        .order((contact_links::contact_id, contact_links::idx))
        .select(DbContactLink::as_select())
        .load(conn)?
    {
        children.entry(row.contact_id).or_default().links.push(row);
    }

    contacts
        .into_iter()
        .map(|contact| {
            let rows = children.remove(&contact.id).unwrap_or_default();
            contact.into_domain(rows).map_err(RepositoryError::from)
        })
        .collect()
}

fn load_contact(
    conn: &mut SqliteConnection,
    id: ContactId,
    hub_id: HubId,
) -> RepositoryResult<Option<Contact>> {
    use crate::schema::contacts;

    let contact = contacts::table
        .filter(contacts::id.eq(id.get()))
        .filter(contacts::hub_id.eq(hub_id.get()))
        .select(DbContact::as_select())
        .first(conn)
        .optional()?;

    match contact {
        Some(contact) => Ok(assemble(conn, vec![contact])?.pop()),
        None => Ok(None),
    }
}

fn to_refs(rows: Vec<ContactRefRow>) -> RepositoryResult<Vec<ContactRef>> {
    rows.into_iter()
        .map(|row| ContactRef::try_from(row).map_err(RepositoryError::from))
        .collect()
}

/// Replaces every child row of `contact_id` with the rows of `draft`.
fn replace_children(
    conn: &mut SqliteConnection,
    contact_id: i32,
    draft: &ContactDraft,
) -> QueryResult<()> {
    use crate::schema::{contact_emails, contact_links, contact_phones, contact_representatives};

    diesel::delete(contact_emails::table.filter(contact_emails::contact_id.eq(contact_id)))
        .execute(conn)?;
    diesel::delete(contact_phones::table.filter(contact_phones::contact_id.eq(contact_id)))
        .execute(conn)?;
    diesel::delete(
        contact_representatives::table
            .filter(contact_representatives::contact_id.eq(contact_id)),
    )
    .execute(conn)?;
    diesel::delete(contact_links::table.filter(contact_links::contact_id.eq(contact_id)))
        .execute(conn)?;

    insert_children(conn, contact_id, draft)
}

fn insert_children(
    conn: &mut SqliteConnection,
    contact_id: i32,
    draft: &ContactDraft,
) -> QueryResult<()> {
    use crate::schema::{contact_emails, contact_links, contact_phones, contact_representatives};

    if !draft.email_ids.is_empty() {
        diesel::insert_into(contact_emails::table)
            .values(new_emails(contact_id, &draft.email_ids))
            .execute(conn)?;
    }
    if !draft.phone_nos.is_empty() {
        diesel::insert_into(contact_phones::table)
            .values(new_phones(contact_id, &draft.phone_nos))
            .execute(conn)?;
    }
    if !draft.representatives.is_empty() {
        diesel::insert_into(contact_representatives::table)
            .values(new_representatives(contact_id, &draft.representatives))
            .execute(conn)?;
    }
    if !draft.links.is_empty() {
        diesel::insert_into(contact_links::table)
            .values(new_links(contact_id, &draft.links))
            .execute(conn)?;
    }
    Ok(())
}

impl ContactReader for DieselRepository {
    fn get_contact_by_id(&self, id: ContactId, hub_id: HubId) -> RepositoryResult<Option<Contact>> {
        let mut conn = self.conn()?;
        load_contact(&mut conn, id, hub_id)
    }

    fn get_contacts_by_ids(
        &self,
        ids: &[ContactId],
        hub_id: HubId,
    ) -> RepositoryResult<Vec<Contact>> {
        use crate::schema::contacts;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let rows = contacts::table
            .filter(contacts::id.eq_any(&raw_ids))
            .filter(contacts::hub_id.eq(hub_id.get()))
            .select(DbContact::as_select())
            .load(&mut conn)?;

        let mut by_id: HashMap<i32, Contact> = assemble(&mut conn, rows)?
            .into_iter()
            .map(|contact| (contact.id.get(), contact))
            .collect();

        Ok(raw_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    fn get_contact_ref(&self, id: ContactId, hub_id: HubId) -> RepositoryResult<Option<ContactRef>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let row = contacts::table
            .filter(contacts::id.eq(id.get()))
            .filter(contacts::hub_id.eq(hub_id.get()))
            .select(ContactRefRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(|row| ContactRef::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_contact_by_email(
        &self,
        email: &str,
        hub_id: HubId,
        exclude: Option<ContactId>,
    ) -> RepositoryResult<Option<ContactRef>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let mut query = contacts::table
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contacts::email_id.eq(email))
            .into_boxed();
        if let Some(exclude) = exclude {
            query = query.filter(contacts::id.ne(exclude.get()));
        }

        let row = query
            .select(ContactRefRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(|row| ContactRef::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_contact_by_employee_code(
        &self,
        employee_code: &str,
        hub_id: HubId,
        exclude: Option<ContactId>,
    ) -> RepositoryResult<Option<ContactRef>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let mut query = contacts::table
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contacts::employee_code.eq(employee_code))
            .into_boxed();
        if let Some(exclude) = exclude {
            query = query.filter(contacts::id.ne(exclude.get()));
        }

        let row = query
            .select(ContactRefRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(|row| ContactRef::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_direct_reports(
        &self,
        manager_id: ContactId,
        hub_id: HubId,
    ) -> RepositoryResult<Vec<ContactRef>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let rows = contacts::table
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contacts::manager_id.eq(manager_id.get()))
            .order(contacts::full_name.asc())
            .select(ContactRefRow::as_select())
            .load(&mut conn)?;

        to_refs(rows)
    }

    fn list_contact_dependents(
        &self,
        id: ContactId,
        hub_id: HubId,
    ) -> RepositoryResult<ContactDependents> {
        use crate::schema::{communications, contact_links, contact_representatives, contacts};

        let mut conn = self.conn()?;

        // Other contacts in the hub whose dynamic links point back at this one.
        let links = contact_links::table
            .inner_join(contacts::table)
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contact_links::link_doctype.eq(CONTACT_DOCTYPE))
            .filter(contact_links::link_name.eq(id.get().to_string()))
            .filter(contact_links::contact_id.ne(id.get()))
            .select((contacts::id, contacts::full_name))
            .distinct()
            .order(contacts::id)
            .load::<(i32, String)>(&mut conn)?
            .into_iter()
            .map(|(parent, full_name)| DynamicLink {
                link_doctype: CONTACT_DOCTYPE.to_string(),
                link_name: parent.to_string(),
                link_title: Some(full_name),
            })
            .collect();

        let managed = contacts::table
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contacts::manager_id.eq(id.get()))
            .order(contacts::id)
            .select(ContactRefRow::as_select())
            .load(&mut conn)?;

        let represented_ids = contact_representatives::table
            .filter(contact_representatives::representative_id.eq(id.get()))
            .select(contact_representatives::contact_id);
        let represented = contacts::table
            .filter(contacts::hub_id.eq(hub_id.get()))
            .filter(contacts::id.eq_any(represented_ids))
            .order(contacts::id)
            .select(ContactRefRow::as_select())
            .load(&mut conn)?;

        let communications = communications::table
            .filter(communications::hub_id.eq(hub_id.get()))
            .filter(communications::contact_id.eq(id.get()))
            .order(communications::id)
            .select(communications::id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .map(|id| CommunicationId::new(id).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(ContactDependents {
            links,
            managed: to_refs(managed)?,
            represented: to_refs(represented)?,
            communications,
        })
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(
        &self,
        hub_id: HubId,
        draft: &ContactDraft,
        user_email: &str,
    ) -> RepositoryResult<Contact> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let contact_id = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let new_contact = DbNewContact {
                hub_id: hub_id.get(),
                owner: user_email,
                created_at: now,
                columns: ContactColumns::from_draft(draft, user_email, now),
            };

            let contact_id = diesel::insert_into(contacts::table)
                .values(&new_contact)
                .returning(contacts::id)
                .get_result::<i32>(conn)?;

            insert_children(conn, contact_id, draft)?;
            Ok(contact_id)
        })?;

        let id = ContactId::new(contact_id).map_err(RepositoryError::from)?;
        load_contact(&mut conn, id, hub_id)?.ok_or(RepositoryError::NotFound)
    }

    fn update_contact(
        &self,
        id: ContactId,
        hub_id: HubId,
        draft: &ContactDraft,
        user_email: &str,
    ) -> RepositoryResult<Contact> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let changes = ContactColumns::from_draft(draft, user_email, now);
            let updated = diesel::update(
                contacts::table
                    .filter(contacts::id.eq(id.get()))
                    .filter(contacts::hub_id.eq(hub_id.get())),
            )
            .set(&changes)
            .execute(conn)?;

            if updated == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            replace_children(conn, id.get(), draft)
        })?;

        load_contact(&mut conn, id, hub_id)?.ok_or(RepositoryError::NotFound)
    }

    fn delete_contact(&self, id: ContactId, hub_id: HubId, force: bool) -> RepositoryResult<()> {
        use crate::schema::{
            communications, contact_emails, contact_links, contact_phones,
            contact_representatives, contacts,
        };

        let mut conn = self.conn()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let exists = contacts::table
                .filter(contacts::id.eq(id.get()))
                .filter(contacts::hub_id.eq(hub_id.get()))
                .select(contacts::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(diesel::result::Error::NotFound);
            }

            if force {
                diesel::delete(
                    communications::table.filter(communications::contact_id.eq(id.get())),
                )
                .execute(conn)?;
                diesel::update(contacts::table.filter(contacts::manager_id.eq(id.get())))
                    .set(contacts::manager_id.eq(None::<i32>))
                    .execute(conn)?;
                diesel::delete(
                    contact_representatives::table
                        .filter(contact_representatives::representative_id.eq(id.get())),
                )
                .execute(conn)?;
                let hub_contacts = contacts::table
                    .filter(contacts::hub_id.eq(hub_id.get()))
                    .select(contacts::id);
                diesel::delete(
                    contact_links::table
                        .filter(contact_links::link_doctype.eq(CONTACT_DOCTYPE))
                        .filter(contact_links::link_name.eq(id.get().to_string()))
                        .filter(contact_links::contact_id.eq_any(hub_contacts)),
                )
                .execute(conn)?;
            }

            diesel::delete(contact_emails::table.filter(contact_emails::contact_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(contact_phones::table.filter(contact_phones::contact_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(
                contact_representatives::table
                    .filter(contact_representatives::contact_id.eq(id.get())),
            )
            .execute(conn)?;
            diesel::delete(contact_links::table.filter(contact_links::contact_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(contacts::table.filter(contacts::id.eq(id.get()))).execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }
}
