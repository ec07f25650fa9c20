//! Diesel models for contacts and their child tables.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, ContactDraft, ContactEmailRow, ContactPhoneRow, ContactRef,
    ContactType, DynamicLink, RepresentativeRow,
};
use crate::domain::types::{ContactId, HubId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Contact {
    pub id: i32,
    pub hub_id: i32,
    pub full_name: String,
    pub salutation: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub contact_type: Option<String>,
    pub contact_category: Option<String>,
    pub status: String,
    pub email_id: Option<String>,
    pub mobile_no: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
    pub notes: Option<String>,
    pub company_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub designation: Option<String>,
    pub employee_code: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub employee_status: Option<String>,
    pub manager_id: Option<i32>,
    pub department: Option<String>,
    pub work_email: Option<String>,
    pub instagram: Option<String>,
    pub website: Option<String>,
    pub gstin: Option<String>,
    pub vendor_type: Option<String>,
    pub owner: String,
    pub modified_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Contact, foreign_key = contact_id))]
#[diesel(table_name = crate::schema::contact_emails)]
pub struct ContactEmail {
    pub id: i32,
    pub contact_id: i32,
    pub email_id: String,
    pub is_primary: bool,
    pub idx: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Contact, foreign_key = contact_id))]
#[diesel(table_name = crate::schema::contact_phones)]
pub struct ContactPhone {
    pub id: i32,
    pub contact_id: i32,
    pub phone: String,
    pub is_primary_phone: bool,
    pub is_primary_mobile_no: bool,
    pub idx: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contact_representatives)]
pub struct ContactRepresentative {
    pub id: i32,
    pub contact_id: i32,
    pub representative_id: i32,
    pub is_primary_representative: bool,
    pub idx: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Contact, foreign_key = contact_id))]
#[diesel(table_name = crate::schema::contact_links)]
pub struct ContactLink {
    pub id: i32,
    pub contact_id: i32,
    pub link_doctype: String,
    pub link_name: String,
    pub link_title: Option<String>,
    pub idx: i32,
}

/// Child rows of one contact, already ordered by `idx`.
#[derive(Debug, Default)]
pub struct ContactChildren {
    pub emails: Vec<ContactEmail>,
    pub phones: Vec<ContactPhone>,
    pub representatives: Vec<ContactRepresentative>,
    pub links: Vec<ContactLink>,
}

impl Contact {
    pub fn into_domain(
        self,
        children: ContactChildren,
    ) -> Result<DomainContact, TypeConstraintError> {
        let contact_type = self
            .contact_type
            .as_deref()
            .map(str::parse::<ContactType>)
            .transpose()?;
        let manager_id = self.manager_id.map(ContactId::new).transpose()?;
        let representatives = children
            .representatives
            .into_iter()
            .map(|row| {
                Ok(RepresentativeRow {
                    contact: ContactId::new(row.representative_id)?,
                    is_primary_representative: row.is_primary_representative,
                })
            })
            .collect::<Result<Vec<_>, TypeConstraintError>>()?;

        Ok(DomainContact {
            id: ContactId::new(self.id)?,
            hub_id: HubId::new(self.hub_id)?,
            full_name: self.full_name,
            salutation: self.salutation,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            gender: self.gender,
            contact_type,
            contact_category: self.contact_category,
            status: self.status,
            email_id: self.email_id,
            mobile_no: self.mobile_no,
            phone: self.phone,
            dob: self.dob,
            notes: self.notes,
            company_name: self.company_name,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            country: self.country,
            pincode: self.pincode,
            designation: self.designation,
            employee_code: self.employee_code,
            date_of_joining: self.date_of_joining,
            employee_status: self.employee_status,
            manager_id,
            department: self.department,
            work_email: self.work_email,
            instagram: self.instagram,
            website: self.website,
            gstin: self.gstin,
            vendor_type: self.vendor_type,
            owner: self.owner,
            modified_by: self.modified_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            email_ids: children
                .emails
                .into_iter()
                .map(|row| ContactEmailRow {
                    email_id: row.email_id,
                    is_primary: row.is_primary,
                })
                .collect(),
            phone_nos: children
                .phones
                .into_iter()
                .map(|row| ContactPhoneRow {
                    phone: row.phone,
                    is_primary_phone: row.is_primary_phone,
                    is_primary_mobile_no: row.is_primary_mobile_no,
                })
                .collect(),
            representatives,
            links: children
                .links
                .into_iter()
                .map(|row| DynamicLink {
                    link_doctype: row.link_doctype,
                    link_name: row.link_name,
                    link_title: row.link_title,
                })
                .collect(),
        })
    }
}

/// Columns needed for hierarchy walks and uniqueness checks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct ContactRefRow {
    pub id: i32,
    pub full_name: String,
    pub contact_type: Option<String>,
    pub designation: Option<String>,
    pub employee_status: Option<String>,
    pub manager_id: Option<i32>,
}

impl TryFrom<ContactRefRow> for ContactRef {
    type Error = TypeConstraintError;

    fn try_from(row: ContactRefRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactId::new(row.id)?,
            full_name: row.full_name,
            contact_type: row
                .contact_type
                .as_deref()
                .map(str::parse::<ContactType>)
                .transpose()?,
            designation: row.designation,
            employee_status: row.employee_status,
            manager_id: row.manager_id.map(ContactId::new).transpose()?,
        })
    }
}

/// Column values shared by inserts and updates.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(treat_none_as_null = true)]
pub struct ContactColumns<'a> {
    pub full_name: &'a str,
    pub salutation: Option<&'a str>,
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub contact_type: Option<&'static str>,
    pub contact_category: Option<&'a str>,
    pub status: &'a str,
    pub email_id: Option<&'a str>,
    pub mobile_no: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub dob: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub address_line1: Option<&'a str>,
    pub address_line2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub designation: Option<&'a str>,
    pub employee_code: Option<&'a str>,
    pub date_of_joining: Option<NaiveDate>,
    pub employee_status: Option<&'a str>,
    pub manager_id: Option<i32>,
    pub department: Option<&'a str>,
    pub work_email: Option<&'a str>,
    pub instagram: Option<&'a str>,
    pub website: Option<&'a str>,
    pub gstin: Option<&'a str>,
    pub vendor_type: Option<&'a str>,
    pub modified_by: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> ContactColumns<'a> {
    pub fn from_draft(draft: &'a ContactDraft, modified_by: &'a str, now: NaiveDateTime) -> Self {
        Self {
            full_name: draft.full_name.as_str(),
            salutation: draft.salutation.as_deref(),
            first_name: draft.first_name.as_str(),
            middle_name: draft.middle_name.as_deref(),
            last_name: draft.last_name.as_deref(),
            gender: draft.gender.as_deref(),
            contact_type: draft.contact_type.map(ContactType::as_str),
            contact_category: draft.contact_category.as_deref(),
            status: draft.status.as_str(),
            email_id: draft.email_id.as_deref(),
            mobile_no: draft.mobile_no.as_deref(),
            phone: draft.phone.as_deref(),
            dob: draft.dob,
            notes: draft.notes.as_deref(),
            company_name: draft.company_name.as_deref(),
            address_line1: draft.address_line1.as_deref(),
            address_line2: draft.address_line2.as_deref(),
            city: draft.city.as_deref(),
            state: draft.state.as_deref(),
            country: draft.country.as_deref(),
            pincode: draft.pincode.as_deref(),
            designation: draft.designation.as_deref(),
            employee_code: draft.employee_code.as_deref(),
            date_of_joining: draft.date_of_joining,
            employee_status: draft.employee_status.as_deref(),
            manager_id: draft.manager_id.map(ContactId::get),
            department: draft.department.as_deref(),
            work_email: draft.work_email.as_deref(),
            instagram: draft.instagram.as_deref(),
            website: draft.website.as_deref(),
            gstin: draft.gstin.as_deref(),
            vendor_type: draft.vendor_type.as_deref(),
            modified_by,
            updated_at: now,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
pub struct NewContact<'a> {
    pub hub_id: i32,
    pub owner: &'a str,
    pub created_at: NaiveDateTime,
    #[diesel(embed)]
    pub columns: ContactColumns<'a>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contact_emails)]
pub struct NewContactEmail<'a> {
    pub contact_id: i32,
    pub email_id: &'a str,
    pub is_primary: bool,
    pub idx: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contact_phones)]
pub struct NewContactPhone<'a> {
    pub contact_id: i32,
    pub phone: &'a str,
    pub is_primary_phone: bool,
    pub is_primary_mobile_no: bool,
    pub idx: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contact_representatives)]
pub struct NewContactRepresentative {
    pub contact_id: i32,
    pub representative_id: i32,
    pub is_primary_representative: bool,
    pub idx: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contact_links)]
pub struct NewContactLink<'a> {
    pub contact_id: i32,
    pub link_doctype: &'a str,
    pub link_name: &'a str,
    pub link_title: Option<&'a str>,
    pub idx: i32,
}

fn idx(position: usize) -> i32 {
    i32::try_from(position + 1).unwrap_or(i32::MAX)
}

pub fn new_emails(contact_id: i32, rows: &[ContactEmailRow]) -> Vec<NewContactEmail<'_>> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| NewContactEmail {
            contact_id,
            email_id: row.email_id.as_str(),
            is_primary: row.is_primary,
            idx: idx(position),
        })
        .collect()
}

pub fn new_phones(contact_id: i32, rows: &[ContactPhoneRow]) -> Vec<NewContactPhone<'_>> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| NewContactPhone {
            contact_id,
            phone: row.phone.as_str(),
            is_primary_phone: row.is_primary_phone,
            is_primary_mobile_no: row.is_primary_mobile_no,
            idx: idx(position),
        })
        .collect()
}

pub fn new_representatives(
    contact_id: i32,
    rows: &[RepresentativeRow],
) -> Vec<NewContactRepresentative> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| NewContactRepresentative {
            contact_id,
            representative_id: row.contact.get(),
            is_primary_representative: row.is_primary_representative,
            idx: idx(position),
        })
        .collect()
}

pub fn new_links(contact_id: i32, rows: &[DynamicLink]) -> Vec<NewContactLink<'_>> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| NewContactLink {
            contact_id,
            link_doctype: row.link_doctype.as_str(),
            link_name: row.link_name.as_str(),
            link_title: row.link_title.as_deref(),
            idx: idx(position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(contact_type: Option<&str>) -> Contact {
        let timestamp = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("timestamp");
        Contact {
            id: 5,
            hub_id: 1,
            full_name: "Asha Rao".into(),
            salutation: None,
            first_name: "Asha".into(),
            middle_name: None,
            last_name: Some("Rao".into()),
            gender: None,
            contact_type: contact_type.map(str::to_string),
            contact_category: None,
            status: "Passive".into(),
            email_id: None,
            mobile_no: None,
            phone: None,
            dob: None,
            notes: None,
            company_name: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            country: None,
            pincode: None,
            designation: None,
            employee_code: None,
            date_of_joining: None,
            employee_status: None,
            manager_id: Some(2),
            department: None,
            work_email: None,
            instagram: None,
            website: None,
            gstin: None,
            vendor_type: None,
            owner: "admin@example.com".into(),
            modified_by: "admin@example.com".into(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn converts_row_with_children() {
        let children = ContactChildren {
            emails: vec![ContactEmail {
                id: 1,
                contact_id: 5,
                email_id: "asha@example.com".into(),
                is_primary: true,
                idx: 1,
            }],
            ..Default::default()
        };

        let contact = row(Some("Vendor")).into_domain(children).expect("valid row");

        assert_eq!(contact.id.get(), 5);
        assert_eq!(contact.contact_type, Some(ContactType::Vendor));
        assert_eq!(contact.manager_id.map(ContactId::get), Some(2));
        assert_eq!(contact.email_ids.len(), 1);
    }

    #[test]
    fn rejects_unknown_contact_type() {
        assert!(row(Some("Alien")).into_domain(ContactChildren::default()).is_err());
    }
}
