//! Contact aggregate and the validation rules that need no storage access.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::document::{CoercedDocument, DocumentError};
use crate::domain::types::{
    ContactEmail, ContactId, Gstin, HubId, MobileNumber, PhoneNumber, TypeConstraintError,
    is_mobile_number,
};

pub const ORGANIZATION_CATEGORY: &str = "Organization";
pub const UNNAMED_CONTACT: &str = "Unnamed Contact";

/// Vendor types for which a GSTIN is expected.
const GST_REGISTERED_VENDOR_TYPES: &[&str] = &["Airline", "Hotel", "Transport"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    Customer,
    Vendor,
    Employee,
    Partner,
}

impl ContactType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContactType::Customer => "Customer",
            ContactType::Vendor => "Vendor",
            ContactType::Employee => "Employee",
            ContactType::Partner => "Partner",
        }
    }

    /// Categories normally used with this contact type.
    pub const fn typical_categories(self) -> &'static [&'static str] {
        match self {
            ContactType::Customer => &["Individual", "Corporate", "Government"],
            ContactType::Vendor => &["Airline", "Hotel", "Transport", "Other"],
            ContactType::Employee => &["Full-time", "Part-time", "Contractor"],
            ContactType::Partner => &["Business Partner", "Travel Agent"],
        }
    }
}

impl Display for ContactType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(ContactType::Customer),
            "Vendor" => Ok(ContactType::Vendor),
            "Employee" => Ok(ContactType::Employee),
            "Partner" => Ok(ContactType::Partner),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown contact type {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEmailRow {
    pub email_id: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPhoneRow {
    pub phone: String,
    pub is_primary_phone: bool,
    pub is_primary_mobile_no: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeRow {
    pub contact: ContactId,
    pub is_primary_representative: bool,
}

/// Another document that references this contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicLink {
    pub link_doctype: String,
    pub link_name: String,
    pub link_title: Option<String>,
}

/// Persisted contact. Serializes with the public field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    #[serde(rename = "name")]
    pub id: ContactId,
    #[serde(skip)]
    pub hub_id: HubId,
    pub full_name: String,
    pub salutation: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub contact_type: Option<ContactType>,
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
    #[serde(rename = "manager")]
    pub manager_id: Option<ContactId>,
    pub department: Option<String>,
    pub work_email: Option<String>,
    pub instagram: Option<String>,
    pub website: Option<String>,
    pub gstin: Option<String>,
    pub vendor_type: Option<String>,
    pub owner: String,
    pub modified_by: String,
    #[serde(rename = "creation")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified")]
    pub updated_at: NaiveDateTime,
    pub email_ids: Vec<ContactEmailRow>,
    pub phone_nos: Vec<ContactPhoneRow>,
    pub representatives: Vec<RepresentativeRow>,
    pub links: Vec<DynamicLink>,
}

/// Whole years elapsed between `from` and `today`.
fn whole_years(from: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - from.year();
    if (today.month(), today.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

impl Contact {
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        self.dob.map(|dob| whole_years(dob, today))
    }

    /// Completed years since joining; employees only, never negative.
    pub fn years_of_service(&self, today: NaiveDate) -> Option<i32> {
        if self.contact_type != Some(ContactType::Employee) {
            return None;
        }
        self.date_of_joining
            .map(|joined| whole_years(joined, today).max(0))
    }

    pub fn primary_contact_methods(&self) -> BTreeMap<&'static str, String> {
        let mut methods = BTreeMap::new();
        let candidates = [
            ("email", &self.email_id),
            ("mobile", &self.mobile_no),
            ("phone", &self.phone),
            ("instagram", &self.instagram),
        ];
        for (key, value) in candidates {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                methods.insert(key, value.clone());
            }
        }
        methods
    }

    pub fn is_employee(&self) -> bool {
        self.contact_type == Some(ContactType::Employee)
    }
}

/// Lightweight projection used for hierarchy walks and uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRef {
    #[serde(rename = "name")]
    pub id: ContactId,
    pub full_name: String,
    pub contact_type: Option<ContactType>,
    pub designation: Option<String>,
    pub employee_status: Option<String>,
    #[serde(rename = "manager")]
    pub manager_id: Option<ContactId>,
}

/// Contact data about to be written, before or after rule checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    /// Present when the draft updates an existing contact.
    pub id: Option<ContactId>,
    pub full_name: String,
    pub salutation: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub contact_type: Option<ContactType>,
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
    pub manager_id: Option<ContactId>,
    pub department: Option<String>,
    pub work_email: Option<String>,
    pub instagram: Option<String>,
    pub website: Option<String>,
    pub gstin: Option<String>,
    pub vendor_type: Option<String>,
    pub email_ids: Vec<ContactEmailRow>,
    pub phone_nos: Vec<ContactPhoneRow>,
    pub representatives: Vec<RepresentativeRow>,
    pub links: Vec<DynamicLink>,
}

fn contact_link(field: &str, value: &str) -> Result<ContactId, DocumentError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(|raw| ContactId::new(raw).ok())
        .ok_or_else(|| DocumentError::invalid(field, "must reference a contact id"))
}

fn text(document: &CoercedDocument, fieldname: &str) -> Option<String> {
    document.text(fieldname).map(str::to_string)
}

impl ContactDraft {
    /// Builds a draft from coerced values.
    pub fn from_document(document: &CoercedDocument) -> Result<Self, DocumentError> {
        let contact_type = document
            .text("contact_type")
            .map(ContactType::from_str)
            .transpose()
            .map_err(|err| DocumentError::invalid("contact_type", err.to_string()))?;

        let manager_id = document
            .text("manager")
            .map(|value| contact_link("manager", value))
            .transpose()?;

        let email_ids = document
            .table("email_ids")
            .iter()
            .map(|row| ContactEmailRow {
                email_id: row.text("email_id").unwrap_or_default().to_string(),
                is_primary: row.flag("is_primary"),
            })
            .collect();

        let phone_nos = document
            .table("phone_nos")
            .iter()
            .map(|row| ContactPhoneRow {
                phone: row.text("phone").unwrap_or_default().to_string(),
                is_primary_phone: row.flag("is_primary_phone"),
                is_primary_mobile_no: row.flag("is_primary_mobile_no"),
            })
            .collect();

        let representatives = document
            .table("representatives")
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let field = format!("representatives[{idx}].contact");
                Ok(RepresentativeRow {
                    contact: contact_link(&field, row.text("contact").unwrap_or_default())?,
                    is_primary_representative: row.flag("is_primary_representative"),
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        let links = document
            .table("links")
            .iter()
            .map(|row| DynamicLink {
                link_doctype: row.text("link_doctype").unwrap_or_default().to_string(),
                link_name: row.text("link_name").unwrap_or_default().to_string(),
                link_title: text(row, "link_title"),
            })
            .collect();

        Ok(Self {
            id: None,
            full_name: String::new(),
            salutation: text(document, "salutation"),
            first_name: text(document, "first_name").unwrap_or_default(),
            middle_name: text(document, "middle_name"),
            last_name: text(document, "last_name"),
            gender: text(document, "gender"),
            contact_type,
            contact_category: text(document, "contact_category"),
            status: text(document, "status").unwrap_or_else(|| "Passive".to_string()),
            email_id: text(document, "email_id"),
            mobile_no: text(document, "mobile_no"),
            phone: text(document, "phone"),
            dob: document.date("dob"),
            notes: text(document, "notes"),
            company_name: text(document, "company_name"),
            address_line1: text(document, "address_line1"),
            address_line2: text(document, "address_line2"),
            city: text(document, "city"),
            state: text(document, "state"),
            country: text(document, "country"),
            pincode: text(document, "pincode"),
            designation: text(document, "designation"),
            employee_code: text(document, "employee_code"),
            date_of_joining: document.date("date_of_joining"),
            employee_status: text(document, "employee_status"),
            manager_id,
            department: text(document, "department"),
            work_email: text(document, "work_email"),
            instagram: text(document, "instagram"),
            website: text(document, "website"),
            gstin: text(document, "gstin"),
            vendor_type: text(document, "vendor_type"),
            email_ids,
            phone_nos,
            representatives,
            links,
        })
    }

    pub fn is_employee(&self) -> bool {
        self.contact_type == Some(ContactType::Employee)
    }

    /// Normalizes primary flags in the email and phone tables and copies
    /// the primaries into `email_id`, `mobile_no` and `phone`.
    pub fn sync_primary_email_and_phone(&mut self) {
        if !self.email_ids.is_empty() {
            let mut seen_primary = false;
            for row in &mut self.email_ids {
                if row.is_primary && seen_primary {
                    row.is_primary = false;
                }
                seen_primary |= row.is_primary;
            }
            if !seen_primary {
                self.email_ids[0].is_primary = true;
            }
            self.email_id = self
                .email_ids
                .iter()
                .find(|row| row.is_primary)
                .map(|row| row.email_id.clone());
        }

        if !self.phone_nos.is_empty() {
            let mut seen_phone = false;
            let mut seen_mobile = false;
            for row in &mut self.phone_nos {
                if row.is_primary_phone && seen_phone {
                    row.is_primary_phone = false;
                }
                if row.is_primary_mobile_no && seen_mobile {
                    row.is_primary_mobile_no = false;
                }
                seen_phone |= row.is_primary_phone;
                seen_mobile |= row.is_primary_mobile_no;
            }

            if !seen_phone && !seen_mobile {
                let first = &mut self.phone_nos[0];
                if is_mobile_number(&first.phone) {
                    first.is_primary_mobile_no = true;
                } else {
                    first.is_primary_phone = true;
                }
            }

            self.phone = self
                .phone_nos
                .iter()
                .find(|row| row.is_primary_phone)
                .map(|row| row.phone.clone());
            self.mobile_no = self
                .phone_nos
                .iter()
                .find(|row| row.is_primary_mobile_no)
                .map(|row| row.phone.clone());
        }
    }

    /// Lower-cases and validates every email on the draft.
    pub fn validate_emails(&mut self) -> Result<(), DocumentError> {
        let normalize = |value: &str| {
            ContactEmail::new(value)
                .map(ContactEmail::into_inner)
                .map_err(|_| DocumentError::Rule(format!("{value} is not a valid Email Address")))
        };
        if let Some(email) = self.email_id.as_deref() {
            self.email_id = Some(normalize(email)?);
        }
        if let Some(email) = self.work_email.as_deref() {
            self.work_email = Some(normalize(email)?);
        }
        for row in &mut self.email_ids {
            row.email_id = normalize(&row.email_id)?;
        }
        Ok(())
    }

    pub fn validate_mandatory_contact_info(&self) -> Result<(), DocumentError> {
        let has_email = self.email_id.is_some() || !self.email_ids.is_empty();
        let has_phone =
            self.mobile_no.is_some() || self.phone.is_some() || !self.phone_nos.is_empty();
        let has_instagram = self.instagram.is_some();

        if has_email || has_phone || has_instagram {
            Ok(())
        } else {
            Err(DocumentError::Rule(
                "At least one contact method is required: Email, Mobile Number, or Instagram ID"
                    .to_string(),
            ))
        }
    }

    /// Warns when the category is unusual for the contact type.
    pub fn category_warning(&self) -> Option<String> {
        let contact_type = self.contact_type?;
        let category = self.contact_category.as_deref()?;
        if category == ORGANIZATION_CATEGORY
            || contact_type.typical_categories().contains(&category)
        {
            return None;
        }
        Some(format!(
            "Contact Category {category} may not be typical for Contact Type {contact_type}"
        ))
    }

    pub fn validate_gstin(&mut self) -> Result<(), DocumentError> {
        if let Some(gstin) = self.gstin.as_deref() {
            let gstin = Gstin::new(gstin).map_err(|err| DocumentError::Rule(err.to_string()))?;
            self.gstin = Some(gstin.into_inner());
        }
        Ok(())
    }

    /// Mobile must be a mobile number; phone and phone rows may be landlines.
    pub fn validate_phone_numbers(&mut self) -> Result<(), DocumentError> {
        let rule = |err: TypeConstraintError| DocumentError::Rule(err.to_string());
        if let Some(mobile) = self.mobile_no.as_deref() {
            self.mobile_no = Some(MobileNumber::new(mobile).map_err(rule)?.into_inner());
        }
        if let Some(phone) = self.phone.as_deref() {
            self.phone = Some(PhoneNumber::new(phone).map_err(rule)?.into_inner());
        }
        for row in &mut self.phone_nos {
            row.phone = PhoneNumber::new(row.phone.as_str())
                .map_err(rule)?
                .into_inner();
        }
        Ok(())
    }

    /// Employee checks that need no lookups. Returns warnings.
    pub fn validate_employee_fields(
        &self,
        previous: Option<&Contact>,
    ) -> Result<Vec<String>, DocumentError> {
        let mut warnings = Vec::new();
        if !self.is_employee() {
            return Ok(warnings);
        }

        if self.employee_code.is_none() {
            return Err(DocumentError::Rule(
                "Employee Code is mandatory for Employee contacts".to_string(),
            ));
        }

        if let (Some(joined), Some(born)) = (self.date_of_joining, self.dob) {
            let age_at_joining = (joined - born).num_days() as f64 / 365.25;
            if age_at_joining < 18.0 {
                return Err(DocumentError::Rule(
                    "Employee must be at least 18 years old at the time of joining".to_string(),
                ));
            }
        }

        if let Some(previous) = previous
            && previous.employee_status.as_deref() == Some("Active")
            && self.employee_status.as_deref() == Some("Inactive")
        {
            warnings.push(
                "Employee status changed to Inactive. This may affect system access.".to_string(),
            );
        }

        Ok(warnings)
    }

    pub fn validate_manager_is_not_self(&self) -> Result<(), DocumentError> {
        match (self.id, self.manager_id) {
            (Some(id), Some(manager)) if id == manager => Err(DocumentError::Rule(
                "Employee cannot be their own manager".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Vendor checks. Returns warnings.
    pub fn validate_vendor_fields(&self) -> Result<Vec<String>, DocumentError> {
        if self.contact_type != Some(ContactType::Vendor) {
            return Ok(Vec::new());
        }
        let Some(vendor_type) = self.vendor_type.as_deref() else {
            return Err(DocumentError::Rule(
                "Vendor Type is mandatory for Vendor contacts".to_string(),
            ));
        };
        if GST_REGISTERED_VENDOR_TYPES.contains(&vendor_type) && self.gstin.is_none() {
            return Ok(vec![format!("GSTIN is recommended for {vendor_type} vendors")]);
        }
        Ok(Vec::new())
    }

    /// Rules applied when an update changes `contact_type`. Returns warnings.
    pub fn validate_contact_type_change(
        &self,
        previous: &Contact,
    ) -> Result<Vec<String>, DocumentError> {
        let mut warnings = Vec::new();
        if previous.contact_type == self.contact_type {
            return Ok(warnings);
        }

        if previous.contact_type == Some(ContactType::Employee)
            && !self.is_employee()
            && self.employee_code.is_some()
        {
            warnings.push(
                "Contact type changed from Employee. Consider clearing employee-specific fields."
                    .to_string(),
            );
        }

        if self.is_employee() && self.employee_code.is_none() {
            return Err(DocumentError::Rule(
                "Employee Code is required when changing contact type to Employee".to_string(),
            ));
        }

        if self.contact_type == Some(ContactType::Vendor) && self.vendor_type.is_none() {
            return Err(DocumentError::Rule(
                "Vendor Type is required when changing contact type to Vendor".to_string(),
            ));
        }

        Ok(warnings)
    }

    pub fn set_full_name(&mut self) {
        let full_name = if self.contact_category.as_deref() == Some(ORGANIZATION_CATEGORY) {
            self.first_name.clone()
        } else {
            [
                self.salutation.as_deref(),
                Some(self.first_name.as_str()),
                self.middle_name.as_deref(),
                self.last_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
        };

        self.full_name = if full_name.is_empty() {
            self.email_id
                .clone()
                .or_else(|| self.mobile_no.clone())
                .unwrap_or_else(|| UNNAMED_CONTACT.to_string())
        } else {
            full_name
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContactDraft {
        ContactDraft {
            first_name: "Asha".to_string(),
            status: "Passive".to_string(),
            ..Default::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn stored(contact_type: Option<ContactType>) -> Contact {
        let timestamp = date(2024, 1, 1).and_hms_opt(0, 0, 0).expect("valid time");
        Contact {
            id: ContactId::new(1).expect("valid id"),
            hub_id: HubId::new(1).expect("valid hub"),
            full_name: "Asha".to_string(),
            salutation: None,
            first_name: "Asha".to_string(),
            middle_name: None,
            last_name: None,
            gender: None,
            contact_type,
            contact_category: None,
            status: "Passive".to_string(),
            email_id: Some("asha@example.com".to_string()),
            mobile_no: None,
            phone: None,
            dob: Some(date(1990, 6, 15)),
            notes: None,
            company_name: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            country: None,
            pincode: None,
            designation: None,
            employee_code: Some("EMP001".to_string()),
            date_of_joining: Some(date(2015, 6, 16)),
            employee_status: Some("Active".to_string()),
            manager_id: None,
            department: None,
            work_email: None,
            instagram: None,
            website: None,
            gstin: None,
            vendor_type: None,
            owner: "admin@example.com".to_string(),
            modified_by: "admin@example.com".to_string(),
            created_at: timestamp,
            updated_at: timestamp,
            email_ids: Vec::new(),
            phone_nos: Vec::new(),
            representatives: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn only_first_primary_email_survives() {
        let mut draft = draft();
        draft.email_ids = vec![
            ContactEmailRow {
                email_id: "one@example.com".into(),
                is_primary: false,
            },
            ContactEmailRow {
                email_id: "two@example.com".into(),
                is_primary: true,
            },
            ContactEmailRow {
                email_id: "three@example.com".into(),
                is_primary: true,
            },
        ];

        draft.sync_primary_email_and_phone();

        assert_eq!(draft.email_id.as_deref(), Some("two@example.com"));
        assert!(!draft.email_ids[2].is_primary);
    }

    #[test]
    fn first_email_becomes_primary_when_none_flagged() {
        let mut draft = draft();
        draft.email_ids = vec![ContactEmailRow {
            email_id: "one@example.com".into(),
            is_primary: false,
        }];

        draft.sync_primary_email_and_phone();

        assert!(draft.email_ids[0].is_primary);
        assert_eq!(draft.email_id.as_deref(), Some("one@example.com"));
    }

    #[test]
    fn first_phone_is_classified_as_mobile_or_landline() {
        let mut mobile = draft();
        mobile.phone_nos = vec![ContactPhoneRow {
            phone: "98765 43210".into(),
            is_primary_phone: false,
            is_primary_mobile_no: false,
        }];
        mobile.sync_primary_email_and_phone();
        assert_eq!(mobile.mobile_no.as_deref(), Some("98765 43210"));
        assert_eq!(mobile.phone, None);

        let mut landline = draft();
        landline.phone_nos = vec![ContactPhoneRow {
            phone: "022-23456789".into(),
            is_primary_phone: false,
            is_primary_mobile_no: false,
        }];
        landline.sync_primary_email_and_phone();
        assert_eq!(landline.phone.as_deref(), Some("022-23456789"));
        assert_eq!(landline.mobile_no, None);
    }

    #[test]
    fn requires_some_contact_method() {
        let err = draft().validate_mandatory_contact_info().unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one contact method is required: Email, Mobile Number, or Instagram ID"
        );

        let mut with_instagram = draft();
        with_instagram.instagram = Some("@asha".into());
        assert!(with_instagram.validate_mandatory_contact_info().is_ok());
    }

    #[test]
    fn unusual_category_only_warns() {
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Customer);
        draft.contact_category = Some("Airline".into());
        assert_eq!(
            draft.category_warning().as_deref(),
            Some("Contact Category Airline may not be typical for Contact Type Customer")
        );

        draft.contact_category = Some("Corporate".into());
        assert!(draft.category_warning().is_none());
    }

    #[test]
    fn gstin_and_phones_are_normalized() {
        let mut draft = draft();
        draft.gstin = Some("27aapfu0939f1zv".into());
        draft.mobile_no = Some("+91-98765-43210".into());
        draft.phone = Some("080 2345 6789".into());

        draft.validate_gstin().expect("valid gstin");
        draft.validate_phone_numbers().expect("valid phones");

        assert_eq!(draft.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(draft.mobile_no.as_deref(), Some("+919876543210"));
        assert_eq!(draft.phone.as_deref(), Some("08023456789"));
    }

    #[test]
    fn landline_in_mobile_field_is_rejected() {
        let mut draft = draft();
        draft.mobile_no = Some("022-23456789".into());
        let err = draft.validate_phone_numbers().unwrap_err();
        assert!(err.to_string().starts_with("Invalid mobile number format"));
    }

    #[test]
    fn employee_needs_code_and_adult_joining_age() {
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Employee);
        assert_eq!(
            draft.validate_employee_fields(None).unwrap_err().to_string(),
            "Employee Code is mandatory for Employee contacts"
        );

        draft.employee_code = Some("EMP001".into());
        draft.dob = Some(date(2010, 1, 1));
        draft.date_of_joining = Some(date(2024, 1, 1));
        assert_eq!(
            draft.validate_employee_fields(None).unwrap_err().to_string(),
            "Employee must be at least 18 years old at the time of joining"
        );

        draft.dob = Some(date(1990, 1, 1));
        assert!(draft.validate_employee_fields(None).expect("valid").is_empty());
    }

    #[test]
    fn deactivating_an_employee_warns() {
        let previous = stored(Some(ContactType::Employee));
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Employee);
        draft.employee_code = Some("EMP001".into());
        draft.employee_status = Some("Inactive".into());

        let warnings = draft.validate_employee_fields(Some(&previous)).expect("valid");

        assert_eq!(
            warnings,
            vec!["Employee status changed to Inactive. This may affect system access."]
        );
    }

    #[test]
    fn own_manager_is_rejected() {
        let mut draft = draft();
        draft.id = ContactId::new(4).ok();
        draft.manager_id = ContactId::new(4).ok();
        assert!(draft.validate_manager_is_not_self().is_err());
    }

    #[test]
    fn vendor_rules() {
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Vendor);
        assert_eq!(
            draft.validate_vendor_fields().unwrap_err().to_string(),
            "Vendor Type is mandatory for Vendor contacts"
        );

        draft.vendor_type = Some("Hotel".into());
        assert_eq!(
            draft.validate_vendor_fields().expect("valid"),
            vec!["GSTIN is recommended for Hotel vendors"]
        );

        draft.vendor_type = Some("Supplier".into());
        assert!(draft.validate_vendor_fields().expect("valid").is_empty());
    }

    #[test]
    fn leaving_employee_type_warns() {
        let previous = stored(Some(ContactType::Employee));
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Customer);
        draft.employee_code = Some("EMP001".into());

        let warnings = draft.validate_contact_type_change(&previous).expect("valid");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn becoming_vendor_requires_vendor_type() {
        let previous = stored(Some(ContactType::Customer));
        let mut draft = draft();
        draft.contact_type = Some(ContactType::Vendor);

        let err = draft.validate_contact_type_change(&previous).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Vendor Type is required when changing contact type to Vendor"
        );
    }

    #[test]
    fn full_name_rules() {
        let mut person = draft();
        person.salutation = Some("Dr".into());
        person.last_name = Some("Rao".into());
        person.set_full_name();
        assert_eq!(person.full_name, "Dr Asha Rao");

        let mut organization = draft();
        organization.first_name = "Sunrise Travels".into();
        organization.last_name = Some("ignored".into());
        organization.contact_category = Some(ORGANIZATION_CATEGORY.into());
        organization.set_full_name();
        assert_eq!(organization.full_name, "Sunrise Travels");

        let mut anonymous = draft();
        anonymous.first_name = String::new();
        anonymous.mobile_no = Some("9876543210".into());
        anonymous.set_full_name();
        assert_eq!(anonymous.full_name, "9876543210");

        anonymous.mobile_no = None;
        anonymous.set_full_name();
        assert_eq!(anonymous.full_name, UNNAMED_CONTACT);
    }

    #[test]
    fn computed_fields() {
        let contact = stored(Some(ContactType::Employee));
        let today = date(2025, 6, 15);

        assert_eq!(contact.age(today), Some(35));
        assert_eq!(contact.years_of_service(today), Some(9));

        let customer = stored(Some(ContactType::Customer));
        assert_eq!(customer.years_of_service(today), None);

        let methods = contact.primary_contact_methods();
        assert_eq!(methods.get("email").map(String::as_str), Some("asha@example.com"));
        assert!(!methods.contains_key("mobile"));
    }
}
