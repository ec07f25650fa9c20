//! Static field registry describing every DocType the service understands.
//!
//! The registry drives type coercion, required-field checks, list field
//! validation and the column/template metadata handed to clients. Column names
//! used in generated SQL are taken from here and nowhere else.

use serde::Serialize;

/// Storage and presentation type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Data,
    #[serde(rename = "Long Text")]
    LongText,
    Select,
    Link,
    Date,
    Datetime,
    Int,
    Check,
    Phone,
    Table,
    #[serde(rename = "Section Break")]
    SectionBreak,
}

impl FieldType {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Data => "Data",
            FieldType::LongText => "Long Text",
            FieldType::Select => "Select",
            FieldType::Link => "Link",
            FieldType::Date => "Date",
            FieldType::Datetime => "Datetime",
            FieldType::Int => "Int",
            FieldType::Check => "Check",
            FieldType::Phone => "Phone",
            FieldType::Table => "Table",
            FieldType::SectionBreak => "Section Break",
        }
    }

    /// Layout-only fields carry no value.
    pub const fn is_layout(self) -> bool {
        matches!(self, FieldType::SectionBreak)
    }

    pub const fn is_table(self) -> bool {
        matches!(self, FieldType::Table)
    }
}

/// Field definition within a DocType.
#[derive(Debug, Clone, Copy)]
pub struct DocField {
    pub fieldname: &'static str,
    pub label: &'static str,
    pub fieldtype: FieldType,
    /// Allowed values for `Select` fields.
    pub options: &'static [&'static str],
    /// Target DocType for `Link` and `Table` fields.
    pub target: Option<&'static str>,
    pub reqd: bool,
    pub read_only: bool,
    pub hidden: bool,
    pub in_list_view: bool,
    pub in_standard_filter: bool,
    pub in_global_search: bool,
    pub in_quick_entry: bool,
    pub depends_on: Option<&'static str>,
    pub default: Option<&'static str>,
    /// Database column when it differs from `fieldname`.
    pub column: Option<&'static str>,
}

impl DocField {
    const fn new(fieldname: &'static str, label: &'static str, fieldtype: FieldType) -> Self {
        Self {
            fieldname,
            label,
            fieldtype,
            options: &[],
            target: None,
            reqd: false,
            read_only: false,
            hidden: false,
            in_list_view: false,
            in_standard_filter: false,
            in_global_search: false,
            in_quick_entry: false,
            depends_on: None,
            default: None,
            column: None,
        }
    }

    const fn section(fieldname: &'static str, label: &'static str) -> Self {
        Self::new(fieldname, label, FieldType::SectionBreak)
    }

    const fn select(
        fieldname: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        let mut field = Self::new(fieldname, label, FieldType::Select);
        field.options = options;
        field
    }

    const fn link(fieldname: &'static str, label: &'static str, target: &'static str) -> Self {
        let mut field = Self::new(fieldname, label, FieldType::Link);
        field.target = Some(target);
        field
    }

    const fn table(fieldname: &'static str, label: &'static str, target: &'static str) -> Self {
        let mut field = Self::new(fieldname, label, FieldType::Table);
        field.target = Some(target);
        field
    }

    const fn reqd(mut self) -> Self {
        self.reqd = true;
        self
    }

    const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    const fn list_view(mut self) -> Self {
        self.in_list_view = true;
        self
    }

    const fn standard_filter(mut self) -> Self {
        self.in_standard_filter = true;
        self
    }

    const fn global_search(mut self) -> Self {
        self.in_global_search = true;
        self
    }

    const fn quick_entry(mut self) -> Self {
        self.in_quick_entry = true;
        self
    }

    const fn depends_on(mut self, expression: &'static str) -> Self {
        self.depends_on = Some(expression);
        self
    }

    const fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Column holding the value of this field.
    pub fn column_name(&self) -> &'static str {
        self.column.unwrap_or(self.fieldname)
    }

    /// Whether values of this field are stored as integers.
    pub fn is_integer(&self) -> bool {
        matches!(self.fieldtype, FieldType::Int | FieldType::Check)
            || (self.fieldtype == FieldType::Link && self.target == Some(CONTACT))
    }

    /// Contact types this field applies to, derived from `depends_on`.
    pub fn applicable_to(&self) -> Option<&'static str> {
        let expression = self.depends_on?;
        ["Employee", "Vendor", "Customer"]
            .into_iter()
            .find(|contact_type| expression.contains(contact_type))
    }
}

/// Column layout entry for the default list view.
#[derive(Debug, Clone, Copy)]
pub struct DefaultColumn {
    pub key: &'static str,
    pub width: &'static str,
}

/// DocType schema.
#[derive(Debug)]
pub struct DocMeta {
    pub name: &'static str,
    pub table: &'static str,
    pub title_field: &'static str,
    pub is_child: bool,
    /// Fields matched by free-text search.
    pub search_fields: &'static [&'static str],
    pub fields: &'static [DocField],
    pub default_columns: &'static [DefaultColumn],
    pub default_rows: &'static [&'static str],
}

impl DocMeta {
    /// Declared (non-standard) field by name.
    pub fn field(&self, fieldname: &str) -> Option<&DocField> {
        self.fields.iter().find(|field| field.fieldname == fieldname)
    }

    /// Declared or standard field by name.
    pub fn resolve(&self, fieldname: &str) -> Option<&DocField> {
        self.field(fieldname).or_else(|| standard_field(fieldname))
    }

    /// Fields that carry values, layout removed.
    pub fn value_fields(&self) -> impl Iterator<Item = &DocField> {
        self.fields
            .iter()
            .filter(|field| !field.fieldtype.is_layout())
    }

    /// Fields usable as list columns: no layout and no child tables.
    pub fn listable_fields(&self) -> impl Iterator<Item = &DocField> {
        self.value_fields()
            .filter(|field| !field.fieldtype.is_table())
    }

    /// Fields accepted in imports and templates.
    pub fn importable_fields(&self) -> impl Iterator<Item = &DocField> {
        self.listable_fields().filter(|field| !field.read_only)
    }

    /// Default projection: `name`, list-view fields, then timestamps.
    pub fn default_list_fields(&self) -> Vec<String> {
        let mut fields = vec!["name".to_string()];
        for field in self.listable_fields().filter(|field| field.in_list_view) {
            fields.push(field.fieldname.to_string());
        }
        for standard in ["modified", "creation"] {
            if !fields.iter().any(|f| f == standard) {
                fields.push(standard.to_string());
            }
        }
        fields
    }
}

pub const CONTACT: &str = "Contact";
pub const COMMUNICATION: &str = "Communication";
pub const CONTACT_EMAIL: &str = "Contact Email";
pub const CONTACT_PHONE: &str = "Contact Phone";
pub const ORGANIZATION_REPRESENTATIVE: &str = "Organization Representative";
pub const DYNAMIC_LINK: &str = "Dynamic Link";

/// Bookkeeping fields present on every DocType.
pub static STANDARD_FIELDS: &[DocField] = &[
    DocField::new("name", "ID", FieldType::Int)
        .column("id")
        .read_only(),
    DocField::new("owner", "Created By", FieldType::Data).read_only(),
    DocField::new("creation", "Created On", FieldType::Datetime)
        .column("created_at")
        .read_only(),
    DocField::new("modified", "Last Updated On", FieldType::Datetime)
        .column("updated_at")
        .read_only(),
    DocField::new("modified_by", "Last Updated By", FieldType::Data).read_only(),
];

/// Framework bookkeeping names accepted in field lists and silently dropped.
pub const SYSTEM_FIELDS: &[&str] = &["_comments", "_liked_by", "_assign", "_user_tags"];

pub fn standard_field(fieldname: &str) -> Option<&'static DocField> {
    STANDARD_FIELDS
        .iter()
        .find(|field| field.fieldname == fieldname)
}

pub fn is_system_field(fieldname: &str) -> bool {
    SYSTEM_FIELDS.contains(&fieldname)
}

const EMPLOYEE_ONLY: &str = "eval:doc.contact_type == 'Employee'";
const VENDOR_ONLY: &str = "eval:doc.contact_type == 'Vendor'";

pub const CONTACT_TYPES: &[&str] = &["Customer", "Vendor", "Employee", "Partner"];
pub const VENDOR_TYPES: &[&str] = &[
    "Supplier",
    "Service Provider",
    "Contractor",
    "Airline",
    "Hotel",
    "Transport",
    "Other",
];
pub const EMPLOYEE_STATUSES: &[&str] = &["Active", "Inactive", "On Leave"];
pub const CONTACT_STATUSES: &[&str] = &["Passive", "Open", "Replied", "Active"];

static CONTACT_FIELDS: &[DocField] = &[
    DocField::new("salutation", "Salutation", FieldType::Data),
    DocField::new("first_name", "First Name", FieldType::Data)
        .reqd()
        .list_view()
        .quick_entry(),
    DocField::new("middle_name", "Middle Name", FieldType::Data),
    DocField::new("last_name", "Last Name", FieldType::Data)
        .list_view()
        .quick_entry()
        .depends_on("eval:doc.contact_category != 'Organization'"),
    DocField::new("full_name", "Full Name", FieldType::Data)
        .read_only()
        .list_view()
        .global_search(),
    DocField::select("gender", "Gender", &["Male", "Female"]),
    DocField::select("contact_type", "Contact Type", CONTACT_TYPES)
        .list_view()
        .standard_filter()
        .quick_entry(),
    DocField::link("contact_category", "Contact Category", "Contact Category")
        .list_view()
        .standard_filter(),
    DocField::select("status", "Status", CONTACT_STATUSES)
        .standard_filter()
        .default("Passive"),
    DocField::table(
        "representatives",
        "Representatives",
        ORGANIZATION_REPRESENTATIVE,
    )
    .depends_on("eval:doc.contact_category == 'Organization'"),
    DocField::section("contact_details_section", "Contact Details"),
    DocField::new("email_id", "Email Address", FieldType::Data)
        .list_view()
        .global_search()
        .quick_entry(),
    DocField::table("email_ids", "Email IDs", CONTACT_EMAIL),
    DocField::new("mobile_no", "Mobile No", FieldType::Phone)
        .list_view()
        .global_search()
        .quick_entry(),
    DocField::new("phone", "Phone", FieldType::Phone),
    DocField::table("phone_nos", "Contact Numbers", CONTACT_PHONE),
    DocField::section("personal_details_section", "Personal Details"),
    DocField::new("dob", "Date of Birth", FieldType::Date),
    DocField::new("notes", "Notes", FieldType::LongText),
    DocField::new("company_name", "Company Name", FieldType::Data),
    DocField::section("address_details_section", "Address Details"),
    DocField::new("address_line1", "Address Line 1", FieldType::Data),
    DocField::new("address_line2", "Address Line 2", FieldType::Data),
    DocField::new("city", "City", FieldType::Data)
        .list_view()
        .standard_filter()
        .global_search(),
    DocField::new("state", "State", FieldType::Data).list_view(),
    DocField::new("country", "Country", FieldType::Data),
    DocField::new("pincode", "Pincode", FieldType::Data),
    DocField::section("employee_details_section", "Employee Details"),
    DocField::new("designation", "Designation", FieldType::Data).depends_on(EMPLOYEE_ONLY),
    DocField::new("employee_code", "Employee Code", FieldType::Data).depends_on(EMPLOYEE_ONLY),
    DocField::new("date_of_joining", "Date of Joining", FieldType::Date)
        .depends_on(EMPLOYEE_ONLY),
    DocField::select("employee_status", "Employee Status", EMPLOYEE_STATUSES)
        .depends_on(EMPLOYEE_ONLY),
    DocField::link("manager", "Manager", CONTACT)
        .column("manager_id")
        .depends_on(EMPLOYEE_ONLY),
    DocField::new("department", "Department", FieldType::Data).depends_on(EMPLOYEE_ONLY),
    DocField::new("work_email", "Work Email", FieldType::Data).depends_on(EMPLOYEE_ONLY),
    DocField::section("social_media_section", "Social Media"),
    DocField::new("instagram", "Instagram", FieldType::Data),
    DocField::new("website", "Website", FieldType::Data),
    DocField::new("gstin", "GSTIN", FieldType::Data),
    DocField::select("vendor_type", "Vendor Type", VENDOR_TYPES).depends_on(VENDOR_ONLY),
    DocField::table("links", "Links", DYNAMIC_LINK).hidden(),
];

static CONTACT_META: DocMeta = DocMeta {
    name: CONTACT,
    table: "contacts",
    title_field: "full_name",
    is_child: false,
    search_fields: &["full_name", "email_id", "mobile_no", "city"],
    fields: CONTACT_FIELDS,
    default_columns: &[
        DefaultColumn {
            key: "full_name",
            width: "10rem",
        },
        DefaultColumn {
            key: "contact_type",
            width: "8rem",
        },
        DefaultColumn {
            key: "contact_category",
            width: "8rem",
        },
        DefaultColumn {
            key: "email_id",
            width: "10rem",
        },
        DefaultColumn {
            key: "mobile_no",
            width: "8rem",
        },
        DefaultColumn {
            key: "city",
            width: "8rem",
        },
    ],
    default_rows: &[
        "name",
        "full_name",
        "contact_type",
        "contact_category",
        "email_id",
        "mobile_no",
        "_user_tags",
        "_assign",
        "_liked_by",
        "modified",
    ],
};

static COMMUNICATION_FIELDS: &[DocField] = &[
    DocField::new("subject", "Subject", FieldType::Data)
        .reqd()
        .list_view()
        .global_search()
        .quick_entry(),
    DocField::new("content", "Message", FieldType::LongText),
    DocField::select(
        "communication_type",
        "Communication Type",
        &["Communication", "Comment", "Automated Message"],
    )
    .list_view()
    .default("Communication"),
    DocField::select(
        "communication_medium",
        "Medium",
        &["Email", "Phone", "Chat", "SMS", "Visit", "Other"],
    )
    .standard_filter(),
    DocField::select("sent_or_received", "Sent or Received", &["Sent", "Received"])
        .reqd()
        .list_view()
        .default("Sent"),
    DocField::new("sender", "Sender", FieldType::Data).global_search(),
    DocField::new("recipients", "Recipients", FieldType::Data),
    DocField::new("communication_date", "Date", FieldType::Datetime).list_view(),
    DocField::link("reference_name", "Reference Contact", CONTACT)
        .column("contact_id")
        .reqd()
        .standard_filter()
        .quick_entry(),
];

static COMMUNICATION_META: DocMeta = DocMeta {
    name: COMMUNICATION,
    table: "communications",
    title_field: "subject",
    is_child: false,
    search_fields: &["subject", "sender", "recipients"],
    fields: COMMUNICATION_FIELDS,
    default_columns: &[
        DefaultColumn {
            key: "subject",
            width: "12rem",
        },
        DefaultColumn {
            key: "sent_or_received",
            width: "6rem",
        },
        DefaultColumn {
            key: "communication_date",
            width: "8rem",
        },
    ],
    default_rows: &[
        "name",
        "subject",
        "sent_or_received",
        "communication_date",
        "modified",
    ],
};

static CONTACT_EMAIL_META: DocMeta = DocMeta {
    name: CONTACT_EMAIL,
    table: "contact_emails",
    title_field: "email_id",
    is_child: true,
    search_fields: &[],
    fields: &[
        DocField::new("email_id", "Email ID", FieldType::Data).reqd(),
        DocField::new("is_primary", "Is Primary", FieldType::Check),
    ],
    default_columns: &[],
    default_rows: &[],
};

static CONTACT_PHONE_META: DocMeta = DocMeta {
    name: CONTACT_PHONE,
    table: "contact_phones",
    title_field: "phone",
    is_child: true,
    search_fields: &[],
    fields: &[
        DocField::new("phone", "Number", FieldType::Phone).reqd(),
        DocField::new("is_primary_phone", "Is Primary Phone", FieldType::Check),
        DocField::new("is_primary_mobile_no", "Is Primary Mobile", FieldType::Check),
    ],
    default_columns: &[],
    default_rows: &[],
};

static REPRESENTATIVE_META: DocMeta = DocMeta {
    name: ORGANIZATION_REPRESENTATIVE,
    table: "contact_representatives",
    title_field: "contact",
    is_child: true,
    search_fields: &[],
    fields: &[
        DocField::link("contact", "Contact", CONTACT).reqd(),
        DocField::new(
            "is_primary_representative",
            "Is Primary Representative",
            FieldType::Check,
        ),
    ],
    default_columns: &[],
    default_rows: &[],
};

static DYNAMIC_LINK_META: DocMeta = DocMeta {
    name: DYNAMIC_LINK,
    table: "contact_links",
    title_field: "link_name",
    is_child: true,
    search_fields: &[],
    fields: &[
        DocField::new("link_doctype", "Link Document Type", FieldType::Data).reqd(),
        DocField::new("link_name", "Link Name", FieldType::Data).reqd(),
        DocField::new("link_title", "Link Title", FieldType::Data),
    ],
    default_columns: &[],
    default_rows: &[],
};

static REGISTRY: &[&DocMeta] = &[
    &CONTACT_META,
    &COMMUNICATION_META,
    &CONTACT_EMAIL_META,
    &CONTACT_PHONE_META,
    &REPRESENTATIVE_META,
    &DYNAMIC_LINK_META,
];

/// Any registered DocType, child tables included.
pub fn doctype(name: &str) -> Option<&'static DocMeta> {
    REGISTRY.iter().copied().find(|meta| meta.name == name)
}

/// A top-level DocType that can be listed, created and viewed.
pub fn document_doctype(name: &str) -> Option<&'static DocMeta> {
    doctype(name).filter(|meta| !meta.is_child)
}

pub fn contact_meta() -> &'static DocMeta {
    &CONTACT_META
}

pub fn communication_meta() -> &'static DocMeta {
    &COMMUNICATION_META
}
