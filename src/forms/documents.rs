//! Generic document creation, upload and parsing payloads.

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::forms::bulk::{decode_base64, parse_csv};
use crate::forms::{FormError, lenient_json};

#[derive(Debug, Deserialize)]
pub struct CreateDocumentForm {
    #[serde(alias = "doc_data", deserialize_with = "lenient_json")]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct MultipleDocumentsForm {
    #[serde(alias = "documents_data", deserialize_with = "lenient_json")]
    pub documents: Value,
}

impl MultipleDocumentsForm {
    pub fn into_documents(self) -> Result<Vec<Value>, FormError> {
        match self.documents {
            Value::Array(documents) => Ok(documents),
            _ => Err(FormError::NotAnObject("documents")),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadDocumentsForm {
    #[validate(length(min = 1))]
    pub doctype: String,
    #[validate(length(min = 1))]
    pub file_content: String,
    #[serde(default, deserialize_with = "lenient_json")]
    pub field_mapping: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadDocumentsPayload {
    pub doctype: String,
    pub rows: Vec<Map<String, Value>>,
}

impl TryFrom<UploadDocumentsForm> for UploadDocumentsPayload {
    type Error = FormError;

    /// Decodes the CSV and renames columns through `field_mapping`
    /// (`{"CSV column": "fieldname"}`).
    fn try_from(form: UploadDocumentsForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mapping = match form.field_mapping {
            Value::Null => Map::new(),
            Value::Object(mapping) => mapping,
            _ => return Err(FormError::NotAnObject("field_mapping")),
        };

        let bytes = decode_base64(&form.file_content)?;
        let rows = parse_csv(&bytes)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(column, value)| {
                        let fieldname = mapping
                            .get(&column)
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or(column);
                        (fieldname, value)
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            doctype: form.doctype.trim().to_string(),
            rows,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    #[serde(default)]
    pub template_type: TemplateKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    #[default]
    Text,
    Json,
}

/// One extraction rule: a regex whose first group (or whole match) fills
/// the field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsingRule {
    pub pattern: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UnstructuredDataForm {
    #[validate(length(min = 1))]
    pub doctype: String,
    #[validate(length(min = 1, max = 20000))]
    pub unstructured_data: String,
    #[serde(default)]
    pub data_type: DataKind,
    #[serde(default, deserialize_with = "lenient_json")]
    pub parsing_rules: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredDataPayload {
    pub doctype: String,
    pub text: String,
    pub data_type: DataKind,
    pub parsing_rules: Vec<(String, ParsingRule)>,
}

impl TryFrom<UnstructuredDataForm> for UnstructuredDataPayload {
    type Error = FormError;

    fn try_from(form: UnstructuredDataForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let parsing_rules = match form.parsing_rules {
            Value::Null => Vec::new(),
            Value::Object(rules) => rules
                .into_iter()
                .map(|(field, rule)| {
                    serde_json::from_value::<ParsingRule>(rule)
                        .map(|rule| (field, rule))
                        .map_err(|_| FormError::NotAnObject("parsing rule"))
                })
                .collect::<Result<_, _>>()?,
            _ => return Err(FormError::NotAnObject("parsing_rules")),
        };

        Ok(Self {
            doctype: form.doctype.trim().to_string(),
            text: form.unstructured_data,
            data_type: form.data_type,
            parsing_rules,
        })
    }
}
