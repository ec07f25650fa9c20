use serde::Deserialize;
use validator::Validate;

use crate::forms::documents::DataKind;

#[derive(Debug, Deserialize, Validate)]
pub struct AiSearchForm {
    #[validate(length(min = 1, max = 500))]
    pub query: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AiCreateForm {
    #[validate(length(min = 1, max = 20000))]
    pub unstructured_data: String,
    #[serde(default)]
    pub data_type: DataKind,
}

fn dry_run_default() -> bool {
    true
}

/// Deletion by query is a dry run unless the caller opts out.
#[derive(Debug, Deserialize, Validate)]
pub struct AiDeleteForm {
    #[validate(length(min = 1, max = 500))]
    pub query: String,
    #[serde(default = "dry_run_default")]
    pub dry_run: bool,
}
