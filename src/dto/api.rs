//! JSON envelope shared by every API endpoint.

use serde::Serialize;

/// `{ success, message?, data?, warnings? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            warnings: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            warnings: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_envelope_omits_data_and_warnings() {
        let value = serde_json::to_value(ApiResponse::error("Contact 3 not found")).expect("json");
        assert_eq!(
            value,
            json!({"success": false, "message": "Contact 3 not found"})
        );
    }

    #[test]
    fn warnings_are_serialized_when_present() {
        let response = ApiResponse::ok(json!({"name": 1}))
            .with_message("Contact created successfully")
            .with_warnings(vec!["GSTIN is recommended for Hotel vendors".to_string()]);
        let value = serde_json::to_value(response).expect("json");
        assert_eq!(value["warnings"][0], "GSTIN is recommended for Hotel vendors");
        assert_eq!(value["data"]["name"], 1);
    }
}
