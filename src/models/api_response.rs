use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
pub const DEFAULT_ERROR_CODE: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
}

/// Uniform `{success, data, error, sourceProvider}` envelope returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub error: Option<ErrorBody>,
    pub data: Option<Value>,
    pub source_provider: Option<String>,
}

impl ApiResponse {
    pub fn success(data: Value, source_provider: Option<&str>) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
            source_provider: source_provider.map(str::to_owned),
        }
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(ErrorBody {
                message: message.into(),
                code: code.into(),
            }),
            data: None,
            source_provider: None,
        }
    }

    /// Permissive decode of an upstream body.
    ///
    /// A missing `success` reads as `false`. A failed envelope always carries an error,
    /// falling back to "Unknown error" / "ERROR", and never carries data.
    pub fn from_json(body: &Value) -> Self {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        let source_provider = body
            .get("sourceProvider")
            .and_then(Value::as_str)
            .map(str::to_owned);

        if success {
            let data = body.get("data").filter(|d| !d.is_null()).cloned();
            return Self {
                success,
                error: None,
                data,
                source_provider,
            };
        }

        let error = body.get("error").filter(|e| !e.is_null());
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MESSAGE);
        let code = error
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_CODE);

        Self {
            success,
            error: Some(ErrorBody {
                message: message.to_owned(),
                code: code.to_owned(),
            }),
            data: None,
            source_provider,
        }
    }

    pub fn to_envelope(&self) -> Value {
        json!({
            "success": self.success,
            "error": self.error,
            "data": self.data,
            "sourceProvider": self.source_provider,
        })
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}
