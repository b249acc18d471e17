use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::CatalogueError;

pub const MAX_PAGE_SIZE: u32 = 100;

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// ================================
/// Sign-in
/// ================================
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub api_key: String,
    pub client_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("client_id", &self.client_id)
            .finish()
    }
}

fn non_null<'a>(data: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    data.get(camel)
        .filter(|v| !v.is_null())
        .or_else(|| data.get(snake).filter(|v| !v.is_null()))
}

/// Token returned by the sign-in endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalToken {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

impl ExternalToken {
    /// The upstream has been seen answering in both camelCase and snake_case.
    /// A null under one spelling falls through to the other.
    pub fn from_data(data: &Value) -> Self {
        let access_token = non_null(data, "accessToken", "access_token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let expires_in = non_null(data, "expiresIn", "expires_in")
            .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));

        Self {
            access_token,
            expires_in,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "accessToken": self.access_token,
            "expiresIn": self.expires_in,
        })
    }
}

/// ================================
/// Pull SKU
/// ================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullSkuRequest {
    pub voucher_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub order_ref: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub customer_ref: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub transaction_id: Option<String>,
}

impl PullSkuRequest {
    pub fn new(voucher_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            voucher_id: voucher_id.into(),
            quantity,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CatalogueError> {
        let mut errors = Vec::new();
        if self.voucher_id.trim().is_empty() {
            errors.push("voucherId is required");
        }
        if self.quantity < 1 {
            errors.push("quantity must be at least 1");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogueError::validation(errors.join("; ")))
        }
    }

    pub fn to_body(&self) -> Result<Value, CatalogueError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// ================================
/// Customer log
/// ================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerLogType {
    New,
    Revealed,
    Redeemed,
    Expired,
}

impl CustomerLogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerLogType::New => "New",
            CustomerLogType::Revealed => "Revealed",
            CustomerLogType::Redeemed => "Redeemed",
            CustomerLogType::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLogQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub customer_ref: Option<String>,
    #[serde(default)]
    pub customer_log_type: Option<CustomerLogType>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for CustomerLogQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            customer_ref: None,
            customer_log_type: None,
        }
    }
}

impl CustomerLogQuery {
    pub fn validate(&self) -> Result<(), CatalogueError> {
        let mut errors = Vec::new();
        if self.page < 1 {
            errors.push(String::from("page must be at least 1"));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            errors.push(format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogueError::validation(errors.join("; ")))
        }
    }

    /// Query pairs, blank filters left out.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_owned(), self.page.to_string()),
            ("pageSize".to_owned(), self.page_size.to_string()),
        ];
        if let Some(customer_ref) = self.customer_ref.as_deref().filter(|v| !v.trim().is_empty()) {
            query.push(("customerRef".to_owned(), customer_ref.to_owned()));
        }
        if let Some(log_type) = self.customer_log_type {
            query.push(("customerLogType".to_owned(), log_type.as_str().to_owned()));
        }
        query
    }
}
