use http::header::AUTHORIZATION;
use http::Method;
use serde_json::Value;

/// One outbound call: built per operation, dropped after dispatch.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// metrics / log label
    pub operation: &'static str,
    /// code reported in the envelope when the call fails
    pub error_code: &'static str,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>, operation: &'static str, error_code: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            query: Vec::new(),
            operation,
            error_code,
        }
    }

    pub fn get(path: impl Into<String>, operation: &'static str, error_code: &'static str) -> Self {
        Self::new(Method::GET, path, operation, error_code)
    }

    pub fn post(path: impl Into<String>, operation: &'static str, error_code: &'static str) -> Self {
        Self::new(Method::POST, path, operation, error_code)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn bearer(self, token: impl Into<String>) -> Self {
        self.header(AUTHORIZATION.as_str(), format!("Bearer {}", token.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_becomes_authorization_header() {
        let spec = RequestSpec::get("/catalogue-adapter/view", "get_catalogue", "GET_CATALOGUE_ERROR")
            .bearer("tok-abc");
        assert_eq!(
            spec.headers,
            vec![("authorization".to_owned(), "Bearer tok-abc".to_owned())]
        );
        assert!(spec.body.is_none());
    }
}
