use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parts of an inbound request the logger records.
pub trait Request {
    fn remote_address(&self) -> &str;
    fn params(&self) -> Option<&Value>;
    fn query(&self) -> Option<&Value>;
    fn body(&self) -> Option<&Value>;
}

/// An outbound response that can be completed with a status and a text body.
pub trait Response {
    fn send_status(&mut self, status: StatusCode, body: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub remote_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestRecord {
    pub fn new(remote_address: impl Into<String>) -> Self {
        Self {
            remote_address: remote_address.into(),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl Request for RequestRecord {
    fn remote_address(&self) -> &str {
        &self.remote_address
    }

    fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Captures whatever was sent, for callers that render the reply themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseRecord {
    pub status: Option<StatusCode>,
    pub body: Option<String>,
}

impl Response for ResponseRecord {
    fn send_status(&mut self, status: StatusCode, body: &str) {
        self.status = Some(status);
        self.body = Some(body.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_record_deserializes_with_optional_fields() {
        let record: RequestRecord =
            serde_json::from_value(json!({"remote_address": "10.0.0.1", "query": {"q": "x"}}))
                .unwrap();

        assert_eq!(record.remote_address(), "10.0.0.1");
        assert_eq!(record.params(), None);
        assert_eq!(record.query(), Some(&json!({"q": "x"})));
        assert_eq!(record.body(), None);
    }

    #[test]
    fn response_record_keeps_last_reply() {
        let mut response = ResponseRecord::default();
        response.send_status(StatusCode::INTERNAL_SERVER_ERROR, "oops");

        assert_eq!(response.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(response.body.as_deref(), Some("oops"));
    }
}
