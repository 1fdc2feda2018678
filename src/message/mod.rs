//! Transport boundary: what goes over the wire to the remote matcher
//!
//! The router only ever posts one JSON payload shape and expects one JSON
//! response shape back. Everything transport-level (network failure, non-2xx,
//! garbled body) surfaces as a single uniform error; the state machine folds
//! it into `api_error` without distinguishing causes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::ActionPathSchema;

/// Outbound request body. The schema-descriptor form is the sole contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessagePayload {
    pub message: String,
    pub action_path_schemas: Vec<ActionPathSchema>,
}

/// One matched parameter value: scalar or ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

/// The remote matcher's resolution of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub path: String,
    pub params: Option<BTreeMap<String, ParamValue>>,
    pub original_message: String,
}

/// Transport collaborator. One call per send; any failure is one error.
#[async_trait]
pub trait MessageService: Send + Sync {
    async fn post_message(&self, payload: PostMessagePayload) -> Result<ActionResult>;
}

/// Transport configuration. Higher layers construct this.
#[derive(Debug, Clone)]
pub struct MessageServiceConfig {
    pub endpoint: String,
    /// No timeout by default: a hung matcher leaves the send in flight,
    /// which is the transport's responsibility to bound, not the router's.
    pub timeout_seconds: Option<u64>,
}

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/action-router/get-action";

impl Default for MessageServiceConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.into(), timeout_seconds: None }
    }
}

impl MessageServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout_seconds: None }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Default config, with `ACTION_ROUTER_ENDPOINT` overriding the endpoint.
    pub fn from_env() -> Self {
        match std::env::var("ACTION_ROUTER_ENDPOINT") {
            Ok(endpoint) if !endpoint.is_empty() => Self::new(endpoint),
            _ => Self::default(),
        }
    }
}

/// JSON-over-HTTP `MessageService`.
pub struct HttpMessageService {
    config: MessageServiceConfig,
    client: Client,
}

impl HttpMessageService {
    pub fn new(config: MessageServiceConfig) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl Default for HttpMessageService {
    fn default() -> Self {
        Self::new(MessageServiceConfig::default())
    }
}

#[async_trait]
impl MessageService for HttpMessageService {
    async fn post_message(&self, payload: PostMessagePayload) -> Result<ActionResult> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.config.endpoint))?;

        let response = response.error_for_status().context("matcher returned error status")?;

        let result: ActionResult =
            response.json().await.context("malformed matcher response body")?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ActionPath;
    use crate::schema::SchemaSet;
    use serde_json::json;

    #[test]
    fn payload_serializes_schema_descriptors() {
        let set = SchemaSet::compile(&[ActionPath::new("search")]).unwrap();
        let payload = PostMessagePayload {
            message: "find me pizza".into(),
            action_path_schemas: set.schemas().to_vec(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["message"], "find me pizza");
        assert_eq!(value["actionPathSchemas"][0]["path"], "search");
        assert!(value["actionPathSchemas"][0]["responseFormat"].is_object());
    }

    #[test]
    fn action_result_round_trips_scalar_and_list_params() {
        let result: ActionResult = serde_json::from_value(json!({
            "path": "order",
            "params": {"city": "Paris", "toppings": ["olive", "basil"]},
            "originalMessage": "pizza in paris"
        }))
        .unwrap();
        let params = result.params.as_ref().unwrap();
        assert_eq!(params["city"], ParamValue::One("Paris".into()));
        assert_eq!(params["toppings"], ParamValue::Many(vec!["olive".into(), "basil".into()]));
        assert_eq!(result.original_message, "pizza in paris");
    }

    #[test]
    fn action_result_accepts_null_params() {
        let result: ActionResult = serde_json::from_value(json!({
            "path": "help",
            "params": null,
            "originalMessage": "help me"
        }))
        .unwrap();
        assert!(result.params.is_none());
    }

    #[test]
    fn config_builder_and_default_endpoint() {
        let config = MessageServiceConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout_seconds.is_none());

        let config = MessageServiceConfig::new("http://matcher:9000/match").with_timeout(5);
        assert_eq!(config.timeout_seconds, Some(5));
        assert_eq!(HttpMessageService::new(config).endpoint(), "http://matcher:9000/match");
    }
}
