use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    ApiConfig, Result, RuleflowError,
    api::{
        RuleApi,
        wire::{ErrorResponse, RuleDetailsResponse, SaveRuleRequest, SaveRuleResponse},
    },
    model::{ExecutionResult, FunctionDescriptor, PersistedEdge, PersistedNode, Rule, RuleId, RuleSummary},
};

/// [`RuleApi`] over HTTP + JSON.
///
/// Endpoint paths are joined onto the configured base url, so a base of
/// `http://host/rule_engine/` yields `http://host/rule_engine/rules/`.
#[derive(Debug, Clone)]
pub struct HttpRuleApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRuleApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout));
        }
        let client = builder.build().map_err(|e| RuleflowError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        debug!("rule api {} {}", method, url);
        Ok(self.client.request(method, url))
    }

    /// Send a request and turn failure statuses into errors. `rule_id` marks
    /// requests addressing one rule, for which 404 means the rule is gone.
    async fn send(
        &self,
        request: RequestBuilder,
        what: &str,
        rule_id: Option<RuleId>,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|e| RuleflowError::Transport(format!("{}: {}", what, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);
        warn!("rule api {} failed with status {}: {}", what, status.as_u16(), message);

        match (status, rule_id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(RuleflowError::NotFound(format!("rule {} does not exist", id))),
            _ => Err(RuleflowError::Transport(format!("{}: http status {}: {}", what, status.as_u16(), message))),
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T> {
        let bytes = response.bytes().await.map_err(|e| RuleflowError::Transport(format!("{}: {}", what, e)))?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| RuleflowError::Convert(format!("{}: invalid response body: {}", what, e)))
    }
}

#[async_trait]
impl RuleApi for HttpRuleApi {
    async fn list_functions(&self) -> Result<Vec<FunctionDescriptor>> {
        let what = "list functions";
        let response = self.send(self.request(Method::GET, "functions/")?, what, None).await?;
        Self::decode(response, what).await
    }

    async fn list_rules(&self) -> Result<Vec<RuleSummary>> {
        let what = "list rules";
        let response = self.send(self.request(Method::GET, "rules/")?, what, None).await?;
        Self::decode(response, what).await
    }

    async fn fetch_rule_graph(
        &self,
        rule_id: RuleId,
    ) -> Result<Rule> {
        let what = "fetch rule";
        let response = self.send(self.request(Method::GET, &format!("rules/{}/", rule_id))?, what, Some(rule_id)).await?;
        let details: RuleDetailsResponse = Self::decode(response, what).await?;
        Ok(details.into_rule(rule_id))
    }

    async fn save_rule(
        &self,
        name: &str,
        nodes: &[PersistedNode],
        edges: &[PersistedEdge],
    ) -> Result<RuleSummary> {
        let what = "save rule";
        let body = SaveRuleRequest {
            rule_name: name,
            nodes,
            edges,
        };
        let response = self.send(self.request(Method::POST, "rules/save/")?.json(&body), what, None).await?;
        let saved: SaveRuleResponse = Self::decode(response, what).await?;
        Ok(saved.into_summary(name))
    }

    async fn delete_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("rules/{}/", rule_id))?, "delete rule", Some(rule_id)).await?;
        Ok(())
    }

    async fn execute_rule(
        &self,
        rule_id: RuleId,
    ) -> Result<ExecutionResult> {
        let what = "execute rule";
        let response = self.send(self.request(Method::POST, &format!("rules/{}/execute/", rule_id))?, what, Some(rule_id)).await?;
        let bytes = response.bytes().await.map_err(|e| RuleflowError::Transport(format!("{}: {}", what, e)))?;
        if bytes.is_empty() {
            return Ok(ExecutionResult::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| RuleflowError::Convert(format!("{}: invalid response body: {}", what, e)))
    }
}

/// Parse the base url and make sure it ends with a slash, otherwise `join`
/// would replace its last path segment.
fn normalize_base_url(base: &str) -> Result<Url> {
    let base = base.trim();
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{}/", base))?)
    }
}
