//! Backend forward path.
//!
//! In production mode an endpoint invocation is passed through to the real
//! backend. Call-time parameters are split into path/query/header/body
//! buckets, either by explicit declaration or by heuristic, and the parsed
//! JSON body is returned unmodified.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use symulate_core::endpoint::{EndpointDefinition, HttpMethod, ParamLocation};
use symulate_core::{Error, Result, SymulateConfig};

/// Client for pass-through invocations against the real backend.
pub struct BackendForwarder {
    client: Client,
    base_url: String,
}

#[derive(Default)]
struct Buckets {
    path: Vec<(String, String)>,
    query: Vec<(String, String)>,
    header: Vec<(String, String)>,
    body: Map<String, Value>,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl BackendForwarder {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build from the SDK-wide configuration. A backend base URL is
    /// required for pass-through mode.
    pub fn from_config(config: &SymulateConfig) -> Result<Self> {
        let base_url = config.backend_base_url.as_ref().ok_or_else(|| {
            Error::Config(
                "Pass-through mode requires a backend base URL. Set SYMULATE_BACKEND_URL \
                 or pass backend_base_url in the configuration."
                    .to_string(),
            )
        })?;
        Self::new(base_url, config.timeout_seconds)
    }

    /// Forward one invocation and return the parsed JSON response body.
    pub async fn forward(
        &self,
        def: &EndpointDefinition,
        params: Option<&Map<String, Value>>,
    ) -> Result<Value> {
        let buckets = Self::bucket_params(def, params);
        let url = self.build_url(def, &buckets);

        debug!(
            endpoint = %def.registry_key(),
            url = %url,
            "Forwarding to backend"
        );

        let mut request = match def.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        if !buckets.query.is_empty() {
            request = request.query(&buckets.query);
        }
        for (name, value) in &buckets.header {
            request = request.header(name, value);
        }
        let send_body = !matches!(def.method, HttpMethod::Get | HttpMethod::Delete)
            && !buckets.body.is_empty();
        if send_body {
            request = request.json(&buckets.body);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BackendForward {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        Ok(response.json().await?)
    }

    // Split params into path/query/header/body buckets. Explicit
    // ParameterSpec locations win, except that a param whose name appears
    // as a `:name` token in the path template is always a path param.
    // Undeclared params follow the method heuristic: GET → query,
    // everything else → body.
    fn bucket_params(def: &EndpointDefinition, params: Option<&Map<String, Value>>) -> Buckets {
        let mut buckets = Buckets::default();
        let Some(params) = params else {
            return buckets;
        };

        for (name, value) in params {
            if def.is_path_param(name) {
                buckets.path.push((name.clone(), value_text(value)));
                continue;
            }

            let declared = def.params.iter().find(|p| &p.name == name);
            match declared.map(|p| p.location) {
                Some(ParamLocation::Path) => {
                    // Declared as path but absent from the template.
                    warn!(param = %name, "Path parameter has no :token in the path template, dropping");
                }
                Some(ParamLocation::Query) => {
                    buckets.query.push((name.clone(), value_text(value)));
                }
                Some(ParamLocation::Header) => {
                    buckets.header.push((name.clone(), value_text(value)));
                }
                Some(ParamLocation::Body) => {
                    buckets.body.insert(name.clone(), value.clone());
                }
                None => {
                    if def.method == HttpMethod::Get {
                        buckets.query.push((name.clone(), value_text(value)));
                    } else {
                        buckets.body.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        buckets
    }

    fn build_url(&self, def: &EndpointDefinition, buckets: &Buckets) -> String {
        let mut path = def.path.clone();
        for (name, value) in &buckets.path {
            path = path.replace(&format!(":{}", name), value);
        }
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use symulate_core::endpoint::ParameterSpec;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    async fn forwarder(server: &MockServer) -> BackendForwarder {
        BackendForwarder::new(server.uri(), 5).expect("forwarder")
    }

    #[test]
    fn missing_base_url_is_config_error() {
        let config = SymulateConfig::default();
        let err = BackendForwarder::from_config(&config).err().expect("error");
        match err {
            Error::Config(msg) => assert!(msg.contains("SYMULATE_BACKEND_URL")),
            other => panic!("Expected Config, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn path_tokens_substituted_textually() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Get, "/api/users/:id");
        let result = forwarder(&server)
            .await
            .forward(&def, Some(&params(json!({"id": 42}))))
            .await
            .expect("success");
        assert_eq!(result, json!({"id": 42}));
    }

    #[tokio::test]
    async fn get_heuristic_puts_params_in_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("limit", "10"))
            .and(query_param("sort", "name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Get, "/api/users");
        let result = forwarder(&server)
            .await
            .forward(&def, Some(&params(json!({"limit": 10, "sort": "name"}))))
            .await
            .expect("success");
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn post_heuristic_puts_params_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(body_json(json!({"name": "Ada", "age": 36})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Post, "/api/users");
        let result = forwarder(&server)
            .await
            .forward(&def, Some(&params(json!({"name": "Ada", "age": 36}))))
            .await
            .expect("success");
        assert_eq!(result, json!({"created": true}));
    }

    #[tokio::test]
    async fn explicit_locations_win() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .and(query_param("q", "mocks"))
            .and(header("x-trace", "t-1"))
            .and(body_json(json!({"page": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": 0})))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Post, "/api/search").with_params(vec![
            ParameterSpec::new("q", ParamLocation::Query),
            ParameterSpec::new("x-trace", ParamLocation::Header),
            ParameterSpec::new("page", ParamLocation::Body),
        ]);
        let result = forwarder(&server)
            .await
            .forward(
                &def,
                Some(&params(json!({"q": "mocks", "x-trace": "t-1", "page": 2}))),
            )
            .await
            .expect("success");
        assert_eq!(result, json!({"hits": 0}));
    }

    #[tokio::test]
    async fn path_template_overrides_declared_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        // Declared as query, but `:id` appears in the template — path wins.
        let def = EndpointDefinition::new(HttpMethod::Get, "/api/users/:id")
            .with_params(vec![ParameterSpec::new("id", ParamLocation::Query)]);
        let result = forwarder(&server)
            .await
            .forward(&def, Some(&params(json!({"id": 7}))))
            .await
            .expect("success");
        assert_eq!(result, json!({"ok": true}));
    }

    #[tokio::test]
    async fn delete_never_sends_a_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Delete, "/api/users/:id");
        // The extra param routes to the body bucket but DELETE drops it.
        let result = forwarder(&server)
            .await
            .forward(&def, Some(&params(json!({"id": 9, "force": true}))))
            .await
            .expect("success");
        assert_eq!(result, json!({"deleted": true}));
    }

    #[tokio::test]
    async fn non_2xx_maps_to_backend_forward_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let def = EndpointDefinition::new(HttpMethod::Get, "/api/users");
        let err = forwarder(&server)
            .await
            .forward(&def, None)
            .await
            .unwrap_err();
        match err {
            Error::BackendForward {
                status,
                status_text,
            } => {
                assert_eq!(status, 502);
                assert_eq!(status_text, "Bad Gateway");
            }
            other => panic!("Expected BackendForward, got {:?}", other),
        }
    }
}
