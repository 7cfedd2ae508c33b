//! HTTP client for the Parse-style function backend.
//!
//! Every operation is an authenticated `POST {base_url}/functions/<name>`
//! whose JSON response wraps the payload in `{"result": ...}`.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ResolvedConfig;
use crate::error::ApiError;
use crate::session::Session;

const APPLICATION_ID_HEADER: &str = "X-Parse-Application-Id";
const REST_API_KEY_HEADER: &str = "X-Parse-REST-API-Key";
const SESSION_TOKEN_HEADER: &str = "X-Parse-Session-Token";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    result: Option<T>,
}

/// Parse error body: `{"code": 141, "error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the backend's cloud functions.
#[derive(Debug, Clone)]
pub struct BaasClient {
    client: Client,
    base_url: String,
    application_id: String,
    rest_api_key: SecretString,
}

impl BaasClient {
    pub fn new(
        base_url: impl Into<String>,
        application_id: impl Into<String>,
        rest_api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            application_id: application_id.into(),
            rest_api_key: SecretString::from(rest_api_key.into()),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            application_id: config.application_id.clone(),
            rest_api_key: config.rest_api_key.clone(),
        }
    }

    /// Replace the underlying HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn function_url(&self, function: &str) -> String {
        format!("{}/functions/{function}", self.base_url)
    }

    /// Call `function` with the session credential attached.
    ///
    /// A missing or `null` result decodes to `T::default()`.
    pub async fn call<B, T>(&self, session: &Session, function: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        self.dispatch(Some(session), function, body).await
    }

    /// Call `function` without a session (e.g. `signup`).
    pub async fn call_anonymous<B, T>(&self, function: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        self.dispatch(None, function, body).await
    }

    async fn dispatch<B, T>(
        &self,
        session: Option<&Session>,
        function: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let mut request = self
            .client
            .post(self.function_url(function))
            .header(APPLICATION_ID_HEADER, &self.application_id)
            .header(REST_API_KEY_HEADER, self.rest_api_key.expose_secret())
            .json(body);
        if let Some(session) = session {
            request = request.header(SESSION_TOKEN_HEADER, session.token());
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            function: function.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            function: function.to_string(),
            source,
        })?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<ErrorBody>(&text).ok();
            let code = parsed.as_ref().and_then(|b| b.code);
            let message = parsed
                .and_then(|b| b.error)
                .unwrap_or_else(|| text.trim().to_string());
            tracing::debug!(function, %status, ?code, "Function call rejected");
            return Err(ApiError::Function {
                function: function.to_string(),
                status,
                code,
                message,
            });
        }

        decode_result(function, &text)
    }
}

fn decode_result<T>(function: &str, text: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    let envelope: Envelope<T> =
        serde_json::from_str(text).map_err(|source| ApiError::Decode {
            function: function.to_string(),
            source,
        })?;
    Ok(envelope.result.unwrap_or_default())
}

/// Request body for functions that take no parameters.
#[derive(Debug, Default, Serialize)]
pub struct NoParams {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn missing_result_decodes_to_default() {
        let items: Vec<Value> = decode_result("list-active-products", "{}").unwrap();
        assert!(items.is_empty());
        let items: Vec<Value> =
            decode_result("list-active-products", r#"{"result": null}"#).unwrap();
        assert!(items.is_empty());
        let items: Vec<Value> = decode_result("list-active-products", "").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = decode_result::<Vec<Value>>("list-active-products", r#"{"result": 5}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref function, .. } if function == "list-active-products"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BaasClient::new("http://localhost:1337/parse/", "app", "key");
        assert_eq!(
            client.function_url("add-sale"),
            "http://localhost:1337/parse/functions/add-sale"
        );
    }

    #[test]
    fn no_params_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&NoParams {}).unwrap(), "{}");
    }
}
