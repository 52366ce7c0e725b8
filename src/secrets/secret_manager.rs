use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use super::SecretError;

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const DEFAULT_API_BASE: &str = "https://secretmanager.googleapis.com/v1";
const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

/// Minimal Google Secret Manager client.
///
/// Authenticates as the runtime's default service account through the
/// metadata server, then reads secret versions over the REST API.
#[derive(Debug, Clone)]
pub struct SecretManagerClient {
    http: reqwest::Client,
    metadata_base: String,
    api_base: String,
}

impl SecretManagerClient {
    /// Honors `GCE_METADATA_HOST` like the Google client libraries do.
    pub fn from_env() -> Self {
        let host = std::env::var("GCE_METADATA_HOST")
            .unwrap_or_else(|_| DEFAULT_METADATA_HOST.to_string());
        Self::with_endpoints(format!("http://{}", host), DEFAULT_API_BASE)
    }

    pub fn with_endpoints(metadata_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            metadata_base: metadata_base.into(),
            api_base: api_base.into(),
        }
    }

    /// Read the secret payload as UTF-8 text.
    pub async fn access(&self, name: &str) -> Result<String, SecretError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}:access", self.api_base, version_path(name));
        debug!(secret = %name, "accessing secret version");

        let response: AccessResponse = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(response.payload.data.as_bytes())
            .map_err(|e| SecretError::Payload {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        String::from_utf8(bytes).map_err(|e| SecretError::Payload {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    async fn access_token(&self) -> Result<String, SecretError> {
        let token: TokenResponse = self
            .http
            .get(format!("{}{}", self.metadata_base, TOKEN_PATH))
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(token.access_token)
    }
}

/// `projects/p/secrets/s` means the latest version.
pub fn version_path(name: &str) -> String {
    let name = name.trim_matches('/');
    if name.contains("/versions/") {
        name.to_string()
    } else {
        format!("{}/versions/latest", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    #[test]
    fn appends_latest_version_when_missing() {
        assert_eq!(
            version_path("projects/fretter/secrets/x509-public"),
            "projects/fretter/secrets/x509-public/versions/latest"
        );
        assert_eq!(
            version_path("projects/fretter/secrets/x509-public/versions/3"),
            "projects/fretter/secrets/x509-public/versions/3"
        );
    }

    async fn token(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
        match headers.get("Metadata-Flavor") {
            Some(v) if v == "Google" => Ok(Json(json!({
                "access_token": "test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            }))),
            _ => Err(StatusCode::FORBIDDEN),
        }
    }

    async fn access(Path(rest): Path<String>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-token") {
            return Err(StatusCode::UNAUTHORIZED);
        }
        if rest != "projects/fretter/secrets/cert/versions/latest:access" {
            return Err(StatusCode::NOT_FOUND);
        }
        let data = base64::engine::general_purpose::STANDARD.encode("-----BEGIN CERTIFICATE-----");
        Ok(Json(json!({
            "name": "projects/fretter/secrets/cert/versions/1",
            "payload": { "data": data }
        })))
    }

    async fn fake_google() -> String {
        let app = Router::new()
            .route(TOKEN_PATH, get(token))
            .route("/v1/*rest", get(access));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn reads_and_decodes_secret_payload() {
        let base = fake_google().await;
        let client = SecretManagerClient::with_endpoints(base.clone(), format!("{}/v1", base));

        let pem = client.access("projects/fretter/secrets/cert").await.unwrap();
        assert_eq!(pem, "-----BEGIN CERTIFICATE-----");
    }

    #[tokio::test]
    async fn missing_secret_is_an_http_error() {
        let base = fake_google().await;
        let client = SecretManagerClient::with_endpoints(base.clone(), format!("{}/v1", base));

        let err = client.access("projects/fretter/secrets/other").await.unwrap_err();
        assert!(matches!(err, SecretError::Http(_)), "{err:?}");
    }
}
