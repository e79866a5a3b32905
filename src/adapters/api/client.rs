//! Shared HTTP client for the MindMorph backend.
//!
//! Every request carries an `X-Request-Id` header that is also recorded on
//! the tracing span. Non-success statuses are mapped onto [`ClientError`]
//! with the backend's own message when it sent one.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::dto::ErrorBody;
use crate::config::ApiConfig;
use crate::domain::foundation::{AuthError, ClientError};
use crate::ports::CredentialSource;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// How a request authenticates.
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    /// No credentials (login, signup, demo usernames).
    Public,
    /// The current session's token, from the credential source.
    Session,
    /// An explicit token, used while restoring a session.
    Token(&'a SecretString),
}

/// Thin wrapper over `reqwest::Client` bound to one backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Creates a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            timeout: config.timeout(),
            credentials: None,
        })
    }

    /// Attaches the source of bearer tokens for `Auth::Session` requests.
    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth<'_>,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, auth, None::<&()>).await?;
        Self::decode(response).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B, auth: Auth<'_>) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, auth, Some(body)).await?;
        Self::decode(response).await
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
        body: Option<&B>,
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "api_request",
            method = %method,
            path = %path,
            request_id = %request_id,
        );

        async {
            let mut builder = self
                .client
                .request(method.clone(), self.url(path))
                .header(REQUEST_ID_HEADER, request_id.to_string());
            if let Some(body) = body {
                builder = builder.json(body);
            }
            builder = self.authorize(builder, auth)?;

            let response = builder.send().await.map_err(|e| self.transport_error(e))?;
            let status = response.status();
            tracing::debug!(status = status.as_u16(), "Backend responded");

            if status.is_success() {
                return Ok(response);
            }
            Err(self.status_error(status, response, auth).await)
        }
        .instrument(span)
        .await
    }

    fn authorize(&self, builder: RequestBuilder, auth: Auth<'_>) -> Result<RequestBuilder, ClientError> {
        match auth {
            Auth::Public => Ok(builder),
            Auth::Token(token) => Ok(builder.bearer_auth(token.expose_secret())),
            Auth::Session => {
                let token = self
                    .credentials
                    .as_ref()
                    .and_then(|source| source.bearer_token())
                    .ok_or_else(|| {
                        tracing::debug!("No session token; request not sent");
                        ClientError::from(AuthError::InvalidToken)
                    })?;
                Ok(builder.bearer_auth(token.expose_secret()))
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            tracing::warn!("Request timed out");
            ClientError::network(format!(
                "Request timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if e.is_connect() {
            tracing::warn!(error = %e, "Connection failed");
            ClientError::network(format!("Connection failed: {}", e))
        } else {
            tracing::warn!(error = %e, "Request failed");
            ClientError::network(e.to_string())
        }
    }

    async fn status_error(&self, status: StatusCode, response: Response, auth: Auth<'_>) -> ClientError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);

        match (status, auth) {
            (StatusCode::UNAUTHORIZED, Auth::Public) => {
                tracing::info!("Credentials rejected");
                AuthError::invalid_credentials(
                    message.unwrap_or_else(|| "Invalid email or password".to_string()),
                )
                .into()
            }
            (StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY, Auth::Session) => {
                tracing::warn!(status = status.as_u16(), "Session token rejected");
                if let Some(source) = &self.credentials {
                    source.on_unauthorized().await;
                }
                token_error(message.as_deref()).into()
            }
            (StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY, Auth::Token(_)) => {
                token_error(message.as_deref()).into()
            }
            (StatusCode::NOT_FOUND, _) => {
                ClientError::not_found(message.unwrap_or_else(|| "Not found".to_string()))
            }
            _ => {
                tracing::error!(status = status.as_u16(), "Backend request failed");
                ClientError::Backend {
                    status: status.as_u16(),
                    message: message
                        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
                }
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(format!("Failed to read response: {}", e)))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode backend response");
            ClientError::Decode(e.to_string())
        })
    }
}

fn token_error(message: Option<&str>) -> AuthError {
    match message {
        Some(m) if m.to_lowercase().contains("expired") => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/auth/login"), "http://localhost:5000/api/auth/login");
        assert_eq!(client.url("text/history"), "http://localhost:5000/api/text/history");
    }

    #[test]
    fn expired_message_maps_to_token_expired() {
        assert_eq!(token_error(Some("Token has expired")), AuthError::TokenExpired);
        assert_eq!(token_error(Some("Not enough segments")), AuthError::InvalidToken);
        assert_eq!(token_error(None), AuthError::InvalidToken);
    }

    #[test]
    fn debug_does_not_leak_internals() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("base_url"));
        assert!(rendered.contains("has_credentials: false"));
    }
}
