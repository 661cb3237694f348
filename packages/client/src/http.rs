use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    session::SessionHandle,
};

/// Single request path for the Taskdeck API.
///
/// Authenticated calls attach `Authorization: Bearer <token>` from the shared
/// session. A 401 on any of them ends that session here, so call sites never
/// handle the rule themselves.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST without credentials (login and registration). The raw response is
    /// returned so the caller can read error bodies on failure statuses.
    pub(crate) async fn post_anonymous<B>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("POST {} (anonymous)", url);

        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        Ok(response)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let (token, generation) = self
            .session
            .credentials()
            .await
            .ok_or(ClientError::NotAuthenticated)?;

        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                warn!("{} {} returned 401", method, path);
                self.session.force_logout(generation).await;
                Err(ClientError::Unauthorized)
            }
            status if status.is_success() => Ok(response),
            status => {
                debug!("{} {} failed with {}", method, path, status);
                Err(ClientError::from_response(response).await)
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// POST whose response body is not needed
    pub async fn post<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    /// PUT whose response body is not needed; callers refetch afterwards
    pub async fn put<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
