//! Reqwest-backed client for the article and subscriber endpoints.
//!
//! Owns transport details only: URL construction, the session cookie jar,
//! JSON encoding and mapping of error bodies. Admin calls need a prior
//! [`ApiClient::login`] on the same client so the session cookie is sent.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::define_port_error;
use crate::domain::{AdminProfile, Article, Subscriber, Subscription};
use crate::inbound::http::admin::LoginRequest;
use crate::inbound::http::articles::{CreateArticleRequest, MessageResponse, UpdateArticleRequest};
use crate::inbound::http::subscribers::{SubscribeRequest, UpdateSubscriberRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const PREVIEW_CHAR_LIMIT: usize = 160;

define_port_error! {
    /// Failures surfaced by [`ApiClient`].
    pub enum ClientError {
        InvalidUrl { message: String } => "invalid API url: {message}",
        Transport { message: String } => "request failed: {message}",
        Timeout { message: String } => "request timed out: {message}",
        /// The server answered with a non-success status.
        Api { status: u16, message: String } => "status {status}: {message}",
        Decode { message: String } => "invalid response body: {message}",
    }
}

impl ClientError {
    /// HTTP status for [`ClientError::Api`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubscribeBody {
    Created(Subscriber),
    Message(MessageResponse),
}

/// Typed client for the FootballVoice API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client rooted at `base` (for example `http://localhost:8080/`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url) -> Result<Self, ClientError> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(mut base: Url, timeout: Duration) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::invalid_url(base.as_str()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|err| ClientError::invalid_url(err.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|err| ClientError::decode(err.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    pub async fn list_published_articles(&self) -> Result<Vec<Article>, ClientError> {
        self.send(self.client.get(self.url("api/articles")?)).await
    }

    /// Fetch a published article; counts as a view.
    pub async fn read_article(&self, id: Uuid) -> Result<Article, ClientError> {
        self.send(self.client.get(self.url(&format!("api/articles/{id}"))?))
            .await
    }

    /// Sign in and keep the session cookie for later admin calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminProfile, ClientError> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.send(self.client.post(self.url("api/admin/login")?).json(&body))
            .await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send_empty(self.client.post(self.url("api/admin/logout")?))
            .await
    }

    pub async fn list_articles(&self) -> Result<Vec<Article>, ClientError> {
        self.send(self.client.get(self.url("api/admin/articles")?))
            .await
    }

    pub async fn create_article(
        &self,
        article: &CreateArticleRequest,
    ) -> Result<Article, ClientError> {
        self.send(
            self.client
                .post(self.url("api/admin/articles")?)
                .json(article),
        )
        .await
    }

    pub async fn update_article(
        &self,
        id: Uuid,
        patch: &UpdateArticleRequest,
    ) -> Result<Article, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("api/admin/articles/{id}"))?)
                .json(patch),
        )
        .await
    }

    pub async fn delete_article(&self, id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(
                self.client
                    .delete(self.url(&format!("api/admin/articles/{id}"))?),
            )
            .await?;
        Ok(())
    }

    /// Subscribe an email. A known email yields
    /// [`Subscription::AlreadySubscribed`] rather than an error.
    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<Subscription, ClientError> {
        let body: SubscribeBody = self
            .send(self.client.post(self.url("api/subscribers")?).json(request))
            .await?;
        Ok(match body {
            SubscribeBody::Created(subscriber) => Subscription::Created(subscriber),
            SubscribeBody::Message(_) => Subscription::AlreadySubscribed,
        })
    }

    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>, ClientError> {
        self.send(self.client.get(self.url("api/admin/subscribers")?))
            .await
    }

    pub async fn update_subscriber(
        &self,
        id: Uuid,
        patch: &UpdateSubscriberRequest,
    ) -> Result<Subscriber, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("api/admin/subscribers/{id}"))?)
                .json(patch),
        )
        .await
    }

    pub async fn delete_subscriber(&self, id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(
                self.client
                    .delete(self.url(&format!("api/admin/subscribers/{id}"))?),
            )
            .await?;
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::timeout(error.to_string())
    } else {
        ClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body_preview(body),
    };
    ClientError::api(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/api/articles")]
    #[case("http://localhost:8080/", "http://localhost:8080/api/articles")]
    #[case("https://example.com/blog", "https://example.com/blog/api/articles")]
    fn endpoints_resolve_under_the_base(#[case] base: &str, #[case] expected: &str) {
        let client = ApiClient::new(Url::parse(base).expect("valid url")).expect("client");
        assert_eq!(client.url("api/articles").expect("joined").as_str(), expected);
    }

    #[rstest]
    fn opaque_base_is_rejected() {
        let base = Url::parse("mailto:editor@example.com").expect("valid url");
        assert!(matches!(
            ApiClient::new(base),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[rstest]
    #[case(
        StatusCode::NOT_FOUND,
        br#"{"error":"Article not found","code":"not_found"}"#.as_slice(),
        "Article not found"
    )]
    #[case(StatusCode::BAD_GATEWAY, b"<html>  upstream\n down </html>".as_slice(), "<html> upstream down </html>")]
    fn status_errors_prefer_the_error_field(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] message: &str,
    ) {
        let error = map_status_error(status, body);
        assert_eq!(error.status(), Some(status.as_u16()));
        assert_eq!(error, ClientError::api(status.as_u16(), message));
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(PREVIEW_CHAR_LIMIT + 10);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }
}
