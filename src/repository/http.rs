//! Content API client over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::auth::{Credentials, Session};
use crate::domain::blog::{Blog, NewBlog};
use crate::domain::car::{Car, NewCar};
use crate::domain::lead::{ContactRequest, LeadSubmission};
use crate::domain::message::{LeadStatus, Message};
use crate::domain::types::DocumentId;
use crate::models::blog::{BlogPayload, BlogRecord};
use crate::models::car::{CarPayload, CarRecord};
use crate::models::config::PortalConfig;
use crate::models::envelope::{
    ApiErrorBody, CollectionEnvelope, DataEnvelope, PaginationMeta, SingleEnvelope,
};
use crate::models::message::{LeadPayload, MessageRecord, StatusPayload};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::query::{ListQuery, Page};
use crate::repository::{
    AuthProvider, BlogReader, BlogWriter, CarReader, CarWriter, ContactWriter, LeadWriter,
    MessageReader, MessageWriter,
};

const CARS: &str = "cars";
const BLOGS: &str = "blogs";
const MESSAGES: &str = "messages";
const CONTACT_FORM: &str = "contact-form";
const AUTH_LOCAL: &str = "auth/local";

/// Repository backed by the REST content API.
///
/// Cloning is cheap; clones share the connection pool. Write and admin-read
/// calls need a session attached with [`HttpRepository::with_session`].
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    media_base_url: String,
    token: Option<String>,
}

impl HttpRepository {
    pub fn new(config: &PortalConfig) -> RepositoryResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RepositoryError::Transport(format!("client setup: {e}")))?;

        Ok(Self::with_client(
            client,
            &config.api_base_url,
            &config.media_base_url,
        ))
    }

    pub fn with_client(client: Client, base_url: &str, media_base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            media_base_url: media_base_url.to_string(),
            token: None,
        }
    }

    /// Copy of this repository that authenticates as `session`.
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            token: Some(session.jwt.clone()),
            ..self.clone()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn require_token(&self) -> RepositoryResult<()> {
        if self.token.is_none() {
            return Err(RepositoryError::Unauthorized(
                "admin session required".to_string(),
            ));
        }
        Ok(())
    }

    async fn send(&self, builder: RequestBuilder) -> RepositoryResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = ApiErrorBody::message_from(&body);
        Err(match status {
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RepositoryError::Unauthorized(message.unwrap_or_default())
            }
            _ => RepositoryError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn fetch_collection<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> RepositoryResult<(Vec<R>, Option<PaginationMeta>)> {
        let qs = query.to_query_string()?;
        let url = if qs.is_empty() {
            self.url(path)
        } else {
            format!("{}?{qs}", self.url(path))
        };
        let envelope: CollectionEnvelope<R> =
            self.send(self.request(Method::GET, &url)).await?.json().await?;
        Ok((envelope.data, envelope.meta.pagination))
    }

    async fn fetch_single<R: DeserializeOwned>(
        &self,
        path: &str,
        id: &DocumentId,
    ) -> RepositoryResult<Option<R>> {
        let url = format!("{}/{}?populate=*", self.url(path), id.as_str());
        match self.send(self.request(Method::GET, &url)).await {
            Ok(response) => {
                let envelope: SingleEnvelope<R> = response.json().await?;
                Ok(envelope.data)
            }
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write<P: Serialize + Sync, R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        payload: &P,
    ) -> RepositoryResult<R> {
        let envelope: SingleEnvelope<R> = self
            .send(self.request(method, url).json(&DataEnvelope::new(payload)))
            .await?
            .json()
            .await?;
        envelope
            .data
            .ok_or_else(|| RepositoryError::Decode("response carried no data".to_string()))
    }

    async fn delete(&self, path: &str, id: &DocumentId) -> RepositoryResult<()> {
        self.require_token()?;
        let url = format!("{}/{}", self.url(path), id.as_str());
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }

    fn car_from(&self, record: CarRecord) -> RepositoryResult<Car> {
        Ok(record.into_domain(&self.media_base_url)?)
    }

    fn blog_from(&self, record: BlogRecord) -> RepositoryResult<Blog> {
        Ok(record.into_domain(&self.media_base_url)?)
    }
}

#[async_trait]
impl CarReader for HttpRepository {
    async fn list_cars(&self, query: &ListQuery) -> RepositoryResult<Page<Car>> {
        let (records, meta) = self.fetch_collection::<CarRecord>(CARS, query).await?;
        let cars = records
            .into_iter()
            .map(|r| self.car_from(r))
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::from_meta(cars, meta))
    }

    async fn get_car(&self, id: &DocumentId) -> RepositoryResult<Option<Car>> {
        self.fetch_single::<CarRecord>(CARS, id)
            .await?
            .map(|r| self.car_from(r))
            .transpose()
    }
}

#[async_trait]
impl CarWriter for HttpRepository {
    async fn create_car(&self, car: &NewCar) -> RepositoryResult<Car> {
        self.require_token()?;
        let record: CarRecord = self
            .write(Method::POST, &self.url(CARS), &CarPayload::from(car))
            .await?;
        self.car_from(record)
    }

    async fn update_car(&self, id: &DocumentId, car: &NewCar) -> RepositoryResult<Car> {
        self.require_token()?;
        let url = format!("{}/{}", self.url(CARS), id.as_str());
        let record: CarRecord = self
            .write(Method::PUT, &url, &CarPayload::from(car))
            .await?;
        self.car_from(record)
    }

    async fn delete_car(&self, id: &DocumentId) -> RepositoryResult<()> {
        self.delete(CARS, id).await
    }
}

#[async_trait]
impl BlogReader for HttpRepository {
    async fn list_blogs(&self, query: &ListQuery) -> RepositoryResult<Page<Blog>> {
        let (records, meta) = self.fetch_collection::<BlogRecord>(BLOGS, query).await?;
        let blogs = records
            .into_iter()
            .map(|r| self.blog_from(r))
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::from_meta(blogs, meta))
    }

    async fn get_blog(&self, id: &DocumentId) -> RepositoryResult<Option<Blog>> {
        self.fetch_single::<BlogRecord>(BLOGS, id)
            .await?
            .map(|r| self.blog_from(r))
            .transpose()
    }
}

#[async_trait]
impl BlogWriter for HttpRepository {
    async fn create_blog(&self, blog: &NewBlog) -> RepositoryResult<Blog> {
        self.require_token()?;
        let record: BlogRecord = self
            .write(Method::POST, &self.url(BLOGS), &BlogPayload::from(blog))
            .await?;
        self.blog_from(record)
    }

    async fn update_blog(&self, id: &DocumentId, blog: &NewBlog) -> RepositoryResult<Blog> {
        self.require_token()?;
        let url = format!("{}/{}", self.url(BLOGS), id.as_str());
        let record: BlogRecord = self
            .write(Method::PUT, &url, &BlogPayload::from(blog))
            .await?;
        self.blog_from(record)
    }

    async fn delete_blog(&self, id: &DocumentId) -> RepositoryResult<()> {
        self.delete(BLOGS, id).await
    }
}

#[async_trait]
impl MessageReader for HttpRepository {
    async fn list_messages(&self, query: &ListQuery) -> RepositoryResult<Page<Message>> {
        self.require_token()?;
        let (records, meta) = self
            .fetch_collection::<MessageRecord>(MESSAGES, query)
            .await?;
        let messages = records
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::from_meta(messages, meta))
    }
}

#[async_trait]
impl MessageWriter for HttpRepository {
    async fn update_message_status(
        &self,
        id: &DocumentId,
        status: LeadStatus,
    ) -> RepositoryResult<()> {
        self.require_token()?;
        let url = format!("{}/{}", self.url(MESSAGES), id.as_str());
        let payload = DataEnvelope::new(StatusPayload {
            lead_status: status,
        });
        self.send(self.request(Method::PUT, &url).json(&payload))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, id: &DocumentId) -> RepositoryResult<()> {
        self.delete(MESSAGES, id).await
    }
}

#[async_trait]
impl LeadWriter for HttpRepository {
    async fn create_message(&self, lead: &LeadSubmission) -> RepositoryResult<()> {
        let payload = DataEnvelope::new(LeadPayload::from(lead));
        self.send(
            self.request(Method::POST, &self.url(MESSAGES))
                .json(&payload),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ContactWriter for HttpRepository {
    async fn submit_contact(&self, request: &ContactRequest) -> RepositoryResult<()> {
        let payload = DataEnvelope::new(request);
        self.send(
            self.request(Method::POST, &self.url(CONTACT_FORM))
                .json(&payload),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session> {
        let response = self
            .send(
                self.client
                    .post(self.url(AUTH_LOCAL))
                    .json(credentials),
            )
            .await
            .map_err(|e| match e {
                // Bad credentials come back as 400 with a message.
                RepositoryError::Api {
                    status: 400,
                    message,
                } => RepositoryError::Unauthorized(
                    message.unwrap_or_else(|| "Invalid identifier or password".to_string()),
                ),
                other => other,
            })?;
        Ok(response.json::<Session>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> HttpRepository {
        HttpRepository::with_client(Client::new(), "https://cms.test/api/", "https://cms.test")
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(repo().url("/cars"), "https://cms.test/api/cars");
        assert_eq!(repo().url("messages"), "https://cms.test/api/messages");
    }

    #[test]
    fn session_attaches_token() {
        let base = repo();
        assert!(!base.is_authenticated());

        let session = Session {
            jwt: "token".to_string(),
            user: Default::default(),
        };
        assert!(base.with_session(&session).is_authenticated());
        assert!(base.require_token().is_err());
    }

    #[tokio::test]
    async fn admin_calls_without_session_never_hit_the_network() {
        let id = DocumentId::new("abc").unwrap();
        let err = repo().delete_car(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Unauthorized(_)));

        let err = repo().list_messages(&ListQuery::new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Unauthorized(_)));
    }
}
