use async_trait::async_trait;

use crate::{
    domain::{
        auth::{Credentials, Session},
        blog::{Blog, NewBlog},
        car::{Car, NewCar},
        lead::{ContactRequest, LeadSubmission},
        message::{LeadStatus, Message},
        types::DocumentId,
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod flags;
pub mod http;
#[cfg(all(test, feature = "test-mocks"))]
pub mod mock;
pub mod query;

pub use flags::{FileFlagStore, FlagStore, MemoryFlagStore};
pub use http::HttpRepository;
pub use query::{ListQuery, Page, Pagination, SortDirection, SortKey};

/// Read operations for the car fleet.
#[async_trait]
pub trait CarReader: Send + Sync {
    async fn list_cars(&self, query: &ListQuery) -> RepositoryResult<Page<Car>>;
    async fn get_car(&self, id: &DocumentId) -> RepositoryResult<Option<Car>>;
}

/// Write operations for the car fleet. Requires an admin session.
#[async_trait]
pub trait CarWriter: Send + Sync {
    async fn create_car(&self, car: &NewCar) -> RepositoryResult<Car>;
    async fn update_car(&self, id: &DocumentId, car: &NewCar) -> RepositoryResult<Car>;
    async fn delete_car(&self, id: &DocumentId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait BlogReader: Send + Sync {
    async fn list_blogs(&self, query: &ListQuery) -> RepositoryResult<Page<Blog>>;
    async fn get_blog(&self, id: &DocumentId) -> RepositoryResult<Option<Blog>>;
}

#[async_trait]
pub trait BlogWriter: Send + Sync {
    async fn create_blog(&self, blog: &NewBlog) -> RepositoryResult<Blog>;
    async fn update_blog(&self, id: &DocumentId, blog: &NewBlog) -> RepositoryResult<Blog>;
    async fn delete_blog(&self, id: &DocumentId) -> RepositoryResult<()>;
}

/// Read access to submitted leads. Requires an admin session.
#[async_trait]
pub trait MessageReader: Send + Sync {
    async fn list_messages(&self, query: &ListQuery) -> RepositoryResult<Page<Message>>;
}

#[async_trait]
pub trait MessageWriter: Send + Sync {
    async fn update_message_status(
        &self,
        id: &DocumentId,
        status: LeadStatus,
    ) -> RepositoryResult<()>;
    async fn delete_message(&self, id: &DocumentId) -> RepositoryResult<()>;
}

/// Public submission endpoints.
#[async_trait]
pub trait LeadWriter: Send + Sync {
    async fn create_message(&self, lead: &LeadSubmission) -> RepositoryResult<()>;
}

#[async_trait]
pub trait ContactWriter: Send + Sync {
    async fn submit_contact(&self, request: &ContactRequest) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session>;
}
