//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::auth::{Credentials, Session};
use crate::domain::blog::{Blog, NewBlog};
use crate::domain::car::{Car, NewCar};
use crate::domain::lead::{ContactRequest, LeadSubmission};
use crate::domain::message::{LeadStatus, Message};
use crate::domain::types::DocumentId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuthProvider, BlogReader, BlogWriter, CarReader, CarWriter, ContactWriter, LeadWriter,
    ListQuery, MessageReader, MessageWriter, Page,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl CarReader for Repository {
        async fn list_cars(&self, query: &ListQuery) -> RepositoryResult<Page<Car>>;
        async fn get_car(&self, id: &DocumentId) -> RepositoryResult<Option<Car>>;
    }

    #[async_trait]
    impl CarWriter for Repository {
        async fn create_car(&self, car: &NewCar) -> RepositoryResult<Car>;
        async fn update_car(&self, id: &DocumentId, car: &NewCar) -> RepositoryResult<Car>;
        async fn delete_car(&self, id: &DocumentId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl BlogReader for Repository {
        async fn list_blogs(&self, query: &ListQuery) -> RepositoryResult<Page<Blog>>;
        async fn get_blog(&self, id: &DocumentId) -> RepositoryResult<Option<Blog>>;
    }

    #[async_trait]
    impl BlogWriter for Repository {
        async fn create_blog(&self, blog: &NewBlog) -> RepositoryResult<Blog>;
        async fn update_blog(&self, id: &DocumentId, blog: &NewBlog) -> RepositoryResult<Blog>;
        async fn delete_blog(&self, id: &DocumentId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl MessageReader for Repository {
        async fn list_messages(&self, query: &ListQuery) -> RepositoryResult<Page<Message>>;
    }

    #[async_trait]
    impl MessageWriter for Repository {
        async fn update_message_status(
            &self,
            id: &DocumentId,
            status: LeadStatus,
        ) -> RepositoryResult<()>;
        async fn delete_message(&self, id: &DocumentId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl LeadWriter for Repository {
        async fn create_message(&self, lead: &LeadSubmission) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl ContactWriter for Repository {
        async fn submit_contact(&self, request: &ContactRequest) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl AuthProvider for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<Session>;
    }
}
