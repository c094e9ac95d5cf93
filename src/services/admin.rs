//! Admin console workflows. Every operation needs a session and fails with
//! [`ServiceError::Unauthorized`] before any request when there is none.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::{Credentials, Session};
use crate::domain::blog::{Blog, NewBlog};
use crate::domain::car::{Car, NewCar};
use crate::domain::message::{LeadStatus, Message};
use crate::domain::types::DocumentId;
use crate::forms::blog::BlogForm;
use crate::forms::car::CarForm;
use crate::forms::login::LoginForm;
use crate::repository::{
    AuthProvider, BlogReader, BlogWriter, CarReader, CarWriter, ListQuery, MessageReader,
    MessageWriter, Page,
};
use crate::services::listing::PageSource;
use crate::services::{ServiceError, ServiceResult, require_session};

/// Validates the sign-in form and exchanges it for a session.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<Session>
where
    R: AuthProvider + ?Sized,
{
    let credentials = Credentials::try_from(form)?;
    repo.login(&credentials).await.map_err(|err| {
        log::error!("Failed to sign in {}: {err}", credentials.identifier);
        err.into()
    })
}

pub async fn create_blog<R>(
    repo: &R,
    session: Option<&Session>,
    form: &BlogForm,
) -> ServiceResult<Blog>
where
    R: BlogWriter + ?Sized,
{
    require_session(session)?;
    let blog = NewBlog::try_from(form)?;
    repo.create_blog(&blog)
        .await
        .inspect(|created| log::info!("Created blog {}", created.document_id))
        .map_err(|err| {
            log::error!("Failed to create blog: {err}");
            err.into()
        })
}

pub async fn update_blog<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
    form: &BlogForm,
) -> ServiceResult<Blog>
where
    R: BlogWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    let blog = NewBlog::try_from(form)?;
    repo.update_blog(&id, &blog)
        .await
        .inspect(|_| log::info!("Updated blog {id}"))
        .map_err(|err| {
            log::error!("Failed to update blog {id}: {err}");
            err.into()
        })
}

/// Loads a post into the editor.
pub async fn edit_blog_form<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
) -> ServiceResult<BlogForm>
where
    R: BlogReader + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    match repo.get_blog(&id).await {
        Ok(Some(blog)) => Ok(BlogForm::from(&blog)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(err) => {
            log::error!("Failed to load blog {id}: {err}");
            Err(err.into())
        }
    }
}

pub async fn delete_blog<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
) -> ServiceResult<()>
where
    R: BlogWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    repo.delete_blog(&id)
        .await
        .inspect(|_| log::info!("Deleted blog {id}"))
        .map_err(|err| {
            log::error!("Failed to delete blog {id}: {err}");
            err.into()
        })
}

pub async fn create_car<R>(
    repo: &R,
    session: Option<&Session>,
    form: &CarForm,
) -> ServiceResult<Car>
where
    R: CarWriter + ?Sized,
{
    require_session(session)?;
    let car = NewCar::try_from(form)?;
    repo.create_car(&car)
        .await
        .inspect(|created| log::info!("Created car {}", created.document_id))
        .map_err(|err| {
            log::error!("Failed to create car: {err}");
            err.into()
        })
}

pub async fn update_car<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
    form: &CarForm,
) -> ServiceResult<Car>
where
    R: CarWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    let car = NewCar::try_from(form)?;
    repo.update_car(&id, &car)
        .await
        .inspect(|_| log::info!("Updated car {id}"))
        .map_err(|err| {
            log::error!("Failed to update car {id}: {err}");
            err.into()
        })
}

pub async fn edit_car_form<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
) -> ServiceResult<CarForm>
where
    R: CarReader + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    match repo.get_car(&id).await {
        Ok(Some(car)) => Ok(CarForm::from(&car)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(err) => {
            log::error!("Failed to load car {id}: {err}");
            Err(err.into())
        }
    }
}

pub async fn delete_car<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
) -> ServiceResult<()>
where
    R: CarWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    repo.delete_car(&id)
        .await
        .inspect(|_| log::info!("Deleted car {id}"))
        .map_err(|err| {
            log::error!("Failed to delete car {id}: {err}");
            err.into()
        })
}

pub async fn update_message_status<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
    status: LeadStatus,
) -> ServiceResult<()>
where
    R: MessageWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    repo.update_message_status(&id, status)
        .await
        .inspect(|_| log::info!("Message {id} marked {status}"))
        .map_err(|err| {
            log::error!("Failed to set message {id} to {status}: {err}");
            err.into()
        })
}

pub async fn delete_message<R>(
    repo: &R,
    session: Option<&Session>,
    document_id: &str,
) -> ServiceResult<()>
where
    R: MessageWriter + ?Sized,
{
    require_session(session)?;
    let id = DocumentId::new(document_id)?;
    repo.delete_message(&id)
        .await
        .inspect(|_| log::info!("Deleted message {id}"))
        .map_err(|err| {
            log::error!("Failed to delete message {id}: {err}");
            err.into()
        })
}

/// Admin table source bound to a session.
pub struct AdminTable<R: ?Sized> {
    repo: Arc<R>,
    session: Option<Session>,
}

impl<R: ?Sized> AdminTable<R> {
    pub fn new(repo: Arc<R>, session: Option<Session>) -> Self {
        Self { repo, session }
    }
}

#[async_trait]
impl<R> PageSource<Message> for AdminTable<R>
where
    R: MessageReader + ?Sized,
{
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<Message>> {
        require_session(self.session.as_ref())?;
        self.repo.list_messages(query).await.map_err(|err| {
            log::error!("Failed to list messages: {err}");
            err.into()
        })
    }
}

#[async_trait]
impl<R> PageSource<Blog> for AdminTable<R>
where
    R: BlogReader + ?Sized,
{
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<Blog>> {
        require_session(self.session.as_ref())?;
        self.repo.list_blogs(query).await.map_err(|err| {
            log::error!("Failed to list blogs: {err}");
            err.into()
        })
    }
}

#[async_trait]
impl<R> PageSource<Car> for AdminTable<R>
where
    R: CarReader + ?Sized,
{
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<Car>> {
        require_session(self.session.as_ref())?;
        self.repo.list_cars(query).await.map_err(|err| {
            log::error!("Failed to list cars: {err}");
            err.into()
        })
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::auth::AdminUser;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::catalog::fixtures::blog;

    fn session() -> Session {
        Session {
            jwt: "jwt-token".to_string(),
            user: AdminUser {
                id: 1,
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
            },
        }
    }

    fn blog_form() -> BlogForm {
        BlogForm {
            title: "Monsoon in Coorg".to_string(),
            slug: "monsoon-in-coorg".to_string(),
            excerpt: String::new(),
            content: "Mist and coffee.".to_string(),
            tags: "travel, karnataka".to_string(),
        }
    }

    #[tokio::test]
    async fn login_validates_before_request() {
        let mut repo = MockRepository::new();
        repo.expect_login().times(0);
        let form = LoginForm {
            identifier: "admin@".to_string(),
            password: "secret1".to_string(),
        };

        let err = login(&repo, form).await.unwrap_err();

        match err {
            ServiceError::Form(err) => assert_eq!(
                err.message_for("identifier").as_deref(),
                Some("Please enter a valid email.")
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_login_is_unauthorized() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .returning(|_| Err(RepositoryError::Unauthorized("Invalid identifier".to_string())));
        let form = LoginForm {
            identifier: "admin".to_string(),
            password: "secret1".to_string(),
        };

        let err = login(&repo, form).await.unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn writes_require_session() {
        let mut repo = MockRepository::new();
        repo.expect_create_blog().times(0);
        repo.expect_delete_car().times(0);
        repo.expect_update_message_status().times(0);

        assert!(matches!(
            create_blog(&repo, None, &blog_form()).await,
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            delete_car(&repo, None, "car1").await,
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            update_message_status(&repo, None, "m1", LeadStatus::Viewed).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn create_blog_sends_parsed_payload() {
        let mut repo = MockRepository::new();
        repo.expect_create_blog()
            .withf(|b: &NewBlog| b.tags == vec!["travel", "karnataka"])
            .times(1)
            .returning(|_| Ok(blog(3, "Monsoon in Coorg")));

        let created = create_blog(&repo, Some(&session()), &blog_form())
            .await
            .unwrap();

        assert_eq!(created.title, "Monsoon in Coorg");
    }

    #[tokio::test]
    async fn edit_form_round_trips_existing_post() {
        let mut repo = MockRepository::new();
        repo.expect_get_blog()
            .returning(|_| Ok(Some(blog(5, "Hill Drives"))));

        let form = edit_blog_form(&repo, Some(&session()), "blog5")
            .await
            .unwrap();

        assert_eq!(form.title, "Hill Drives");
        assert_eq!(form.content, "Body");
    }

    #[tokio::test]
    async fn status_update_forwards_status() {
        let mut repo = MockRepository::new();
        repo.expect_update_message_status()
            .withf(|id: &DocumentId, status: &LeadStatus| {
                id.as_str() == "m1" && *status == LeadStatus::Contacted
            })
            .times(1)
            .returning(|_, _| Ok(()));

        update_message_status(&repo, Some(&session()), "m1", LeadStatus::Contacted)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn admin_table_without_session_never_lists() {
        let mut repo = MockRepository::new();
        repo.expect_list_messages().times(0);
        let table = AdminTable::new(Arc::new(repo), None);

        let result = <AdminTable<MockRepository> as PageSource<Message>>::fetch_page(
            &table,
            &ListQuery::new(),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
