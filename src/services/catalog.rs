//! Public car and blog catalogues.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::blog::Blog;
use crate::domain::car::Car;
use crate::domain::types::DocumentId;
use crate::repository::{BlogReader, CarReader, ListQuery, Page, SortKey};
use crate::services::listing::PageSource;
use crate::services::{ServiceError, ServiceResult};

/// Car listing page source.
pub struct CarCatalog<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> CarCatalog<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> PageSource<Car> for CarCatalog<R>
where
    R: CarReader + ?Sized,
{
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<Car>> {
        self.repo.list_cars(query).await.map_err(|err| {
            log::error!("Failed to list cars: {err}");
            err.into()
        })
    }
}

pub struct BlogCatalog<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> BlogCatalog<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> PageSource<Blog> for BlogCatalog<R>
where
    R: BlogReader + ?Sized,
{
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<Blog>> {
        self.repo.list_blogs(query).await.map_err(|err| {
            log::error!("Failed to list blogs: {err}");
            err.into()
        })
    }
}

/// Car details page.
pub async fn get_car<R>(repo: &R, document_id: &str) -> ServiceResult<Car>
where
    R: CarReader + ?Sized,
{
    let id = DocumentId::new(document_id)?;
    match repo.get_car(&id).await {
        Ok(Some(car)) => Ok(car),
        Ok(None) => Err(ServiceError::NotFound),
        Err(err) => {
            log::error!("Failed to load car {id}: {err}");
            Err(err.into())
        }
    }
}

/// Blog article page.
pub async fn get_blog<R>(repo: &R, document_id: &str) -> ServiceResult<Blog>
where
    R: BlogReader + ?Sized,
{
    let id = DocumentId::new(document_id)?;
    match repo.get_blog(&id).await {
        Ok(Some(blog)) => Ok(blog),
        Ok(None) => Err(ServiceError::NotFound),
        Err(err) => {
            log::error!("Failed to load blog {id}: {err}");
            Err(err.into())
        }
    }
}

/// Newest posts for the home page teaser.
pub async fn latest_blogs<R>(repo: &R, count: usize) -> ServiceResult<Vec<Blog>>
where
    R: BlogReader + ?Sized,
{
    let query = ListQuery::new()
        .paginate(1, count)
        .sort(SortKey::desc("publishedAt"))
        .populate();
    let page = repo.list_blogs(&query).await.map_err(|err| {
        log::error!("Failed to load latest blogs: {err}");
        ServiceError::from(err)
    })?;
    Ok(page.items)
}


#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::fixtures::car;
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[tokio::test]
    async fn missing_car_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_car().returning(|_| Ok(None));

        let result = get_car(&repo, "abc").await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn blank_document_id_is_rejected_without_request() {
        let mut repo = MockRepository::new();
        repo.expect_get_car().times(0);

        let result = get_car(&repo, "  ").await;

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[tokio::test]
    async fn catalog_forwards_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_cars()
            .withf(|q: &ListQuery| q.filter.as_ref().map(|f| f.value.as_str()) == Some("SUV"))
            .returning(|_| {
                Ok(Page {
                    items: vec![car(1, "Innova")],
                    page: 1,
                    page_count: 1,
                    total: 1,
                })
            });
        let catalog = CarCatalog::new(Arc::new(repo));

        let page = catalog
            .fetch_page(&ListQuery::new().filter("carType", "SUV"))
            .await
            .unwrap();

        assert_eq!(page.items[0].name, "Innova");
    }

    #[tokio::test]
    async fn catalog_maps_errors() {
        let mut repo = MockRepository::new();
        repo.expect_list_blogs()
            .returning(|_| Err(RepositoryError::Transport("refused".to_string())));
        let catalog = BlogCatalog::new(Arc::new(repo));

        let err = catalog.fetch_page(&ListQuery::new()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Repository(_)));
    }
}
