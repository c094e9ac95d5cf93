//! Admin dashboard figures.

use std::collections::BTreeMap;

use crate::domain::auth::Session;
use crate::domain::message::Message;
use crate::dto::dashboard::{DashboardSummary, StatusCount};
use crate::repository::{BlogReader, CarReader, ListQuery, MessageReader, SortKey};
use crate::services::{ServiceError, ServiceResult, require_session};

const MESSAGE_BATCH: usize = 100;
const UNSET_STATUS: &str = "New";

fn capitalize(label: &str) -> String {
    let mut chars = label.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Groups leads by their stored status label. Leads without one count as
/// `New`.
pub fn status_breakdown(messages: &[Message]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for message in messages {
        let label = message
            .status_label
            .as_deref()
            .map(capitalize)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNSET_STATUS.to_string());
        *counts.entry(label).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| StatusCount { label, count })
        .collect()
}

fn logged(err: impl Into<ServiceError> + std::fmt::Display, what: &str) -> ServiceError {
    log::error!("Failed to load {what}: {err}");
    err.into()
}

/// Counts every collection and summarises lead statuses.
pub async fn load_dashboard<R>(
    repo: &R,
    session: Option<&Session>,
) -> ServiceResult<DashboardSummary>
where
    R: BlogReader + CarReader + MessageReader + ?Sized,
{
    require_session(session)?;

    let count_query = ListQuery::new().paginate(1, 1);
    let total_blogs = repo
        .list_blogs(&count_query)
        .await
        .map_err(|e| logged(e, "blogs"))?
        .total;
    let total_cars = repo
        .list_cars(&count_query)
        .await
        .map_err(|e| logged(e, "cars"))?
        .total;

    let mut messages = Vec::new();
    let mut page = 1;
    let total_messages = loop {
        let batch = repo
            .list_messages(&ListQuery::new().paginate(page, MESSAGE_BATCH))
            .await
            .map_err(|e| logged(e, "messages"))?;
        messages.extend(batch.items);
        if page >= batch.page_count {
            break batch.total;
        }
        page += 1;
    };

    Ok(DashboardSummary {
        total_blogs,
        total_cars,
        total_messages,
        lead_statuses: status_breakdown(&messages),
    })
}

/// Most recent leads, newest first.
pub async fn newest_leads<R>(
    repo: &R,
    session: Option<&Session>,
    count: usize,
) -> ServiceResult<Vec<Message>>
where
    R: MessageReader + ?Sized,
{
    require_session(session)?;
    let query = ListQuery::new()
        .paginate(1, count)
        .sort(SortKey::desc("createdAt"));
    let page = repo
        .list_messages(&query)
        .await
        .map_err(|e| logged(e, "messages"))?;
    Ok(page.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DocumentId, MessageId};

    fn message(id: i64, status: Option<&str>) -> Message {
        Message {
            id: MessageId::new(id).unwrap(),
            document_id: DocumentId::new(format!("m{id}")).unwrap(),
            name: "Lead".to_string(),
            phone: None,
            message: None,
            destination: None,
            date: None,
            status_label: status.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn missing_status_counts_as_new() {
        let breakdown = status_breakdown(&[
            message(1, None),
            message(2, Some("lead created")),
            message(3, Some("viewed")),
            message(4, None),
            message(5, Some("viewed")),
        ]);

        assert_eq!(
            breakdown,
            vec![
                StatusCount {
                    label: "Lead created".to_string(),
                    count: 1
                },
                StatusCount {
                    label: "New".to_string(),
                    count: 2
                },
                StatusCount {
                    label: "Viewed".to_string(),
                    count: 2
                },
            ]
        );
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use super::*;
    use crate::domain::auth::AdminUser;
    use crate::domain::types::{DocumentId, MessageId};
    use crate::repository::Page;
    use crate::repository::mock::MockRepository;

    fn lead(id: i64) -> Message {
        Message {
            id: MessageId::new(id).unwrap(),
            document_id: DocumentId::new(format!("m{id}")).unwrap(),
            name: "Lead".to_string(),
            phone: None,
            message: None,
            destination: None,
            date: None,
            status_label: Some("contacted".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn dashboard_walks_all_message_pages() {
        let mut repo = MockRepository::new();
        repo.expect_list_blogs()
            .returning(|_| Ok(Page { items: vec![], page: 1, page_count: 4, total: 4 }));
        repo.expect_list_cars()
            .returning(|_| Ok(Page { items: vec![], page: 1, page_count: 9, total: 9 }));
        repo.expect_list_messages().times(2).returning(|q| {
            let page = q.pagination.map(|p| p.page).unwrap_or(1);
            Ok(Page {
                items: vec![lead(page as i64)],
                page,
                page_count: 2,
                total: 2,
            })
        });
        let session = Session {
            jwt: "t".to_string(),
            user: AdminUser::default(),
        };

        let summary = load_dashboard(&repo, Some(&session)).await.unwrap();

        assert_eq!(summary.total_blogs, 4);
        assert_eq!(summary.total_cars, 9);
        assert_eq!(summary.total_messages, 2);
        assert_eq!(
            summary.lead_statuses,
            vec![StatusCount {
                label: "Contacted".to_string(),
                count: 2
            }]
        );
    }

    #[tokio::test]
    async fn dashboard_requires_session() {
        let mut repo = MockRepository::new();
        repo.expect_list_blogs().times(0);

        assert!(matches!(
            load_dashboard(&repo, None).await,
            Err(ServiceError::Unauthorized)
        ));
    }
}
