#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tour_portal::domain::lead::LeadSubmission;
use tour_portal::forms::lead::LeadForm;
use tour_portal::repository::errors::{RepositoryError, RepositoryResult};
use tour_portal::repository::{LeadWriter, ListQuery, Page};
use tour_portal::services::ServiceResult;
use tour_portal::services::listing::PageSource;

/// Page source answering with the applied search text as the only item.
/// Searches starting with "slow" take longer than the rest.
#[derive(Default)]
pub struct EchoSource {
    pub queries: Mutex<Vec<ListQuery>>,
    pub completed: AtomicUsize,
}

impl EchoSource {
    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource<String> for EchoSource {
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<String>> {
        self.queries.lock().unwrap().push(query.clone());
        let text = query
            .search
            .as_ref()
            .map(|s| s.text.clone())
            .unwrap_or_else(|| "all".to_string());
        let delay = if text.starts_with("slow") { 500 } else { 20 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(Page {
            items: vec![text],
            page: query.pagination.map(|p| p.page).unwrap_or(1),
            page_count: 12,
            total: 96,
        })
    }
}

/// Lead endpoint that records submissions after a short delay.
pub struct RecordingLeads {
    pub received: Mutex<Vec<LeadSubmission>>,
    pub fail_with: Option<String>,
    pub delay: Duration,
}

impl RecordingLeads {
    pub fn accepting() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_with: None,
            delay: Duration::from_millis(200),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::accepting()
        }
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl LeadWriter for RecordingLeads {
    async fn create_message(&self, lead: &LeadSubmission) -> RepositoryResult<()> {
        tokio::time::sleep(self.delay).await;
        self.received.lock().unwrap().push(lead.clone());
        match &self.fail_with {
            Some(message) => Err(RepositoryError::Api {
                status: 400,
                message: Some(message.clone()),
            }),
            None => Ok(()),
        }
    }
}

pub fn lead_form() -> LeadForm {
    LeadForm {
        name: "Karthik".to_string(),
        phone_number: "9123456780".to_string(),
        destination: "Ooty".to_string(),
        date: "2026-11-02".to_string(),
        message: "Two nights".to_string(),
    }
}
