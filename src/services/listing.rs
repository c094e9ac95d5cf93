//! Paginated, filtered and sorted remote lists.
//!
//! A [`ListState`] owns the parameters of one list view. Every operation that
//! needs data returns a [`FetchRequest`] tagged with a sequence number; only
//! the response carrying the latest number is applied, so a slow search
//! result can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};

use crate::domain::types::TypeConstraintError;
use crate::dto::listing::{ListSnapshot, ListStatus};
use crate::pagination::{Paginated, clamp_page, page_links};
use crate::repository::{ListQuery, Page, SortDirection, SortKey};
use crate::services::ServiceResult;

/// Fixed configuration of one list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListProfile {
    pub page_size: usize,
    /// Fields matched case-insensitively by the search box.
    pub search_fields: &'static [&'static str],
    /// Field compared exactly with the filter dropdown.
    pub filter_field: Option<&'static str>,
    /// Allow-list of sortable fields.
    pub sort_fields: &'static [&'static str],
    pub default_sort_field: &'static str,
    pub default_sort_direction: SortDirection,
    /// Zero applies search text immediately.
    pub search_debounce: Duration,
    pub populate: bool,
}

impl ListProfile {
    pub fn default_sort(&self) -> SortKey {
        SortKey::new(self.default_sort_field, self.default_sort_direction)
    }

    pub fn allows_sort(&self, key: &SortKey) -> bool {
        self.sort_fields.contains(&key.field.as_str())
    }
}

/// Public car catalogue.
pub const CAR_CATALOG: ListProfile = ListProfile {
    page_size: 8,
    search_fields: &["carName"],
    filter_field: Some("carType"),
    sort_fields: &["carName", "modelYear"],
    default_sort_field: "carName",
    default_sort_direction: SortDirection::Asc,
    search_debounce: Duration::from_millis(700),
    populate: true,
};

/// Public blog listing; "newest", "oldest" and "title" orderings.
pub const BLOG_CATALOG: ListProfile = ListProfile {
    page_size: 6,
    search_fields: &["title"],
    filter_field: None,
    sort_fields: &["publishedAt", "title"],
    default_sort_field: "publishedAt",
    default_sort_direction: SortDirection::Desc,
    search_debounce: Duration::from_millis(700),
    populate: true,
};

pub const ADMIN_BLOGS: ListProfile = ListProfile {
    page_size: 10,
    search_fields: &["title", "content.children.text"],
    filter_field: None,
    sort_fields: &["title", "publishedAt", "createdAt"],
    default_sort_field: "createdAt",
    default_sort_direction: SortDirection::Desc,
    search_debounce: Duration::ZERO,
    populate: true,
};

pub const ADMIN_CARS: ListProfile = ListProfile {
    page_size: 10,
    search_fields: &["carName"],
    filter_field: Some("carType"),
    sort_fields: &["carName", "modelYear", "createdAt"],
    default_sort_field: "createdAt",
    default_sort_direction: SortDirection::Desc,
    search_debounce: Duration::ZERO,
    populate: true,
};

pub const ADMIN_MESSAGES: ListProfile = ListProfile {
    page_size: 10,
    search_fields: &["name", "message"],
    filter_field: None,
    sort_fields: &["createdAt", "updatedAt", "name", "leadStatus"],
    default_sort_field: "createdAt",
    default_sort_direction: SortDirection::Desc,
    search_debounce: Duration::ZERO,
    populate: false,
};

/// A fetch the owner must run and hand back to [`ListState::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: ListQuery,
}

/// What [`ListState::apply`] did with a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// Superseded by a newer request or the view was unmounted.
    Stale,
    Shown,
    /// The collection shrank below the current page; the page was clamped
    /// and this fetch must be run.
    Refetch(FetchRequest),
}

#[derive(Debug)]
pub struct ListState<T> {
    profile: ListProfile,
    search_input: String,
    search: String,
    filter: String,
    sort: SortKey,
    page: usize,
    debounce_at: Option<Instant>,
    seq: u64,
    mounted: bool,
    items: Vec<T>,
    total_pages: usize,
    total_count: usize,
    status: ListStatus,
}

impl<T: Clone> ListState<T> {
    pub fn new(profile: ListProfile) -> Self {
        Self {
            profile,
            search_input: String::new(),
            search: String::new(),
            filter: String::new(),
            sort: profile.default_sort(),
            page: 1,
            debounce_at: None,
            seq: 0,
            mounted: false,
            items: Vec::new(),
            total_pages: 0,
            total_count: 0,
            status: ListStatus::Idle,
        }
    }

    pub fn profile(&self) -> &ListProfile {
        &self.profile
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn sort(&self) -> &SortKey {
        &self.sort
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Text as typed, possibly not yet applied.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Page buttons; `None` is an ellipsis.
    pub fn pages(&self) -> Vec<Option<usize>> {
        page_links(self.total_pages, self.page)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce_at
    }

    /// Query for the current parameters.
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery::new()
            .paginate(self.page, self.profile.page_size)
            .search(self.profile.search_fields, self.search.as_str())
            .sort(self.sort.clone());
        if let Some(field) = self.profile.filter_field {
            query = query.filter(field, self.filter.as_str());
        }
        if self.profile.populate {
            query = query.populate();
        }
        query
    }

    fn issue(&mut self) -> Option<FetchRequest> {
        if !self.mounted {
            return None;
        }
        self.seq += 1;
        self.status = ListStatus::Loading;
        Some(FetchRequest {
            seq: self.seq,
            query: self.query(),
        })
    }

    /// First fetch with default parameters.
    pub fn mount(&mut self) -> Option<FetchRequest> {
        self.mounted = true;
        self.issue()
    }

    /// Stops the view: pending debounce is dropped and late responses are
    /// ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.debounce_at = None;
    }

    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) -> Option<FetchRequest> {
        self.search_input = text.into();
        if self.profile.search_debounce.is_zero() {
            self.debounce_at = None;
            return self.apply_search();
        }
        self.debounce_at = Some(now + self.profile.search_debounce);
        None
    }

    /// Applies debounced search text once its deadline passed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        match self.debounce_at {
            Some(at) if at <= now => {
                self.debounce_at = None;
                self.apply_search()
            }
            _ => None,
        }
    }

    fn apply_search(&mut self) -> Option<FetchRequest> {
        if self.search_input == self.search {
            return None;
        }
        self.search = self.search_input.clone();
        self.page = 1;
        self.issue()
    }

    pub fn set_filter(&mut self, value: impl Into<String>) -> Option<FetchRequest> {
        let value = value.into();
        if self.profile.filter_field.is_none() || value == self.filter {
            return None;
        }
        self.filter = value;
        self.page = 1;
        self.issue()
    }

    pub fn set_sort(&mut self, key: SortKey) -> Result<Option<FetchRequest>, TypeConstraintError> {
        if !self.profile.allows_sort(&key) {
            return Err(TypeConstraintError::InvalidValue(format!(
                "sort field {}",
                key.field
            )));
        }
        if key == self.sort {
            return Ok(None);
        }
        self.sort = key;
        self.page = 1;
        Ok(self.issue())
    }

    /// Column-header click: flips direction on the active field.
    pub fn toggle_sort(
        &mut self,
        field: &str,
    ) -> Result<Option<FetchRequest>, TypeConstraintError> {
        let key = self.sort.toggled(field);
        self.set_sort(key)
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<FetchRequest> {
        let page = clamp_page(page, self.total_pages);
        if page == self.page {
            return None;
        }
        self.page = page;
        self.issue()
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Restores defaults with a single fetch.
    pub fn clear_filters(&mut self) -> Option<FetchRequest> {
        self.search_input.clear();
        self.search.clear();
        self.filter.clear();
        self.sort = self.profile.default_sort();
        self.page = 1;
        self.debounce_at = None;
        self.issue()
    }

    /// Refetches the current parameters, e.g. after an error or a delete.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        self.issue()
    }

    /// Applies a response unless a newer request has been issued since.
    pub fn apply(&mut self, seq: u64, result: ServiceResult<Page<T>>) -> Applied {
        if !self.mounted || seq != self.seq {
            log::debug!("Discarding stale list response {seq} (latest {})", self.seq);
            return Applied::Stale;
        }

        match result {
            Ok(page) => {
                self.items = page.items;
                self.total_pages = page.page_count;
                self.total_count = page.total;
                self.status = ListStatus::Ready;

                let clamped = clamp_page(self.page, self.total_pages);
                if clamped != self.page {
                    log::debug!("Page {} out of range, moving to {clamped}", self.page);
                    self.page = clamped;
                    if let Some(request) = self.issue() {
                        return Applied::Refetch(request);
                    }
                }
            }
            Err(err) => {
                log::error!("Failed to fetch list page: {err}");
                self.items.clear();
                self.total_pages = 0;
                self.total_count = 0;
                self.status = ListStatus::Failed(err.alert_message());
            }
        }
        Applied::Shown
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            rows: Paginated::new(
                self.items.clone(),
                self.page,
                self.total_pages,
                self.total_count,
            ),
            status: self.status.clone(),
            search: self.search_input.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

/// Something a list view can page through.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &ListQuery) -> ServiceResult<Page<T>>;
}

/// User input forwarded to a running list view.
#[derive(Clone, Debug)]
pub enum ListCommand {
    Search(String),
    Filter(String),
    Sort(SortKey),
    ToggleSort(String),
    Page(usize),
    Next,
    Prev,
    ClearFilters,
    Retry,
}

/// Owner side of a running [`ListDriver`]; dropping it unmounts the view.
pub struct ListHandle<T> {
    commands: mpsc::UnboundedSender<ListCommand>,
    snapshots: watch::Receiver<ListSnapshot<T>>,
}

impl<T: Clone> ListHandle<T> {
    pub fn send(&self, command: ListCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.snapshots.clone()
    }
}

type Fetched<T> = (u64, ServiceResult<Page<T>>);

pub struct ListDriver<T, S: ?Sized> {
    state: ListState<T>,
    source: Arc<S>,
}

impl<T, S> ListDriver<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: PageSource<T> + ?Sized + 'static,
{
    pub fn new(profile: ListProfile, source: Arc<S>) -> Self {
        Self {
            state: ListState::new(profile),
            source,
        }
    }

    /// Mounts the view on a tokio task and issues the first fetch.
    pub fn spawn(mut self) -> ListHandle<T> {
        let (commands, rx) = mpsc::unbounded_channel();
        let mut fetches = JoinSet::new();
        if let Some(request) = self.state.mount() {
            self.dispatch(request, &mut fetches);
        }
        let (tx, snapshots) = watch::channel(self.state.snapshot());
        tokio::spawn(self.run(rx, tx, fetches));
        ListHandle {
            commands,
            snapshots,
        }
    }

    fn dispatch(&self, request: FetchRequest, fetches: &mut JoinSet<Fetched<T>>) {
        let source = Arc::clone(&self.source);
        fetches.spawn(async move {
            let result = source.fetch_page(&request.query).await;
            (request.seq, result)
        });
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<ListCommand>,
        snapshots: watch::Sender<ListSnapshot<T>>,
        mut fetches: JoinSet<Fetched<T>>,
    ) {
        loop {
            let deadline = self.state.next_deadline();
            let wake_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));

            let request = tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command)
                }
                Some(joined) = fetches.join_next() => {
                    match joined {
                        Ok((seq, result)) => match self.state.apply(seq, result) {
                            Applied::Refetch(request) => Some(request),
                            Applied::Stale | Applied::Shown => None,
                        },
                        Err(err) => {
                            log::error!("List fetch task failed: {err}");
                            None
                        }
                    }
                }
                _ = sleep_until(wake_at), if deadline.is_some() => {
                    self.state.poll(Instant::now())
                }
            };

            if let Some(request) = request {
                self.dispatch(request, &mut fetches);
            }
            if snapshots.send(self.state.snapshot()).is_err() {
                break;
            }
        }

        self.state.unmount();
        fetches.abort_all();
        log::debug!("List view unmounted");
    }

    fn handle(&mut self, command: ListCommand) -> Option<FetchRequest> {
        let now = Instant::now();
        let sorted = |result: Result<Option<FetchRequest>, TypeConstraintError>| {
            result.unwrap_or_else(|err| {
                log::warn!("Ignoring sort change: {err}");
                None
            })
        };
        match command {
            ListCommand::Search(text) => self.state.set_search(text, now),
            ListCommand::Filter(value) => self.state.set_filter(value),
            ListCommand::Sort(key) => sorted(self.state.set_sort(key)),
            ListCommand::ToggleSort(field) => sorted(self.state.toggle_sort(&field)),
            ListCommand::Page(page) => self.state.go_to_page(page),
            ListCommand::Next => self.state.next_page(),
            ListCommand::Prev => self.state.prev_page(),
            ListCommand::ClearFilters => self.state.clear_filters(),
            ListCommand::Retry => self.state.retry(),
        }
    }
}
