use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tour_portal::domain::lead::FORM_SUBMITTED_KEY;
use tour_portal::dto::widget::Notice;
use tour_portal::forms::lead::LeadForm;
use tour_portal::models::config::{EngagementConfig, PortalConfig};
use tour_portal::repository::{FileFlagStore, FlagStore, MemoryFlagStore};
use tour_portal::services::engagement::{
    EngagementDriver, EngagementHandle, EngagementWidget, SUCCESS_MESSAGE, Timings, WidgetCommand,
    start_widget,
};

mod common;

use common::{RecordingLeads, lead_form};

fn start(flags: Arc<dyn FlagStore>, leads: Arc<RecordingLeads>) -> EngagementHandle {
    let widget = EngagementWidget::mount(flags, Timings::default(), Instant::now());
    EngagementDriver::new(widget, leads).spawn()
}

#[tokio::test(start_paused = true)]
async fn widget_opens_after_a_minute() {
    let handle = start(
        Arc::new(MemoryFlagStore::new()),
        Arc::new(RecordingLeads::accepting()),
    );

    sleep(Duration::from_secs(59)).await;
    assert!(!handle.snapshot().is_open);

    sleep(Duration::from_secs(2)).await;
    assert!(handle.snapshot().is_open);
}

#[tokio::test(start_paused = true)]
async fn returning_visitor_is_left_alone_but_can_open_manually() {
    let handle = start(
        Arc::new(MemoryFlagStore::with_flag(FORM_SUBMITTED_KEY, true)),
        Arc::new(RecordingLeads::accepting()),
    );

    sleep(Duration::from_secs(300)).await;
    assert!(!handle.snapshot().is_open);

    handle.send(WidgetCommand::Open);
    sleep(Duration::from_millis(1)).await;
    assert!(handle.snapshot().is_open);
}

#[tokio::test(start_paused = true)]
async fn dismissed_widget_reopens_unless_opened_manually() {
    let handle = start(
        Arc::new(MemoryFlagStore::new()),
        Arc::new(RecordingLeads::accepting()),
    );
    sleep(Duration::from_secs(61)).await;

    handle.send(WidgetCommand::Dismiss);
    sleep(Duration::from_secs(61)).await;
    assert!(handle.snapshot().is_open, "reopens after the delay");

    // Dismiss at 122s schedules a reopen for 182s; the manual open cancels it.
    handle.send(WidgetCommand::Dismiss);
    sleep(Duration::from_secs(30)).await;
    handle.send(WidgetCommand::Open);
    sleep(Duration::from_secs(1)).await;
    handle.send(WidgetCommand::Dismiss);
    sleep(Duration::from_secs(40)).await;
    assert!(!handle.snapshot().is_open, "cancelled reopen must not fire");

    sleep(Duration::from_secs(30)).await;
    assert!(handle.snapshot().is_open, "reopen from the latest dismiss");
}

#[tokio::test(start_paused = true)]
async fn successful_submission_is_sent_once_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    let leads = Arc::new(RecordingLeads::accepting());
    let handle = start(Arc::new(FileFlagStore::open(&path)), leads.clone());

    handle.send(WidgetCommand::Open);
    handle.send(WidgetCommand::Edit(lead_form()));
    handle.send(WidgetCommand::Submit);
    handle.send(WidgetCommand::Submit);
    sleep(Duration::from_millis(50)).await;
    assert!(handle.snapshot().submitting);

    sleep(Duration::from_millis(500)).await;
    let snapshot = handle.snapshot();
    assert_eq!(leads.count(), 1);
    assert!(snapshot.has_submitted);
    assert!(snapshot.is_open);
    assert_eq!(snapshot.form, LeadForm::default());
    assert_eq!(
        snapshot.notice,
        Some(Notice::Success(SUCCESS_MESSAGE.to_string()))
    );

    sleep(Duration::from_secs(4)).await;
    let snapshot = handle.snapshot();
    assert!(!snapshot.is_open);
    assert_eq!(snapshot.notice, None);

    sleep(Duration::from_secs(600)).await;
    assert!(!handle.snapshot().is_open);

    // The flag survives a reload.
    assert!(FileFlagStore::open(&path).get(FORM_SUBMITTED_KEY));
}

#[tokio::test(start_paused = true)]
async fn failed_submission_shows_server_message_and_keeps_form() {
    let leads = Arc::new(RecordingLeads::rejecting("Invalid phone number"));
    let handle = start(Arc::new(MemoryFlagStore::new()), leads.clone());

    handle.send(WidgetCommand::Open);
    handle.send(WidgetCommand::Edit(lead_form()));
    handle.send(WidgetCommand::Submit);
    sleep(Duration::from_secs(1)).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.is_open);
    assert!(!snapshot.has_submitted);
    assert_eq!(snapshot.form, lead_form());
    assert_eq!(
        snapshot.notice,
        Some(Notice::Alert("Invalid phone number".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_phone_never_reaches_the_endpoint() {
    let leads = Arc::new(RecordingLeads::accepting());
    let handle = start(Arc::new(MemoryFlagStore::new()), leads.clone());

    handle.send(WidgetCommand::Open);
    handle.send(WidgetCommand::Edit(LeadForm {
        phone_number: "12345".to_string(),
        ..lead_form()
    }));
    handle.send(WidgetCommand::Submit);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(leads.count(), 0);
    assert_eq!(
        handle.snapshot().phone_error.as_deref(),
        Some("Phone number must be exactly 10 digits")
    );
}

#[tokio::test(start_paused = true)]
async fn configured_widget_uses_configured_delay_and_flag_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    let config = PortalConfig {
        api_base_url: "http://localhost:1337/api".to_string(),
        media_base_url: "http://localhost:1337".to_string(),
        flag_store_path: path.to_string_lossy().into_owned(),
        request_timeout_secs: None,
        engagement: EngagementConfig {
            open_delay_ms: 5_000,
            ..EngagementConfig::default()
        },
        admin_identifier: None,
        admin_password: None,
    };
    let leads = Arc::new(RecordingLeads::accepting());
    let handle = start_widget(&config, leads.clone());

    sleep(Duration::from_secs(6)).await;
    assert!(handle.snapshot().is_open);

    handle.send(WidgetCommand::Edit(lead_form()));
    handle.send(WidgetCommand::Submit);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(leads.count(), 1);
    assert!(FileFlagStore::open(&path).get(FORM_SUBMITTED_KEY));
}

#[tokio::test(start_paused = true)]
async fn submission_on_another_page_suppresses_pending_auto_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");

    let other_page = FileFlagStore::open(&path);
    let handle = start(
        Arc::new(FileFlagStore::open(&path)),
        Arc::new(RecordingLeads::accepting()),
    );

    sleep(Duration::from_secs(30)).await;
    other_page.set(FORM_SUBMITTED_KEY, true).unwrap();

    sleep(Duration::from_secs(60)).await;
    let snapshot = handle.snapshot();
    assert!(!snapshot.is_open);
    assert!(snapshot.has_submitted);
}
