//! Enquiry widget: delayed auto-open, reopen after dismiss and single-flight
//! submission.
//!
//! [`EngagementWidget`] is a plain state machine driven by explicit
//! timestamps so that every transition can be checked without a runtime.
//! [`EngagementDriver`] runs it on a tokio task, sleeping until the next
//! deadline and sending submissions in the background.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};

use crate::domain::lead::{FORM_SUBMITTED_KEY, LeadSubmission};
use crate::dto::widget::{Notice, WidgetSnapshot};
use crate::forms::lead::LeadForm;
use crate::models::config::{EngagementConfig, PortalConfig};
use crate::repository::errors::RepositoryError;
use crate::repository::{FileFlagStore, FlagStore, LeadWriter};
use crate::services::lead::{submit_lead, validate_lead};
use crate::services::{ServiceError, ServiceResult};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// What caused a scheduled automatic open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoOpen {
    /// First open after the page mounted.
    InitialDelay,
    /// Reopen after a dismiss without submitting.
    Reopen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingOpen {
    pub at: Instant,
    pub kind: AutoOpen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetState {
    /// Collapsed; at most one automatic open is scheduled.
    Closed { pending: Option<PendingOpen> },
    Open,
    /// Showing the success acknowledgement until `collapse_at`.
    SubmittedSuppressed { collapse_at: Instant },
}

/// Delays and display times, detached from the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub open_delay: Duration,
    pub reopen_delay: Duration,
    pub success_display: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&EngagementConfig::default())
    }
}

impl From<&EngagementConfig> for Timings {
    fn from(config: &EngagementConfig) -> Self {
        Self {
            open_delay: config.open_delay(),
            reopen_delay: config.reopen_delay(),
            success_display: config.success_display(),
        }
    }
}

pub struct EngagementWidget {
    timings: Timings,
    flags: Arc<dyn FlagStore>,
    state: WidgetState,
    form: LeadForm,
    submitting: bool,
    notice: Option<Notice>,
    phone_error: Option<String>,
}

impl EngagementWidget {
    /// Starts collapsed. The initial auto-open is scheduled only for visitors
    /// who never submitted.
    pub fn mount(flags: Arc<dyn FlagStore>, timings: Timings, now: Instant) -> Self {
        let pending = (!flags.get(FORM_SUBMITTED_KEY)).then(|| PendingOpen {
            at: now + timings.open_delay,
            kind: AutoOpen::InitialDelay,
        });

        Self {
            timings,
            flags,
            state: WidgetState::Closed { pending },
            form: LeadForm::default(),
            submitting: false,
            notice: None,
            phone_error: None,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, WidgetState::Closed { .. })
    }

    pub fn has_submitted(&self) -> bool {
        self.flags.get(FORM_SUBMITTED_KEY)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn phone_error(&self) -> Option<&str> {
        self.phone_error.as_deref()
    }

    /// Earliest instant at which [`EngagementWidget::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            WidgetState::Closed { pending } => pending.map(|p| p.at),
            WidgetState::Open => None,
            WidgetState::SubmittedSuppressed { collapse_at } => Some(collapse_at),
        }
    }

    /// Fires any deadline that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        match self.state {
            WidgetState::Closed {
                pending: Some(pending),
            } if pending.at <= now => {
                // The flag may have been set by another widget since scheduling.
                if self.has_submitted() {
                    log::debug!("Skipping {:?} auto-open, lead already submitted", pending.kind);
                    self.state = WidgetState::Closed { pending: None };
                } else {
                    self.state = WidgetState::Open;
                }
            }
            WidgetState::SubmittedSuppressed { collapse_at } if collapse_at <= now => {
                self.state = WidgetState::Closed { pending: None };
                self.notice = None;
            }
            _ => {}
        }
    }

    /// Visitor clicked the collapsed trigger. Always allowed; replaces any
    /// scheduled automatic open.
    pub fn open(&mut self) {
        if let WidgetState::Closed { .. } = self.state {
            self.state = WidgetState::Open;
            if matches!(self.notice, Some(Notice::Success(_))) {
                self.notice = None;
            }
        }
    }

    /// Visitor closed the panel. Schedules a reopen unless they already
    /// submitted.
    pub fn dismiss(&mut self, now: Instant) {
        match self.state {
            WidgetState::Open => {
                let pending = (!self.has_submitted()).then(|| PendingOpen {
                    at: now + self.timings.reopen_delay,
                    kind: AutoOpen::Reopen,
                });
                self.state = WidgetState::Closed { pending };
            }
            WidgetState::SubmittedSuppressed { .. } => {
                self.state = WidgetState::Closed { pending: None };
                self.notice = None;
            }
            WidgetState::Closed { .. } => {}
        }
    }

    pub fn edit(&mut self, form: LeadForm) {
        self.form = form;
    }

    /// Validates the form and marks a submission in flight.
    ///
    /// Returns `Ok(None)` while a previous submission is still pending, so
    /// repeated clicks send one request.
    pub fn begin_submit(&mut self) -> ServiceResult<Option<LeadSubmission>> {
        if self.submitting {
            return Ok(None);
        }

        match validate_lead(&self.form) {
            Ok(lead) => {
                self.phone_error = None;
                self.notice = None;
                self.submitting = true;
                Ok(Some(lead))
            }
            Err(err) => {
                self.phone_error = match &err {
                    ServiceError::Form(form_err) => form_err.message_for("phoneNumber"),
                    _ => None,
                };
                Err(err)
            }
        }
    }

    /// Applies the outcome of the submission started by
    /// [`EngagementWidget::begin_submit`].
    pub fn complete_submit(&mut self, result: ServiceResult<()>, now: Instant) {
        if !self.submitting {
            return;
        }
        self.submitting = false;

        match result {
            Ok(()) => {
                self.form.clear();
                if let Err(err) = self.flags.set(FORM_SUBMITTED_KEY, true) {
                    log::warn!("Failed to persist {FORM_SUBMITTED_KEY}: {err}");
                }
                self.state = match self.state {
                    WidgetState::Closed { .. } => WidgetState::Closed { pending: None },
                    WidgetState::Open | WidgetState::SubmittedSuppressed { .. } => {
                        self.notice = Some(Notice::Success(SUCCESS_MESSAGE.to_string()));
                        WidgetState::SubmittedSuppressed {
                            collapse_at: now + self.timings.success_display,
                        }
                    }
                };
            }
            Err(err) => {
                log::warn!("Lead submission failed: {err}");
                self.notice = Some(Notice::Alert(err.alert_message()));
            }
        }
    }

    /// Acknowledges the blocking alert.
    pub fn dismiss_alert(&mut self) {
        if matches!(self.notice, Some(Notice::Alert(_))) {
            self.notice = None;
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            is_open: self.is_open(),
            has_submitted: self.has_submitted(),
            submitting: self.submitting,
            form: self.form.clone(),
            phone_error: self.phone_error.clone(),
            notice: self.notice.clone(),
        }
    }
}

/// User input forwarded to a running widget.
#[derive(Clone, Debug)]
pub enum WidgetCommand {
    Open,
    Dismiss,
    Edit(LeadForm),
    Submit,
    DismissAlert,
}

/// Owner side of a running [`EngagementDriver`]. Dropping it stops the
/// widget, cancelling its timers and any in-flight submission.
pub struct EngagementHandle {
    commands: mpsc::UnboundedSender<WidgetCommand>,
    snapshots: watch::Receiver<WidgetSnapshot>,
}

impl EngagementHandle {
    /// Returns `false` once the widget task has stopped.
    pub fn send(&self, command: WidgetCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.snapshots.clone()
    }
}

pub struct EngagementDriver<R: ?Sized> {
    widget: EngagementWidget,
    repo: Arc<R>,
}

impl<R> EngagementDriver<R>
where
    R: LeadWriter + ?Sized + 'static,
{
    pub fn new(widget: EngagementWidget, repo: Arc<R>) -> Self {
        Self { widget, repo }
    }

    /// Moves the widget onto a tokio task.
    pub fn spawn(self) -> EngagementHandle {
        let (commands, rx) = mpsc::unbounded_channel();
        let (tx, snapshots) = watch::channel(self.widget.snapshot());
        tokio::spawn(self.run(rx, tx));
        EngagementHandle {
            commands,
            snapshots,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<WidgetCommand>,
        snapshots: watch::Sender<WidgetSnapshot>,
    ) {
        let mut submissions: JoinSet<ServiceResult<()>> = JoinSet::new();

        loop {
            let deadline = self.widget.next_deadline();
            let wake_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));

            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command, &mut submissions);
                }
                Some(joined) = submissions.join_next() => {
                    let result = joined.unwrap_or_else(|err| {
                        log::error!("Lead submission task failed: {err}");
                        Err(RepositoryError::Transport(err.to_string()).into())
                    });
                    self.widget.complete_submit(result, Instant::now());
                }
                _ = sleep_until(wake_at), if deadline.is_some() => {
                    self.widget.tick(Instant::now());
                }
            }

            if snapshots.send(self.widget.snapshot()).is_err() {
                break;
            }
        }
        log::debug!("Engagement widget stopped");
    }

    fn handle(&mut self, command: WidgetCommand, submissions: &mut JoinSet<ServiceResult<()>>) {
        match command {
            WidgetCommand::Open => self.widget.open(),
            WidgetCommand::Dismiss => self.widget.dismiss(Instant::now()),
            WidgetCommand::Edit(form) => self.widget.edit(form),
            WidgetCommand::DismissAlert => self.widget.dismiss_alert(),
            WidgetCommand::Submit => match self.widget.begin_submit() {
                Ok(Some(lead)) => {
                    let repo = Arc::clone(&self.repo);
                    submissions.spawn(async move { submit_lead(repo.as_ref(), &lead).await });
                }
                Ok(None) => log::debug!("Submission already in flight"),
                Err(err) => log::debug!("Lead form rejected: {err}"),
            },
        }
    }
}

/// Starts a widget whose flag lives in the configured file.
pub fn start_widget<R>(config: &PortalConfig, repo: Arc<R>) -> EngagementHandle
where
    R: LeadWriter + ?Sized + 'static,
{
    let flags: Arc<dyn FlagStore> = Arc::new(FileFlagStore::open(&config.flag_store_path));
    let widget = EngagementWidget::mount(flags, Timings::from(&config.engagement), Instant::now());
    EngagementDriver::new(widget, repo).spawn()
}
