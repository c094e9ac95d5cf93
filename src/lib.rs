#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "client")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;

#[cfg(feature = "client")]
use crate::{
    forms::login::LoginForm,
    models::config::PortalConfig,
    repository::HttpRepository,
    services::{ServiceError, ServiceResult, admin, dashboard},
};

/// Number of leads listed by [`run_digest`].
#[cfg(feature = "client")]
pub const DIGEST_LEADS: usize = 10;

/// Signs in with the configured admin account and logs the dashboard figures
/// followed by the newest leads.
#[cfg(feature = "client")]
pub async fn run_digest(config: PortalConfig) -> ServiceResult<()> {
    let repo = HttpRepository::new(&config)?;

    let (Some(identifier), Some(password)) = (config.admin_identifier, config.admin_password)
    else {
        log::error!("admin_identifier and admin_password must be configured");
        return Err(ServiceError::Unauthorized);
    };

    let session = admin::login(&repo, LoginForm { identifier, password }).await?;
    log::info!("Signed in as {}", session.user.username);
    let repo = repo.with_session(&session);

    let summary = dashboard::load_dashboard(&repo, Some(&session)).await?;
    log::info!(
        "Blogs: {}, cars: {}, messages: {}",
        summary.total_blogs,
        summary.total_cars,
        summary.total_messages
    );
    for status in &summary.lead_statuses {
        log::info!("  {}: {}", status.label, status.count);
    }

    let leads = dashboard::newest_leads(&repo, Some(&session), DIGEST_LEADS).await?;
    for lead in leads {
        log::info!(
            "{} | {} | {} | {} | {}",
            lead.created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            lead.name,
            lead.phone.as_deref().unwrap_or("-"),
            lead.destination.as_deref().unwrap_or("-"),
            lead.status()
        );
    }

    Ok(())
}
