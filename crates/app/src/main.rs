//! TrainHub command-line client
//!
//! Loads configuration, restores the stored session and, when signed in,
//! syncs workouts and notifications once. Feedback the UI would show is
//! written to the log.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use trainhub_app::utils::{init_logging, spawn_feedback_logger};
use trainhub_app::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let config = trainhub_infra::config::load().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let ctx = AppContext::new(config).await.context("failed to initialize application")?;
    let feedback_task = spawn_feedback_logger(ctx.feedback.subscribe());

    match ctx.session.restore().await? {
        Some(user) => {
            info!(user = %user.display_name(), "Syncing account");
            match ctx.workouts.list().await {
                Ok(workouts) => info!(count = workouts.len(), "Workouts synced"),
                Err(err) => warn!(error = %err, "Workout sync failed"),
            }
            match ctx.notifications.list().await {
                Ok(notifications) => {
                    let unread = notifications.iter().filter(|n| !n.is_read).count();
                    info!(total = notifications.len(), unread, "Notifications synced");
                }
                Err(err) => warn!(error = %err, "Notification sync failed"),
            }
        }
        None => info!("Not signed in, nothing to sync"),
    }

    drop(ctx);
    feedback_task.await.context("feedback logger panicked")?;
    Ok(())
}
