//! Periodic retention cleanup.
//!
//! Each pass removes share links that expired more than the grace period
//! ago, then purges soft-deleted rows older than the trash retention window.
//! Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::TimeDelta;
use eventshare_core::error::CoreError;
use eventshare_core::types::Timestamp;
use eventshare_db::repositories::{ShareLinkRepo, TrashRepo};
use eventshare_db::DbResult;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;

/// Row counts removed by one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub expired_share_links: u64,
    pub purged_trash: u64,
}

impl RetentionReport {
    pub fn total(&self) -> u64 {
        self.expired_share_links + self.purged_trash
    }
}

/// The instant `window` before `now`.
///
/// Fails with [`CoreError::Validation`] naming `name` when the window is not
/// representable or the cutoff would fall outside the supported date range.
pub fn cutoff(now: Timestamp, window: Option<TimeDelta>, name: &str) -> Result<Timestamp, CoreError> {
    window
        .and_then(|w| now.checked_sub_signed(w))
        .ok_or_else(|| CoreError::Validation(format!("{name} is outside the supported date range")))
}

/// Run a single retention pass as of `now`.
///
/// Expired links go first so the trash purge does not count them. Both
/// cutoffs are computed before anything is deleted.
pub async fn run_once(
    pool: &PgPool,
    config: &WorkerConfig,
    now: Timestamp,
) -> DbResult<RetentionReport> {
    let link_cutoff = cutoff(now, config.share_link_grace(), "SHARE_LINK_GRACE_HOURS")?;
    let trash_cutoff = cutoff(now, config.trash_retention(), "TRASH_RETENTION_DAYS")?;

    let expired_share_links = ShareLinkRepo::delete_expired_before(pool, link_cutoff).await?;
    let purged_trash = TrashRepo::purge_older_than(pool, trash_cutoff).await?;

    Ok(RetentionReport {
        expired_share_links,
        purged_trash,
    })
}

/// Run the retention loop until `cancel` is triggered.
///
/// The first pass runs immediately. A failed pass is logged and retried on
/// the next tick.
pub async fn run(pool: PgPool, config: WorkerConfig, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = config.retention_interval.as_secs(),
        share_link_grace_hours = config.share_link_grace_hours,
        trash_retention_days = config.trash_retention_days,
        "Retention job started"
    );

    let mut interval = tokio::time::interval(config.retention_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, &config, chrono::Utc::now()).await {
                    Ok(report) if report.total() > 0 => {
                        tracing::info!(
                            expired_share_links = report.expired_share_links,
                            purged_trash = report.purged_trash,
                            "Retention: purged rows"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Retention: nothing to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Retention: cleanup failed");
                    }
                }
            }
        }
    }
}

/// How a retention task ended after cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// The task panicked or was aborted before it could stop.
    Failed,
    /// The task was still running when `grace` elapsed.
    TimedOut,
}

/// Wait up to `grace` for a cancelled retention task and log how it ended.
pub async fn await_stop(handle: JoinHandle<()>, grace: Duration) -> StopOutcome {
    match tokio::time::timeout(grace, handle).await {
        Ok(Ok(())) => {
            tracing::info!("Retention job stopped");
            StopOutcome::Stopped
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Retention job failed before shutdown");
            StopOutcome::Failed
        }
        Err(_) => {
            tracing::warn!(grace_secs = grace.as_secs_f64(), "Retention job did not stop in time");
            StopOutcome::TimedOut
        }
    }
}
