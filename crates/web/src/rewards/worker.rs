use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use storage::{Database, error::Result, repository::reward::RewardGrantRepository};
use tokio::sync::watch;

use super::RewardsDispatcher;

const BATCH_SIZE: i64 = 20;
const LEASE_SECS: i64 = 300;
const BASE_BACKOFF_SECS: u64 = 30;
const MAX_BACKOFF_SECS: u64 = 3600;

/// Polls the reward outbox and hands due grants to the dispatcher
pub struct RewardsWorker {
    db: Database,
    dispatcher: Arc<dyn RewardsDispatcher>,
    poll_interval: Duration,
    max_attempts: i32,
}

impl RewardsWorker {
    pub fn new(
        db: Database,
        dispatcher: Arc<dyn RewardsDispatcher>,
        poll_interval: Duration,
        max_attempts: i32,
    ) -> Self {
        Self {
            db,
            dispatcher,
            poll_interval,
            max_attempts,
        }
    }

    /// Run until `shutdown` flips to true
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Rewards worker started, polling every {}s",
            self.poll_interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::warn!("Rewards outbox poll failed: {}", e);
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Rewards worker stopped");
    }

    /// Dispatch one batch of due grants, returning how many were attempted
    pub async fn run_once(&self) -> Result<usize> {
        let repo = RewardGrantRepository::new(self.db.pool());
        let grants = repo.claim_due(BATCH_SIZE, LEASE_SECS).await?;

        for grant in &grants {
            match self
                .dispatcher
                .grant_tournament_rewards(grant.tournament_id, &grant.placements)
                .await
            {
                Ok(()) => {
                    repo.mark_dispatched(grant.grant_id).await?;
                    tracing::info!(tournament_id = %grant.tournament_id, "Rewards granted");
                }
                Err(e) => {
                    let attempts = grant.attempts + 1;
                    let retry = retry_at(attempts, self.max_attempts, Utc::now());
                    match retry {
                        Some(at) => tracing::warn!(
                            tournament_id = %grant.tournament_id,
                            attempts,
                            "Rewards grant failed, retrying at {}: {:#}",
                            at,
                            e
                        ),
                        None => tracing::error!(
                            tournament_id = %grant.tournament_id,
                            attempts,
                            "Rewards grant failed permanently: {:#}",
                            e
                        ),
                    }
                    repo.record_failure(grant.grant_id, &format!("{e:#}"), retry)
                        .await?;
                }
            }
        }

        Ok(grants.len())
    }
}

/// Delay before retry number `attempts + 1`: 30s doubling, capped at an hour
pub fn backoff(attempts: i32) -> Duration {
    let exponent = attempts.clamp(0, 16) as u32;
    let secs = BASE_BACKOFF_SECS
        .saturating_mul(2u64.saturating_pow(exponent))
        .min(MAX_BACKOFF_SECS);
    Duration::from_secs(secs)
}

/// Next attempt time, or `None` once `max_attempts` is used up
pub fn retry_at(attempts: i32, max_attempts: i32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if attempts >= max_attempts {
        return None;
    }

    let delay = chrono::Duration::from_std(backoff(attempts)).ok()?;
    Some(now + delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff(0), Duration::from_secs(30));
        assert_eq!(backoff(1), Duration::from_secs(60));
        assert_eq!(backoff(3), Duration::from_secs(240));
        assert_eq!(backoff(7), Duration::from_secs(3600));
        assert_eq!(backoff(50), Duration::from_secs(3600));
    }

    #[test]
    fn test_retry_at_gives_up_after_max_attempts() {
        let now = Utc::now();

        assert_eq!(retry_at(1, 3, now), Some(now + chrono::Duration::seconds(60)));
        assert_eq!(retry_at(3, 3, now), None);
        assert_eq!(retry_at(4, 3, now), None);
    }
}
