//! Delivery of tournament rewards.
//!
//! Completing a tournament writes a row to the `reward_grants` outbox inside
//! the finalization transaction. [`worker::RewardsWorker`] drains that outbox
//! through a [`RewardsDispatcher`], retrying with backoff.

pub mod worker;

use async_trait::async_trait;
use serde::Serialize;
use storage::models::Placements;
use uuid::Uuid;

#[async_trait]
pub trait RewardsDispatcher: Send + Sync {
    async fn grant_tournament_rewards(
        &self,
        tournament_id: Uuid,
        placements: &Placements,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct RewardGrantPayload<'a> {
    tournament_id: Uuid,
    placements: &'a Placements,
}

/// Posts grants as JSON to a rewards webhook; any non-2xx answer is a failure
pub struct HttpRewardsDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRewardsDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RewardsDispatcher for HttpRewardsDispatcher {
    async fn grant_tournament_rewards(
        &self,
        tournament_id: Uuid,
        placements: &Placements,
    ) -> anyhow::Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&RewardGrantPayload {
                tournament_id,
                placements,
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Used when no webhook is configured
pub struct LogRewardsDispatcher;

#[async_trait]
impl RewardsDispatcher for LogRewardsDispatcher {
    async fn grant_tournament_rewards(
        &self,
        tournament_id: Uuid,
        placements: &Placements,
    ) -> anyhow::Result<()> {
        tracing::info!(
            %tournament_id,
            first = %placements.first,
            second = %placements.second,
            third = ?placements.third,
            fourth = ?placements.fourth,
            "No rewards webhook configured, grant logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn placements() -> Placements {
        Placements {
            first: Uuid::new_v4(),
            second: Uuid::new_v4(),
            third: Some(Uuid::new_v4()),
            fourth: vec![Uuid::new_v4()],
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/grants")
    }

    #[tokio::test]
    async fn test_http_dispatcher_posts_grant() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let router = Router::new()
            .route(
                "/grants",
                post(
                    |State(tx): State<mpsc::UnboundedSender<Value>>, Json(body): Json<Value>| async move {
                        tx.send(body).unwrap();
                        StatusCode::ACCEPTED
                    },
                ),
            )
            .with_state(tx);
        let endpoint = serve(router).await;

        let tournament_id = Uuid::new_v4();
        let placements = placements();
        HttpRewardsDispatcher::new(endpoint)
            .grant_tournament_rewards(tournament_id, &placements)
            .await
            .unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["tournament_id"], tournament_id.to_string());
        assert_eq!(body["placements"]["first"], placements.first.to_string());
        assert_eq!(body["placements"]["fourth"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_http_dispatcher_fails_on_server_error() {
        let router = Router::new().route(
            "/grants",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let endpoint = serve(router).await;

        let result = HttpRewardsDispatcher::new(endpoint)
            .grant_tournament_rewards(Uuid::new_v4(), &placements())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_log_dispatcher_always_succeeds() {
        let result = LogRewardsDispatcher
            .grant_tournament_rewards(Uuid::new_v4(), &placements())
            .await;

        assert!(result.is_ok());
    }
}
